//! Structural verification of a candidate document against a template
//!
//! Two documents match when they have the same element skeleton: the same
//! tag names in the same positions, each carrying the same attribute names.
//! Attribute values and text content are never compared.
//!
//! # Example
//!
//! ```
//! use structcheck::{ErrorKind, Source, StructureVerifier};
//!
//! let template = Source::from_str("template.xml", "<Project><Name/><Version/></Project>");
//! let candidate = Source::from_str("project.xml", "<Project><Name>Alpha</Name></Project>");
//!
//! let mut verifier = StructureVerifier::new(candidate, template);
//! let result = verifier.verify();
//!
//! assert!(!result.is_valid());
//! assert_eq!(verifier.last_error_code(), Some(ErrorKind::NodeAvailability));
//! ```

mod attributes;
mod node;

use std::fmt;

use tracing::{debug, info, instrument};

use crate::input::Source;
use crate::loader::{load_with_config, LoadError};
use crate::xml::{self, Document};

/// Which of the two documents failed to load
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LoadTarget {
    /// The user-supplied document under test
    Candidate,
    /// The reference template shipped with the application
    Format,
}

/// Kind of divergence found by the verifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// A document could not be read or is not well-formed
    Load(LoadTarget),
    /// An element exists on one side only
    NodeAvailability,
    /// Elements at the same position have different tag names
    NodeName,
    /// Elements at the same position have different attribute names
    Attribute,
}

impl ErrorKind {
    /// Stable numeric code
    pub const fn code(self) -> u8 {
        match self {
            Self::Load(LoadTarget::Candidate) => 1,
            Self::Load(LoadTarget::Format) => 2,
            Self::NodeAvailability => 3,
            Self::NodeName => 4,
            Self::Attribute => 5,
        }
    }

    /// User-facing message for this kind
    pub const fn message(self) -> &'static str {
        match self {
            Self::Load(LoadTarget::Candidate) => "candidate not loaded properly",
            Self::Load(LoadTarget::Format) => "format document not loaded",
            Self::NodeAvailability => "tag missing or extra node present",
            Self::NodeName => "tag name does not match the format document",
            Self::Attribute => "attribute names do not match the format document",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// First structural difference found between two documents
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Divergence {
    kind: ErrorKind,
    code: u8,
    message: String,
    location: Option<String>,
}

impl Divergence {
    pub fn new(kind: ErrorKind, location: Option<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: kind.message().to_string(),
            location,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn code(&self) -> u8 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Tag path of the element where the walk stopped, if any
    ///
    /// For a missing element this is the path in the template; otherwise it
    /// is the path in the candidate.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} (at {location})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of a verification run
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "status", content = "divergence", rename_all = "snake_case")
)]
pub enum VerificationResult {
    Valid,
    Invalid(Divergence),
}

impl VerificationResult {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub const fn divergence(&self) -> Option<&Divergence> {
        match self {
            Self::Valid => None,
            Self::Invalid(divergence) => Some(divergence),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.divergence().map(Divergence::kind)
    }
}

impl From<Result<(), Divergence>> for VerificationResult {
    fn from(result: Result<(), Divergence>) -> Self {
        match result {
            Ok(()) => Self::Valid,
            Err(divergence) => Self::Invalid(divergence),
        }
    }
}

/// How attribute lists are compared
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttributeOrder {
    /// Same names in the same order
    #[default]
    Strict,
    /// Same set of names in any order
    Any,
}

/// Verification settings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Required root tag; `None` compares the two root elements as they are
    pub root: Option<String>,
    pub attribute_order: AttributeOrder,
    /// Limits for loading both documents
    pub parser: xml::Config,
}

impl VerifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_attribute_order(mut self, order: AttributeOrder) -> Self {
        self.attribute_order = order;
        self
    }

    #[must_use]
    pub fn with_parser_config(mut self, parser: xml::Config) -> Self {
        self.parser = parser;
        self
    }
}

/// Compare two already loaded documents
pub fn verify_documents(
    candidate: &Document,
    template: &Document,
    config: &VerifyConfig,
) -> VerificationResult {
    let root = config.root.as_deref();
    node::compare(
        candidate,
        node::designated_root(candidate, root),
        template,
        node::designated_root(template, root),
        config,
    )
    .into()
}

/// Checks a candidate document against a reference template
///
/// Construction does no I/O; both documents are loaded on each call to
/// [`verify`](Self::verify) and dropped before it returns.
#[derive(Debug)]
pub struct StructureVerifier {
    candidate: Source,
    template: Source,
    config: VerifyConfig,
    last_error: Option<Divergence>,
    last_load_error: Option<LoadError>,
}

impl StructureVerifier {
    pub fn new(candidate: impl Into<Source>, template: impl Into<Source>) -> Self {
        Self::with_config(candidate, template, VerifyConfig::default())
    }

    pub fn with_config(
        candidate: impl Into<Source>,
        template: impl Into<Source>,
        config: VerifyConfig,
    ) -> Self {
        Self {
            candidate: candidate.into(),
            template: template.into(),
            config,
            last_error: None,
            last_load_error: None,
        }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Load both documents and compare them
    ///
    /// The candidate is loaded first; if it fails, the template is never
    /// opened.
    #[instrument(skip_all, fields(candidate = %self.candidate, template = %self.template))]
    pub fn verify(&mut self) -> VerificationResult {
        self.last_error = None;
        self.last_load_error = None;

        let result = match self.load_documents() {
            Ok((candidate, template)) => verify_documents(&candidate, &template, &self.config),
            Err(divergence) => VerificationResult::Invalid(divergence),
        };

        match &result {
            VerificationResult::Valid => info!("document matches template"),
            VerificationResult::Invalid(divergence) => {
                info!(code = divergence.code(), %divergence, "document rejected");
                self.last_error = Some(divergence.clone());
            }
        }
        result
    }

    fn load_documents(&mut self) -> Result<(Document, Document), Divergence> {
        let candidate = self
            .load(LoadTarget::Candidate)
            .ok_or_else(|| Divergence::new(ErrorKind::Load(LoadTarget::Candidate), None))?;
        let template = self
            .load(LoadTarget::Format)
            .ok_or_else(|| Divergence::new(ErrorKind::Load(LoadTarget::Format), None))?;
        Ok((candidate, template))
    }

    fn load(&mut self, target: LoadTarget) -> Option<Document> {
        let source = match target {
            LoadTarget::Candidate => &self.candidate,
            LoadTarget::Format => &self.template,
        };
        match load_with_config(source, self.config.parser) {
            Ok(document) => Some(document),
            Err(err) => {
                debug!(?target, %err, "load failed");
                self.last_load_error = Some(err);
                None
            }
        }
    }

    /// Kind of the most recent failure; `None` before any run or after a
    /// successful one
    pub fn last_error_code(&self) -> Option<ErrorKind> {
        self.last_error.as_ref().map(Divergence::kind)
    }

    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error.as_ref().map(Divergence::message)
    }

    pub fn last_error(&self) -> Option<&Divergence> {
        self.last_error.as_ref()
    }

    /// Read or parse error behind the most recent load failure
    pub fn last_load_error(&self) -> Option<&LoadError> {
        self.last_load_error.as_ref()
    }
}
