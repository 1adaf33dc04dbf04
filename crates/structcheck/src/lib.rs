//! structcheck - structural verification of XML documents
//!
//! Checks that a candidate document has the same element skeleton as a
//! reference template: matching tag names at every position and matching
//! attribute names on every element. Values and text are ignored, and only
//! the first divergence (in document preorder) is reported.
//!
//! # Quick Start
//!
//! ```
//! use structcheck::{Source, StructureVerifier, VerificationResult};
//!
//! let template = Source::from_str("format.xml", r#"<Project id=""><Name/></Project>"#);
//! let candidate = Source::from_str("project.xml", r#"<Project id="42"><Name>Beta</Name></Project>"#);
//!
//! let mut verifier = StructureVerifier::new(candidate, template);
//! assert_eq!(verifier.verify(), VerificationResult::Valid);
//! ```

#![forbid(unsafe_code)]

pub mod cursor;
pub mod error;
pub use error::{Error as ParseError, ErrorKind as ParseErrorKind, Pos, Result, Span};

pub mod input;
pub use input::Source;

pub mod loader;
pub use loader::{load, load_with_config, LoadError};

pub mod verify;
pub use verify::{
    verify_documents, AttributeOrder, Divergence, ErrorKind, LoadTarget, StructureVerifier,
    VerificationResult, VerifyConfig,
};

pub mod xml;
pub use xml::{
    Config as ParserConfig, Document as XmlDocument, Node as XmlNode, NodeId,
    Parser as XmlParser,
};

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    XmlParser::new(s.as_bytes()).parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    XmlParser::new(bytes).parse()
}
