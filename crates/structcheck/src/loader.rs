//! Document loading

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::error::Error as ParseError;
use crate::input::Source;
use crate::xml::{Config, Document, Parser};

/// Failure to turn a source into a parsed document
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {name}: {error}")]
    Io {
        name: String,
        #[source]
        error: std::io::Error,
    },
    #[error("failed to parse {name}: {error}")]
    Parse {
        name: String,
        #[source]
        error: ParseError,
    },
}

impl LoadError {
    /// Display name of the source that failed
    pub fn name(&self) -> &str {
        match self {
            Self::Io { name, .. } | Self::Parse { name, .. } => name,
        }
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { error, .. } => Some(error),
            Self::Io { .. } => None,
        }
    }
}

/// Load a document with the default parser limits
pub fn load(source: &Source) -> Result<Document, LoadError> {
    load_with_config(source, Config::default())
}

#[instrument(skip_all, fields(source = %source))]
pub fn load_with_config(source: &Source, config: Config) -> Result<Document, LoadError> {
    let bytes = source.read().map_err(|error| {
        warn!(%error, "failed to read document");
        LoadError::Io {
            name: source.name().into_owned(),
            error,
        }
    })?;

    let document = Parser::with_config(&bytes, config)
        .parse()
        .map_err(|error| {
            warn!(%error, "document is not well-formed");
            LoadError::Parse {
                name: source.name().into_owned(),
                error,
            }
        })?;

    debug!(elements = document.len(), "document loaded");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::xml::Node;

    #[test]
    fn test_load_from_bytes() -> Result<(), LoadError> {
        let doc = load(&Source::from_str("inline", "<Project><Name/></Project>"))?;
        assert_eq!(doc.root_node().map(Node::name), Some("Project"));
        assert_eq!(doc.len(), 2);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(&Source::from_path("no/such/project.xml")).err();
        assert!(matches!(err, Some(LoadError::Io { .. })));
        assert_eq!(err.as_ref().map(LoadError::name), Some("no/such/project.xml"));
    }

    #[test]
    fn test_load_malformed() {
        let err = load(&Source::from_str("broken", "<Project><Name></Project>")).err();
        assert!(matches!(
            err.as_ref().and_then(LoadError::parse_error).map(ParseError::kind),
            Some(ErrorKind::MismatchedTag { .. })
        ));
        let message = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(message.starts_with("failed to parse broken: error at 1:"));
    }

    #[test]
    fn test_load_respects_config() {
        let err = load_with_config(
            &Source::from_str("deep", "<a><b><c/></b></a>"),
            Config::new(2, 0),
        )
        .err();
        assert!(matches!(
            err.as_ref().and_then(LoadError::parse_error).map(ParseError::kind),
            Some(ErrorKind::MaxDepthExceeded { max: 2 })
        ));
    }
}
