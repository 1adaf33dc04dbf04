use std::fs;
use std::path::PathBuf;

use structcheck::{
    from_xml_str, verify_documents, ErrorKind, LoadError, LoadTarget, StructureVerifier,
    VerificationResult, VerifyConfig,
};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    fn write(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn verify_files(candidate: &str, template: &str) -> std::io::Result<VerificationResult> {
    let ws = Workspace::new()?;
    let candidate = ws.write("project.xml", candidate)?;
    let template = ws.write("format.xml", template)?;
    Ok(StructureVerifier::new(candidate, template).verify())
}

#[test]
fn test_missing_sibling() -> std::io::Result<()> {
    let result = verify_files(
        "<Project><Name/></Project>",
        "<Project><Name/><Version/></Project>",
    )?;
    assert_eq!(result.kind(), Some(ErrorKind::NodeAvailability));
    Ok(())
}

#[test]
fn test_missing_root_attribute() -> std::io::Result<()> {
    let result = verify_files(
        "<Project><Name/></Project>",
        "<Project id=\"\"><Name/></Project>",
    )?;
    assert_eq!(result.kind(), Some(ErrorKind::Attribute));
    Ok(())
}

#[test]
fn test_text_content_is_ignored() -> std::io::Result<()> {
    let result = verify_files(
        "<Project><Name>Alpha</Name></Project>",
        "<Project><Name>Beta</Name></Project>",
    )?;
    assert_eq!(result, VerificationResult::Valid);
    Ok(())
}

#[test]
fn test_attribute_values_are_ignored() -> std::io::Result<()> {
    let result = verify_files(
        "<Project id=\"7\" lang=\"sa\"><Name/></Project>",
        "<Project id=\"\" lang=\"\"><Name/></Project>",
    )?;
    assert!(result.is_valid());
    Ok(())
}

#[test]
fn test_tag_names_are_case_sensitive() -> std::io::Result<()> {
    let result = verify_files("<Project><name/></Project>", "<Project><Name/></Project>")?;
    assert_eq!(result.kind(), Some(ErrorKind::NodeName));
    Ok(())
}

#[test]
fn test_extra_child_either_side() -> std::io::Result<()> {
    let extra = verify_files("<Project><Name><A/></Name></Project>", "<Project><Name/></Project>")?;
    let missing = verify_files("<Project><Name/></Project>", "<Project><Name><A/></Name></Project>")?;
    assert_eq!(extra.kind(), Some(ErrorKind::NodeAvailability));
    assert_eq!(missing.kind(), Some(ErrorKind::NodeAvailability));
    Ok(())
}

#[test]
fn test_candidate_checked_before_template() -> std::io::Result<()> {
    let ws = Workspace::new()?;
    let mut verifier =
        StructureVerifier::new(ws.missing("project.xml"), ws.missing("format.xml"));

    let result = verifier.verify();
    assert_eq!(result.kind(), Some(ErrorKind::Load(LoadTarget::Candidate)));
    assert_eq!(
        verifier.last_error_message(),
        Some("candidate not loaded properly")
    );
    assert!(matches!(
        verifier.last_load_error(),
        Some(LoadError::Io { name, .. }) if name.ends_with("project.xml")
    ));
    Ok(())
}

#[test]
fn test_malformed_candidate() -> std::io::Result<()> {
    let result = verify_files("<Project><Name></Project>", "<Project><Name/></Project>")?;
    assert_eq!(result.kind(), Some(ErrorKind::Load(LoadTarget::Candidate)));
    Ok(())
}

#[test]
fn test_missing_template() -> std::io::Result<()> {
    let ws = Workspace::new()?;
    let candidate = ws.write("project.xml", "<Project/>")?;
    let mut verifier = StructureVerifier::new(candidate, ws.missing("format.xml"));

    assert_eq!(
        verifier.verify().kind(),
        Some(ErrorKind::Load(LoadTarget::Format))
    );
    assert_eq!(verifier.last_error_message(), Some("format document not loaded"));
    Ok(())
}

#[test]
fn test_verifier_can_run_repeatedly() -> std::io::Result<()> {
    let ws = Workspace::new()?;
    let candidate = ws.write("project.xml", "<Project><Name/></Project>")?;
    let template = ws.write("format.xml", "<Project><Name/><Version/></Project>")?;
    let mut verifier = StructureVerifier::new(candidate.clone(), template);

    assert!(!verifier.verify().is_valid());
    assert_eq!(verifier.last_error_code(), Some(ErrorKind::NodeAvailability));

    fs::write(&candidate, "<Project><Name>x</Name><Version>2</Version></Project>")?;
    assert!(verifier.verify().is_valid());
    assert_eq!(verifier.last_error_code(), None);
    Ok(())
}

#[test]
fn test_verify_parsed_documents() -> structcheck::Result<()> {
    let candidate = from_xml_str("<Project><Files><File path=\"a\"/><File/></Files></Project>")?;
    let template = from_xml_str("<Project><Files><File path=\"\"/><File path=\"\"/></Files></Project>")?;

    let result = verify_documents(&candidate, &template, &VerifyConfig::default());
    assert_eq!(result.kind(), Some(ErrorKind::Attribute));
    assert_eq!(
        result.divergence().and_then(|d| d.location()),
        Some("/Project/Files/File[2]")
    );
    Ok(())
}
