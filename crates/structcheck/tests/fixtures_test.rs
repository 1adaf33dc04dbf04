use std::fs;
use std::path::{Path, PathBuf};

use structcheck::{ErrorKind, LoadTarget, StructureVerifier, VerificationResult};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn template() -> PathBuf {
    Path::new(FIXTURES).join("template.xml")
}

fn fixtures(dir: &str) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(Path::new(FIXTURES).join(dir))? {
        paths.push(entry?.path());
    }
    paths.sort();
    Ok(paths)
}

/// Invalid fixtures are named after the divergence they trigger
fn expected_kind(path: &Path) -> Option<ErrorKind> {
    let stem = path.file_stem()?.to_str()?;
    if stem.starts_with("load_") {
        Some(ErrorKind::Load(LoadTarget::Candidate))
    } else if stem.starts_with("node_availability_") {
        Some(ErrorKind::NodeAvailability)
    } else if stem.starts_with("node_name_") {
        Some(ErrorKind::NodeName)
    } else if stem.starts_with("attribute_") {
        Some(ErrorKind::Attribute)
    } else {
        None
    }
}

#[test]
fn test_template_matches_itself() {
    let mut verifier = StructureVerifier::new(template(), template());
    assert_eq!(verifier.verify(), VerificationResult::Valid);
}

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    for path in fixtures("valid")? {
        let result = StructureVerifier::new(path.clone(), template()).verify();
        if !result.is_valid() {
            return Err(std::io::Error::other(format!(
                "valid fixture rejected: {path:?}: {result:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    for path in fixtures("invalid")? {
        let expected = expected_kind(&path)
            .ok_or_else(|| std::io::Error::other(format!("unnamed fixture: {path:?}")))?;
        let result = StructureVerifier::new(path.clone(), template()).verify();
        if result.kind() != Some(expected) {
            return Err(std::io::Error::other(format!(
                "fixture {path:?}: expected {expected:?}, got {result:?}"
            ))
            .into());
        }
    }
    Ok(())
}
