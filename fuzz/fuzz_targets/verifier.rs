#![no_main]
use libfuzzer_sys::fuzz_target;
use structcheck::{from_xml_bytes, verify_documents, VerifyConfig};

// Split the input in two and compare the halves; the walk must terminate
// and a document must always match itself.
fuzz_target!(|data: &[u8]| {
    let mid = data.len() / 2;
    let (left, right) = data.split_at(mid);
    if let (Ok(candidate), Ok(template)) = (from_xml_bytes(left), from_xml_bytes(right)) {
        let config = VerifyConfig::default();
        let _ = verify_documents(&candidate, &template, &config);
        assert!(verify_documents(&candidate, &candidate, &config).is_valid());
    }
});
