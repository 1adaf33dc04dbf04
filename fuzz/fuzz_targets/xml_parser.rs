#![no_main]
use libfuzzer_sys::fuzz_target;
use structcheck::XmlParser;

fuzz_target!(|data: &[u8]| {
    let _ = XmlParser::new(data).parse();
});
