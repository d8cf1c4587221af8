#![no_main]

use folio_core::PageConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    if let Ok(config) = PageConfig::from_json_str(input) {
        assert!(config.validate().is_ok());
    }
});
