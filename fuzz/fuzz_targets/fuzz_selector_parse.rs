#![no_main]

use folio_core::Selector;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let Ok(selector) = Selector::parse(input) else {
        return;
    };
    // Rendering a parsed selector must parse back to the same selector.
    let rendered = selector.to_string();
    let reparsed = Selector::parse(&rendered).expect("rendered selector parses");
    assert_eq!(selector, reparsed, "render/parse drift for {input:?}");
});
