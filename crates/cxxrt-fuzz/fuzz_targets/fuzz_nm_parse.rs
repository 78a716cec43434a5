#![no_main]
use libfuzzer_sys::fuzz_target;

use cxxrt_core::link::audit;
use cxxrt_core::nm::parse_listing;
use cxxrt_core::symbols::BuildVariant;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // First half as the application, second half as the shim.
    let mid = text.len() / 2;
    let split = (0..=mid).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
    let (app_text, shim_text) = text.split_at(split);

    let app = parse_listing("app.o", app_text);
    let shim = parse_listing("shim.o", shim_text);
    for entry in app.iter().chain(&shim) {
        assert!(!entry.name.is_empty());
        assert!(!entry.name.contains(char::is_whitespace));
    }

    let report = audit(&app, &shim, &BuildVariant::default());
    let mut sorted = report.unresolved.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, report.unresolved);
    for dup in &report.duplicates {
        assert!(!dup.objects.is_empty());
    }
});
