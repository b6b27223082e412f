#![no_main]

use libfuzzer_sys::fuzz_target;

use newsbrief::extract::{self, ExtractOptions};
use newsbrief::mail::decode::DecodedEmail;

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let body = String::from_utf8_lossy(data).to_string();

    let email = DecodedEmail {
        subject: "fuzz subject line".to_string(),
        html_body: body.clone(),
        text_body: body,
    };

    let opts = ExtractOptions {
        min_title_length: 12,
        snippet_max_len: 320,
    };

    // The extractor should never panic regardless of input
    let _ = extract::extract(&email, &opts);
});
