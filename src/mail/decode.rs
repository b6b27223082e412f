//! Message decoding: MIME part walk plus base64url body decoding.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::mail::{MessagePart, RawMessage};

pub const NO_SUBJECT: &str = "no subject";

/// Decoded view of one message. Either body may be empty; downstream
/// extraction strategies cope with whichever is present.
#[derive(Debug, Clone, Default)]
pub struct DecodedEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Walk the part tree and decode the HTML and plain-text bodies. When several
/// parts carry the same media type the last one wins, which matches how
/// multipart/alternative newsletters order their renditions. Decode failures
/// leave that body empty; they never fail the message.
pub fn decode_email(message: &RawMessage) -> DecodedEmail {
    let Some(payload) = message.payload.as_ref() else {
        return DecodedEmail {
            subject: NO_SUBJECT.to_string(),
            ..DecodedEmail::default()
        };
    };

    let mut html_data: Option<&str> = None;
    let mut text_data: Option<&str> = None;

    if payload.parts.is_empty() {
        // Single-part message: the payload itself is the body.
        if let Some(data) = part_data(payload) {
            if payload.mime_type.eq_ignore_ascii_case("text/html") {
                html_data = Some(data);
            } else {
                text_data = Some(data);
            }
        }
    } else {
        walk_parts(&payload.parts, &mut html_data, &mut text_data);
    }

    let subject = payload
        .headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("subject"))
        .map(|h| h.value.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(NO_SUBJECT)
        .to_string();

    DecodedEmail {
        subject,
        html_body: html_data.map(decode_base64url).unwrap_or_default(),
        text_body: text_data.map(decode_base64url).unwrap_or_default(),
    }
}

fn walk_parts<'a>(
    parts: &'a [MessagePart],
    html_data: &mut Option<&'a str>,
    text_data: &mut Option<&'a str>,
) {
    for part in parts {
        if let Some(data) = part_data(part) {
            if part.mime_type.eq_ignore_ascii_case("text/html") {
                *html_data = Some(data);
            } else if part.mime_type.eq_ignore_ascii_case("text/plain") {
                *text_data = Some(data);
            }
        }
        if !part.parts.is_empty() {
            walk_parts(&part.parts, html_data, text_data);
        }
    }
}

fn part_data(part: &MessagePart) -> Option<&str> {
    part.body
        .as_ref()
        .and_then(|b| b.data.as_deref())
        .filter(|d| !d.is_empty())
}

/// Decode a base64url body to UTF-8 text. Providers are inconsistent about
/// padding, so it is stripped before decoding. Any failure yields "".
fn decode_base64url(data: &str) -> String {
    let trimmed = data.trim_end_matches('=');
    match URL_SAFE_NO_PAD.decode(trimmed) {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_default(),
        Err(_) => String::new(),
    }
}
