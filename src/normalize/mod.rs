//! URL canonicalization.
//!
//! The canonical URL is the identity key for deduplication and the
//! seen-cache, so normalization must be a pure, idempotent function of its
//! input and must never fail: an unparseable URL passes through trimmed.

use percent_encoding::percent_decode_str;
use url::Url;

/// Query keys dropped during normalization, matched by prefix.
const TRACKING_PARAM_PREFIXES: &[&str] = &["utm_", "fbclid", "gclid", "igshid", "mc_cid", "mc_eid"];

/// Unwrap one level of click-tracking indirection. Alert and newsletter
/// mails route links through `google.com/url?q=<dest>` (sometimes `url=`),
/// with the real destination percent-encoded in the parameter.
pub fn unwrap_redirect(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    if let Some((_, rest)) = url.split_once("google.com/url?q=") {
        let dest = rest.split('&').next().unwrap_or("");
        if let Ok(decoded) = percent_decode_str(dest).decode_utf8()
            && !decoded.is_empty()
        {
            return decoded.into_owned();
        }
        return url.to_string();
    }

    if url.contains("google.com/url?")
        && let Ok(parsed) = Url::parse(url)
    {
        let mut url_param = None;
        let mut q_param = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "url" if url_param.is_none() => url_param = Some(value.into_owned()),
                "q" if q_param.is_none() => q_param = Some(value.into_owned()),
                _ => {}
            }
        }
        if let Some(target) = url_param.or(q_param)
            && !target.is_empty()
        {
            return target;
        }
    }

    url.to_string()
}

/// Canonicalize a raw URL: unwrap indirection, drop tracking parameters,
/// clear the fragment, strip a leading `www.` and a single trailing slash.
pub fn normalize_url(raw: &str) -> String {
    let unwrapped = unwrap_redirect(raw.trim());
    let trimmed = unwrapped.trim();

    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    url.set_fragment(None);

    if let Some(host) = url.host_str()
        && let Some(stripped) = host.strip_prefix("www.")
    {
        let stripped = stripped.to_string();
        let _ = url.set_host(Some(&stripped));
    }

    let mut out = url.to_string();
    // A `//` tail is left alone: eating one slash at a time would make the
    // function non-idempotent, and such URLs fail the structural filter.
    if out.ends_with('/') && !out.ends_with("//") {
        out.pop();
    }
    out
}

/// Hostname with any leading `www.` removed; `None` when the URL has none.
pub fn safe_hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .map(|h| h.strip_prefix("www.").unwrap_or(h).to_string())
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    TRACKING_PARAM_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_tracking_params_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/news/2025/story?utm_source=newsletter&utm_medium=email#top"),
            "https://example.com/news/2025/story"
        );
        assert_eq!(
            normalize_url("https://example.com/a?fbclid=xyz&id=7&gclid=1"),
            "https://example.com/a?id=7"
        );
    }

    #[test]
    fn keeps_meaningful_params() {
        assert_eq!(
            normalize_url("https://example.com/read?id=42"),
            "https://example.com/read?id=42"
        );
    }

    #[test]
    fn strips_www_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://www.example.com/story/"),
            "https://example.com/story"
        );
        assert_eq!(normalize_url("https://www.example.com"), "https://example.com");
    }

    #[test]
    fn unwraps_google_redirect() {
        assert_eq!(
            unwrap_redirect(
                "https://www.google.com/url?q=https%3A%2F%2Fexample.com%2Fstory&sa=D&usg=xyz"
            ),
            "https://example.com/story"
        );
        assert_eq!(
            unwrap_redirect("https://www.google.com/url?url=https%3A%2F%2Fexample.com%2Fa&x=1"),
            "https://example.com/a"
        );
        assert_eq!(unwrap_redirect("https://example.com/a"), "https://example.com/a");
    }

    #[test]
    fn normalize_applies_unwrap_before_cleaning() {
        assert_eq!(
            normalize_url(
                "https://www.google.com/url?q=https%3A%2F%2Fwww.example.com%2Fnews%2F%3Futm_source%3Dalert"
            ),
            "https://example.com/news"
        );
    }

    #[test]
    fn unparseable_input_passes_through_trimmed() {
        assert_eq!(normalize_url("  not a url  "), "not a url");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn normalization_is_idempotent_on_known_shapes() {
        let inputs = [
            "https://www.example.com/news/2025/story/?utm_source=x#frag",
            "https://example.com",
            "https://example.com/read?id=42&utm_campaign=z",
            "HTTPS://EXAMPLE.COM/Path/",
            "https://example.com//",
            "not a url",
            "www.example.com/story",
        ];
        for input in inputs {
            let once = normalize_url(input);
            assert_eq!(normalize_url(&once), once, "input: {input}");
        }
    }

    proptest! {
        #[test]
        fn idempotent_on_url_shaped_input(
            url in r"https?://(www\.)?[a-z]{1,8}\.[a-z]{2,3}(/[a-z0-9]{0,6}){0,4}/?(\?[a-z_]{1,10}=[a-z0-9%]{0,6}(&[a-z_]{1,10}=[a-z0-9]{0,6}){0,2})?(#[a-z]{0,4})?"
        ) {
            let once = normalize_url(&url);
            prop_assert_eq!(normalize_url(&once), once);
        }

        #[test]
        fn idempotent_and_total_on_arbitrary_input(input in ".*") {
            let once = normalize_url(&input);
            prop_assert_eq!(normalize_url(&once), once);
        }
    }
}
