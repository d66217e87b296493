//! Helpers shared by the reqwest-backed adapters.

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Whitespace-compacted, truncated rendering of an error response body.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// `status N` or `status N: preview` for a failed response.
pub(crate) fn status_message(status: u16, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {status}")
    } else {
        format!("status {status}: {preview}")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn compacts_whitespace() {
        assert_eq!(body_preview(b"{\n  \"error\":   \"bad\"\n}"), "{ \"error\": \"bad\" }");
    }

    #[rstest]
    fn truncates_long_bodies() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }

    #[rstest]
    #[case(b"".as_slice(), "status 502")]
    #[case(b"upstream down".as_slice(), "status 502: upstream down")]
    fn status_message_includes_preview(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(status_message(502, body), expected);
    }
}
