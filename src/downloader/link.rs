//! Download-link assembly
//!
//! Turns a buffered media payload into an anchor the browser can save
//! without another server hop: the href is a base64 data URI carrying the
//! entire payload, and the `download` attribute names the saved file.

use crate::utils::escape_html;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Render an HTML anchor whose href inlines `payload` as a data URI.
///
/// The `download` attribute is `{title}.mp4`.
pub fn build_download_link(payload: &[u8], title: &str) -> String {
    let encoded = STANDARD.encode(payload);
    format!(
        r#"<a href="data:video/mp4;base64,{encoded}" download="{file}" class="download-button">Download {label}</a>"#,
        file = escape_html(&format!("{}.mp4", title)),
        label = escape_html(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pull the base64 payload back out of the rendered anchor.
    fn extract_b64(anchor: &str) -> &str {
        let start = anchor.find("base64,").expect("data URI") + "base64,".len();
        let end = anchor[start..].find('"').expect("closing quote") + start;
        &anchor[start..end]
    }

    #[test]
    fn test_payload_round_trips_through_base64() {
        let payload: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        let anchor = build_download_link(&payload, "Demo");

        let decoded = STANDARD.decode(extract_b64(&anchor)).expect("valid base64");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_download_attribute_is_title_dot_mp4() {
        let anchor = build_download_link(b"bytes", "Demo");
        assert!(anchor.contains(r#"download="Demo.mp4""#), "anchor: {anchor}");
    }

    #[test]
    fn test_anchor_shape() {
        let anchor = build_download_link(b"abc", "Clip");
        assert!(anchor.starts_with(r#"<a href="data:video/mp4;base64,"#));
        assert!(anchor.ends_with("</a>"));
        assert!(anchor.contains(">Download Clip<"));
    }

    #[test]
    fn test_empty_payload() {
        let anchor = build_download_link(b"", "Empty");
        assert_eq!(extract_b64(&anchor), "");
    }

    #[test]
    fn test_title_is_escaped_in_markup() {
        let anchor = build_download_link(b"x", r#"A "quoted" <title>"#);
        assert!(!anchor.contains("<title>"));
        assert!(anchor.contains("&quot;quoted&quot;"));
    }
}
