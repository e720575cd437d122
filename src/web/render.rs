//! HTML rendering for the render-model values the handlers produce
//!
//! Handlers compute plain view values; everything string-shaped for the
//! browser happens here, including progress formatting.

use crate::downloader::ProgressUpdate;
use crate::extractor::VideoInfo;
use crate::utils::escape_html;
use crate::web::handlers::{FetchOutcome, FetchView, SearchView, RESOLUTION_LABELS};

/// Page chrome shared by every response.
fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 640px; margin: 2em auto; }}\n\
         .error {{ color: #b00020; }}\n\
         .warning {{ color: #8a6d00; }}\n\
         .success {{ color: #1b5e20; }}\n\
         .download-button {{ text-decoration: none; background-color: #008CBA; color: #ffffff; \
         padding: 10px 20px; border-radius: 5px; cursor: pointer; }}\n\
         </style>\n</head>\n<body>\n<h1>Medialink</h1>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// The landing page: one form per mode.
pub fn index_page() -> String {
    let mut options = String::new();
    for label in RESOLUTION_LABELS {
        options.push_str(&format!("<option value=\"{label}\">{label}</option>"));
    }

    let body = format!(
        "<h2>Fetch a video</h2>\n\
         <form action=\"/fetch\" method=\"get\">\n\
         <p><label>Video URL <input type=\"text\" name=\"url\" size=\"48\"></label></p>\n\
         <p><label>Resolution <select name=\"resolution\">{}</select></label></p>\n\
         <p><button type=\"submit\">Fetch Video</button></p>\n\
         </form>\n\
         <h2>Search for videos</h2>\n\
         <form action=\"/search\" method=\"get\">\n\
         <p><label>Query <input type=\"text\" name=\"q\" size=\"48\"></label></p>\n\
         <p><button type=\"submit\">Search</button></p>\n\
         </form>",
        options
    );
    page("Medialink", &body)
}

/// The four metadata lines, exactly as displayed.
pub fn metadata_lines(info: &VideoInfo) -> [String; 4] {
    [
        format!("Title: {}", info.title),
        format!("Views: {}", display_count(info.view_count)),
        format!("Likes: {}", display_count(info.like_count)),
        format!("Duration: {} seconds", display_count(info.duration)),
    ]
}

fn display_count(value: Option<u64>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => "N/A".to_string(),
    }
}

/// Format one structured progress update for display.
pub fn format_progress(update: &ProgressUpdate) -> String {
    let eta = match update.eta {
        Some(eta) => format!("{}s", eta.as_secs()),
        None => "unknown".to_string(),
    };
    format!(
        "Downloading... {:.1}% complete ({}, ETA: {})",
        update.percent,
        format_speed(update.speed),
        eta
    )
}

fn format_speed(bytes_per_sec: f64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    const KIB: f64 = 1024.0;
    if bytes_per_sec >= MIB {
        format!("{:.2} MiB/s", bytes_per_sec / MIB)
    } else if bytes_per_sec >= KIB {
        format!("{:.2} KiB/s", bytes_per_sec / KIB)
    } else {
        format!("{:.0} B/s", bytes_per_sec)
    }
}

/// Result page for the direct-fetch mode.
pub fn fetch_page(view: &FetchView) -> String {
    let mut body = String::new();

    for update in &view.progress {
        body.push_str(&format!("<p>{}</p>\n", escape_html(&format_progress(update))));
    }

    match &view.outcome {
        FetchOutcome::Resolved { info, anchor } => {
            body.push_str(&format!(
                "<p class=\"success\">Video information fetched: {}</p>\n",
                escape_html(&info.title)
            ));
            body.push_str("<p>Video Metadata:</p>\n<ul>\n");
            for line in metadata_lines(info) {
                body.push_str(&format!("<li>{}</li>\n", escape_html(&line)));
            }
            body.push_str("</ul>\n");
            body.push_str(&format!(
                "<p>Video URL: <a href=\"{0}\">{0}</a></p>\n",
                escape_html(&info.direct_url)
            ));
            // the anchor is markup we produced, not user text
            body.push_str(&format!("<p>{}</p>\n", anchor));
        }
        FetchOutcome::Failed { message } => {
            body.push_str(&format!(
                "<p class=\"error\">An error occurred: {}</p>\n",
                escape_html(message)
            ));
        }
    }

    body.push_str("<p><a href=\"/\">Back</a></p>");
    page("Medialink - Fetch", &body)
}

/// Result page for the search mode.
pub fn search_page(view: &SearchView) -> String {
    let mut body = format!("<h2>Search Results: {}</h2>\n", escape_html(&view.query));

    if let Some(warning) = &view.warning {
        body.push_str(&format!(
            "<p class=\"warning\">{}</p>\n",
            escape_html(warning)
        ));
    }

    if !view.entries.is_empty() {
        body.push_str("<ul>\n");
        for entry in &view.entries {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                escape_html(&entry.url),
                escape_html(&entry.title)
            ));
        }
        body.push_str("</ul>\n");
    }

    body.push_str("<p><a href=\"/\">Back</a></p>");
    page("Medialink - Search", &body)
}

/// Generic top-level failure page. Only download-link construction failures
/// land here; everything else renders inline.
pub fn error_page(message: &str) -> String {
    let body = format!(
        "<p class=\"error\">Something went wrong: {}</p>\n<p><a href=\"/\">Back</a></p>",
        escape_html(message)
    );
    page("Medialink - Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn demo_info() -> VideoInfo {
        VideoInfo {
            title: "Demo".to_string(),
            direct_url: "https://cdn.example.com/v.mp4".to_string(),
            view_count: Some(100),
            like_count: Some(10),
            duration: Some(42),
        }
    }

    #[test]
    fn test_metadata_lines_exact() {
        let lines = metadata_lines(&demo_info());
        assert_eq!(
            lines,
            [
                "Title: Demo".to_string(),
                "Views: 100".to_string(),
                "Likes: 10".to_string(),
                "Duration: 42 seconds".to_string(),
            ]
        );
    }

    #[test]
    fn test_metadata_lines_unknown_fields() {
        let info = VideoInfo {
            title: "Demo".to_string(),
            direct_url: "https://cdn.example.com/v.mp4".to_string(),
            view_count: None,
            like_count: None,
            duration: None,
        };
        let lines = metadata_lines(&info);
        assert_eq!(lines[1], "Views: N/A");
        assert_eq!(lines[2], "Likes: N/A");
        assert_eq!(lines[3], "Duration: N/A seconds");
    }

    #[test]
    fn test_format_progress() {
        let update = ProgressUpdate {
            percent: 42.5,
            speed: 5.2 * 1024.0 * 1024.0,
            eta: Some(Duration::from_secs(15)),
        };
        assert_eq!(
            format_progress(&update),
            "Downloading... 42.5% complete (5.20 MiB/s, ETA: 15s)"
        );
    }

    #[test]
    fn test_format_progress_unknown_eta() {
        let update = ProgressUpdate {
            percent: 1.0,
            speed: 512.0,
            eta: None,
        };
        assert_eq!(
            format_progress(&update),
            "Downloading... 1.0% complete (512 B/s, ETA: unknown)"
        );
    }

    #[test]
    fn test_index_page_lists_every_resolution() {
        let html = index_page();
        for label in RESOLUTION_LABELS {
            assert!(html.contains(label), "missing {label}");
        }
        assert!(html.contains("action=\"/fetch\""));
        assert!(html.contains("action=\"/search\""));
    }

    #[test]
    fn test_fetch_page_renders_metadata_and_anchor() {
        let view = FetchView {
            progress: vec![],
            outcome: FetchOutcome::Resolved {
                info: demo_info(),
                anchor: "<a href=\"data:video/mp4;base64,\" download=\"Demo.mp4\">Download Demo</a>"
                    .to_string(),
            },
        };
        let html = fetch_page(&view);
        assert!(html.contains("Title: Demo"));
        assert!(html.contains("Video information fetched: Demo"));
        assert!(html.contains("download=\"Demo.mp4\""));
        assert!(html.contains("https://cdn.example.com/v.mp4"));
    }

    #[test]
    fn test_fetch_page_renders_inline_failure() {
        let view = FetchView {
            progress: vec![],
            outcome: FetchOutcome::Failed {
                message: "Video download link not found".to_string(),
            },
        };
        let html = fetch_page(&view);
        assert!(html.contains("An error occurred: Video download link not found"));
    }

    #[test]
    fn test_search_page_escapes_titles() {
        let view = SearchView {
            query: "cats".to_string(),
            entries: vec![crate::extractor::SearchEntry {
                title: "<script>alert(1)</script>".to_string(),
                url: "https://example.com/1".to_string(),
            }],
            warning: None,
        };
        let html = search_page(&view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_search_page_warning_without_entries() {
        let view = SearchView {
            query: "nothing".to_string(),
            entries: vec![],
            warning: Some("No search results found.".to_string()),
        };
        let html = search_page(&view);
        assert!(html.contains("No search results found."));
        assert!(!html.contains("<ul>"));
    }
}
