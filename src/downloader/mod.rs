pub mod fetcher;
pub mod link;
pub mod progress;

pub use fetcher::fetch_payload;
pub use link::build_download_link;
pub use progress::{CollectingSink, NullSink, ProgressSink, ProgressUpdate};
