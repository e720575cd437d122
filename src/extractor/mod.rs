pub mod models;
pub mod retry;
pub mod traits;
pub mod ytdlp;

pub use models::{SearchEntry, VideoInfo};
pub use retry::{resolve_with_retry, RetryPolicy};
pub use traits::Extractor;
pub use ytdlp::YtDlpExtractor;
