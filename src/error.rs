use std::path::PathBuf;
use thiserror::Error;

use crate::http::FetchError;

/// Fatal failure kinds for a page mirror operation.
///
/// Per-resource fetch and write failures are not represented here; they are
/// recorded in the operation's outcome report and never fail the operation.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("destination directory is not writable: {0:?}")]
    DestinationUnwritable(PathBuf),

    #[error("this page is already downloaded in the selected directory: {0:?}")]
    AlreadyDownloaded(PathBuf),

    #[error("failed to fetch page {url}: {source}")]
    PageFetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    #[error("filesystem operation failed on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
