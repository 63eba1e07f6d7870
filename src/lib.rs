pub mod cli;
pub mod downloader;
pub mod error;
pub mod file_manager;
pub mod html_parser;
pub mod http;
pub mod links;
pub mod naming;

// Re-export main types for convenience
pub use cli::MirrorCommand;
pub use downloader::{FetchResult, MirrorReport, PageMirror, ResourceOutcome};
pub use error::MirrorError;
pub use file_manager::FileManager;
pub use http::{FetchError, HttpFetch, ReqwestFetch};
pub use links::ReferenceForm;
