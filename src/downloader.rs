use std::path::{Path, PathBuf};

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use url::Url;

use crate::error::MirrorError;
use crate::file_manager::FileManager;
use crate::html_parser;
use crate::http::HttpFetch;
use crate::links;
use crate::naming;

/// Per-resource record of one mirror operation.
#[derive(Debug)]
pub struct ResourceOutcome {
    pub source_url: Url,
    pub local_name: String,
    pub result: FetchResult,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchResult {
    Downloaded,
    Failed,
}

/// Aggregate result of a successful mirror operation. Failed resources do
/// not fail the operation; they only show up here.
#[derive(Debug)]
pub struct MirrorReport {
    pub page_path: PathBuf,
    pub outcomes: Vec<ResourceOutcome>,
}

impl MirrorReport {
    pub fn downloaded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.result == FetchResult::Downloaded)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.downloaded_count()
    }
}

/// Drives one page mirror operation end to end: pre-flight checks, page
/// fetch, markup rewrite, page write, then the concurrent resource fan-out.
pub struct PageMirror<C> {
    page_url: Url,
    files: FileManager,
    client: C,
}

impl<C: HttpFetch> PageMirror<C> {
    pub fn new(url: &str, output_dir: &Path, client: C) -> Result<Self, MirrorError> {
        let page_url =
            Url::parse(url).map_err(|_| MirrorError::MalformedUrl(url.to_string()))?;

        Ok(Self {
            page_url,
            files: FileManager::new(output_dir),
            client,
        })
    }

    pub async fn download_page(&self) -> Result<MirrorReport, MirrorError> {
        if !self.files.is_writable() {
            return Err(MirrorError::DestinationUnwritable(
                self.files.base_dir().to_path_buf(),
            ));
        }

        let page_name = naming::page_filename(&self.page_url);
        if self.files.exists(&page_name) {
            return Err(MirrorError::AlreadyDownloaded(self.files.path_for(&page_name)));
        }

        debug!(url = %self.page_url, "fetching page");
        let html = self
            .client
            .get_text(&self.page_url)
            .await
            .map_err(|source| MirrorError::PageFetchFailed {
                url: self.page_url.to_string(),
                source,
            })?;

        let references = html_parser::extract_references(&html, html_parser::TAG_ATTR_PAIRS);
        debug!(count = references.len(), "extracted references");
        let targets = self.same_site_targets(&references);

        let rewritten = html_parser::rewrite_references(&html, html_parser::TAG_ATTR_PAIRS, |r| {
            naming::local_reference(&self.page_url, r)
        });
        let page_path = self.files.write_file(&page_name, rewritten.as_bytes())?;
        debug!(path = %page_path.display(), "page written");

        let mut report = MirrorReport {
            page_path,
            outcomes: Vec::new(),
        };

        // No same-site resources: no resource directory at all.
        if targets.is_empty() {
            return Ok(report);
        }

        let dir_name = naming::resource_dir_name(&self.page_url);
        self.files.create_dir(&dir_name)?;

        let progress = ProgressBar::new(targets.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let fetches = targets.into_iter().map(|url| {
            let dir_name = dir_name.as_str();
            let progress = progress.clone();
            async move {
                let outcome = self.fetch_resource(dir_name, url).await;
                progress.inc(1);
                outcome
            }
        });

        // All-settled: every task runs to completion regardless of siblings.
        report.outcomes = join_all(fetches).await;
        progress.finish_and_clear();

        Ok(report)
    }

    /// Resolves every extracted reference and keeps the same-site subset.
    /// References that fail to resolve are skipped, not fatal.
    fn same_site_targets(&self, references: &[String]) -> Vec<Url> {
        let mut targets = Vec::new();
        for reference in references {
            match links::resolve(&self.page_url, reference) {
                Ok(absolute) if links::is_same_site(&absolute, &self.page_url) => {
                    targets.push(absolute);
                }
                Ok(absolute) => {
                    debug!(%absolute, "cross-site reference left remote");
                }
                Err(error) => {
                    warn!(reference = %reference, %error, "skipping unresolvable reference");
                }
            }
        }
        targets
    }

    async fn fetch_resource(&self, dir_name: &str, url: Url) -> ResourceOutcome {
        let local_name = naming::resource_filename(&url);

        let bytes = match self.client.get_bytes(&url).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%url, %error, "resource fetch failed");
                return ResourceOutcome {
                    source_url: url,
                    local_name,
                    result: FetchResult::Failed,
                    error: Some(error.to_string()),
                };
            }
        };

        match self
            .files
            .write_file(&format!("{}/{}", dir_name, local_name), &bytes)
        {
            Ok(path) => {
                debug!(%url, path = %path.display(), "resource saved");
                ResourceOutcome {
                    source_url: url,
                    local_name,
                    result: FetchResult::Downloaded,
                    error: None,
                }
            }
            Err(error) => {
                warn!(%url, %error, "resource write failed");
                ResourceOutcome {
                    source_url: url,
                    local_name,
                    result: FetchResult::Failed,
                    error: Some(error.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{FetchError, MockHttpFetch};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_unwritable_destination_makes_no_request() {
        let mut client = MockHttpFetch::new();
        client.expect_get_text().times(0);
        client.expect_get_bytes().times(0);

        let mirror = PageMirror::new(
            "http://a.com/page",
            Path::new("/nonexistent/mirror/destination"),
            client,
        )
        .unwrap();

        let error = mirror.download_page().await.unwrap_err();
        assert!(matches!(error, MirrorError::DestinationUnwritable(_)));
    }

    #[tokio::test]
    async fn test_existing_page_file_makes_no_request() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("a-com-page.html"), "old").unwrap();

        let mut client = MockHttpFetch::new();
        client.expect_get_text().times(0);
        client.expect_get_bytes().times(0);

        let mirror = PageMirror::new("http://a.com/page", temp_dir.path(), client).unwrap();

        let error = mirror.download_page().await.unwrap_err();
        assert!(matches!(error, MirrorError::AlreadyDownloaded(_)));
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("a-com-page.html")).unwrap(),
            "old"
        );
    }

    #[tokio::test]
    async fn test_page_fetch_failure_writes_nothing() {
        let temp_dir = tempdir().unwrap();

        let mut client = MockHttpFetch::new();
        client
            .expect_get_text()
            .times(1)
            .returning(|_| Err(FetchError::Status(500)));
        client.expect_get_bytes().times(0);

        let mirror = PageMirror::new("http://a.com/page", temp_dir.path(), client).unwrap();

        let error = mirror.download_page().await.unwrap_err();
        assert!(matches!(error, MirrorError::PageFetchFailed { .. }));
        assert!(!temp_dir.path().join("a-com-page.html").exists());
    }

    #[tokio::test]
    async fn test_page_without_references_creates_no_resource_dir() {
        let temp_dir = tempdir().unwrap();

        let mut client = MockHttpFetch::new();
        client
            .expect_get_text()
            .times(1)
            .returning(|_| Ok("<html><body>plain</body></html>".to_string()));
        client.expect_get_bytes().times(0);

        let mirror = PageMirror::new("http://a.com/page", temp_dir.path(), client).unwrap();

        let report = mirror.download_page().await.unwrap();
        assert!(report.outcomes.is_empty());
        assert!(temp_dir.path().join("a-com-page.html").exists());
        assert!(!temp_dir.path().join("a-com-page_files").exists());
    }
}
