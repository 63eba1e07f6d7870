use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "page-mirror",
    about = "Downloads a page from the specified URL",
    version,
    long_about = "Downloads a single web page together with its same-site scripts, stylesheets and images, rewriting the page's links to point at the local copies."
)]
pub struct MirrorCommand {
    /// The URL of the page to download
    #[arg(required = true)]
    pub url: String,

    /// Destination folder
    #[arg(long, default_value = ".")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_only_defaults_output() {
        let args = MirrorCommand::try_parse_from(["page-mirror", "https://example.com"]).unwrap();

        assert_eq!(args.url, "https://example.com");
        assert_eq!(args.output, PathBuf::from("."));
    }

    #[test]
    fn test_parse_with_output() {
        let args = MirrorCommand::try_parse_from([
            "page-mirror",
            "https://example.com/page",
            "--output",
            "/tmp/mirror",
        ])
        .unwrap();

        assert_eq!(args.url, "https://example.com/page");
        assert_eq!(args.output, PathBuf::from("/tmp/mirror"));
    }

    #[test]
    fn test_parse_missing_url() {
        let result = MirrorCommand::try_parse_from(["page-mirror", "--output", "/tmp"]);
        assert!(result.is_err());
    }
}
