use tracing::debug;
use url::Url;

use crate::links;

/// Collapses every maximal run of non-alphanumeric characters (underscore
/// included) into a single hyphen. Idempotent.
pub fn hyphenate(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            output.push(c);
            in_run = false;
        } else if !in_run {
            output.push('-');
            in_run = true;
        }
    }
    output
}

/// Local filename for the mirrored page itself,
/// e.g. `http://a.com/one/two/` -> `a-com-one-two.html`.
pub fn page_filename(page_url: &Url) -> String {
    format!("{}.html", page_stem(page_url))
}

/// Name of the sibling directory holding the page's same-site resources,
/// e.g. `http://a.com/one/two/` -> `a-com-one-two_files`.
pub fn resource_dir_name(page_url: &Url) -> String {
    format!("{}_files", page_stem(page_url))
}

/// Local filename for a resource: the hyphenated pathname with its original
/// extension re-attached. A pathname without any `.` gets no extension.
pub fn resource_filename(resource_url: &Url) -> String {
    let path = resource_url.path();
    match path.rfind('.') {
        Some(dot) => {
            let name = strip_leading_slash(&path[..dot]);
            let ext = &path[dot + 1..];
            format!("{}.{}", hyphenate(name), ext)
        }
        None => hyphenate(strip_leading_slash(path)),
    }
}

/// The per-attribute rewrite transform: same-site references become relative
/// paths into the resource directory, everything else passes through
/// unchanged (cross-site references and references that fail to resolve).
pub fn local_reference(page_url: &Url, reference: &str) -> String {
    match links::resolve(page_url, reference) {
        Ok(absolute) if links::is_same_site(&absolute, page_url) => {
            let local = format!(
                "{}/{}",
                resource_dir_name(page_url),
                resource_filename(&absolute)
            );
            debug!(reference, local = %local, "rewrote same-site reference");
            local
        }
        Ok(_) => reference.to_string(),
        Err(error) => {
            debug!(reference, %error, "leaving unresolvable reference untouched");
            reference.to_string()
        }
    }
}

// Hyphenated host+path stem shared by the page filename and the resource
// directory name. A trailing slash on the path contributes nothing.
fn page_stem(page_url: &Url) -> String {
    let path = page_url.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    format!("{}{}", hyphenate(&host_with_port(page_url)), hyphenate(path))
}

fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_hyphenate_collapses_runs() {
        assert_eq!(hyphenate("a.com"), "a-com");
        assert_eq!(hyphenate("/one/two_three.html"), "-one-two-three-html");
        assert_eq!(hyphenate("already-clean"), "already-clean");
    }

    #[test]
    fn test_hyphenate_idempotent() {
        let once = hyphenate("/one//two..three");
        assert_eq!(hyphenate(&once), once);
    }

    #[test]
    fn test_page_filename() {
        assert_eq!(
            page_filename(&url("http://a.com/one/two/three/index.html")),
            "a-com-one-two-three-index-html.html"
        );
    }

    #[test]
    fn test_page_filename_root_path() {
        assert_eq!(page_filename(&url("http://a.com/")), "a-com.html");
    }

    #[test]
    fn test_page_filename_trailing_slash_stripped() {
        assert_eq!(
            page_filename(&url("http://localhost/single2/")),
            "localhost-single2.html"
        );
    }

    #[test]
    fn test_page_filename_includes_port() {
        assert_eq!(
            page_filename(&url("http://a.com:8080/page")),
            "a-com-8080-page.html"
        );
    }

    #[test]
    fn test_resource_dir_name() {
        assert_eq!(
            resource_dir_name(&url("http://a.com/one/two/three/index.html")),
            "a-com-one-two-three-index-html_files"
        );
    }

    #[test]
    fn test_resource_filename() {
        assert_eq!(
            resource_filename(&url("http://a.com/one/two/protocolRelative.js")),
            "one-two-protocolRelative.js"
        );
    }

    #[test]
    fn test_resource_filename_keeps_only_final_extension() {
        assert_eq!(
            resource_filename(&url("http://a.com/root.resource.js")),
            "root-resource.js"
        );
    }

    #[test]
    fn test_resource_filename_without_extension() {
        assert_eq!(
            resource_filename(&url("http://a.com/api/data")),
            "api-data"
        );
    }

    #[test]
    fn test_resource_filename_deterministic() {
        let resource = url("http://a.com/assets/app.min.js");
        assert_eq!(resource_filename(&resource), resource_filename(&resource));
    }

    #[test]
    fn test_local_reference_same_site() {
        let page = url("http://a.com/one/two/three/index.html");
        assert_eq!(
            local_reference(&page, "resource.js"),
            "a-com-one-two-three-index-html_files/one-two-three-resource.js"
        );
    }

    #[test]
    fn test_local_reference_unresolvable_untouched() {
        let page = url("http://a.com/one/two/three/index.html");
        assert_eq!(local_reference(&page, "http://[bad"), "http://[bad");
    }

    #[test]
    fn test_local_reference_cross_site_untouched() {
        let page = url("http://a.com/one/two/three/index.html");
        assert_eq!(
            local_reference(&page, "http://other.com/x.js"),
            "http://other.com/x.js"
        );
    }
}
