use tracing::debug;
use url::Url;

use crate::error::MirrorError;

/// Classification of a raw resource reference by its string prefix.
///
/// The check order is significant: a reference starting with `..` is always
/// `Backward`, even though it would also fall through to `Relative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceForm {
    Backward,
    Absolute,
    ProtocolRelative,
    RootRelative,
    Relative,
}

/// Classifies a reference string into one of the five forms. Total: every
/// string maps to exactly one form.
pub fn classify(reference: &str) -> ReferenceForm {
    if reference.starts_with("..") {
        ReferenceForm::Backward
    } else if reference.starts_with("http") {
        ReferenceForm::Absolute
    } else if reference.starts_with("//") {
        ReferenceForm::ProtocolRelative
    } else if reference.starts_with('/') {
        ReferenceForm::RootRelative
    } else {
        ReferenceForm::Relative
    }
}

/// Resolves a raw reference against the page URL, producing an absolute URL.
pub fn resolve(page_url: &Url, reference: &str) -> Result<Url, MirrorError> {
    let form = classify(reference);
    debug!(reference, ?form, "resolving reference");

    let resolved = match form {
        ReferenceForm::Absolute => parse(reference)?,
        ReferenceForm::RootRelative => {
            parse(&format!("{}{}", origin(page_url), reference))?
        }
        ReferenceForm::ProtocolRelative => {
            // The segment right after `//` is a hostname only if it contains
            // a dot; otherwise the reference is a path under the page's
            // origin that happens to start with a double slash.
            let first_segment = reference.split('/').nth(2).unwrap_or("");
            if first_segment.contains('.') {
                parse(&format!("{}:{}", page_url.scheme(), reference))?
            } else {
                parse(&format!("{}{}", origin(page_url), &reference[1..]))?
            }
        }
        ReferenceForm::Relative => page_url
            .join(reference)
            .map_err(|_| MirrorError::MalformedUrl(reference.to_string()))?,
        ReferenceForm::Backward => {
            // Pop one directory from the page path (keeping the final
            // segment, the "current file"), consume one `../`, and recurse
            // until the reference no longer points upward.
            let mut base = page_url.clone();
            let parts: Vec<&str> = base.path().split('/').collect();
            let last = parts.last().copied().unwrap_or("");
            let upper = &parts[..parts.len().saturating_sub(2)];
            let path_one_level_up = format!("{}/{}", upper.join("/"), last);
            base.set_path(&path_one_level_up);
            let remainder = reference.get(3..).unwrap_or("");
            resolve(&base, remainder)?
        }
    };

    debug!(resolved = %resolved, "reference resolved");
    Ok(resolved)
}

/// Whether the candidate URL is served by the page's site. Coarse substring
/// test: `cdn.a.com` matches a page on `a.com`, but so would an unrelated
/// `notactuallya.com`. Kept as-is; see DESIGN.md.
pub fn is_same_site(candidate: &Url, page_url: &Url) -> bool {
    match (candidate.host_str(), page_url.host_str()) {
        (Some(candidate_host), Some(page_host)) => candidate_host.contains(page_host),
        _ => false,
    }
}

fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

fn parse(input: &str) -> Result<Url, MirrorError> {
    Url::parse(input).map_err(|_| MirrorError::MalformedUrl(input.to_string()))
}
