use select::document::Document;
use select::predicate::Any;

/// The closed set of tag/attribute pairs whose values are treated as
/// resource references, in extraction precedence order.
pub const TAG_ATTR_PAIRS: &[(&str, &str)] = &[("img", "src"), ("script", "src"), ("link", "href")];

/// Extracts the non-empty attribute values of all recognized tags, in
/// document order. Tags whose attribute is absent or empty are skipped.
pub fn extract_references(html: &str, pairs: &[(&str, &str)]) -> Vec<String> {
    let document = Document::from(html);
    let mut references = Vec::new();

    for node in document.find(Any) {
        let Some(attr) = matching_attribute(node.name(), pairs) else {
            continue;
        };
        if let Some(value) = node.attr(attr) {
            if !value.is_empty() {
                references.push(value.to_string());
            }
        }
    }

    references
}

/// Replaces each non-empty recognized attribute value with
/// `transform(value)`, leaving the rest of the markup untouched. Attributes
/// with empty values are never passed to the transform.
///
/// Rewriting is textual: any other attribute whose serialized `attr="value"`
/// text coincides with a rewritten one (e.g. an `<a href>` equal to a
/// stylesheet's `href`) gets rewritten too.
pub fn rewrite_references<F>(html: &str, pairs: &[(&str, &str)], transform: F) -> String
where
    F: Fn(&str) -> String,
{
    let document = Document::from(html);
    let mut rewritten = html.to_string();

    for node in document.find(Any) {
        let Some(attr) = matching_attribute(node.name(), pairs) else {
            continue;
        };
        let Some(value) = node.attr(attr) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        let replacement = transform(value);
        if replacement != value {
            rewritten = rewritten.replace(
                &format!("{}=\"{}\"", attr, value),
                &format!("{}=\"{}\"", attr, replacement),
            );
        }
    }

    rewritten
}

fn matching_attribute<'a>(tag: Option<&str>, pairs: &[(&str, &'a str)]) -> Option<&'a str> {
    let tag = tag?;
    pairs
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, attr)| *attr)
}
