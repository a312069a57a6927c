// Input and HTML sanitization
// `sanitize_input` is a defense-in-depth filter for plain-text fields.
// `sanitize_html` is the allow-list sanitizer for admin-authored rich content,
// the one place this system must resist stored XSS.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Tags permitted in admin-authored rich content.
const ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "strong",
    "em",
    "u",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "a",
    "img",
    "blockquote",
];

/// Attributes permitted on allowed tags. Everything else, including `data-*`
/// and `on*` handlers, is dropped.
const ALLOWED_ATTRS: &[&str] = &["href", "src", "alt", "title", "target"];

/// Tags stripped together with their content.
const DANGEROUS_TAGS: &[&str] = &["script", "iframe", "object", "embed", "form", "button"];

lazy_static! {
    static ref ANGLE_RE: Regex = Regex::new(r"[<>]").unwrap();
    static ref JS_SCHEME_RE: Regex = Regex::new(r"(?i)javascript:").unwrap();
    static ref EVENT_ATTR_RE: Regex = Regex::new(r"(?i)\bon\w+\s*=").unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref DANGEROUS_BLOCK_RES: Vec<Regex> = DANGEROUS_TAGS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{0}\b[^>]*>.*?</{0}\s*>", tag)).unwrap())
        .collect();
    static ref TAG_RE: Regex = Regex::new(r"</?([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").unwrap();
    static ref ATTR_RE: Regex =
        Regex::new(r#"([a-zA-Z][a-zA-Z0-9:._-]*)\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap();
}

/// Sanitize a plain-text field.
///
/// Strips angle brackets, `javascript:` scheme prefixes and inline event
/// handler patterns, then trims surrounding whitespace. Not an HTML
/// sanitizer; use [`sanitize_html`] for rich content.
pub fn sanitize_input(text: &str) -> String {
    let out = ANGLE_RE.replace_all(text, "");
    let out = JS_SCHEME_RE.replace_all(&out, "");
    let out = EVENT_ATTR_RE.replace_all(&out, "");
    out.trim().to_string()
}

/// Sanitize admin-authored HTML against the allow-list.
///
/// Comments and scripting-capable tags are removed (content-bearing dangerous
/// tags together with their content). Remaining tags outside the allow-list
/// are dropped while their inner text is kept. Attributes on kept tags are
/// filtered to the allowed set, and `javascript:` URLs are rejected.
pub fn sanitize_html(html: &str) -> String {
    let mut out = COMMENT_RE.replace_all(html, "").into_owned();

    for re in DANGEROUS_BLOCK_RES.iter() {
        out = re.replace_all(&out, "").into_owned();
    }

    TAG_RE
        .replace_all(&out, |caps: &Captures| rebuild_tag(caps))
        .into_owned()
}

fn rebuild_tag(caps: &Captures) -> String {
    let tag = caps[1].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&tag.as_str()) {
        return String::new();
    }

    if caps[0].starts_with("</") {
        return format!("</{}>", tag);
    }

    let attrs = &caps[2];
    let mut kept = String::new();
    for attr in ATTR_RE.captures_iter(attrs) {
        let name = attr[1].to_ascii_lowercase();
        if !ALLOWED_ATTRS.contains(&name.as_str()) {
            continue;
        }
        let value = attr[2].trim_matches(|c| c == '"' || c == '\'');
        if has_js_scheme(value) {
            continue;
        }
        kept.push_str(&format!(" {}=\"{}\"", name, value));
    }

    let self_closing = attrs.trim_end().ends_with('/');
    format!("<{}{}{}>", tag, kept, if self_closing { " /" } else { "" })
}

fn has_js_scheme(value: &str) -> bool {
    value
        .to_ascii_lowercase()
        .replace(char::is_whitespace, "")
        .starts_with("javascript:")
}
