//! URL path canonicalization and media reference lookup.

use std::collections::HashMap;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use regex_lite::Regex;

/// Characters escaped in a URL path. Non-ASCII is always escaped.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `jr://images/path/to/file.png` → `path/to/file.png`
static JR_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^jr://[\w-]+/(.+)$").unwrap());

/// `scheme:` prefix of an absolute URL.
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Canonicalize the path of a URL.
///
/// The scheme, authority, query and fragment are kept as they are. The path
/// has its `.` and `..` segments removed and is percent-decoded, then
/// re-encoded, so raw and already-escaped input produce the same result.
pub fn escape_url_path(url: &str) -> String {
    let (rest, fragment) = match url.find('#') {
        Some(i) => url.split_at(i),
        None => (url, ""),
    };
    let (rest, query) = match rest.find('?') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };

    let (origin, path) = split_origin(rest);
    let normalized = remove_dot_segments(path);
    let decoded = percent_decode_str(&normalized).decode_utf8_lossy();
    let encoded = utf8_percent_encode(&decoded, PATH);

    format!("{origin}{encoded}{query}{fragment}")
}

/// Split `scheme://authority` (or `scheme:`) off the front of a URL.
fn split_origin(url: &str) -> (&str, &str) {
    let Some(scheme) = SCHEME_RE.find(url) else {
        return ("", url);
    };
    let after = &url[scheme.end()..];
    if let Some(authority) = after.strip_prefix("//") {
        let end = authority.find('/').map_or(url.len(), |i| scheme.end() + 2 + i);
        return url.split_at(end);
    }
    url.split_at(scheme.end())
}

/// Remove `.` and `..` segments. `..` never climbs above the start of the
/// path; a leading `/` and a trailing `/` are preserved.
fn remove_dot_segments(path: &str) -> String {
    if !path.split('/').any(|s| s == "." || s == "..") {
        return path.to_string();
    }

    let absolute = path.starts_with('/');
    let segments: Vec<&str> = path.split('/').collect();
    let trailing = matches!(segments.last(), Some(&"" | &"." | &".."));

    let mut stack: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }

    let mut out = String::with_capacity(path.len());
    if absolute {
        out.push('/');
    }
    out.push_str(&stack.join("/"));
    if trailing && !stack.is_empty() {
        out.push('/');
    }
    out
}

/// Caller-supplied media substitutions.
///
/// `jr://` references are looked up by their escaped path, then by the raw
/// path, then against the keys in canonical form. When several keys share
/// a canonical form, the one that sorts first wins.
#[derive(Debug, Clone, Default)]
pub struct MediaMap {
    exact: HashMap<String, String>,
    canonical: HashMap<String, String>,
}

impl MediaMap {
    pub fn new(media: &HashMap<String, String>) -> Self {
        let exact = media.clone();

        let mut keys: Vec<&String> = media.keys().collect();
        keys.sort();
        let mut canonical = HashMap::with_capacity(keys.len());
        for key in keys {
            canonical
                .entry(escape_url_path(key))
                .or_insert_with(|| media[key].clone());
        }

        Self { exact, canonical }
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Look up a key verbatim.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.exact.get(key).map(String::as_str)
    }

    /// Resolve a `src`/`href` value.
    ///
    /// `jr://<scheme>/<path>` is replaced by the mapping for the escaped
    /// path. Any other value is replaced only on an exact key match. Values
    /// without a mapping come back escaped.
    pub fn resolve(&self, url: &str) -> String {
        if let Some(caps) = JR_URL_RE.captures(url) {
            let path = escape_url_path(&caps[1]);
            let found = self
                .exact
                .get(&path)
                .or_else(|| self.exact.get(&caps[1]))
                .or_else(|| self.canonical.get(&path));
            return match found {
                Some(replacement) => replacement.clone(),
                None => escape_url_path(url),
            };
        }
        match self.exact.get(url) {
            Some(replacement) => replacement.clone(),
            None => escape_url_path(url),
        }
    }
}

/// Resolve a media reference against a plain map.
pub fn media_path(media: &HashMap<String, String>, url: &str) -> String {
    MediaMap::new(media).resolve(url)
}
