use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed pattern an analysis target must match: an `http(s)://` URL with an
/// optional `www.` prefix, a dotted host whose final segment is at most six
/// characters, and an optional path/query/fragment tail.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .unwrap()
});

/// Checks whether a URL string is an acceptable analysis target
///
/// The input is trimmed and then matched against [`URL_PATTERN`]. This is a
/// shape check, not a reachability check: a URL can be valid here and still
/// point at a dead site. Schemes other than HTTP/HTTPS, bare hostnames
/// without a scheme, and hosts without a dotted TLD segment are all
/// rejected.
///
/// Never panics and never returns an error; anything the pattern does not
/// accept is simply `false`.
///
/// # Examples
///
/// ```
/// use stacksight::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com"));
/// assert!(is_valid_url("https://example.com/path?query=1"));
/// assert!(!is_valid_url("example.com"));
/// assert!(!is_valid_url("ftp://example.com"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url.trim())
}
