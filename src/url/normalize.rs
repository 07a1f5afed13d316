/// Normalizes a raw user-supplied URL string
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. If the trimmed string does not already start with `http://` or
///    `https://`, prepend `https://`
///
/// Nothing else is touched: the host, path, and query are passed through
/// verbatim so the analysis target is exactly what the user asked for.
/// Whether the result is actually usable is a separate question answered by
/// [`is_valid_url`](crate::url::is_valid_url).
///
/// # Arguments
///
/// * `raw` - The raw URL string as submitted by the user
///
/// # Examples
///
/// ```
/// use stacksight::url::normalize_url;
///
/// assert_eq!(normalize_url("example.com"), "https://example.com");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// assert_eq!(normalize_url("  https://example.com  "), "https://example.com");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
