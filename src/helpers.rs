/// Case-insensitive substring test for ASCII needles.
pub(crate) fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return true;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}

/// Case-insensitive suffix test for ASCII needles.
pub(crate) fn ends_with_ignore_ascii_case(haystack: &str, suffix: &str) -> bool {
    let (haystack, suffix) = (haystack.as_bytes(), suffix.as_bytes());
    haystack.len() >= suffix.len()
        && haystack[haystack.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Major version following the first `Chrome/` token, e.g. `130` for
/// `Chrome/130.0.6723.58`.
pub(crate) fn chrome_major_version(ua: &str) -> Option<u32> {
    const TOKEN: &[u8] = b"Chrome/";
    let start = ua
        .as_bytes()
        .windows(TOKEN.len())
        .position(|w| w.eq_ignore_ascii_case(TOKEN))?
        + TOKEN.len();
    let rest = &ua[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Model token of the parenthesised device clause, i.e. whatever follows the
/// last `;` before the first `)`. `K` for `(Linux; Android 10; K)`.
pub(crate) fn device_model_token(ua: &str) -> Option<&str> {
    let open = ua.find('(')?;
    let close = open + ua[open..].find(')')?;
    let clause = &ua[open + 1..close];
    let token = clause.rsplit(';').next()?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
