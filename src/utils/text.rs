/// Drop every non-ASCII character. Deliberately lossy: downstream storage
/// of resource titles and links is ASCII-only, so this is the one place
/// where text leaves the parser normalized instead of escaped.
pub fn ascii_clean(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii()).collect()
}

/// Join an instance home link and a class-site path. Home links in the
/// catalog sometimes carry a trailing slash and sometimes don't.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
