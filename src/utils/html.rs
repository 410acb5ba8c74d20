use ammonia;

/// Sanitize free-text profile fields (bio, about-me) with ammonia.
///
/// Whitelist-based: safe inline tags survive, anything scriptable is
/// stripped. Profiles are rendered to other users, so this is the backstop
/// against stored XSS regardless of what the frontend escapes.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
