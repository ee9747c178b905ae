//! Sound name to playable address resolution

/// Base location used when none is configured
pub const DEFAULT_SOUND_BASE_URL: &str = "./sounds";

/// Resolve a logical sound or music name against a base location.
///
/// Returns `None` for an empty name; callers treat that as a no-op.
/// Absolute (`scheme://...`) and rooted (`/...`) names are returned as-is.
/// Everything else is appended to the base with its trailing slashes trimmed.
pub fn resolve_sound_url(name: &str, base_url: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if is_absolute(name) || name.starts_with('/') {
        return Some(name.to_string());
    }

    let base = if base_url.is_empty() {
        DEFAULT_SOUND_BASE_URL
    } else {
        base_url
    };
    Some(format!("{}/{}", base.trim_end_matches('/'), name))
}

/// Check for a leading `scheme://` where the scheme follows RFC 3986
/// (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`).
pub fn is_absolute(name: &str) -> bool {
    let Some((scheme, _)) = name.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_name() {
        assert_eq!(
            resolve_sound_url("cards/shuffle.ogg", "./sounds").as_deref(),
            Some("./sounds/cards/shuffle.ogg")
        );
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        assert_eq!(
            resolve_sound_url("win.ogg", "https://cdn.example.com/audio///").as_deref(),
            Some("https://cdn.example.com/audio/win.ogg")
        );
    }

    #[test]
    fn test_absolute_and_rooted_untouched() {
        for name in [
            "https://cdn.example.com/a.ogg",
            "HTTP://example.com/b.ogg",
            "blob+x://id",
            "/static/c.ogg",
        ] {
            assert_eq!(resolve_sound_url(name, "./sounds").as_deref(), Some(name));
        }
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(resolve_sound_url("", "./sounds"), None);
    }

    #[test]
    fn test_empty_base_uses_default() {
        assert_eq!(
            resolve_sound_url("a.ogg", "").as_deref(),
            Some("./sounds/a.ogg")
        );
    }

    #[test]
    fn test_not_a_scheme() {
        assert!(!is_absolute("1http://x"));
        assert!(!is_absolute("music/theme.ogg"));
        assert!(!is_absolute("://x"));
        assert!(!is_absolute("a b://x"));
        // Treated as relative, so it is joined to the base
        assert_eq!(
            resolve_sound_url("a b://x", "base").as_deref(),
            Some("base/a b://x")
        );
    }
}
