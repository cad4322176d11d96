//! Portable filename sanitization.

/// Longest name kept, in bytes (NAME_MAX on Linux; also under the NTFS limit).
const NAME_MAX: usize = 255;

/// Sanitizes a candidate filename so it is valid on Linux and Windows.
///
/// Path separators, control characters, whitespace and the characters Windows
/// reserves (`<>:"|?*`) become `_`; runs of `_` collapse; leading and trailing
/// dots, spaces and underscores are trimmed; the result is cut to `NAME_MAX`
/// bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let bad = c.is_control()
            || c.is_whitespace()
            || matches!(c, '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*');
        let c = if bad { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
