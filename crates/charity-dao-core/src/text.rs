//! Text normalization applied to free-form documents before upload.
//!
//! Identical logical text yields identical bytes, so the content store returns
//! the same locator regardless of the editor that produced it.

/// Normalize text content.
///
/// Rules:
/// - remove a leading UTF-8 BOM
/// - convert CRLF and CR to LF
/// - trim trailing whitespace on each line
/// - keep a final newline only if one was present
pub fn normalize_text(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let s = input.trim_start_matches('\u{FEFF}');
    let s = s.replace("\r\n", "\n").replace('\r', "\n");
    let had_trailing_newline = s.ends_with('\n');

    let mut out = s
        .trim_end_matches('\n')
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    if had_trailing_newline {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_newlines() {
        assert_eq!(normalize_text("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn trims_trailing_whitespace_and_bom() {
        assert_eq!(normalize_text("\u{FEFF}a  \nb\t\n"), "a\nb\n");
    }

    #[test]
    fn collapses_trailing_blank_lines() {
        assert_eq!(normalize_text("a\n\n\n"), "a\n");
        assert_eq!(normalize_text(""), "");
    }
}
