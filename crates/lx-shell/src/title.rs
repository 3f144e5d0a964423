/// Tab labels longer than this are cut and suffixed with `...`.
pub const TAB_TITLE_MAX_CHARS: usize = 15;

const ELLIPSIS: &str = "...";

/// Cuts `title` to `max_chars` characters plus `...`; shorter titles are
/// returned unchanged. Counts chars, so multi-byte text is never split.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        None => title.to_owned(),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len());
            out.push_str(&title[..cut]);
            out.push_str(ELLIPSIS);
            out
        }
    }
}

/// Label shown on a tab: the truncated page title, or the URL when the page
/// has no title.
pub fn tab_label(title: &str, url: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return url.to_owned();
    }
    truncate_title(title, TAB_TITLE_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::TAB_TITLE_MAX_CHARS;
    use super::tab_label;
    use super::truncate_title;

    #[test]
    fn twenty_chars_truncate_to_fifteen_plus_ellipsis() {
        let title = "abcdefghijklmnopqrst";
        assert_eq!(title.chars().count(), 20);
        assert_eq!(
            truncate_title(title, TAB_TITLE_MAX_CHARS),
            "abcdefghijklmno..."
        );
    }

    #[test]
    fn short_titles_are_unchanged() {
        assert_eq!(truncate_title("Rust", 15), "Rust");
        assert_eq!(truncate_title("exactly 15 char", 15), "exactly 15 char");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let title = "\u{00e9}\u{00e9}\u{00e9}\u{00e9}";
        assert_eq!(truncate_title(title, 2), "\u{00e9}\u{00e9}...");
    }

    #[test]
    fn blank_title_falls_back_to_url() {
        assert_eq!(
            tab_label("   ", "https://example.com/"),
            "https://example.com/"
        );
        assert_eq!(
            tab_label("The Rust Programming Language", "https://doc.rust-lang.org/"),
            "The Rust Progra..."
        );
    }
}
