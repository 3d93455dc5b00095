// Output formatting — terminal display of listings.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..60]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters in listing titles.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_chars("Toyota Vitz", 60), "Toyota Vitz");
    }

    #[test]
    fn long_strings_are_cut_with_ellipsis() {
        assert_eq!(truncate_chars("abcdef", 4), "abcd...");
    }

    #[test]
    fn multibyte_titles_do_not_panic() {
        let title = "වාහන විකිණීමට ඇත";
        let cut = truncate_chars(title, 4);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 7);
    }
}
