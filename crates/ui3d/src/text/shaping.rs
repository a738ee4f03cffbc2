//! Text Shaper - wrapping, truncation and numbering of raw strings
//!
//! All limits count characters (Unicode scalar values), never bytes.

/// Suffix appended by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// Shorten `text` longer than `max_length` characters.
///
/// Returns the text unchanged when `max_length` is zero or the text already
/// fits. Otherwise keeps the first `max_length - 1` characters and appends
/// `"..."`.
pub fn truncate(text: &str, max_length: usize) -> String {
    if max_length == 0 || text.chars().count() <= max_length {
        return text.to_string();
    }

    let mut out: String = text.chars().take(max_length - 1).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Insert a hard line break before every `every`-th character.
///
/// Not word-aware: a break can land in the middle of a word. `every == 0`
/// returns the text unchanged.
pub fn insert_line_breaks(every: usize, text: &str) -> String {
    if every == 0 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + text.len() / every);
    for (i, c) in text.chars().enumerate() {
        if i != 0 && i % every == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    out
}

/// Split on hard line breaks. Empty text yields no lines.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(str::to_string).collect()
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Existing line breaks are kept. Words longer than `width` are split across
/// lines. `width == 0` disables wrapping.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return split_lines(text);
    }

    let mut lines = Vec::new();
    for paragraph in split_lines(text) {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-split words that can never fit
            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            if word.is_empty() {
                continue;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }
    lines
}

/// Number the first `limit` comments as `"1. ..."`, `"2. ..."`.
pub fn number_comments(comments: &[String], limit: usize) -> Vec<String> {
    comments
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, comment)| format!("{}. {}", i + 1, comment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Hello World", 30), "Hello World");
        assert_eq!(truncate("exactly five", 12), "exactly five");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let alphabet = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(truncate(alphabet, 5), "abcd...");
    }

    #[test]
    fn truncate_zero_is_identity() {
        assert_eq!(truncate("anything at all", 0), "anything at all");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("青岛市黄岛区海军公园", 4), "青岛市...");
    }

    #[test]
    fn line_breaks_every_n_characters() {
        let text = "a".repeat(60);
        let wrapped = insert_line_breaks(25, &text);
        let lines: Vec<&str> = wrapped.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 25);
        assert_eq!(lines[1].len(), 25);
        assert_eq!(lines[2].len(), 10);
    }

    #[test]
    fn line_breaks_ignore_word_boundaries() {
        assert_eq!(insert_line_breaks(4, "Haijun Park"), "Haij\nun P\nark");
        assert_eq!(insert_line_breaks(0, "Haijun Park"), "Haijun Park");
        assert_eq!(insert_line_breaks(25, ""), "");
    }

    #[test]
    fn wrap_words_fills_lines_greedily() {
        let lines = wrap_words("Good for hanging out after dinner", 12);
        assert_eq!(lines, vec!["Good for", "hanging out", "after dinner"]);
    }

    #[test]
    fn wrap_words_splits_long_words_and_keeps_breaks() {
        let lines = wrap_words("ab abcdefgh\ncd", 4);
        assert_eq!(lines, vec!["ab", "abcd", "efgh", "cd"]);
    }

    #[test]
    fn wrap_words_empty_text_has_no_lines() {
        assert!(wrap_words("", 10).is_empty());
    }

    #[test]
    fn numbering_stops_at_limit() {
        let comments: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(number_comments(&comments, 3), vec!["1. a", "2. b", "3. c"]);
        assert!(number_comments(&[], 3).is_empty());
    }
}
