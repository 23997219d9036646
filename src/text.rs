/// Break markers a topic may carry, each turned into a real line break.
/// The tag spellings are matched case-sensitively.
const BREAK_MARKERS: [&str; 3] = ["<br>", "<BR>", "\\n"];

/// Convert `<br>`, `<BR>` and literal `\n` sequences into `'\n'`.
pub fn normalize(raw: &str) -> String {
    BREAK_MARKERS
        .iter()
        .fold(raw.to_string(), |text, marker| text.replace(marker, "\n"))
}

/// Greedy line breaking for centred card text.
///
/// Explicit `'\n'` always breaks. Within a paragraph, words are packed while
/// they fit `max_width`; a word that does not fit on a line of its own is
/// split between characters, which is also how unspaced CJK text wraps.
pub fn wrap_lines(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if measure(&candidate) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if measure(word) <= max_width {
                line = word.to_string();
            } else {
                for ch in word.chars() {
                    line.push(ch);
                    if measure(&line) > max_width && line.chars().count() > 1 {
                        line.pop();
                        lines.push(std::mem::replace(&mut line, ch.to_string()));
                    }
                }
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_count(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn normalizes_all_three_markers() {
        let out = normalize("A<br>B\\nC<BR>D");
        assert_eq!(out.matches('\n').count(), 3);
        assert_eq!(out.split('\n').collect::<Vec<_>>(), ["A", "B", "C", "D"]);
    }

    #[test]
    fn other_tag_casings_are_left_alone() {
        assert_eq!(normalize("A<Br>B<bR>C"), "A<Br>B<bR>C");
    }

    #[test]
    fn real_newlines_pass_through() {
        assert_eq!(normalize("A\nB"), "A\nB");
        assert_eq!(normalize("plain"), "plain");
    }

    #[test]
    fn wraps_at_spaces() {
        let lines = wrap_lines("one two three four", 9.0, char_count);
        assert_eq!(lines, ["one two", "three", "four"]);
    }

    #[test]
    fn explicit_breaks_always_split() {
        let lines = wrap_lines("a\nb c", 100.0, char_count);
        assert_eq!(lines, ["a", "b c"]);
    }

    #[test]
    fn long_words_break_between_characters() {
        let lines = wrap_lines("好きな食べ物は何ですか", 4.0, char_count);
        assert_eq!(lines, ["好きな食", "べ物は何", "ですか"]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_lines("", 10.0, char_count), [""]);
    }

    #[test]
    fn single_wide_glyph_still_placed() {
        let lines = wrap_lines("WW", 0.5, char_count);
        assert_eq!(lines, ["W", "W"]);
    }
}
