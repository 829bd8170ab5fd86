//! Code-only projection of source text.
//!
//! [`project`] blanks every comment and every string/char-literal interior
//! while keeping the projection the same length (in characters) and keeping
//! every newline in place. Pattern matches against the projection therefore
//! land on the same 1-based line as in the original file.

/// Scanner state. Block comments carry a nesting depth; raw strings carry
/// the fence length their closing delimiter must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment { depth: usize },
    Str,
    Char,
    RawStr { fence: usize },
}

/// Returns a projection of `source` in which comment text and string/char
/// interiors are replaced by spaces.
///
/// Literal delimiters (quotes, raw-string prefixes and fences) are preserved
/// verbatim; comment markers are blanked along with the comment body.
/// Newlines always pass through, so line numbers computed on the projection
/// equal line numbers in the original text. Multi-byte characters never
/// drive a transition; in code they are copied through unexamined.
#[must_use]
pub fn project(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match state {
            State::Code => {
                if c == '/' && chars.get(i + 1) == Some(&'/') {
                    out.push_str("  ");
                    state = State::LineComment;
                    i += 2;
                } else if c == '/' && chars.get(i + 1) == Some(&'*') {
                    out.push_str("  ");
                    state = State::BlockComment { depth: 1 };
                    i += 2;
                } else if let Some((len, fence)) = raw_string_open(&chars, i) {
                    // Prefix, fence, and opening quote are delimiters: keep them.
                    for &d in &chars[i..i + len] {
                        out.push(d);
                    }
                    state = State::RawStr { fence };
                    i += len;
                } else if c == '"' {
                    out.push('"');
                    state = State::Str;
                    i += 1;
                } else if c == '\'' && char_literal_opens(&chars, i) {
                    out.push('\'');
                    state = State::Char;
                    i += 1;
                } else {
                    out.push(c);
                    i += 1;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
                i += 1;
            }
            State::BlockComment { depth } => {
                if c == '/' && chars.get(i + 1) == Some(&'*') {
                    out.push_str("  ");
                    state = State::BlockComment { depth: depth + 1 };
                    i += 2;
                } else if c == '*' && chars.get(i + 1) == Some(&'/') {
                    out.push_str("  ");
                    state = if depth == 1 {
                        State::Code
                    } else {
                        State::BlockComment { depth: depth - 1 }
                    };
                    i += 2;
                } else {
                    out.push(blank(c));
                    i += 1;
                }
            }
            State::Str => {
                if c == '\\' {
                    out.push(' ');
                    if let Some(&next) = chars.get(i + 1) {
                        out.push(blank(next));
                        i += 2;
                    } else {
                        i += 1;
                    }
                } else if c == '"' {
                    out.push('"');
                    state = State::Code;
                    i += 1;
                } else {
                    out.push(blank(c));
                    i += 1;
                }
            }
            State::Char => {
                if c == '\\' {
                    out.push(' ');
                    if let Some(&next) = chars.get(i + 1) {
                        out.push(blank(next));
                        i += 2;
                    } else {
                        i += 1;
                    }
                } else if c == '\'' {
                    out.push('\'');
                    state = State::Code;
                    i += 1;
                } else {
                    out.push(blank(c));
                    i += 1;
                }
            }
            State::RawStr { fence } => {
                if c == '"' && closes_fence(&chars, i + 1, fence) {
                    out.push('"');
                    for _ in 0..fence {
                        out.push('#');
                    }
                    state = State::Code;
                    i += 1 + fence;
                } else {
                    out.push(blank(c));
                    i += 1;
                }
            }
        }
    }

    out
}

/// 1-based line of a byte offset into a projection (or any text that shares
/// the original's newline structure).
#[must_use]
pub fn line_at_offset(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

fn blank(c: char) -> char {
    if c == '\n' {
        '\n'
    } else {
        ' '
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Detects a raw-string opener (`r"`, `r#"`, `br##"`, ...) at `i`. Returns
/// the total opener length (prefix + fence + quote) and the fence length.
///
/// The preceding character must not be an identifier character, so an
/// identifier ending in `r` never opens a raw string.
fn raw_string_open(chars: &[char], i: usize) -> Option<(usize, usize)> {
    if i > 0 && is_ident_char(chars[i - 1]) {
        return None;
    }
    let mut j = i;
    if chars.get(j) == Some(&'b') {
        j += 1;
    }
    if chars.get(j) != Some(&'r') {
        return None;
    }
    j += 1;
    let fence_start = j;
    while chars.get(j) == Some(&'#') {
        j += 1;
    }
    if chars.get(j) == Some(&'"') {
        Some((j + 1 - i, j - fence_start))
    } else {
        None
    }
}

/// Whether the quote at `i` opens a character literal rather than a
/// lifetime: an escape follows, or the literal closes within two characters.
fn char_literal_opens(chars: &[char], i: usize) -> bool {
    if chars.get(i + 1) == Some(&'\\') {
        return true;
    }
    chars.get(i + 1).is_some_and(|&c| c != '\'') && chars.get(i + 2) == Some(&'\'')
}

/// Whether `count` fence characters follow at `from`, closing a raw string.
fn closes_fence(chars: &[char], from: usize, count: usize) -> bool {
    (0..count).all(|k| chars.get(from + k) == Some(&'#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_code_projects_to_itself() {
        let src = "fn main() {\n    let x = 1 + 2;\n}\n";
        assert_eq!(project(src), src);
    }

    #[test]
    fn line_comment_is_blanked_including_marker() {
        let src = "let x = 1; // trailing note\nlet y = 2;\n";
        let proj = project(src);
        assert_eq!(proj.len(), src.len());
        assert!(proj.starts_with("let x = 1; "));
        assert!(!proj.contains("trailing"));
        assert!(!proj.contains("//"));
        assert!(proj.contains("let y = 2;"));
    }

    #[test]
    fn newlines_survive_blanking() {
        let src = "a\n// one\n/* two\nthree */\nb\n";
        let proj = project(src);
        assert_eq!(
            proj.matches('\n').count(),
            src.matches('\n').count(),
            "projection must keep the original line structure"
        );
    }

    #[test]
    fn nested_block_comment_needs_matching_closes() {
        let src = "a /* outer /* inner */ still comment */ b";
        let proj = project(src);
        assert!(!proj.contains("still"));
        assert!(proj.starts_with("a "));
        assert!(proj.ends_with(" b"));
    }

    #[test]
    fn string_interior_blanked_quotes_kept() {
        let src = r#"let s = "crate::checker";"#;
        let proj = project(src);
        assert_eq!(proj, r#"let s = "              ";"#);
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let src = r#"let s = "a\"b"; use x;"#;
        let proj = project(src);
        assert!(proj.contains("use x;"));
        assert!(!proj.contains('a'));
    }

    #[test]
    fn raw_string_closes_only_on_matching_fence() {
        let src = r###"let s = r##"has "# inside"##; done"###;
        let proj = project(src);
        assert!(proj.contains("done"));
        assert!(!proj.contains("inside"));
        // Delimiters survive.
        assert!(proj.contains(r###"r##""###));
        assert!(proj.contains(r###""##"###));
    }

    #[test]
    fn char_literal_interior_blanked() {
        let src = "let c = 'x'; let q = '\\''; after";
        let proj = project(src);
        assert!(proj.contains("after"));
        assert!(!proj.contains('x'));
    }

    #[test]
    fn lifetime_tick_is_code() {
        let src = "fn f<'a>(s: &'a str) -> &'a str { s }";
        assert_eq!(project(src), src);
    }

    #[test]
    fn comment_marker_inside_string_is_inert() {
        let src = r#"let s = "// not a comment"; use y;"#;
        let proj = project(src);
        assert!(proj.contains("use y;"));
        assert!(!proj.contains("not a comment"));
    }

    #[test]
    fn identifier_ending_in_r_is_not_raw_string() {
        let src = r#"let for_parser = 1; let s = "x";"#;
        let proj = project(src);
        assert!(proj.contains("for_parser = 1"));
    }

    #[test]
    fn multibyte_passes_through_in_code() {
        let src = "let na\u{ef}ve = 1; // caf\u{e9}\n";
        let proj = project(src);
        assert_eq!(proj.chars().count(), src.chars().count());
        assert!(proj.contains("na\u{ef}ve"));
        assert!(!proj.contains("caf\u{e9}"));
    }

    #[test]
    fn line_at_offset_counts_newlines() {
        let text = "a\nb\nc";
        assert_eq!(line_at_offset(text, 0), 1);
        assert_eq!(line_at_offset(text, 2), 2);
        assert_eq!(line_at_offset(text, 4), 3);
    }
}
