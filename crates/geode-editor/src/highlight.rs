//! Syntax highlighting — per-character classification of a render string.
//!
//! [`highlight_line`] scans one row's render string left to right and tags
//! every byte with a [`Highlight`] class. The only state that crosses row
//! boundaries is whether a block comment is still open at the end of the
//! row; the caller feeds the previous row's flag in and gets this row's flag
//! back. Propagating a changed flag to the following rows is the
//! document's job (see [`Document`](crate::document::Document)).
//!
//! # Precedence
//!
//! At each position the first rule that applies wins:
//!
//! 1. line comment start (outside strings and block comments) → rest of row
//! 2. block comment: inside one, or its start token → comment
//! 3. string: inside one, or an opening quote → string (`\x` is two bytes)
//! 4. digit after a separator or a number, or `.` after a number → number
//! 5. after a separator: the longest keyword followed by a separator
//! 6. the longest operator token
//! 7. normal text
//!
//! A separator is whitespace, the end of the row, or one of
//! [`SEPARATORS`].

use crate::language::{Features, Keyword, KeywordKind, Language};

/// Classification of one render byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    String,
    Number,
    KeywordType,
    KeywordControl,
    Operator,
    /// Current search match (temporary overlay).
    Match,
}

impl Highlight {
    /// SGR foreground code for this class; `None` is the default color.
    #[must_use]
    pub const fn color(self) -> Option<u8> {
        match self {
            Self::Normal => None,
            Self::Comment => Some(36),
            Self::String => Some(35),
            Self::Number => Some(31),
            Self::KeywordType => Some(32),
            Self::KeywordControl => Some(33),
            Self::Operator => Some(91),
            Self::Match => Some(34),
        }
    }
}

impl From<KeywordKind> for Highlight {
    fn from(kind: KeywordKind) -> Self {
        match kind {
            KeywordKind::Type => Self::KeywordType,
            KeywordKind::Control => Self::KeywordControl,
        }
    }
}

/// Punctuation that ends a word.
pub const SEPARATORS: &[u8] = b",.()+-/*=~%<>[];";

/// Whether `c` separates words. `0` stands for the end of the row.
#[inline]
#[must_use]
pub fn is_separator(c: u8) -> bool {
    matches!(c, 0 | b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c) || SEPARATORS.contains(&c)
}

/// Classify `render` into `out` (resized to `render.len()`).
///
/// `open_comment` says whether a block comment was still open at the end of
/// the previous row. Returns the same flag for the end of this row.
pub fn highlight_line(
    render: &[u8],
    language: Option<&Language>,
    open_comment: bool,
    out: &mut Vec<Highlight>,
) -> bool {
    out.clear();
    out.resize(render.len(), Highlight::Normal);

    let Some(lang) = language else {
        return false;
    };

    let line_comment = lang.line_comment.as_bytes();
    let (block_start, block_end) = if lang.has_block_comments() {
        (lang.block_comment.0.as_bytes(), lang.block_comment.1.as_bytes())
    } else {
        (&[][..], &[][..])
    };
    let strings = lang.features.contains(Features::STRINGS);
    let numbers = lang.features.contains(Features::NUMBERS);

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = open_comment && !block_start.is_empty();

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let rest = &render[i..];
        let prev_hl = if i > 0 { out[i - 1] } else { Highlight::Normal };

        if !line_comment.is_empty()
            && in_string.is_none()
            && !in_comment
            && rest.starts_with(line_comment)
        {
            out[i..].fill(Highlight::Comment);
            break;
        }

        if !block_start.is_empty() && in_string.is_none() {
            if in_comment {
                if rest.starts_with(block_end) {
                    out[i..i + block_end.len()].fill(Highlight::Comment);
                    i += block_end.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    out[i] = Highlight::Comment;
                    i += 1;
                }
                continue;
            }
            if rest.starts_with(block_start) {
                out[i..i + block_start.len()].fill(Highlight::Comment);
                i += block_start.len();
                in_comment = true;
                continue;
            }
        }

        if strings {
            if let Some(quote) = in_string {
                out[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    out[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if c == b'"' || c == b'\'' {
                in_string = Some(c);
                out[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            out[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some(keyword) = match_keyword(rest, lang.keywords) {
                let end = i + keyword.text.len();
                out[i..end].fill(keyword.kind.into());
                i = end;
                prev_sep = false;
                continue;
            }
        }

        if let Some(op) = longest_prefix(rest, lang.operators.iter().copied()) {
            out[i..i + op.len()].fill(Highlight::Operator);
            i += op.len();
            prev_sep = true;
            continue;
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    in_comment
}

/// The longest keyword at the start of `rest` that is followed by a
/// separator. Ties go to the earlier keyword in the table.
fn match_keyword<'k>(rest: &[u8], keywords: &'k [Keyword]) -> Option<&'k Keyword> {
    keywords
        .iter()
        .filter(|kw| {
            let text = kw.text.as_bytes();
            !text.is_empty()
                && rest.starts_with(text)
                && is_separator(rest.get(text.len()).copied().unwrap_or(0))
        })
        .fold(None, |best: Option<&Keyword>, kw| match best {
            Some(b) if b.text.len() >= kw.text.len() => Some(b),
            _ => Some(kw),
        })
}

/// The longest candidate that `rest` starts with.
fn longest_prefix<'a>(rest: &[u8], candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .filter(|c| !c.is_empty() && rest.starts_with(c.as_bytes()))
        .fold(None, |best: Option<&str>, c| match best {
            Some(b) if b.len() >= c.len() => Some(b),
            _ => Some(c),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{C, Features, Keyword, KeywordKind};
    use pretty_assertions::assert_eq;

    use Highlight::{
        Comment as Cm, KeywordControl as Kc, KeywordType as Kt, Normal as N, Number as Nu,
        Operator as Op, String as St,
    };

    fn hl(text: &str, open: bool) -> (Vec<Highlight>, bool) {
        let mut out = Vec::new();
        let still_open = highlight_line(text.as_bytes(), Some(&C), open, &mut out);
        (out, still_open)
    }

    fn classes(text: &str) -> Vec<Highlight> {
        hl(text, false).0
    }

    // -- Basics ---------------------------------------------------------------

    #[test]
    fn no_language_is_all_normal() {
        let mut out = Vec::new();
        let open = highlight_line(b"int x; /*", None, true, &mut out);
        assert_eq!(out, vec![N; 9]);
        assert!(!open);
    }

    #[test]
    fn output_length_matches_render() {
        for text in ["", "a", "int main() {", "\"unterminated", "/* x"] {
            assert_eq!(classes(text).len(), text.len(), "{text:?}");
        }
    }

    #[test]
    fn colors_are_distinct_per_class() {
        let all = [
            Highlight::Comment,
            Highlight::String,
            Highlight::Number,
            Highlight::KeywordType,
            Highlight::KeywordControl,
            Highlight::Operator,
            Highlight::Match,
        ];
        let mut codes: Vec<u8> = all.iter().map(|h| h.color().unwrap()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
        assert_eq!(Highlight::Normal.color(), None);
    }

    #[test]
    fn separators() {
        for c in b" \t,.()+-/*=~%<>[];\0" {
            assert!(is_separator(*c), "{c}");
        }
        for c in b"aZ_#\"'{}" {
            assert!(!is_separator(*c), "{c}");
        }
    }

    // -- Comments -------------------------------------------------------------

    #[test]
    fn line_comment_runs_to_end() {
        assert_eq!(classes("x // y"), vec![N, N, Cm, Cm, Cm, Cm]);
    }

    #[test]
    fn line_comment_inside_string_is_string() {
        assert_eq!(classes("\"//\""), vec![St, St, St, St]);
    }

    #[test]
    fn block_comment_within_row() {
        assert_eq!(classes("/*a*/1"), vec![Cm, Cm, Cm, Cm, Cm, Nu]);
        assert!(!hl("/*a*/1", false).1);
    }

    #[test]
    fn unterminated_block_comment_stays_open() {
        let (out, open) = hl("x /* y", false);
        assert_eq!(out, vec![N, N, Cm, Cm, Cm, Cm]);
        assert!(open);
    }

    #[test]
    fn open_comment_from_previous_row() {
        let (out, open) = hl("a */ b", true);
        assert_eq!(out, vec![Cm, Cm, Cm, Cm, N, N]);
        assert!(!open);
    }

    #[test]
    fn line_comment_ignored_inside_block_comment() {
        let (out, open) = hl("// */", true);
        assert_eq!(out, vec![Cm; 5]);
        assert!(!open);
    }

    // -- Strings --------------------------------------------------------------

    #[test]
    fn double_and_single_quotes() {
        assert_eq!(classes("\"a\" 'b'"), vec![St, St, St, N, St, St, St]);
    }

    #[test]
    fn escaped_quote_does_not_close() {
        assert_eq!(classes(r#""\"x""#), vec![St; 5]);
    }

    #[test]
    fn mismatched_quote_does_not_close() {
        assert_eq!(classes("\"'a"), vec![St, St, St]);
    }

    #[test]
    fn block_comment_start_inside_string_is_string() {
        let (out, open) = hl("\"/*\"", false);
        assert_eq!(out, vec![St; 4]);
        assert!(!open);
    }

    // -- Numbers --------------------------------------------------------------

    #[test]
    fn numbers_after_separators() {
        assert_eq!(classes("x=10"), vec![N, Op, Nu, Nu]);
    }

    #[test]
    fn decimal_point_inside_number() {
        assert_eq!(classes("3.14"), vec![Nu, Nu, Nu, Nu]);
    }

    #[test]
    fn digits_inside_identifiers_are_normal() {
        assert_eq!(classes("x1"), vec![N, N]);
    }

    #[test]
    fn numbers_disabled_by_features() {
        let lang = Language {
            features: Features::STRINGS,
            ..C
        };
        let mut out = Vec::new();
        highlight_line(b"42", Some(&lang), false, &mut out);
        assert_eq!(out, vec![N, N]);
    }

    #[test]
    fn strings_disabled_by_features() {
        let lang = Language {
            features: Features::NUMBERS,
            ..C
        };
        let mut out = Vec::new();
        highlight_line(b"\"a\"", Some(&lang), false, &mut out);
        assert_eq!(out, vec![N, N, N]);
    }

    // -- Keywords -------------------------------------------------------------

    #[test]
    fn type_and_control_keywords() {
        assert_eq!(
            classes("int if"),
            vec![Kt, Kt, Kt, N, Kc, Kc]
        );
    }

    #[test]
    fn keyword_needs_trailing_separator() {
        assert_eq!(classes("integer"), vec![N; 7]);
    }

    #[test]
    fn keyword_needs_leading_separator() {
        assert_eq!(classes("xint"), vec![N; 4]);
    }

    #[test]
    fn preprocessor_keyword_at_row_start() {
        let out = classes("#include <x>");
        assert_eq!(&out[..8], &[Kc; 8]);
    }

    #[test]
    fn keyword_before_paren() {
        assert_eq!(classes("if(x)"), vec![Kc, Kc, N, N, N]);
    }

    #[test]
    fn longest_keyword_wins() {
        static KEYWORDS: &[Keyword] = &[
            Keyword {
                text: "static",
                kind: KeywordKind::Control,
            },
            Keyword {
                text: "static_cast",
                kind: KeywordKind::Type,
            },
        ];
        let kw = match_keyword(b"static_cast<int>", KEYWORDS).unwrap();
        assert_eq!(kw.text, "static_cast");
    }

    #[test]
    fn equal_length_keywords_keep_table_order() {
        // "auto" is listed as control before type in the C table.
        assert_eq!(classes("auto"), vec![Kc; 4]);
    }

    // -- Operators ------------------------------------------------------------

    #[test]
    fn operators_are_classified() {
        assert_eq!(classes("a+b"), vec![N, Op, N]);
        assert_eq!(classes("!x"), vec![Op, N]);
    }

    #[test]
    fn longest_operator_wins() {
        let ops = ["<", "<<", "<<="];
        assert_eq!(longest_prefix(b"<<= 1", ops.iter().copied()), Some("<<="));
        assert_eq!(longest_prefix(b"<1", ops.iter().copied()), Some("<"));
        assert_eq!(longest_prefix(b"x", ops.iter().copied()), None);
    }

    #[test]
    fn operator_then_keyword() {
        assert_eq!(classes("=int"), vec![Op, Kt, Kt, Kt]);
    }

    // -- Whole line -----------------------------------------------------------

    #[test]
    fn typical_c_line() {
        let out = classes("int main() {");
        assert_eq!(&out[..3], &[Kt, Kt, Kt]);
        assert_eq!(&out[3..], &[N; 9]);
    }

    #[test]
    fn return_statement() {
        assert_eq!(
            classes("return 0;"),
            vec![Kc, Kc, Kc, Kc, Kc, Kc, N, Nu, N]
        );
    }
}
