//! Quoted-CSV tokenizer.
//!
//! Explicit state machine over the whole document:
//! - `FieldStart`: at the beginning of a field; leading blanks are skipped, a `"`
//!   opens a quoted field
//! - `Unquoted`: plain run up to the next `,` or line end
//! - `Quoted`: everything is literal, including `,` and newlines
//! - `QuotedSeenQuote`: a `"` inside a quoted field; a second `"` is an escaped
//!   quote, anything else closes the quoted span
//!
//! `\n` and `\r\n` end a record outside quotes. Fields are trimmed after unquoting.
//! Unterminated quotes run to the end of input instead of failing.

use std::mem::take;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuotedSeenQuote,
}

/// Split `text` into records of trimmed fields.
///
/// Blank lines produce a record with a single empty field; callers decide whether
/// such records carry anything worth keeping.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::FieldStart => match ch {
                '"' => state = State::Quoted,
                ',' => record.push(String::new()),
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    record.push(String::new());
                    records.push(take(&mut record));
                }
                ' ' | '\t' => {}
                _ => {
                    field.push(ch);
                    state = State::Unquoted;
                }
            },
            State::Unquoted => match ch {
                ',' => {
                    record.push(finish(&mut field));
                    state = State::FieldStart;
                }
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    record.push(finish(&mut field));
                    records.push(take(&mut record));
                    state = State::FieldStart;
                }
                _ => field.push(ch),
            },
            State::Quoted => match ch {
                '"' => state = State::QuotedSeenQuote,
                _ => field.push(ch),
            },
            State::QuotedSeenQuote => match ch {
                '"' => {
                    field.push('"');
                    state = State::Quoted;
                }
                ',' => {
                    record.push(finish(&mut field));
                    state = State::FieldStart;
                }
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    record.push(finish(&mut field));
                    records.push(take(&mut record));
                    state = State::FieldStart;
                }
                // Stray text after a closing quote is kept rather than rejected.
                _ => {
                    field.push(ch);
                    state = State::Unquoted;
                }
            },
        }
    }

    // Trailing record without a final newline.
    if state != State::FieldStart || !record.is_empty() {
        record.push(finish(&mut field));
        records.push(record);
    }

    records
}

fn finish(field: &mut String) -> String {
    let value = take(field);
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        let rows = tokenize("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn comma_inside_quotes_is_one_field() {
        let rows = tokenize(r#"Engineer,"Acme, Inc.",Remote"#);
        assert_eq!(rows, vec![vec!["Engineer", "Acme, Inc.", "Remote"]]);
    }

    #[test]
    fn doubled_quotes_decode_to_literal_quote() {
        let rows = tokenize(r#""He said ""hi""",x"#);
        assert_eq!(rows[0][0], r#"He said "hi""#);
        assert_eq!(rows[0][1], "x");
    }

    #[test]
    fn newline_inside_quotes_is_literal() {
        let rows = tokenize("\"line one\nline two\",b\nnext,row");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "line one\nline two");
        assert_eq!(rows[1], vec!["next", "row"]);
    }

    #[test]
    fn crlf_line_endings() {
        let rows = tokenize("a,b\r\n1,2\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn empty_cells_are_empty_strings() {
        let rows = tokenize("a,,c,\n");
        assert_eq!(rows, vec![vec!["a", "", "c", ""]]);
    }

    #[test]
    fn fields_are_trimmed_after_unquoting() {
        let rows = tokenize(r#"  padded  , "  quoted  " ,x"#);
        assert_eq!(rows, vec![vec!["padded", "quoted", "x"]]);
    }

    #[test]
    fn blank_line_yields_single_empty_field() {
        let rows = tokenize("a\n\nb");
        assert_eq!(rows, vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        let rows = tokenize("\"open,ended");
        assert_eq!(rows, vec![vec!["open,ended"]]);
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn trailing_empty_field_at_eof() {
        let rows = tokenize("a,");
        assert_eq!(rows, vec![vec!["a", ""]]);
    }
}
