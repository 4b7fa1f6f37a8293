//! Minimal CSV record reader.
//!
//! Handles comma-separated fields, double-quoted fields containing commas,
//! doubled quotes (`""`) inside quoted fields and quoted fields spanning
//! several lines. Blank lines are skipped. Bytes that are not valid UTF-8
//! are replaced and the record is flagged as lossy.

use std::borrow::Cow;
use std::io::{self, BufRead};

/// One record and the line it started on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
    /// Some of the record's bytes were not valid UTF-8.
    pub lossy: bool,
}

impl Record {
    /// Field `index`, trimmed; empty when the record is shorter.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.trim())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Iterator over the records of a buffered reader.
#[derive(Debug)]
pub struct Records<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Read the next physical line into `self.buf`, without its terminator.
    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(true)
    }

    /// Append the current line to `text`; returns `true` if it had to be
    /// decoded lossily.
    fn decode_into(&self, text: &mut String) -> bool {
        let decoded = String::from_utf8_lossy(&self.buf);
        let lossy = matches!(decoded, Cow::Owned(_));
        text.push_str(&decoded);
        lossy
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(false) => return None,
                Ok(true) if self.buf.iter().all(u8::is_ascii_whitespace) => continue,
                Ok(true) => break,
                Err(e) => return Some(Err(e)),
            }
        }
        let start = self.line;

        let mut text = String::new();
        let mut lossy = self.decode_into(&mut text);
        let (mut fields, mut open) = scan(&text);

        // A quoted field still open at the end of the line continues on the next.
        while open {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return Some(Err(e)),
            }
            text.push('\n');
            lossy |= self.decode_into(&mut text);
            (fields, open) = scan(&text);
        }

        Some(Ok(Record {
            line: start,
            fields,
            lossy,
        }))
    }
}

/// Split one CSV record into its fields.
///
/// A quote only opens a quoted section at the start of a field; elsewhere
/// it is kept literally. An unterminated quote runs to the end of the text.
pub fn split_record(text: &str) -> Vec<String> {
    scan(text).0
}

/// Fields of `text` and whether a quoted section is still open at its end.
fn scan(text: &str) -> (Vec<String>, bool) {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    (fields, in_quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn records(text: &str) -> Vec<Record> {
        Records::new(Cursor::new(text))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_split_plain() {
        assert_eq!(split_record("a,b,,d"), vec!["a", "b", "", "d"]);
    }

    #[test]
    fn test_split_quoted_comma_and_escaped_quote() {
        assert_eq!(
            split_record(r#"1,"Hello, Goodbye","He said ""hi""",x"#),
            vec!["1", "Hello, Goodbye", r#"He said "hi""#, "x"]
        );
    }

    #[test]
    fn test_split_python_list_field() {
        assert_eq!(
            split_record(r#"id,"['Simon & Garfunkel', 'Paul Simon']",1"#),
            vec!["id", "['Simon & Garfunkel', 'Paul Simon']", "1"]
        );
    }

    #[test]
    fn test_split_inner_quote_kept_literally() {
        assert_eq!(split_record(r#"it's "fine",2"#), vec![r#"it's "fine""#, "2"]);
    }

    #[test]
    fn test_split_trailing_empty_field() {
        assert_eq!(split_record("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_records_skip_blank_lines_and_track_line_numbers() {
        let parsed = records("name,energy\r\n\nfoo,0.5\n  \nbar,0.7\n");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].fields, vec!["name", "energy"]);
        assert_eq!(parsed[1].line, 3);
        assert_eq!(parsed[2].line, 5);
        assert_eq!(parsed[2].field(1), "0.7");
        assert_eq!(parsed[2].field(9), "");
    }

    #[test]
    fn test_records_multiline_quoted_field() {
        let parsed = records("name,energy\n\"Line one\nline two\",0.4\nnext,0.1\n");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1].fields, vec!["Line one\nline two", "0.4"]);
        assert_eq!(parsed[1].line, 2);
        assert_eq!(parsed[2].line, 4);
    }

    #[test]
    fn test_records_unterminated_quote_at_eof() {
        let parsed = records("\"never closed,1\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].fields, vec!["never closed,1"]);
    }

    #[test]
    fn test_records_inner_quote_does_not_join_lines() {
        let parsed = records("name,energy\n12\" Mix,0.5\nSecond,0.6\nThird,0.7\n");
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[1].fields, vec!["12\" Mix", "0.5"]);
        assert_eq!(parsed[2].line, 3);
        assert_eq!(parsed[3].fields, vec!["Third", "0.7"]);
    }

    #[test]
    fn test_records_escaped_quote_at_line_end_keeps_field_open() {
        let parsed = records("\"say \"\"\nhi\"\"\",1\nnext,2\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].fields, vec!["say \"\nhi\"", "1"]);
        assert_eq!(parsed[1].line, 3);
    }

    #[test]
    fn test_records_invalid_utf8_is_lossy_not_an_error() {
        let bytes: &[u8] = b"name,energy\nGood,0.5\nCaf\xE9,0.5\nAlso Good,0.6\n";
        let parsed = Records::new(Cursor::new(bytes))
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(parsed.len(), 4);
        assert!(!parsed[1].lossy);
        assert!(parsed[2].lossy);
        assert_eq!(parsed[2].field(0), "Caf\u{FFFD}");
        assert!(!parsed[3].lossy);
        assert_eq!(parsed[3].field(0), "Also Good");
    }
}
