//! Streaming CSV parser (`spec.md` §4.1).
//!
//! A record is terminated by an unquoted newline; a field is terminated by
//! an unquoted separator. A field is "quoted" iff the first non-whitespace
//! byte of the field is `"` - everything before that point is discarded,
//! and everything after the matching closing quote up to the next
//! separator/newline must be whitespace.

use std::io::{self, BufReader, Read};

use crate::error::{CliError, CliResult};

/// One logical CSV record: an ordered, non-empty sequence of fields.
pub type Row = Vec<String>;

pub struct CsvParser<R> {
    inner: io::Bytes<BufReader<R>>,
    peeked: Option<u8>,
    sep: u8,
    ignore_blank_lines: bool,
    source: String,
    line: usize,
    record: usize,
    eof: bool,
}

impl<R: Read> CsvParser<R> {
    pub fn new(reader: R, source: impl Into<String>, sep: u8, ignore_blank_lines: bool) -> Self {
        CsvParser {
            inner: BufReader::new(reader).bytes(),
            peeked: None,
            sep,
            ignore_blank_lines,
            source: source.into(),
            line: 0,
            record: 0,
            eof: false,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source
    }

    /// Physical line number of the most recently completed record.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn record_number(&self) -> usize {
        self.record
    }

    fn err(&self, msg: impl std::fmt::Display) -> CliError {
        CliError::Other(format!("{} (line {}): {}", self.source, self.line + 1, msg))
    }

    fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.peeked.is_none() && !self.eof {
            self.peeked = match self.inner.next() {
                Some(Ok(b)) => Some(b),
                Some(Err(e)) => return Err(e),
                None => {
                    self.eof = true;
                    None
                }
            };
        }
        Ok(self.peeked)
    }

    fn advance(&mut self) -> io::Result<Option<u8>> {
        let b = self.peek()?;
        self.peeked = None;
        Ok(b)
    }

    /// Parses the next record, or returns `Ok(None)` at end of input.
    pub fn parse_next(&mut self) -> CliResult<Option<Row>> {
        // skip over blank physical lines (a lone newline with no content yet)
        loop {
            match self.peek()? {
                None => return Ok(None),
                Some(b'\n') => {
                    self.advance()?;
                    self.line += 1;
                    if self.ignore_blank_lines {
                        continue;
                    }
                    self.record += 1;
                    return Ok(Some(vec![String::new()]));
                }
                Some(b'\r') => {
                    self.advance()?;
                }
                _ => break,
            }
        }

        let mut fields = Vec::new();
        loop {
            let field = self.parse_field()?;
            fields.push(field);
            match self.peek()? {
                Some(c) if c == self.sep => {
                    self.advance()?;
                }
                Some(b'\n') => {
                    self.advance()?;
                    self.line += 1;
                    break;
                }
                Some(b'\r') => {
                    self.advance()?;
                }
                None => break,
                Some(c) => {
                    return Err(self.err(format!(
                        "unexpected character '{}' after field",
                        c as char
                    )))
                }
            }
        }
        self.record += 1;
        Ok(Some(fields))
    }

    fn parse_field(&mut self) -> CliResult<String> {
        let mut lead_ws = Vec::new();
        loop {
            match self.peek()? {
                Some(b @ b' ') | Some(b @ b'\t') => {
                    self.advance()?;
                    lead_ws.push(b);
                }
                _ => break,
            }
        }
        if self.peek()? == Some(b'"') {
            self.advance()?;
            return self.parse_quoted_body();
        }
        // unquoted: the leading whitespace is part of the field's content
        let mut field = lead_ws;
        loop {
            match self.peek()? {
                None => break,
                Some(c) if c == self.sep || c == b'\n' || c == b'\r' => break,
                Some(_) => field.push(self.advance()?.unwrap()),
            }
        }
        self.bytes_to_field(field)
    }

    fn bytes_to_field(&self, bytes: Vec<u8>) -> CliResult<String> {
        String::from_utf8(bytes).map_err(|e| self.err(format!("invalid UTF-8: {}", e)))
    }

    fn parse_quoted_body(&mut self) -> CliResult<String> {
        let mut field = Vec::new();
        loop {
            match self.advance()? {
                None => return Err(self.err("unterminated quoted field")),
                Some(b'"') => {
                    if self.peek()? == Some(b'"') {
                        self.advance()?;
                        field.push(b'"');
                    } else {
                        break;
                    }
                }
                Some(b'\n') => {
                    self.line += 1;
                    field.push(b'\n');
                }
                Some(b) => field.push(b),
            }
        }
        // trailing whitespace before the separator/newline is ignored
        loop {
            match self.peek()? {
                Some(b' ') | Some(b'\t') => {
                    self.advance()?;
                }
                None => break,
                Some(c) if c == self.sep || c == b'\n' || c == b'\r' => break,
                Some(c) => {
                    return Err(self.err(format!(
                        "unexpected character '{}' after closing quote",
                        c as char
                    )))
                }
            }
        }
        self.bytes_to_field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(input: &str, sep: u8, ibl: bool) -> Vec<Row> {
        let mut p = CsvParser::new(input.as_bytes(), "test", sep, ibl);
        let mut out = Vec::new();
        while let Some(row) = p.parse_next().unwrap() {
            out.push(row);
        }
        out
    }

    #[test]
    fn simple_rows() {
        let rows = parse_all("a,b,c\n1,2,3\n", b',', false);
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn no_trailing_newline() {
        let rows = parse_all("a,b\nc,d", b',', false);
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn quoted_field_with_comma_and_doubled_quote() {
        let rows = parse_all("\"hello, \"\"world\"\"\",2\n", b',', false);
        assert_eq!(rows[0], vec!["hello, \"world\"", "2"]);
    }

    #[test]
    fn quoted_newline_does_not_split_record() {
        let rows = parse_all("\"line1\nline2\",2\n", b',', false);
        assert_eq!(rows[0], vec!["line1\nline2", "2"]);
        assert_eq!(rows[0][0].matches('\n').count(), 1);
    }

    #[test]
    fn blank_lines_ignored() {
        let rows = parse_all("a\n\n\nb\n", b',', true);
        assert_eq!(rows, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn blank_line_kept_as_single_empty_field() {
        let rows = parse_all("a\n\nb\n", b',', false);
        assert_eq!(rows, vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn custom_separator() {
        let rows = parse_all("a;b;c\n", b';', false);
        assert_eq!(rows, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn multibyte_utf8_preserved_unquoted_and_quoted() {
        let rows = parse_all("caf\u{e9},r\u{e9}sum\u{e9}\n\"\u{4e2d}\u{6587}\",2\n", b',', false);
        assert_eq!(rows[0], vec!["caf\u{e9}", "r\u{e9}sum\u{e9}"]);
        assert_eq!(rows[1], vec!["\u{4e2d}\u{6587}", "2"]);
    }
}
