//! CSV emitter (`spec.md` §4.1).

use std::io::{self, Write};

pub struct CsvWriter<W> {
    inner: W,
    sep: u8,
    smart_quote: bool,
    rsep: String,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W, sep: u8, smart_quote: bool, rsep: impl Into<String>) -> Self {
        CsvWriter {
            inner,
            sep,
            smart_quote,
            rsep: rsep.into(),
        }
    }

    fn needs_quote(&self, field: &str) -> bool {
        field.as_bytes().iter().any(|&b| {
            b == self.sep || b == b'"' || b == b'\r' || b == b'\n'
        })
    }

    /// Writes one row honouring the configured smart-quote setting.
    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        for (i, f) in fields.iter().enumerate() {
            if i > 0 {
                self.inner.write_all(&[self.sep])?;
            }
            let f = f.as_ref();
            if self.smart_quote && self.needs_quote(f) {
                self.inner.write_all(b"\"")?;
                let mut start = 0;
                for (idx, _) in f.match_indices('"') {
                    self.inner.write_all(f[start..idx].as_bytes())?;
                    self.inner.write_all(b"\"\"")?;
                    start = idx + 1;
                }
                self.inner.write_all(f[start..].as_bytes())?;
                self.inner.write_all(b"\"")?;
            } else {
                self.inner.write_all(f.as_bytes())?;
            }
        }
        self.inner.write_all(self.rsep.as_bytes())?;
        Ok(())
    }

    /// Writes a row verbatim: fields joined by the separator with no
    /// quoting at all, regardless of the smart-quote setting. Used by
    /// `escape`/`number` which must not alter field content.
    pub fn write_row_raw<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        for (i, f) in fields.iter().enumerate() {
            if i > 0 {
                self.inner.write_all(&[self.sep])?;
            }
            self.inner.write_all(f.as_ref().as_bytes())?;
        }
        self.inner.write_all(self.rsep.as_bytes())?;
        Ok(())
    }

    /// Writes arbitrary non-CSV text verbatim (SQL statements, ASCII
    /// tables, ...).
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parser::CsvParser;

    fn write_row(fields: &[&str], smart_quote: bool) -> String {
        let mut w = CsvWriter::new(Vec::new(), b',', smart_quote, "\n");
        w.write_row(fields).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn plain_fields_unquoted() {
        assert_eq!(write_row(&["a", "b"], true), "a,b\n");
    }

    #[test]
    fn quotes_field_with_separator() {
        assert_eq!(write_row(&["a,b", "c"], true), "\"a,b\",c\n");
    }

    #[test]
    fn doubles_embedded_quotes() {
        assert_eq!(write_row(&["say \"hi\""], true), "\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn without_smart_quote_emits_verbatim() {
        assert_eq!(write_row(&["a,b"], false), "a,b\n");
    }

    #[test]
    fn emit_then_parse_is_identity_when_smart_quoted() {
        let fields = vec!["has, comma", "has \"quote\"", "has\nnewline", "plain"];
        let mut w = CsvWriter::new(Vec::new(), b',', true, "\n");
        w.write_row(&fields).unwrap();
        let bytes = w.into_inner();

        let mut p = CsvParser::new(&bytes[..], "roundtrip", b',', false);
        let row = p.parse_next().unwrap().unwrap();
        assert_eq!(row, fields);
    }
}
