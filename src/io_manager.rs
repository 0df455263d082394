//! Multiplexes N input sources (files or standard input) behind one
//! sequential reader, or hands out independent per-source parsers for the
//! multi-stream commands (`spec.md` §4.3).

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

use crate::csv::{CsvParser, CsvWriter, Row};
use crate::error::CliResult;

pub struct IoManager {
    sources: Vec<String>,
    sep: u8,
    ignore_blank_lines: bool,
    ignore_first_record: bool,
    header_skipped: bool,
    cur_index: usize,
    cur_parser: Option<CsvParser<Box<dyn Read>>>,
    line_index: usize,
    line_reader: Option<BufReader<Box<dyn Read>>>,
    line_file: String,
    line_no: usize,
    writer: CsvWriter<Box<dyn Write>>,
}

impl IoManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sources: Vec<String>,
        sep: u8,
        ignore_blank_lines: bool,
        ignore_first_record: bool,
        output: Option<&str>,
        smart_quote: bool,
        rsep: &str,
    ) -> CliResult<Self> {
        let out: Box<dyn Write> = match output {
            Some(path) => Box::new(io::BufWriter::new(File::create(path)?)),
            None => Box::new(io::BufWriter::new(io::stdout())),
        };
        let writer = CsvWriter::new(out, sep, smart_quote, rsep.to_string());
        let sources = if sources.is_empty() {
            vec!["-".to_string()]
        } else {
            sources
        };
        Ok(IoManager {
            sources,
            sep,
            ignore_blank_lines,
            ignore_first_record,
            header_skipped: false,
            cur_index: 0,
            cur_parser: None,
            line_index: 0,
            line_reader: None,
            line_file: String::new(),
            line_no: 0,
            writer,
        })
    }

    fn open(&self, name: &str) -> CliResult<Box<dyn Read>> {
        if name == "-" {
            Ok(Box::new(io::stdin()))
        } else {
            Ok(Box::new(File::open(name).map_err(|e| {
                format!("cannot open '{}': {}", name, e)
            })?))
        }
    }

    fn display_name(name: &str) -> String {
        if name == "-" {
            "<stdin>".to_string()
        } else {
            name.to_string()
        }
    }

    fn advance_parser(&mut self) -> CliResult<bool> {
        if self.cur_index >= self.sources.len() {
            return Ok(false);
        }
        let name = self.sources[self.cur_index].clone();
        let reader = self.open(&name)?;
        self.cur_parser = Some(CsvParser::new(
            reader,
            Self::display_name(&name),
            self.sep,
            self.ignore_blank_lines,
        ));
        self.cur_index += 1;
        Ok(true)
    }

    /// Reads the next record across all sources, advancing to the next
    /// source on EOF (`spec.md` §4.3 "Sequential concatenation").
    pub fn read_csv(&mut self) -> CliResult<Option<Row>> {
        loop {
            if self.cur_parser.is_none() && !self.advance_parser()? {
                return Ok(None);
            }
            match self.cur_parser.as_mut().unwrap().parse_next()? {
                Some(row) => {
                    if self.ignore_first_record && !self.header_skipped {
                        self.header_skipped = true;
                        continue;
                    }
                    return Ok(Some(row));
                }
                None => {
                    self.cur_parser = None;
                    continue;
                }
            }
        }
    }

    pub fn current_file(&self) -> &str {
        self.cur_parser.as_ref().map(|p| p.source_name()).unwrap_or("")
    }

    pub fn current_line(&self) -> usize {
        self.cur_parser.as_ref().map(|p| p.line()).unwrap_or(0)
    }

    /// Reads one raw physical line (no CSV parsing), for `read_fixed`.
    pub fn read_raw_line(&mut self) -> CliResult<Option<String>> {
        loop {
            if self.line_reader.is_none() {
                if self.line_index >= self.sources.len() {
                    return Ok(None);
                }
                let name = self.sources[self.line_index].clone();
                self.line_reader = Some(BufReader::new(self.open(&name)?));
                self.line_file = Self::display_name(&name);
                self.line_index += 1;
                self.line_no = 0;
            }
            let mut buf = String::new();
            let n = self.line_reader.as_mut().unwrap().read_line(&mut buf)?;
            if n == 0 {
                self.line_reader = None;
                continue;
            }
            self.line_no += 1;
            if buf.ends_with('\n') {
                buf.pop();
                if buf.ends_with('\r') {
                    buf.pop();
                }
            }
            return Ok(Some(buf));
        }
    }

    pub fn raw_line_file(&self) -> &str {
        &self.line_file
    }

    pub fn raw_line_no(&self) -> usize {
        self.line_no
    }

    pub fn write_row(&mut self, row: &[String]) -> CliResult<()> {
        self.writer.write_row(row)?;
        Ok(())
    }

    pub fn write_row_raw(&mut self, row: &[String]) -> CliResult<()> {
        self.writer.write_row_raw(row)?;
        Ok(())
    }

    pub fn write_text(&mut self, text: &str) -> CliResult<()> {
        self.writer.write_text(text)?;
        Ok(())
    }

    pub fn flush(&mut self) -> CliResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of input sources, for the multi-stream commands
    /// (`diff`, `fmerge`, `inter`).
    pub fn stream_count(&self) -> usize {
        self.sources.len()
    }

    /// Hands out an independent parser bound to source `i`
    /// (`spec.md` §4.3 "Parallel access").
    pub fn create_stream_parser(&self, i: usize) -> CliResult<CsvParser<Box<dyn Read>>> {
        let name = &self.sources[i];
        let reader = self.open(name)?;
        Ok(CsvParser::new(
            reader,
            Self::display_name(name),
            self.sep,
            self.ignore_blank_lines,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn with_temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_sequentially_across_two_files() {
        let f1 = with_temp_file("a,1\nb,2\n");
        let f2 = with_temp_file("c,3\n");
        let sources = vec![
            f1.path().to_str().unwrap().to_string(),
            f2.path().to_str().unwrap().to_string(),
        ];
        let mut io = IoManager::new(sources, b',', false, false, None, false, "\n").unwrap();
        let mut rows = Vec::new();
        while let Some(row) = io.read_csv().unwrap() {
            rows.push(row);
        }
        assert_eq!(rows, vec![vec!["a", "1"], vec!["b", "2"], vec!["c", "3"]]);
    }

    #[test]
    fn ignore_first_record_skips_only_once() {
        let f1 = with_temp_file("h1,h2\na,1\n");
        let sources = vec![f1.path().to_str().unwrap().to_string()];
        let mut io = IoManager::new(sources, b',', false, true, None, false, "\n").unwrap();
        let row = io.read_csv().unwrap().unwrap();
        assert_eq!(row, vec!["a", "1"]);
        assert!(io.read_csv().unwrap().is_none());
    }

    #[test]
    fn parallel_streams_are_independent() {
        let f1 = with_temp_file("a\nb\n");
        let f2 = with_temp_file("c\nd\n");
        let sources = vec![
            f1.path().to_str().unwrap().to_string(),
            f2.path().to_str().unwrap().to_string(),
        ];
        let io = IoManager::new(sources, b',', false, false, None, false, "\n").unwrap();
        assert_eq!(io.stream_count(), 2);
        let mut p0 = io.create_stream_parser(0).unwrap();
        let mut p1 = io.create_stream_parser(1).unwrap();
        assert_eq!(p0.parse_next().unwrap().unwrap(), vec!["a"]);
        assert_eq!(p1.parse_next().unwrap().unwrap(), vec!["c"]);
        assert_eq!(p0.parse_next().unwrap().unwrap(), vec!["b"]);
    }

    #[test]
    fn raw_line_reads_are_unparsed() {
        let f1 = with_temp_file("001  x\n002  y\n");
        let sources = vec![f1.path().to_str().unwrap().to_string()];
        let mut io = IoManager::new(sources, b',', false, false, None, false, "\n").unwrap();
        assert_eq!(io.read_raw_line().unwrap().unwrap(), "001  x");
        assert_eq!(io.read_raw_line().unwrap().unwrap(), "002  y");
        assert!(io.read_raw_line().unwrap().is_none());
    }
}
