//! `fmerge`: k-way sorted merge of N input streams (`spec.md` §4.5.2),
//! grounded in `examples/original_source/csvfix/src/csved_fmerge.cpp`'s
//! `MinFinder`/`RowGetter`.

use std::cmp::Ordering;
use std::io::Read;

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::{CsvParser, Row};
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::sort::compare_fields_lex;

#[derive(Args, Debug, Clone)]
pub struct FmergeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to compare when merging (default: all fields)
    #[arg(short = 'f', long = "fields")]
    pub fields: Option<String>,
}

/// A one-row look-ahead buffer around a parser (`spec.md` GLOSSARY
/// "latched getter"): `peek()` parses on demand and caches the row;
/// `consume()` clears the cache so the next `peek()` reads afresh.
struct LatchedGetter {
    parser: CsvParser<Box<dyn Read>>,
    cached: Option<Row>,
    exhausted: bool,
}

impl LatchedGetter {
    fn new(parser: CsvParser<Box<dyn Read>>) -> Self {
        LatchedGetter {
            parser,
            cached: None,
            exhausted: false,
        }
    }

    fn peek(&mut self) -> CliResult<Option<&Row>> {
        if self.cached.is_none() && !self.exhausted {
            self.cached = self.parser.parse_next()?;
            if self.cached.is_none() {
                self.exhausted = true;
            }
        }
        Ok(self.cached.as_ref())
    }

    fn consume(&mut self) -> Row {
        self.cached.take().expect("consume() called with nothing latched")
    }
}

pub fn run(mut cfg: Config, args: &FmergeArgs) -> CliResult<()> {
    let fields = match &args.fields {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    let n = cfg.io.stream_count();
    let mut getters: Vec<LatchedGetter> = (0..n)
        .map(|i| cfg.io.create_stream_parser(i).map(LatchedGetter::new))
        .collect::<CliResult<_>>()?;

    loop {
        let mut min_idx: Option<usize> = None;
        for i in 0..getters.len() {
            if getters[i].peek()?.is_some() {
                min_idx = match min_idx {
                    None => Some(i),
                    Some(m) => {
                        let row = getters[i].peek()?.unwrap();
                        let best = getters[m].peek()?.unwrap();
                        if compare_fields_lex(row, best, &fields) == Ordering::Less {
                            Some(i)
                        } else {
                            Some(m)
                        }
                    }
                };
            }
        }
        match min_idx {
            None => break,
            Some(i) => {
                let row = getters[i].consume();
                cfg.io.write_row(&row)?;
            }
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parser(s: &'static str) -> CsvParser<Box<dyn Read>> {
        let boxed: Box<dyn Read> = Box::new(Cursor::new(s.as_bytes()));
        CsvParser::new(boxed, "test", b',', false)
    }

    #[test]
    fn merges_two_sorted_single_field_streams() {
        let mut g0 = LatchedGetter::new(parser("a\nc\ne\n"));
        let mut g1 = LatchedGetter::new(parser("b\nd\nf\n"));
        let mut out = Vec::new();
        loop {
            let r0 = g0.peek().unwrap().cloned();
            let r1 = g1.peek().unwrap().cloned();
            match (r0, r1) {
                (None, None) => break,
                (Some(a), None) => {
                    out.push(a);
                    g0.consume();
                }
                (None, Some(b)) => {
                    out.push(b);
                    g1.consume();
                }
                (Some(a), Some(b)) => {
                    if compare_fields_lex(&a, &b, &[]) != Ordering::Greater {
                        out.push(a);
                        g0.consume();
                    } else {
                        out.push(b);
                        g1.consume();
                    }
                }
            }
        }
        assert_eq!(
            out,
            vec![vec!["a"], vec!["b"], vec!["c"], vec!["d"], vec!["e"], vec!["f"]]
        );
    }
}
