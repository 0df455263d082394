//! `sort`: multi-key buffered sort (`spec.md` §4.5.1), grounded in
//! `examples/original_source/csvfix/src/csved_sort.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::sort::{compare_rows, parse_sort_spec, SortKey};

#[derive(Args, Debug, Clone)]
pub struct SortArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Sort field spec: idx[:flags],... (flags: A/D ascending/descending, S/N/I string/numeric/case-insensitive)
    #[arg(short = 'f', long = "fields")]
    pub fields: Option<String>,

    /// Retain the first input row as an unsorted header in the output
    #[arg(long = "rh")]
    pub retain_header: bool,
}

pub fn run(mut cfg: Config, args: &SortArgs) -> CliResult<()> {
    let keys: Vec<SortKey> = match &args.fields {
        Some(s) => parse_sort_spec(s)?,
        None => vec![],
    };
    if keys.is_empty() {
        return Err("sort requires -f fields".into());
    }

    let mut header: Option<Row> = None;
    let mut rows: Vec<Row> = Vec::new();
    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        if args.retain_header && header.is_none() {
            header = Some(row);
            continue;
        }
        rows.push(row);
    }

    rows.sort_by(|a, b| compare_rows(a, b, &keys));

    if let Some(h) = header {
        cfg.io.write_row(&h)?;
    }
    for row in &rows {
        cfg.io.write_row(row)?;
    }
    cfg.io.flush()
}
