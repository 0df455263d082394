//! `unique`: drop duplicate rows, or show only the duplicates, keyed on a
//! field list (`spec.md` §2 lists `unique` among the buffering commands),
//! grounded in `examples/original_source/csvfix/inc/csved_unique.h`'s
//! `UniqueCommand` (`MakeKey`/`FilterUnique`/`FilterDupes` split).

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;

#[derive(Args, Debug, Clone)]
pub struct UniqueArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields making up the uniqueness key (default: all fields)
    #[arg(short = 'f', long = "fields")]
    pub fields: Option<String>,

    /// Emit the duplicate rows instead of filtering them out
    #[arg(short = 'd', long = "dupes")]
    pub dupes: bool,
}

fn make_key(row: &Row, cols: &[usize]) -> String {
    if cols.is_empty() {
        row.join("\u{0}")
    } else {
        cols.iter()
            .map(|&i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\u{0}")
    }
}

pub fn run(mut cfg: Config, args: &UniqueArgs) -> CliResult<()> {
    let cols = match &args.fields {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    let mut rows = Vec::new();
    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        rows.push(row);
    }

    let mut seen = std::collections::HashSet::new();
    for row in &rows {
        let key = make_key(row, &cols);
        let is_first = seen.insert(key);
        if args.dupes {
            if !is_first {
                cfg.io.write_row(row)?;
            }
        } else if is_first {
            cfg.io.write_row(row)?;
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn make_key_joins_selected_fields_with_nul() {
        let r = row(&["a", "b", "c"]);
        assert_eq!(make_key(&r, &[0, 2]), "a\u{0}c");
    }

    #[test]
    fn make_key_defaults_to_whole_row() {
        let r = row(&["a", "b"]);
        assert_eq!(make_key(&r, &[]), "a\u{0}b");
    }
}
