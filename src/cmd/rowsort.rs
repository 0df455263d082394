//! `rowsort`: sort the fields *within* a row, rather than sorting rows
//! (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/src/csved_rsort.cpp`'s
//! `RowSortCommand`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::num::to_real;

#[derive(Args, Debug, Clone)]
pub struct RowSortArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to sort, which must be contiguous (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub fields: Option<String>,

    /// Sort ascending (default)
    #[arg(short = 'a', long = "asc", conflicts_with = "desc")]
    pub asc: bool,

    /// Sort descending
    #[arg(short = 'd', long = "desc")]
    pub desc: bool,

    /// Lexicographic order (default)
    #[arg(short = 'l', long = "lex", conflicts_with = "num")]
    pub lex: bool,

    /// Numeric order
    #[arg(short = 'n', long = "num")]
    pub num: bool,
}

/// `RowSortCommand::CheckContiguous`: the selected fields must form a
/// contiguous run so the sorted values can be written back in place.
fn check_contiguous(fields: &[usize]) -> CliResult<()> {
    for pair in fields.windows(2) {
        if pair[1] != pair[0] + 1 {
            return Err("fields to sort must be contiguous".into());
        }
    }
    Ok(())
}

fn sort_row(row: &mut Row, fields: &[usize], ascending: bool, lex: bool) {
    let cols: Vec<usize> = if fields.is_empty() {
        (0..row.len()).collect()
    } else {
        fields.to_vec()
    };
    if cols.is_empty() {
        return;
    }
    let start = cols[0];
    let mut slice: Vec<String> = cols.iter().map(|&i| row[i].clone()).collect();
    if lex {
        slice.sort();
    } else {
        slice.sort_by(|a, b| to_real(a).partial_cmp(&to_real(b)).unwrap_or(std::cmp::Ordering::Equal));
    }
    if !ascending {
        slice.reverse();
    }
    for (offset, val) in slice.into_iter().enumerate() {
        row[start + offset] = val;
    }
}

pub fn run(mut cfg: Config, args: &RowSortArgs) -> CliResult<()> {
    if args.lex && args.num {
        return Err("only one of -l or -n allowed".into());
    }
    let fields = match &args.fields {
        Some(s) => {
            let f = parse_field_list(s)?;
            check_contiguous(&f)?;
            f
        }
        None => vec![],
    };
    let ascending = !args.desc;
    let lex = !args.num;

    while let Some(row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => cfg.io.write_row(&row)?,
            crate::command::Filter::Transform => {
                let mut row = row;
                sort_row(&mut row, &fields, ascending, lex);
                cfg.io.write_row(&row)?;
            }
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
    fn sorts_whole_row_lexically_ascending_by_default() {
        let mut r = row(&["c", "a", "b"]);
        sort_row(&mut r, &[], true, true);
        assert_eq!(r, row(&["a", "b", "c"]));
    }

    #[test]
    fn sorts_selected_contiguous_fields_numerically_descending() {
        let mut r = row(&["x", "10", "2", "100", "y"]);
        sort_row(&mut r, &[1, 2, 3], false, false);
        assert_eq!(r, row(&["x", "100", "10", "2", "y"]));
    }

    #[test]
    fn rejects_non_contiguous_fields() {
        assert!(check_contiguous(&[0, 2]).is_err());
    }

    #[test]
    fn accepts_contiguous_fields() {
        assert!(check_contiguous(&[1, 2, 3]).is_ok());
    }
}
