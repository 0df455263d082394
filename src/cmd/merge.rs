//! `merge`: combine multiple fields into one (`spec.md` §2's "column
//! projection/exclusion" sibling transformation), grounded in
//! `examples/original_source/csvfix/src/csved_merge.cpp`.

use clap::Args;

use crate::command::{expand_escapes, CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to merge (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Separator to place between merged values (default: none)
    #[arg(short = 's', long = "msep")]
    pub sep: Option<String>,

    /// 0-based position to insert the merged field at (default: end)
    #[arg(short = 'p', long = "pos")]
    pub pos: Option<usize>,

    /// Retain the original merged-away fields in the output
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,
}

fn do_merge(row: &Row, cols: &[usize], sep: &str) -> String {
    let mut merged = String::new();
    if !cols.is_empty() {
        for (i, &ci) in cols.iter().enumerate() {
            if let Some(s) = row.get(ci) {
                merged.push_str(s);
                if i != cols.len() - 1 {
                    merged.push_str(sep);
                }
            }
        }
    } else {
        for (i, s) in row.iter().enumerate() {
            if i != 0 {
                merged.push_str(sep);
            }
            merged.push_str(s);
        }
    }
    merged
}

fn build_new_row(row: &Row, merged: &str, cols: &[usize], pos: usize, keep: bool) -> Row {
    let mut newrow = Row::new();
    for (i, field) in row.iter().enumerate() {
        if pos == i {
            newrow.push(merged.to_string());
        }
        if keep || (!cols.is_empty() && !cols.contains(&i)) {
            newrow.push(field.clone());
        }
    }
    if pos >= row.len() {
        newrow.push(merged.to_string());
    }
    newrow
}

pub fn run(mut cfg: Config, args: &MergeArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let sep = match &args.sep {
        Some(s) => expand_escapes(s)?,
        None => String::new(),
    };

    while let Some(row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => cfg.io.write_row(&row)?,
            crate::command::Filter::Transform => {
                let merged = do_merge(&row, &cols, &sep);
                let pos = args.pos.unwrap_or(row.len());
                let newrow = build_new_row(&row, &merged, &cols, pos, args.keep);
                cfg.io.write_row(&newrow)?;
            }
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_all_fields_by_default() {
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(do_merge(&row, &[], ""), "abc");
    }

    #[test]
    fn merges_selected_fields_with_separator() {
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(do_merge(&row, &[0, 2], "-"), "a-c");
    }

    #[test]
    fn build_new_row_places_merged_at_end_by_default_and_drops_merged_cols() {
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let newrow = build_new_row(&row, "a-c", &[0, 2], 3, false);
        assert_eq!(newrow, vec!["b", "a-c"]);
    }
}
