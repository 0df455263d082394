//! `atable`: render buffered CSV rows as a fixed-width ASCII table
//! (`spec.md` SPEC_FULL.md §4 supplemental commands). Output is a
//! non-CSV textual artefact, like `sql_insert`'s generated statements.
//! Grounded in `examples/original_source/csvfix/src/csved_atable.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;

#[derive(Args, Debug, Clone)]
pub struct AtableArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated table headers, or `@` to use the first input row as the header
    #[arg(short = 'h', long = "head")]
    pub head: Option<String>,

    /// Fields to right-align (default: left-aligned)
    #[arg(long = "ra")]
    pub right_align: Option<String>,

    /// Insert a separator line after every data row
    #[arg(short = 's', long = "lsep")]
    pub line_sep: bool,
}

fn make_sep(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push('-');
        s.push_str(&"-".repeat(*w));
        s.push_str("-+");
    }
    s
}

fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - len), s)
    }
}

fn centre(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let total = width - len;
    let left = total / 2;
    let right = total - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

fn output_row(out: &mut String, row: &Row, widths: &[usize], right_align: &[usize]) {
    out.push('|');
    for (i, w) in widths.iter().enumerate() {
        let val = row.get(i).map(String::as_str).unwrap_or("");
        let cell = if right_align.contains(&i) { pad_left(val, *w) } else { pad_right(val, *w) };
        out.push(' ');
        out.push_str(&cell);
        out.push_str(" |");
    }
    out.push('\n');
}

fn output_headings(out: &mut String, row: &Row, widths: &[usize]) {
    out.push('|');
    for (i, w) in widths.iter().enumerate() {
        let val = row.get(i).map(String::as_str).unwrap_or("");
        out.push(' ');
        out.push_str(&centre(val, *w));
        out.push_str(" |");
    }
    out.push('\n');
    out.push_str(&make_sep(widths));
    out.push('\n');
}

pub fn run(mut cfg: Config, args: &AtableArgs) -> CliResult<()> {
    let right_align = match &args.right_align {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    let mut rows: Vec<Row> = Vec::new();
    let mut widths: Vec<usize> = Vec::new();
    let mut has_heading = false;

    if let Some(h) = &args.head {
        if h != "@" {
            let heading: Row = h.split(',').map(str::to_string).collect();
            for (i, cell) in heading.iter().enumerate() {
                if i >= widths.len() {
                    widths.push(0);
                }
                widths[i] = widths[i].max(cell.chars().count());
            }
            rows.push(heading);
            has_heading = true;
        } else {
            has_heading = true;
        }
    }

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        for (i, cell) in row.iter().enumerate() {
            if i >= widths.len() {
                widths.push(0);
            }
            widths[i] = widths[i].max(cell.chars().count());
        }
        rows.push(row);
    }

    let sep = make_sep(&widths);
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        if i == 0 && has_heading {
            output_headings(&mut out, row, &widths);
        } else {
            output_row(&mut out, row, &widths, &right_align);
            if args.line_sep {
                out.push_str(&sep);
                out.push('\n');
            }
        }
    }
    if !args.line_sep {
        out.push_str(&sep);
        out.push('\n');
    }
    cfg.io.write_text(&out)?;
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_right_by_default() {
        assert_eq!(pad_right("ab", 4), "ab  ");
    }

    #[test]
    fn centres_heading() {
        assert_eq!(centre("ab", 6), "  ab  ");
    }

    #[test]
    fn separator_matches_widths() {
        assert_eq!(make_sep(&[3, 1]), "+-----+---+");
    }
}
