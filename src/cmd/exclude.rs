//! `exclude`: column projection/exclusion, one of the core transformation
//! operations named in `spec.md` §2's component table (`spec.md` §4.5
//! calls out "column projection/exclusion" as part of the transformation
//! kernel). Grounded in
//! `examples/original_source/csvfix/src/csved_exclude.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::expr::Program;
use crate::field_list::parse_field_list;

#[derive(Args, Debug, Clone)]
pub struct ExcludeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to exclude (1-based comma list)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Fields to exclude, counted from the end of the record (1 = last field)
    #[arg(long = "rf")]
    pub rev_cols: Option<String>,

    /// Exclude the listed fields only when this expression evaluates truthy
    #[arg(long = "if")]
    pub if_expr: Option<String>,
}

fn exclude_row(row: &mut Row, cols: &[usize], rev_cols: &[usize]) {
    let n = row.len();
    let mut drop: Vec<usize> = cols.to_vec();
    for &r in rev_cols {
        if r < n {
            drop.push(n - 1 - r);
        }
    }
    drop.sort_unstable();
    drop.dedup();
    for &i in drop.iter().rev() {
        if i < row.len() {
            row.remove(i);
        }
    }
}

pub fn run(mut cfg: Config, args: &ExcludeArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let rev_cols = match &args.rev_cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    if cols.is_empty() && rev_cols.is_empty() {
        return Err("exclude needs -f or -rf fields".into());
    }
    let if_expr = args.if_expr.as_deref().map(Program::compile).transpose()?;

    while let Some(mut row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => {}
            crate::command::Filter::Transform => {
                let should = match &if_expr {
                    Some(prog) => prog.eval_bool(&row, &mut cfg.ctx)?,
                    None => true,
                };
                if should {
                    exclude_row(&mut row, &cols, &rev_cols);
                }
            }
        }
        cfg.io.write_row(&row)?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_listed_fields() {
        let mut row = vec!["a".into(), "b".into(), "c".into()];
        exclude_row(&mut row, &[1], &[]);
        assert_eq!(row, vec!["a", "c"]);
    }

    #[test]
    fn drops_from_end_of_record() {
        let mut row = vec!["a".into(), "b".into(), "c".into()];
        exclude_row(&mut row, &[], &[0]);
        assert_eq!(row, vec!["a", "b"]);
    }
}
