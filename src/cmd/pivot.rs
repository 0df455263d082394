//! `pivot`: simple pivot tables (`spec.md` §4.5.14), grounded in
//! `examples/original_source/csvfix/src/csved_pivot.cpp`. Doesn't
//! support `skip`/`pass`.

use std::collections::BTreeSet;

use ahash::AHashMap;
use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::num::{fmt_num, is_number, to_real};

#[derive(Args, Debug, Clone)]
pub struct PivotArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Field to use for column headers (1-based)
    #[arg(short = 'c', long = "col")]
    pub col: usize,

    /// Field to use for row headers (1-based)
    #[arg(short = 'r', long = "row")]
    pub row: usize,

    /// Field representing the fact to accumulate (1-based)
    #[arg(short = 'f', long = "fact")]
    pub fact: usize,

    /// Action to perform: sum, avg, or count
    #[arg(short = 'a', long = "action")]
    pub action: String,
}

#[derive(Clone, Copy, PartialEq)]
enum Action {
    Sum,
    Count,
    Average,
}

fn get_action(s: &str) -> CliResult<Action> {
    match s {
        "sum" => Ok(Action::Sum),
        "count" => Ok(Action::Count),
        "avg" => Ok(Action::Average),
        _ => Err(format!("invalid value for -a. Need one of sum, count, avg: {}", s).into()),
    }
}

fn get_field(n: usize, option: &str) -> CliResult<usize> {
    if n == 0 {
        return Err(format!("value for {} must be greater than zero", option).into());
    }
    Ok(n - 1)
}

#[derive(Default, Clone, Copy)]
struct SumCount {
    sum: f64,
    count: u64,
}

impl SumCount {
    fn update(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }
}

pub fn run(mut cfg: Config, args: &PivotArgs) -> CliResult<()> {
    let row_idx = get_field(args.row, "-r")?;
    let col_idx = get_field(args.col, "-c")?;
    let fact_idx = get_field(args.fact, "-f")?;
    if row_idx == col_idx {
        return Err("row and column options cannot have the same value".into());
    }
    let action = get_action(&args.action)?;

    let mut map: AHashMap<(String, String), SumCount> = AHashMap::new();
    let mut cols: BTreeSet<String> = BTreeSet::new();
    let mut rows: BTreeSet<String> = BTreeSet::new();

    while let Some(row) = cfg.io.read_csv()? {
        if col_idx >= row.len() || row_idx >= row.len() {
            return Err("invalid row/column index".into());
        }
        if fact_idx >= row.len() {
            return Err(format!("invalid fact index: {}", fact_idx).into());
        }
        let col = row[col_idx].clone();
        let rw = row[row_idx].clone();
        let fact = &row[fact_idx];

        let value = if action == Action::Count {
            1.0
        } else {
            if !is_number(fact) {
                return Err(format!("non-numeric fact: {}", fact).into());
            }
            to_real(fact)
        };
        map.entry((col.clone(), rw.clone())).or_default().update(value);
        cols.insert(col);
        rows.insert(rw);
    }

    let mut header: Row = vec![String::new()];
    header.extend(cols.iter().cloned());
    cfg.io.write_row(&header)?;

    for rw in &rows {
        let mut out: Row = vec![rw.clone()];
        for col in &cols {
            let sc = map
                .get(&(col.clone(), rw.clone()))
                .copied()
                .unwrap_or_default();
            let v = if action == Action::Average && sc.count > 0 {
                sc.sum / sc.count as f64
            } else {
                sc.sum
            };
            out.push(fmt_num(v));
        }
        cfg.io.write_row(&out)?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parsing() {
        assert!(get_action("sum").is_ok());
        assert!(get_action("bogus").is_err());
    }

    #[test]
    fn sumcount_accumulates() {
        let mut sc = SumCount::default();
        sc.update(1.0);
        sc.update(2.0);
        assert_eq!(sc.sum, 3.0);
        assert_eq!(sc.count, 2);
    }
}
