//! `summary`: single-action numeric/frequency/size summarisation
//! (`spec.md` §4.5.8), grounded in
//! `examples/original_source/csvfix/src/csved_sum.cpp`.

use std::cmp::Ordering;

use ahash::AHashMap;
use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::num::{is_number, to_real};

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Numeric average of the listed fields
    #[arg(long = "avg")]
    pub avg: Option<String>,
    /// Sum the listed fields
    #[arg(long = "sum")]
    pub sum: Option<String>,
    /// Emit all rows tied for the minimum of the listed fields
    #[arg(long = "min")]
    pub min: Option<String>,
    /// Emit all rows tied for the maximum of the listed fields
    #[arg(long = "max")]
    pub max: Option<String>,
    /// Median of the listed fields
    #[arg(long = "med")]
    pub med: Option<String>,
    /// Emit rows whose key has the highest frequency, prefixed by that count
    #[arg(long = "mod")]
    pub mode: Option<String>,
    /// Prepend each row's occurrence count for the listed fields
    #[arg(long = "frq")]
    pub freq: Option<String>,
    /// Stream min/max field lengths without buffering
    #[arg(long = "siz")]
    pub size: bool,
}

enum Action {
    Avg(Vec<usize>),
    Sum(Vec<usize>),
    Min(Vec<usize>),
    Max(Vec<usize>),
    Median(Vec<usize>),
    Mode(Vec<usize>),
    Freq(Vec<usize>),
    Size,
}

fn pick_action(args: &SummaryArgs) -> CliResult<Action> {
    let chosen: Vec<(&Option<String>, &str)> = vec![
        (&args.avg, "avg"),
        (&args.sum, "sum"),
        (&args.min, "min"),
        (&args.max, "max"),
        (&args.med, "med"),
        (&args.mode, "mod"),
        (&args.freq, "frq"),
    ];
    let mut count = chosen.iter().filter(|(v, _)| v.is_some()).count();
    if args.size {
        count += 1;
    }
    if count == 0 {
        return Err("summary: need a summary flag".into());
    }
    if count != 1 {
        return Err("summary: only one summary flag allowed".into());
    }
    if args.size {
        return Ok(Action::Size);
    }
    if let Some(f) = &args.avg {
        return Ok(Action::Avg(parse_field_list(f)?));
    }
    if let Some(f) = &args.sum {
        return Ok(Action::Sum(parse_field_list(f)?));
    }
    if let Some(f) = &args.min {
        return Ok(Action::Min(parse_field_list(f)?));
    }
    if let Some(f) = &args.max {
        return Ok(Action::Max(parse_field_list(f)?));
    }
    if let Some(f) = &args.med {
        return Ok(Action::Median(parse_field_list(f)?));
    }
    if let Some(f) = &args.mode {
        return Ok(Action::Mode(parse_field_list(f)?));
    }
    if let Some(f) = &args.freq {
        return Ok(Action::Freq(parse_field_list(f)?));
    }
    unreachable!()
}

fn ns_cmp(a: &str, b: &str) -> Ordering {
    if is_number(a) && is_number(b) {
        to_real(a).partial_cmp(&to_real(b)).unwrap_or(Ordering::Equal)
    } else {
        a.cmp(b)
    }
}

fn row_cmp(a: &Row, b: &Row, fields: &[usize]) -> CliResult<Ordering> {
    for &fi in fields {
        let av = a.get(fi).ok_or("summary: bad field index")?;
        let bv = b.get(fi).ok_or("summary: bad field index")?;
        let ord = ns_cmp(av, bv);
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(Ordering::Equal)
}

fn make_key(row: &Row, fields: &[usize]) -> String {
    let mut key = String::new();
    for &fi in fields {
        key.push_str(row.get(fi).map(String::as_str).unwrap_or(""));
        key.push('\0');
    }
    key
}

fn sum_cols(rows: &[Row], fields: &[usize]) -> CliResult<Vec<f64>> {
    let mut sums = vec![0.0; fields.len()];
    for row in rows {
        for (i, &fi) in fields.iter().enumerate() {
            let v = row.get(fi).ok_or("summary: invalid field index")?;
            sums[i] += to_real(v);
        }
    }
    Ok(sums)
}

fn fmt_f64(n: f64) -> String {
    crate::num::fmt_num(n)
}

pub fn run(mut cfg: Config, args: &SummaryArgs) -> CliResult<()> {
    let action = pick_action(args)?;

    if let Action::Size = action {
        let mut sizes: AHashMap<usize, (usize, usize)> = AHashMap::new();
        let mut order: Vec<usize> = Vec::new();
        while let Some(row) = cfg.io.read_csv()? {
            for (i, f) in row.iter().enumerate() {
                let len = f.chars().count();
                let entry = sizes.entry(i).or_insert_with(|| {
                    order.push(i);
                    (usize::MAX, 0)
                });
                entry.0 = entry.0.min(len);
                entry.1 = entry.1.max(len);
            }
        }
        order.sort_unstable();
        for i in order {
            let (min, max) = sizes[&i];
            cfg.io.write_text(&format!("{}: {},{}\n", i + 1, min, max))?;
        }
        cfg.io.flush()?;
        return Ok(());
    }

    let mut rows: Vec<Row> = Vec::new();
    while let Some(row) = cfg.io.read_csv()? {
        rows.push(row);
    }
    if rows.is_empty() {
        return Err("summary: no input".into());
    }

    match action {
        Action::Sum(fields) => {
            let sums = sum_cols(&rows, &fields)?;
            let out: Row = sums.into_iter().map(fmt_f64).collect();
            cfg.io.write_row(&out)?;
        }
        Action::Avg(fields) => {
            let sums = sum_cols(&rows, &fields)?;
            let n = rows.len() as f64;
            let out: Row = sums.into_iter().map(|s| fmt_f64(s / n)).collect();
            cfg.io.write_row(&out)?;
        }
        Action::Min(fields) | Action::Max(fields) => {
            let want_min = args.min.is_some();
            let mut best = rows[0].clone();
            for row in &rows[1..] {
                let ord = row_cmp(row, &best, &fields)?;
                if (want_min && ord == Ordering::Less) || (!want_min && ord == Ordering::Greater) {
                    best = row.clone();
                }
            }
            for row in &rows {
                if row_cmp(&best, row, &fields)? == Ordering::Equal {
                    cfg.io.write_row(row)?;
                }
            }
        }
        Action::Median(fields) => {
            let mut out = Row::new();
            for &col in &fields {
                let mut sorted = rows.clone();
                sorted.sort_by(|a, b| {
                    let av = a.get(col).map(|s| to_real(s)).unwrap_or(0.0);
                    let bv = b.get(col).map(|s| to_real(s)).unwrap_or(0.0);
                    av.partial_cmp(&bv).unwrap_or(Ordering::Equal)
                });
                let sz = sorted.len();
                let d = if sz % 2 == 1 {
                    to_real(&sorted[sz / 2][col])
                } else {
                    let d1 = to_real(&sorted[sz / 2 - 1][col]);
                    let d2 = to_real(&sorted[sz / 2][col]);
                    (d1 + d2) / 2.0
                };
                out.push(fmt_f64(d));
            }
            cfg.io.write_row(&out)?;
        }
        Action::Freq(fields) => {
            let mut freq: AHashMap<String, usize> = AHashMap::new();
            for row in &rows {
                *freq.entry(make_key(row, &fields)).or_insert(0) += 1;
            }
            for row in &rows {
                let n = freq[&make_key(row, &fields)];
                let mut out = vec![n.to_string()];
                out.extend(row.iter().cloned());
                cfg.io.write_row(&out)?;
            }
        }
        Action::Mode(fields) => {
            let mut freq: AHashMap<String, (usize, Vec<usize>)> = AHashMap::new();
            for (i, row) in rows.iter().enumerate() {
                let entry = freq.entry(make_key(row, &fields)).or_insert((0, Vec::new()));
                entry.0 += 1;
                entry.1.push(i);
            }
            let mode = freq.values().map(|(n, _)| *n).max().unwrap_or(0);
            for (n, indices) in freq.values() {
                if *n == mode {
                    for &i in indices {
                        let mut out = vec![mode.to_string()];
                        out.extend(rows[i].iter().cloned());
                        cfg.io.write_row(&out)?;
                    }
                }
            }
        }
        Action::Size => unreachable!(),
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_string_compare_prefers_numeric() {
        assert_eq!(ns_cmp("10", "9"), Ordering::Greater);
        assert_eq!(ns_cmp("abc", "abd"), Ordering::Less);
    }

    #[test]
    fn key_concats_fields_with_nul() {
        let row = vec!["a".to_string(), "b".to_string()];
        assert_eq!(make_key(&row, &[0, 1]), "a\0b\0");
    }
}
