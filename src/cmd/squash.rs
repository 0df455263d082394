//! `squash`: collapse rows sharing a key into one row, accumulating the
//! other fields (`spec.md` SPEC_FULL.md §4 supplemental commands),
//! grounded in `examples/original_source/csvfix/inc/csved_squash.h`.
//! Distinct from `flatten` (which requires input to already be grouped
//! and simply concatenates): `squash` buffers by key across the whole
//! input and, for numeric value fields, sums rather than concatenates.

use indexmap::IndexMap;

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::num::{is_number, to_real};

#[derive(Args, Debug, Clone)]
pub struct SquashArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Key fields identifying rows to squash together
    #[arg(short = 'k', long = "key")]
    pub key: String,

    /// Value fields to accumulate (default: all non-key fields, summed if numeric)
    #[arg(short = 'v', long = "val")]
    pub val: Option<String>,
}

enum Accum {
    Sum(f64),
    Text(String),
}

impl Accum {
    fn add(&mut self, field: &str) {
        match self {
            Accum::Sum(n) => {
                if is_number(field) {
                    *n += to_real(field);
                } else {
                    *self = Accum::Text(field.to_string());
                }
            }
            Accum::Text(_) => {}
        }
    }

    fn into_string(self) -> String {
        match self {
            Accum::Sum(n) => crate::num::fmt_num(n),
            Accum::Text(s) => s,
        }
    }
}

fn make_key(row: &Row, key_fields: &[usize]) -> String {
    key_fields
        .iter()
        .map(|&i| row.get(i).map(String::as_str).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\u{0}")
}

pub fn run(mut cfg: Config, args: &SquashArgs) -> CliResult<()> {
    let key_fields = parse_field_list(&args.key)?;
    if key_fields.is_empty() {
        return Err("squash requires -k key fields".into());
    }
    let val_fields = match &args.val {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    let mut order: Vec<String> = Vec::new();
    let mut groups: IndexMap<String, (Row, Vec<Accum>)> = IndexMap::new();

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let key = make_key(&row, &key_fields);
        let targets: Vec<usize> = if val_fields.is_empty() {
            (0..row.len()).filter(|i| !key_fields.contains(i)).collect()
        } else {
            val_fields.clone()
        };

        groups
            .entry(key.clone())
            .and_modify(|(_, vals)| {
                for (slot, &i) in targets.iter().enumerate() {
                    if let Some(v) = row.get(i) {
                        if let Some(acc) = vals.get_mut(slot) {
                            acc.add(v);
                        }
                    }
                }
            })
            .or_insert_with(|| {
                order.push(key.clone());
                let key_row: Row = key_fields.iter().map(|&i| row.get(i).cloned().unwrap_or_default()).collect();
                let vals = targets
                    .iter()
                    .map(|&i| {
                        let v = row.get(i).map(String::as_str).unwrap_or("");
                        if is_number(v) {
                            Accum::Sum(to_real(v))
                        } else {
                            Accum::Text(v.to_string())
                        }
                    })
                    .collect();
                (key_row, vals)
            });
    }

    for key in order {
        if let Some((key_row, vals)) = groups.shift_remove(&key) {
            let mut out = key_row;
            out.extend(vals.into_iter().map(Accum::into_string));
            cfg.io.write_row(&out)?;
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_key_joins_with_nul() {
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(make_key(&row, &[0, 2]), "a\u{0}c");
    }

    #[test]
    fn accum_sums_numeric_values() {
        let mut acc = Accum::Sum(0.0);
        acc.add("3");
        acc.add("4");
        assert_eq!(acc.into_string(), "7");
    }
}
