//! `flatten`/`unflatten`: master-detail collapsing and its inverse
//! (`spec.md` §4.5.4), grounded in
//! `examples/original_source/csvfix/src/csved_flatten.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::expr::Program;
use crate::field_list::parse_field_list;

#[derive(Args, Debug, Clone)]
pub struct FlattenArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Key fields that identify when a new group starts (default: field 1)
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Data fields to append (default: all but the key fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Drop the key fields from the output row (default: retain them)
    #[arg(short = 'r', long = "remove")]
    pub remove: bool,

    /// Master-record identifying expression: subsequent non-master rows are details
    #[arg(long = "me")]
    pub master_expr: Option<String>,
}

fn make_key(row: &Row, key_fields: &[usize]) -> String {
    let mut key = String::new();
    for &i in key_fields {
        if let Some(v) = row.get(i) {
            key.push_str(v);
        }
        key.push('\0');
    }
    key
}

fn new_group(row: &Row, key_fields: &[usize], keep_key: bool) -> Row {
    let mut data = Vec::new();
    if keep_key {
        for &i in key_fields {
            data.push(row.get(i).cloned().unwrap_or_default());
        }
    }
    data
}

fn add_data(data: &mut Row, row: &Row, key_fields: &[usize], data_fields: &[usize]) {
    if data_fields.is_empty() {
        for (i, v) in row.iter().enumerate() {
            if !key_fields.contains(&i) {
                data.push(v.clone());
            }
        }
    } else {
        for &i in data_fields {
            data.push(row.get(i).cloned().unwrap_or_default());
        }
    }
}

fn md_flatten(mut cfg: Config, expr: &str) -> CliResult<()> {
    let prog = Program::compile(expr)?;
    let mut master: Option<Row> = None;
    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        if prog.eval_bool(&row, &mut cfg.ctx)? {
            master = Some(row);
        } else {
            let master_row = master
                .as_ref()
                .ok_or("flatten: no master record identified")?;
            let mut out = master_row.clone();
            out.extend(row);
            cfg.io.write_row(&out)?;
        }
    }
    cfg.io.flush()
}

pub fn run(cfg: Config, args: &FlattenArgs) -> CliResult<()> {
    if let Some(expr) = &args.master_expr {
        if args.cols.is_some() || args.key.is_some() || args.remove {
            return Err("flatten: cannot use -me with -k/-f/-r".into());
        }
        return md_flatten(cfg, expr);
    }
    let mut cfg = cfg;

    let key_fields = parse_field_list(args.key.as_deref().unwrap_or("1"))?;
    let data_fields = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let keep_key = !args.remove;

    let mut cur_key: String = String::new();
    let mut data: Row = Vec::new();
    let mut read = 0usize;

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let key = make_key(&row, &key_fields);
        if read == 0 {
            data = new_group(&row, &key_fields, keep_key);
        } else if key != cur_key {
            cfg.io.write_row(&data)?;
            data = new_group(&row, &key_fields, keep_key);
        }
        add_data(&mut data, &row, &key_fields, &data_fields);
        cur_key = key;
        read += 1;
    }
    if read > 0 {
        cfg.io.write_row(&data)?;
    }
    cfg.io.flush()
}

#[derive(Args, Debug, Clone)]
pub struct UnflattenArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Key fields, output first on every row (default: field 1)
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Number of data fields per output row (default: 1)
    #[arg(short = 'n', long = "num")]
    pub num: Option<i64>,
}

pub fn run_unflatten(mut cfg: Config, args: &UnflattenArgs) -> CliResult<()> {
    let key_fields = parse_field_list(args.key.as_deref().unwrap_or("1"))?;
    let n = args.num.unwrap_or(1);
    if n <= 0 {
        return Err("unflatten: -n must be greater than zero".into());
    }
    let n = n as usize;

    while let Some(row) = cfg.io.read_csv()? {
        let key: Row = key_fields
            .iter()
            .filter_map(|&i| row.get(i).cloned())
            .collect();

        let mut i = 0;
        while i < row.len() {
            let mut out = key.clone();
            let mut remaining = n;
            let mut added = false;
            while remaining > 0 && i < row.len() {
                if !key_fields.contains(&i) {
                    out.push(row[i].clone());
                    added = true;
                    remaining -= 1;
                }
                i += 1;
            }
            if added {
                cfg.io.write_row(&out)?;
            }
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_concats_with_nul() {
        let row = vec!["a".to_string(), "1".to_string()];
        assert_eq!(make_key(&row, &[0]), "a\0");
    }

    #[test]
    fn add_data_skips_key_fields_by_default() {
        let row = vec!["a".to_string(), "1".to_string(), "2".to_string()];
        let mut data = vec!["a".to_string()];
        add_data(&mut data, &row, &[0], &[]);
        assert_eq!(data, vec!["a", "1", "2"]);
    }
}
