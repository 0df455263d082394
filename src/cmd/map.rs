//! `map`: substitute field values via a `from`/`to` value-list pair
//! (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/src/csved_map.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::{parse_field_list, CommaList};

#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to map (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Comma-list of values to match
    #[arg(long = "from")]
    pub from: String,

    /// Comma-list of replacement values (1:1 with -from, or a single value for all, or shorter and the last value fills the rest)
    #[arg(long = "to")]
    pub to: String,

    /// Case-insensitive match
    #[arg(long = "ic")]
    pub ignore_case: bool,
}

fn expand(val: &str, row: &Row) -> CliResult<String> {
    if let Some(rest) = val.strip_prefix('$') {
        if let Some(doubled) = rest.strip_prefix('$') {
            return Ok(format!("${}", doubled));
        }
        let n: i64 = rest
            .parse()
            .map_err(|_| format!("invalid field specifier {}", val))?;
        if n <= 0 {
            return Err(format!("field numbers must be greater than zero at {}", val).into());
        }
        let idx = (n - 1) as usize;
        return Ok(row.get(idx).cloned().unwrap_or_default());
    }
    Ok(val.to_string())
}

fn map_value(val: &str, from: &CommaList, to: &CommaList, ic: bool, row: &Row) -> CliResult<Option<String>> {
    for i in 0..from.len() {
        let candidate = from.get(i).unwrap_or("");
        let matched = if ic {
            val.eq_ignore_ascii_case(candidate)
        } else {
            val == candidate
        };
        if matched {
            if to.is_empty() {
                return Ok(Some(String::new()));
            } else if to.len() == from.len() {
                return Ok(Some(expand(to.get(i).unwrap_or(""), row)?));
            } else {
                return Ok(Some(expand(to.get(to.len() - 1).unwrap_or(""), row)?));
            }
        }
    }
    Ok(None)
}

pub fn run(mut cfg: Config, args: &MapArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => {
            let c = parse_field_list(s)?;
            if c.is_empty() {
                return Err("map: field list cannot be empty".into());
            }
            c
        }
        None => vec![],
    };
    let from = CommaList::new(&args.from);
    let to = CommaList::new(&args.to);
    if to.len() > from.len() {
        return Err("map: list of 'to' values longer than list of 'from' values".into());
    }

    while let Some(mut row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let targets: Vec<usize> = if cols.is_empty() {
            (0..row.len()).collect()
        } else {
            cols.iter().copied().filter(|&i| i < row.len()).collect()
        };
        for i in targets {
            let snapshot = row.clone();
            if let Some(replacement) = map_value(&row[i], &from, &to, args.ignore_case, &snapshot)? {
                row[i] = replacement;
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
    fn maps_matching_value() {
        let from = CommaList::new("yes,no");
        let to = CommaList::new("1,0");
        let row = vec!["yes".to_string()];
        assert_eq!(map_value("yes", &from, &to, false, &row).unwrap(), Some("1".to_string()));
        assert_eq!(map_value("maybe", &from, &to, false, &row).unwrap(), None);
    }

    #[test]
    fn shorter_to_list_fills_with_last_value() {
        let from = CommaList::new("a,b,c");
        let to = CommaList::new("x");
        let row = vec![];
        assert_eq!(map_value("b", &from, &to, false, &row).unwrap(), Some("x".to_string()));
    }

    #[test]
    fn expands_positional_field_reference() {
        let row = vec!["first".to_string(), "second".to_string()];
        assert_eq!(expand("$2", &row).unwrap(), "second");
        assert_eq!(expand("$$1", &row).unwrap(), "$1");
    }
}
