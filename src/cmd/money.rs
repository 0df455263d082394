//! `money`: normalise a numeric field to a fixed 2-decimal money format
//! (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/inc/csved_money.h`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::num::is_number;

#[derive(Args, Debug, Clone)]
pub struct MoneyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to format (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Currency symbol to prefix the value with
    #[arg(short = 'c', long = "sym")]
    pub symbol: Option<String>,

    /// Value to use in place of a field that does not parse as a number
    #[arg(short = 'e', long = "err")]
    pub err_val: Option<String>,
}

fn format_money(v: &str, symbol: Option<&str>, err_val: Option<&str>) -> String {
    if !is_number(v) {
        return err_val.map(str::to_string).unwrap_or_else(|| v.to_string());
    }
    let n: f64 = v.trim().parse().unwrap_or(0.0);
    let formatted = format!("{:.2}", n);
    match symbol {
        Some(sym) => format!("{}{}", sym, formatted),
        None => formatted,
    }
}

pub fn run(mut cfg: Config, args: &MoneyArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    while let Some(mut row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => {}
            crate::command::Filter::Transform => {
                for (i, v) in row.iter_mut().enumerate() {
                    if cols.is_empty() || cols.contains(&i) {
                        *v = format_money(v, args.symbol.as_deref(), args.err_val.as_deref());
                    }
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
    fn formats_to_two_decimals() {
        assert_eq!(format_money("3", None, None), "3.00");
        assert_eq!(format_money("3.1", Some("$"), None), "$3.10");
    }

    #[test]
    fn non_numeric_falls_back_to_error_value() {
        assert_eq!(format_money("abc", None, Some("N/A")), "N/A");
        assert_eq!(format_money("abc", None, None), "abc");
    }
}
