//! `number`: convert formatted numeric fields (thousands separator +
//! decimal point in either EU or EN convention) to plain numeric form
//! (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/src/csved_number.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::num::is_number;

#[derive(Args, Debug, Clone)]
pub struct NumberArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to convert (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Input format: EN (1,234.00, default) or EU (1.234,00)
    #[arg(long = "fmt")]
    pub fmt: Option<String>,

    /// Replace a field that cannot be parsed with this string (default: leave unchanged)
    #[arg(long = "es")]
    pub err_str: Option<String>,

    /// Treat a conversion failure as a fatal error
    #[arg(long = "ec")]
    pub err_exit: bool,
}

fn convert_field(field: &str, thousands: char, decimal: char) -> String {
    let mut out = String::new();
    let mut have_dp = false;
    for c in field.chars() {
        if c == decimal {
            have_dp = true;
            out.push('.');
        } else if c == thousands && !have_dp {
            continue;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn run(mut cfg: Config, args: &NumberArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let fmt = args.fmt.as_deref().unwrap_or("EN");
    if fmt != "EN" && fmt != "EU" {
        return Err("-fmt must be EN or EU".into());
    }
    if args.err_exit && args.err_str.is_some() {
        return Err("cannot specify both -ec and -es".into());
    }
    let (thousands, decimal) = if fmt == "EN" { (',', '.') } else { ('.', ',') };

    while let Some(mut row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        for (i, v) in row.iter_mut().enumerate() {
            if !(cols.is_empty() || cols.contains(&i)) {
                continue;
            }
            let converted = convert_field(v, thousands, decimal);
            if is_number(&converted) {
                *v = converted;
            } else if args.err_exit {
                return Err(format!("Invalid number: {}", v).into());
            } else if let Some(err_str) = &args.err_str {
                *v = err_str.clone();
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
    fn converts_en_format() {
        assert_eq!(convert_field("1,234.50", ',', '.'), "1234.50");
    }

    #[test]
    fn converts_eu_format() {
        assert_eq!(convert_field("1.234,50", '.', ','), "1234.50");
    }
}
