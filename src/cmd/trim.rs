//! `trim`: trim leading/trailing whitespace on fields (`spec.md`
//! SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/inc/csved_trim.h`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;
use crate::field_list::parse_field_list;

#[derive(Args, Debug, Clone)]
pub struct TrimArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to trim (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Trim only leading whitespace
    #[arg(short = 'l', long = "lead")]
    pub lead_only: bool,

    /// Trim only trailing whitespace
    #[arg(short = 't', long = "trail")]
    pub trail_only: bool,
}

fn trim_value(v: &str, lead: bool, trail: bool) -> String {
    match (lead, trail) {
        (true, false) => v.trim_start().to_string(),
        (false, true) => v.trim_end().to_string(),
        _ => v.trim().to_string(),
    }
}

pub fn run(mut cfg: Config, args: &TrimArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let (lead, trail) = if args.lead_only {
        (true, false)
    } else if args.trail_only {
        (false, true)
    } else {
        (true, true)
    };

    while let Some(mut row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => {}
            crate::command::Filter::Transform => {
                for (i, v) in row.iter_mut().enumerate() {
                    if cols.is_empty() || cols.contains(&i) {
                        *v = trim_value(v, lead, trail);
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
    fn trims_both_sides_by_default() {
        assert_eq!(trim_value("  hi  ", true, true), "hi");
    }

    #[test]
    fn trims_only_leading() {
        assert_eq!(trim_value("  hi  ", true, false), "hi  ");
    }
}
