//! `timestamp`: prepend a date/time-of-run field to each row
//! (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/src/csved_timestamp.cpp`.

use chrono::Local;
use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;

#[derive(Args, Debug, Clone)]
pub struct TimestampArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Emit only the date part
    #[arg(short = 'd', long = "date")]
    pub date_only: bool,

    /// Emit only the time part
    #[arg(short = 't', long = "time")]
    pub time_only: bool,

    /// Emit the timestamp with no separators, as a plain number
    #[arg(short = 'n', long = "num")]
    pub numeric: bool,

    /// Re-read the current time for every row instead of stamping once at start
    #[arg(long = "rt")]
    pub real_time: bool,
}

fn format_stamp(show_date: bool, show_time: bool, numeric: bool) -> String {
    let now = Local::now();
    let mut out = String::new();
    if show_date {
        let fmt = if numeric { "%Y%m%d" } else { "%Y-%m-%d" };
        out.push_str(&now.format(fmt).to_string());
    }
    if show_date && show_time && !numeric {
        out.push(' ');
    }
    if show_time {
        let fmt = if numeric { "%H%M%S" } else { "%H:%M:%S" };
        out.push_str(&now.format(fmt).to_string());
    }
    out
}

pub fn run(mut cfg: Config, args: &TimestampArgs) -> CliResult<()> {
    if args.date_only && args.time_only {
        return Err("cannot specify both -d and -t".into());
    }
    let show_date = !args.time_only;
    let show_time = !args.date_only;

    let mut stamp = format_stamp(show_date, show_time, args.numeric);
    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        if args.real_time {
            stamp = format_stamp(show_date, show_time, args.numeric);
        }
        let mut out = Vec::with_capacity(row.len() + 1);
        out.push(stamp.clone());
        out.extend(row.iter().cloned());
        cfg.io.write_row(&out)?;
    }
    cfg.io.flush()
}
