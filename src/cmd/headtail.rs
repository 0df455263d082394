//! `head`/`tail`: first/last N rows (`spec.md` SPEC_FULL.md §4
//! supplemental commands), grounded in
//! `examples/original_source/csvfix/inc/csved_headtail.h`. `tail`
//! buffers only the last N rows, per `spec.md` §5's resource-model note
//! that buffering commands must document their memory use.

use std::collections::VecDeque;

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;

#[derive(Args, Debug, Clone)]
pub struct HeadArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of rows to emit (default 10)
    #[arg(short = 'n', long = "num", default_value_t = 10)]
    pub num: usize,
}

pub fn run_head(mut cfg: Config, args: &HeadArgs) -> CliResult<()> {
    let mut emitted = 0usize;
    while emitted < args.num {
        match cfg.io.read_csv()? {
            Some(row) => {
                if cfg.should_skip(&row)? {
                    continue;
                }
                cfg.io.write_row(&row)?;
                emitted += 1;
            }
            None => break,
        }
    }
    cfg.io.flush()
}

#[derive(Args, Debug, Clone)]
pub struct TailArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of rows to emit (default 10)
    #[arg(short = 'n', long = "num", default_value_t = 10)]
    pub num: usize,
}

pub fn run_tail(mut cfg: Config, args: &TailArgs) -> CliResult<()> {
    let mut last: VecDeque<Vec<String>> = VecDeque::with_capacity(args.num + 1);
    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        if args.num > 0 {
            if last.len() == args.num {
                last.pop_front();
            }
            last.push_back(row);
        }
    }
    for row in &last {
        cfg.io.write_row(row)?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_buffer_keeps_only_last_n() {
        let mut last: VecDeque<Vec<String>> = VecDeque::with_capacity(3);
        for i in 0..5 {
            if last.len() == 2 {
                last.pop_front();
            }
            last.push_back(vec![i.to_string()]);
        }
        assert_eq!(last, VecDeque::from([vec!["3".to_string()], vec!["4".to_string()]]));
    }
}
