//! `echo`: the simplest possible command, reproduced here as the
//! template ancillary commands were bootstrapped from in the original
//! tool (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/inc/csved_echo.h`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;

#[derive(Args, Debug, Clone)]
pub struct EchoArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Literal field to emit (repeatable; default emits the row unchanged)
    #[arg(short = 'e', long = "expr")]
    pub fields: Vec<String>,
}

pub fn run(mut cfg: Config, args: &EchoArgs) -> CliResult<()> {
    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        if args.fields.is_empty() {
            cfg.io.write_row(&row)?;
        } else {
            cfg.io.write_row(&args.fields)?;
        }
    }
    cfg.io.flush()
}
