//! `seq`: prepend a sequence number field (`spec.md` SPEC_FULL.md §4
//! supplemental commands), grounded in
//! `examples/original_source/csvfix/inc/csved_seq.h`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;

#[derive(Args, Debug, Clone)]
pub struct SeqArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Starting sequence number (default 1)
    #[arg(short = 'v', long = "start", default_value_t = 1)]
    pub start: i64,

    /// Increment added to the sequence number for each row (default 1)
    #[arg(short = 'i', long = "inc", default_value_t = 1)]
    pub inc: i64,

    /// 0-based position to insert the sequence field at (default: front)
    #[arg(short = 'p', long = "pos")]
    pub pos: Option<usize>,

    /// Zero-pad the sequence number to this width
    #[arg(short = 'w', long = "width")]
    pub width: Option<usize>,
}

pub fn run(mut cfg: Config, args: &SeqArgs) -> CliResult<()> {
    let mut n = args.start;
    while let Some(row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => cfg.io.write_row(&row)?,
            crate::command::Filter::Transform => {
                let numstr = match args.width {
                    Some(w) => format!("{:0width$}", n, width = w),
                    None => n.to_string(),
                };
                let pos = args.pos.unwrap_or(0).min(row.len());
                let mut out = row.clone();
                out.insert(pos, numstr);
                cfg.io.write_row(&out)?;
                n += args.inc;
            }
        }
    }
    cfg.io.flush()
}
