//! `block`: mark, keep or remove runs of rows delimited by begin/end
//! expressions (`spec.md` §4.5.12), grounded in
//! `examples/original_source/csvfix/src/csved_block.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;
use crate::expr::Program;

#[derive(Args, Debug, Clone)]
pub struct BlockArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Expression marking the start of a block
    #[arg(long = "be")]
    pub begin: String,

    /// Expression marking the end of a block
    #[arg(long = "ee")]
    pub end: String,

    /// Emit only rows inside the block
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Emit only rows outside the block
    #[arg(short = 'r', long = "remove")]
    pub remove: bool,

    /// Prepend a marker column: `in[,out]`
    #[arg(short = 'm', long = "mark")]
    pub mark: Option<String>,

    /// Treat begin/end marker rows themselves as outside the block
    #[arg(short = 'x', long = "exclusive")]
    pub exclusive: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum InOut {
    Outside,
    Inside,
}

enum Action {
    Keep,
    Remove,
    Mark(String, String),
}

fn pick_action(args: &BlockArgs) -> CliResult<Action> {
    let mut count = 0;
    if args.keep {
        count += 1;
    }
    if args.remove {
        count += 1;
    }
    if args.mark.is_some() {
        count += 1;
    }
    if count != 1 {
        return Err("block: need exactly one of -k, -r, -m".into());
    }
    if args.keep {
        return Ok(Action::Keep);
    }
    if args.remove {
        return Ok(Action::Remove);
    }
    let mark = args.mark.as_ref().unwrap();
    let mut it = mark.splitn(2, ',');
    let inmark = it.next().unwrap_or("").to_string();
    let outmark = it.next().unwrap_or("").to_string();
    Ok(Action::Mark(inmark, outmark))
}

pub fn run(mut cfg: Config, args: &BlockArgs) -> CliResult<()> {
    let action = pick_action(args)?;
    let begin_prog = Program::compile(&args.begin)?;
    let end_prog = Program::compile(&args.end)?;

    let mut state = InOut::Outside;
    let mut block = false;

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }

        match state {
            InOut::Outside => {
                if begin_prog.eval_bool(&row, &mut cfg.ctx)? {
                    block = !args.exclusive;
                    state = InOut::Inside;
                } else {
                    block = false;
                }
            }
            InOut::Inside => {
                if end_prog.eval_bool(&row, &mut cfg.ctx)? {
                    block = !args.exclusive;
                    state = InOut::Outside;
                } else {
                    block = true;
                }
            }
        }

        match &action {
            Action::Mark(inmark, outmark) => {
                let mut out = vec![if block { inmark.clone() } else { outmark.clone() }];
                out.extend(row.iter().cloned());
                cfg.io.write_row(&out)?;
            }
            Action::Keep if block => cfg.io.write_row(&row)?,
            Action::Remove if !block => cfg.io.write_row(&row)?,
            _ => {}
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_action_requires_exactly_one_flag() {
        let mut args = BlockArgs {
            common: CommonArgs::default(),
            begin: "1".into(),
            end: "1".into(),
            keep: false,
            remove: false,
            mark: None,
            exclusive: false,
        };
        assert!(pick_action(&args).is_err());
        args.keep = true;
        assert!(pick_action(&args).is_ok());
        args.remove = true;
        assert!(pick_action(&args).is_err());
    }

    #[test]
    fn mark_splits_on_comma() {
        let args = BlockArgs {
            common: CommonArgs::default(),
            begin: "1".into(),
            end: "1".into(),
            keep: false,
            remove: false,
            mark: Some("IN,OUT".into()),
            exclusive: false,
        };
        match pick_action(&args).unwrap() {
            Action::Mark(i, o) => {
                assert_eq!(i, "IN");
                assert_eq!(o, "OUT");
            }
            _ => panic!("expected Mark"),
        }
    }
}
