//! `eval`: per-row expression evaluation, appending or replacing fields
//! (`spec.md` §4.5.6), grounded in
//! `examples/original_source/csvfix/src/csved_eval.cpp`.
//!
//! The source's `-e`/`-r`/`-if` flags are processed in the order they
//! appear on the command line, which matters: `-e` appends to the row
//! being built, so a later `-r` sees the appended value. clap derive
//! groups repeated flags by name rather than preserving cross-flag
//! order, so this command re-derives the op sequence from the raw
//! process argv instead of from the parsed `Vec` fields (see DESIGN.md).

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::expr::Program;

#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Expression to evaluate, appending the result as a new field (repeatable)
    #[arg(short = 'e', long = "expr")]
    pub expr: Vec<String>,

    /// Conditional: next two -e/-r are the if-true/if-false arms (repeatable)
    #[arg(long = "if")]
    pub if_expr: Vec<String>,

    /// Replace field N (1-based) with the expression's result: `N,expr` (repeatable)
    #[arg(short = 'r', long = "replace")]
    pub replace: Vec<String>,

    /// Discard the input row and write only the -e/-r results
    #[arg(short = 'd', long = "discard")]
    pub discard: bool,
}

enum Op {
    Append(Program),
    Replace(usize, Program),
    If(Program),
}

fn parse_ops_from_argv() -> CliResult<Vec<Op>> {
    let args: Vec<String> = std::env::args().collect();
    let mut ops = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-e" | "--expr" => {
                i += 1;
                let expr = args.get(i).ok_or("missing expression after -e")?;
                ops.push(Op::Append(Program::compile(expr)?));
            }
            "-r" | "--replace" => {
                i += 1;
                let spec = args.get(i).ok_or("missing field,expr pair after -r")?;
                let (field, expr) = spec
                    .split_once(',')
                    .ok_or_else(|| format!("invalid field/expr pair: {}", spec))?;
                let n: i64 = field
                    .parse()
                    .map_err(|_| format!("invalid field (need integer): {}", field))?;
                if n <= 0 {
                    return Err(format!("field must be greater than zero: {}", field).into());
                }
                ops.push(Op::Replace((n - 1) as usize, Program::compile(expr)?));
            }
            "--if" => {
                i += 1;
                let expr = args.get(i).ok_or("missing expression after --if")?;
                ops.push(Op::If(Program::compile(expr)?));
            }
            _ => {}
        }
        i += 1;
    }
    if ops.is_empty() {
        return Err("eval needs at least one -e or -r option".into());
    }
    Ok(ops)
}

pub fn run(mut cfg: Config, _args: &EvalArgs) -> CliResult<()> {
    let ops = parse_ops_from_argv()?;

    while let Some(row) = cfg.io.read_csv()? {
        let filter = cfg.filter(&row)?;
        let mut row = row;
        match filter {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => {}
            crate::command::Filter::Transform => {
                cfg.bind_row(&row);
                if _args.discard {
                    row = Row::new();
                }
                apply_ops(&ops, &mut row, &mut cfg)?;
            }
        }
        cfg.io.write_row(&row)?;
    }
    cfg.io.flush()
}

fn apply_ops(ops: &[Op], row: &mut Row, cfg: &mut Config) -> CliResult<()> {
    let mut skip_else = false;
    let mut i = 0;
    while i < ops.len() {
        match &ops[i] {
            Op::If(cond) => {
                if i + 1 < ops.len() && matches!(ops.get(i + 2), Some(Op::If(_))) {
                    return Err("eval: cannot have consecutive -if options".into());
                }
                if i + 2 >= ops.len() {
                    return Err("eval: need two -e/-r options after -if".into());
                }
                cfg.bind_row(row);
                if cond.eval_bool(row, &mut cfg.ctx)? {
                    skip_else = true;
                } else {
                    i += 1;
                }
            }
            Op::Append(expr) => {
                cfg.bind_row(row);
                let r = expr.eval(&mut cfg.ctx)?;
                row.push(r);
                if skip_else {
                    i += 1;
                    skip_else = false;
                }
            }
            Op::Replace(field, expr) => {
                cfg.bind_row(row);
                let r = expr.eval(&mut cfg.ctx)?;
                if *field < row.len() {
                    row[*field] = r;
                } else {
                    row.push(r);
                }
                if skip_else {
                    i += 1;
                    skip_else = false;
                }
            }
        }
        i += 1;
    }
    Ok(())
}
