//! Command framework primitives shared by every sub-command (`spec.md`
//! §4.4): the universal flags, the `skip`/`pass` filter, and the
//! `Config` that resolves them into a ready-to-run `IoManager` +
//! expression context.

use clap::Args;

use crate::error::CliResult;
use crate::expr::{EvalCtx, Program};
use crate::io_manager::IoManager;

/// Flags every command honours unless its own help text says otherwise
/// (`spec.md` §6 "CLI surface"). Mirrors `markschl-seqtool`'s
/// `CommonArgs`/`GeneralArgs` flatten pattern in `cli.rs`.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Input files ('-' or no files at all reads standard input)
    pub files: Vec<String>,

    /// Field/record separator character (default ',') - '\t'/'\n'/'\r' escapes allowed
    #[arg(long = "sep", default_value = ",", global = true)]
    pub sep: String,

    /// Smart-quote CSV output: quote a field iff it needs it
    #[arg(long = "smq", global = true)]
    pub smq: bool,

    /// Ignore blank input lines
    #[arg(long = "ibl", global = true)]
    pub ibl: bool,

    /// Treat the first input record as a field-name header and discard it
    #[arg(long = "ifn", global = true)]
    pub ifn: bool,

    /// Output record separator (default newline)
    #[arg(long = "rsep", default_value = "\n", global = true)]
    pub rsep: String,

    /// Write output to this file instead of standard output
    #[arg(short = 'o', long = "output", global = true)]
    pub output: Option<String>,

    /// Bind a named expression variable: -v name=value (repeatable)
    #[arg(short = 'v', long = "var", global = true)]
    pub vars: Vec<String>,

    /// Drop a row for which this expression evaluates truthy, before pass/transform
    #[arg(long = "skip", global = true)]
    pub skip: Option<String>,

    /// Write a row unchanged (skipping the command's transform) when this expression evaluates truthy
    #[arg(long = "pass", global = true)]
    pub pass: Option<String>,

    /// Override the process-global RNG seed used by the random() builtin
    #[arg(long = "rseed", global = true)]
    pub rseed: Option<u64>,
}

/// Expands `\t`/`\n`/`\r`/`\\` escapes in a user-supplied separator
/// string, as the source's various `-s`/`-sep` flags do (`spec.md` §9
/// open question (b)).
pub fn expand_escapes(s: &str) -> CliResult<String> {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('\\') => out.push('\\'),
                Some(other) => return Err(format!("invalid escape: \\{}", other).into()),
                None => return Err("invalid escape at end of separator".into()),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

fn one_byte_sep(s: &str) -> CliResult<u8> {
    let expanded = expand_escapes(s)?;
    let bytes = expanded.as_bytes();
    if bytes.len() != 1 {
        return Err(format!("separator must be a single character: '{}'", s).into());
    }
    Ok(bytes[0])
}

pub enum Filter {
    Skip,
    Pass,
    Transform,
}

/// Resolves `CommonArgs` into the I/O manager, expression context, and
/// compiled `skip`/`pass` programs that every command runs its row loop
/// through (`spec.md` §4.4 "Skip/pass filter primitive").
pub struct Config {
    pub io: IoManager,
    pub ctx: EvalCtx,
    skip: Option<Program>,
    pass: Option<Program>,
}

impl Config {
    pub fn new(common: &CommonArgs) -> CliResult<Self> {
        let sep = one_byte_sep(&common.sep)?;
        let rsep = expand_escapes(&common.rsep)?;
        let io = IoManager::new(
            common.files.clone(),
            sep,
            common.ibl,
            common.ifn,
            common.output.as_deref(),
            common.smq,
            &rsep,
        )?;

        let mut ctx = EvalCtx::new();
        if let Some(seed) = common.rseed {
            ctx.seed_random(seed);
        }
        for binding in &common.vars {
            let (name, value) = binding
                .split_once('=')
                .ok_or_else(|| format!("-v binding must be name=value: {}", binding))?;
            ctx.set_var(name, value);
        }

        let skip = common.skip.as_deref().map(Program::compile).transpose()?;
        let pass = common.pass.as_deref().map(Program::compile).transpose()?;

        Ok(Config { io, ctx, skip, pass })
    }

    /// Binds the row-derived variables (`file`, `line`, `fields`,
    /// positional `$1..$N`) before evaluating any expression against it.
    pub fn bind_row(&mut self, row: &[String]) {
        self.ctx.row = row.to_vec();
        self.ctx.file = self.io.current_file().to_string();
        self.ctx.line = self.io.current_line();
    }

    /// Applies the skip/pass filter in the order required by `spec.md`
    /// §4.4: skip beats pass beats the command's own transform.
    pub fn filter(&mut self, row: &[String]) -> CliResult<Filter> {
        self.bind_row(row);
        if let Some(skip) = &self.skip {
            if skip.eval_bool(row, &mut self.ctx)? {
                return Ok(Filter::Skip);
            }
        }
        if let Some(pass) = &self.pass {
            if pass.eval_bool(row, &mut self.ctx)? {
                return Ok(Filter::Pass);
            }
        }
        Ok(Filter::Transform)
    }

    /// For buffering commands that don't offer a `pass` (their help
    /// manifest tags them `#SMQ,SEP,IBL,IFN,OFL` without `SKIP,PASS`,
    /// e.g. `sort`/`fmerge`/`pivot`): `skip` alone still makes sense as
    /// a pre-buffering row filter.
    pub fn should_skip(&mut self, row: &[String]) -> CliResult<bool> {
        self.bind_row(row);
        match &self.skip {
            Some(skip) => skip.eval_bool(row, &mut self.ctx),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_tab_escape() {
        assert_eq!(expand_escapes(r"\t").unwrap(), "\t");
        assert_eq!(expand_escapes(r"\\").unwrap(), "\\");
    }

    #[test]
    fn rejects_multi_char_separator() {
        assert!(one_byte_sep("ab").is_err());
    }
}
