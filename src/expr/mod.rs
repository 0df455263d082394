//! Expression engine: lexer -> shunting-yard compiler -> RPN evaluator
//! (`spec.md` §4.2), grounded in `examples/original_source/alib/src/a_expr.cpp`.

pub mod compiler;
pub mod eval;
pub mod func;
pub mod lexer;
pub mod token;

pub use compiler::{compile, Instr};
pub use eval::{to_bool, EvalCtx};

use crate::error::CliResult;

/// A compiled expression, ready to be evaluated once per row. Commands
/// that take a `-if`/`-be`/`-ee`/`-me` expression flag compile it once at
/// startup and re-run it for every row, rather than re-parsing the text.
#[derive(Debug, Clone)]
pub struct Program(Vec<Instr>);

impl Program {
    pub fn compile(src: &str) -> CliResult<Self> {
        Ok(Program(compiler::compile(src)?))
    }

    pub fn eval(&self, ctx: &mut EvalCtx) -> CliResult<String> {
        eval::evaluate(&self.0, ctx)
    }

    /// Runs the program for `row` and returns its truthiness, the common
    /// case for filter-style expressions (`-if`, `-be`, `-ee`, skip/pass).
    pub fn eval_bool(&self, row: &[String], ctx: &mut EvalCtx) -> CliResult<bool> {
        ctx.row = row.to_vec();
        Ok(to_bool(&self.eval(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_roundtrip() {
        let prog = Program::compile("$1 + $2").unwrap();
        let mut ctx = EvalCtx::new();
        let row = vec!["1".to_string(), "2".to_string()];
        assert!(prog.eval_bool(&row, &mut ctx).unwrap());
    }
}
