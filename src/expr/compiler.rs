//! Shunting-yard compiler: infix expression text to RPN (`spec.md` §4.2
//! "Compiler"), grounded in `examples/original_source/alib/src/a_expr.cpp`'s
//! `ExprCompiler`.
//!
//! Function arity is validated here, at compile time, rather than during
//! evaluation: a wrong-arity call is a parse error, reported before any row
//! is read.

use super::func;
use super::token::{Token, TokenKind, OP_CALL, OP_READVAR, OP_UMINUS};
use crate::error::CliResult;

/// One instruction of the compiled program. Evaluation walks this list
/// left to right maintaining a value stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Literal text (a number or a string), pushed as-is.
    Push(String),
    /// Applies a named operator, popping the operands it needs and
    /// pushing one result. `RV` (read variable) pops a name and resolves
    /// it; `FC` (function call) pops a name pushed immediately before it
    /// and looks up its arity to know how many further operands to pop.
    Op(String),
}

enum StackItem {
    Operator(Token),
    LParen,
    FuncLParen {
        name: String,
        out_start: usize,
        commas: usize,
    },
}

pub fn compile(src: &str) -> CliResult<Vec<Instr>> {
    let mut lexer = super::lexer::Lexer::new(src);
    let mut out: Vec<Instr> = Vec::new();
    let mut stack: Vec<StackItem> = Vec::new();

    loop {
        let tok = lexer.next_token();
        match tok.kind {
            TokenKind::Done => break,
            TokenKind::Error => return Err(tok.text.into()),
            TokenKind::Num | TokenKind::Str => out.push(Instr::Push(tok.text)),
            TokenKind::Var => {
                out.push(Instr::Push(tok.text));
                out.push(Instr::Op(OP_READVAR.to_string()));
            }
            TokenKind::Func => {
                let open = lexer.next_token();
                if !(open.kind == TokenKind::Op && open.text == "(") {
                    return Err(format!("expected '(' after function name '{}'", tok.text).into());
                }
                stack.push(StackItem::FuncLParen {
                    name: tok.text,
                    out_start: out.len(),
                    commas: 0,
                });
            }
            TokenKind::Op => match tok.text.as_str() {
                "(" => stack.push(StackItem::LParen),
                ")" => close_paren(&mut stack, &mut out)?,
                "," => {
                    flush_to_marker(&mut stack, &mut out);
                    match stack.last_mut() {
                        Some(StackItem::FuncLParen { commas, .. }) => *commas += 1,
                        _ => return Err("',' used outside of a function call".into()),
                    }
                }
                _ => push_operator(&mut stack, &mut out, tok),
            },
        }
    }

    while let Some(item) = stack.pop() {
        match item {
            StackItem::Operator(tok) => out.push(Instr::Op(tok.text)),
            StackItem::LParen => return Err("unmatched '('".into()),
            StackItem::FuncLParen { name, .. } => {
                return Err(format!("unterminated call to '{}'", name).into())
            }
        }
    }
    if out.is_empty() {
        return Err("empty expression".into());
    }
    Ok(out)
}

fn push_operator(stack: &mut Vec<StackItem>, out: &mut Vec<Instr>, tok: Token) {
    // A unary-minus incoming never pops: it is right-associative and must
    // wait for its single operand, which has not been lexed yet.
    if tok.text != OP_UMINUS {
        while let Some(StackItem::Operator(top)) = stack.last() {
            if top.prec >= tok.prec {
                if let Some(StackItem::Operator(top)) = stack.pop() {
                    out.push(Instr::Op(top.text));
                }
            } else {
                break;
            }
        }
    }
    stack.push(StackItem::Operator(tok));
}

fn flush_to_marker(stack: &mut Vec<StackItem>, out: &mut Vec<Instr>) {
    while let Some(StackItem::Operator(_)) = stack.last() {
        if let Some(StackItem::Operator(tok)) = stack.pop() {
            out.push(Instr::Op(tok.text));
        }
    }
}

fn close_paren(stack: &mut Vec<StackItem>, out: &mut Vec<Instr>) -> CliResult<()> {
    loop {
        match stack.pop() {
            None => return Err("unmatched ')'".into()),
            Some(StackItem::Operator(tok)) => out.push(Instr::Op(tok.text)),
            Some(StackItem::LParen) => return Ok(()),
            Some(StackItem::FuncLParen {
                name,
                out_start,
                commas,
            }) => {
                let argc = if out.len() == out_start { 0 } else { commas + 1 };
                let expected = func::lookup_arity(&name)
                    .ok_or_else(|| format!("unknown function: {}()", name))?;
                if argc != expected {
                    return Err(format!(
                        "function '{}' expects {} argument(s), got {}",
                        name, expected, argc
                    )
                    .into());
                }
                out.push(Instr::Push(name));
                out.push(Instr::Op(OP_CALL.to_string()));
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(src: &str) -> Vec<String> {
        compile(src)
            .unwrap()
            .into_iter()
            .map(|i| match i {
                Instr::Push(s) => s,
                Instr::Op(s) => s,
            })
            .collect()
    }

    #[test]
    fn simple_addition_is_postfix() {
        assert_eq!(ops("1 + 2"), vec!["1", "2", "+"]);
    }

    #[test]
    fn precedence_respected() {
        assert_eq!(ops("1 + 2 * 3"), vec!["1", "2", "3", "*", "+"]);
    }

    #[test]
    fn parens_override_precedence() {
        assert_eq!(ops("(1 + 2) * 3"), vec!["1", "2", "+", "3", "*"]);
    }

    #[test]
    fn variable_emits_push_then_readvar() {
        assert_eq!(ops("$1"), vec!["1", "RV"]);
    }

    #[test]
    fn function_call_emits_args_then_name_then_call() {
        assert_eq!(ops("trim($1)"), vec!["1", "RV", "trim", "FC"]);
    }

    #[test]
    fn wrong_arity_is_a_compile_error() {
        assert!(compile("trim($1, $2)").is_err());
        assert!(compile("if($1, $2)").is_err());
    }

    #[test]
    fn unknown_function_is_a_compile_error() {
        assert!(compile("nosuch($1)").is_err());
    }

    #[test]
    fn unmatched_parens_are_compile_errors() {
        assert!(compile("(1 + 2").is_err());
        assert!(compile("1 + 2)").is_err());
    }

    #[test]
    fn zero_arity_function_call() {
        assert_eq!(ops("today()"), vec!["today", "FC"]);
    }

    #[test]
    fn semicolon_is_lowest_precedence() {
        assert_eq!(ops("1 + 1; 2 + 2"), vec!["1", "1", "+", "2", "2", "+", ";"]);
    }

    #[test]
    fn nested_unary_minus() {
        assert_eq!(ops("- -3"), vec!["3", "UM", "UM"]);
    }
}
