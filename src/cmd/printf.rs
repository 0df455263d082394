//! `printf`: printf-style row formatting (`spec.md` SPEC_FULL.md §4
//! supplemental commands), grounded in
//! `examples/original_source/csvfix/inc/csved_printf.h`.
//!
//! Format placeholders are `%N` (1-based field reference) and `%%` for a
//! literal `%`; anything else in the format string is copied verbatim.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;

#[derive(Args, Debug, Clone)]
pub struct PrintfArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Format string with `%1`..`%N` field placeholders and `%%` for a literal percent
    #[arg(short = 'f', long = "fmt")]
    pub fmt: String,
}

enum Piece {
    Literal(String),
    Field(usize),
}

fn parse_format(fmt: &str) -> CliResult<Vec<Piece>> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let chars: Vec<char> = fmt.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' && i + 1 < chars.len() {
            let next = chars[i + 1];
            if next == '%' {
                literal.push('%');
                i += 2;
                continue;
            }
            if next.is_ascii_digit() {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    j += 1;
                }
                let n: usize = chars[i + 1..j].iter().collect::<String>().parse().unwrap();
                if n == 0 {
                    return Err("printf field numbers must be greater than zero".into());
                }
                if !literal.is_empty() {
                    out.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                out.push(Piece::Field(n - 1));
                i = j;
                continue;
            }
        }
        literal.push(chars[i]);
        i += 1;
    }
    if !literal.is_empty() {
        out.push(Piece::Literal(literal));
    }
    Ok(out)
}

fn format_row(pieces: &[Piece], row: &[String]) -> String {
    let mut out = String::new();
    for p in pieces {
        match p {
            Piece::Literal(s) => out.push_str(s),
            Piece::Field(i) => out.push_str(row.get(*i).map(String::as_str).unwrap_or("")),
        }
    }
    out
}

pub fn run(mut cfg: Config, args: &PrintfArgs) -> CliResult<()> {
    let pieces = parse_format(&args.fmt)?;
    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        cfg.io.write_text(&format_row(&pieces, &row))?;
        cfg.io.write_text("\n")?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_fields_and_literal_percent() {
        let pieces = parse_format("%1 costs %%%2").unwrap();
        let row = vec!["apple".to_string(), "3".to_string()];
        assert_eq!(format_row(&pieces, &row), "apple costs %3");
    }
}
