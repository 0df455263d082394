//! `erase`: delete fields matching/not-matching a regex (`spec.md`
//! §4.5.11), grounded in
//! `examples/original_source/csvfix/src/csved_erase.cpp`.

use clap::Args;
use regex::Regex;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::regexutil::compile_regex;

#[derive(Args, Debug, Clone)]
pub struct EraseArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to check for erasure (default: all)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Erase fields matching this regex (repeatable)
    #[arg(short = 'r', long = "regexp")]
    pub regexp: Vec<String>,

    /// Erase fields NOT matching this regex (repeatable)
    #[arg(short = 'n', long = "notre")]
    pub notre: Vec<String>,

    /// Keep a row that becomes empty (default: drop it)
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,
}

struct RegexAction {
    regex: Regex,
    erase_on_match: bool,
}

fn erase_field(field: &str, exprs: &[RegexAction]) -> bool {
    exprs.iter().any(|e| e.regex.is_match(field) == e.erase_on_match)
}

fn erase_fields(row: &Row, fields: &[usize], exprs: &[RegexAction]) -> Row {
    row.iter()
        .enumerate()
        .filter(|(i, v)| {
            if !(fields.is_empty() || fields.contains(i)) {
                true
            } else {
                !erase_field(v, exprs)
            }
        })
        .map(|(_, v)| v.clone())
        .collect()
}

pub fn run(mut cfg: Config, args: &EraseArgs) -> CliResult<()> {
    if args.regexp.is_empty() && args.notre.is_empty() {
        return Err("erase: need at least one of -r or -n".into());
    }
    let fields = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let mut exprs = Vec::new();
    for r in &args.regexp {
        exprs.push(RegexAction { regex: compile_regex(r, false)?, erase_on_match: true });
    }
    for r in &args.notre {
        exprs.push(RegexAction { regex: compile_regex(r, false)?, erase_on_match: false });
    }

    while let Some(row) = cfg.io.read_csv()? {
        let filter = cfg.filter(&row)?;
        let newrow = match filter {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => row.clone(),
            crate::command::Filter::Transform => erase_fields(&row, &fields, &exprs),
        };
        if !newrow.is_empty() || args.keep {
            cfg.io.write_row(&newrow)?;
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erases_matching_fields() {
        let exprs = vec![RegexAction { regex: compile_regex("^x", false).unwrap(), erase_on_match: true }];
        let row = vec!["xa".to_string(), "b".to_string()];
        assert_eq!(erase_fields(&row, &[], &exprs), vec!["b"]);
    }
}
