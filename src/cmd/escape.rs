//! `escape`/`unescape`: backslash-encode or decode special characters in
//! field values (`spec.md` SPEC_FULL.md §4 supplemental commands),
//! grounded in `examples/original_source/csvfix/src/csved_escape.cpp`.
//! This is the raw-emission consumer referenced in `spec.md` §4.3: the
//! escaped value must reach the output verbatim, not re-quoted by the
//! CSV writer's smart-quote logic.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;
use crate::field_list::parse_field_list;

#[derive(Args, Debug, Clone)]
pub struct EscapeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to escape (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Characters to escape (required unless -sql is given)
    #[arg(short = 's', long = "chars")]
    pub chars: Option<String>,

    /// Escape string to use (default: backslash)
    #[arg(short = 'e', long = "esc")]
    pub esc: Option<String>,

    /// Perform SQL single-quote escaping instead
    #[arg(long = "sql")]
    pub sql_mode: bool,
}

fn escape_value(val: &str, special: &str, esc: &str) -> String {
    if !val.contains(|c| special.contains(c)) {
        return val.to_string();
    }
    let mut out = String::with_capacity(val.len());
    for c in val.chars() {
        if special.contains(c) {
            out.push_str(esc);
        }
        out.push(c);
    }
    out
}

fn sql_quote(val: &str) -> String {
    val.replace('\'', "''")
}

pub fn run(mut cfg: Config, args: &EscapeArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    let (special, esc) = if args.sql_mode {
        if args.chars.is_some() || args.esc.is_some() {
            return Err("cannot specify -sql with -s or -e".into());
        }
        ("'".to_string(), "'".to_string())
    } else {
        let chars = args
            .chars
            .clone()
            .ok_or("-s needs characters to escape")?;
        let esc = args.esc.clone().unwrap_or_else(|| "\\".to_string());
        let mut special = chars;
        if esc.chars().count() == 1 {
            special.push_str(&esc);
        }
        (special, esc)
    };

    while let Some(mut row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => {}
            crate::command::Filter::Transform => {
                for (i, v) in row.iter_mut().enumerate() {
                    if cols.is_empty() || cols.contains(&i) {
                        *v = if args.sql_mode {
                            sql_quote(v)
                        } else {
                            escape_value(v, &special, &esc)
                        };
                    }
                }
            }
        }
        cfg.io.write_row_raw(&row)?;
    }
    cfg.io.flush()
}

#[derive(Args, Debug, Clone)]
pub struct UnescapeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to unescape (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Escape string to remove (default: backslash)
    #[arg(short = 'e', long = "esc")]
    pub esc: Option<String>,
}

fn unescape_value(val: &str, esc: &str) -> String {
    if esc.is_empty() || !val.contains(esc) {
        return val.to_string();
    }
    let mut out = String::with_capacity(val.len());
    let mut rest = val;
    while let Some(pos) = rest.find(esc) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + esc.len()..];
        if let Some(c) = rest.chars().next() {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out.push_str(rest);
    out
}

pub fn run_unescape(mut cfg: Config, args: &UnescapeArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let esc = args.esc.clone().unwrap_or_else(|| "\\".to_string());

    while let Some(mut row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => {}
            crate::command::Filter::Transform => {
                for (i, v) in row.iter_mut().enumerate() {
                    if cols.is_empty() || cols.contains(&i) {
                        *v = unescape_value(v, &esc);
                    }
                }
            }
        }
        cfg.io.write_row_raw(&row)?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescapes_backslash_sequences() {
        assert_eq!(unescape_value("a\\,b", "\\"), "a,b");
        assert_eq!(unescape_value("abc", "\\"), "abc");
    }

    #[test]
    fn escapes_listed_special_chars() {
        assert_eq!(escape_value("a,b", ",", "\\"), "a\\,b");
        assert_eq!(escape_value("abc", ",", "\\"), "abc");
    }

    #[test]
    fn sql_mode_doubles_quotes() {
        assert_eq!(sql_quote("o'brien"), "o''brien");
    }
}
