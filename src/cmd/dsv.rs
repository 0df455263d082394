//! `read_dsv`/`write_dsv`: delimiter-separated-value conversion
//! (`spec.md` §4.5.9), grounded in
//! `examples/original_source/csvfix/src/csved_dsv.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::field_list::parse_field_list;

const DEFAULT_DELIM: char = '|';

fn parse_delim(s: &str) -> CliResult<char> {
    if s.is_empty() {
        return Err("DSV separator cannot be empty".into());
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() == 1 {
        Ok(chars[0])
    } else if chars.len() == 2 && chars[0] == '\\' && chars[1] == 't' {
        Ok('\t')
    } else {
        Err(format!("bad separator specified by -s: {}", s).into())
    }
}

fn project(row: &Row, fields: &[usize]) -> Row {
    if fields.is_empty() {
        row.clone()
    } else {
        fields.iter().map(|&f| row.get(f).cloned().unwrap_or_default()).collect()
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReadDsvArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to keep from the parsed DSV row (default: all)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// DSV field separator (default '|'; `\t` for tab)
    #[arg(short = 's', long = "dsvsep")]
    pub dsvsep: Option<String>,

    /// Treat field contents as CSV (double quotes are special)
    #[arg(long = "csv")]
    pub csv: bool,

    /// Collapse consecutive separators into a single one
    #[arg(long = "cm")]
    pub collapse: bool,
}

fn unquote(s: &str, is_csv: bool) -> String {
    if !is_csv {
        return s.to_string();
    }
    let t = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s);
    if !t.contains('"') {
        return t.to_string();
    }
    let chars: Vec<char> = t.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '"' && chars.get(i + 1) == Some(&'"') {
            out.push('"');
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

fn parse_dsv_line(line: &str, delim: char, collapse: bool, is_csv: bool) -> CliResult<Row> {
    let chars: Vec<char> = line.chars().collect();
    let mut row = Row::new();
    let mut val = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c == delim {
            while collapse && chars.get(i) == Some(&delim) {
                i += 1;
            }
            row.push(unquote(&val, is_csv));
            val.clear();
        } else if c == '\\' {
            if i == chars.len() {
                return Err("escape at end of line".into());
            }
            val.push(chars[i]);
            i += 1;
        } else {
            val.push(c);
        }
    }
    row.push(unquote(&val, is_csv));
    Ok(row)
}

pub fn run_read(mut cfg: Config, args: &ReadDsvArgs) -> CliResult<()> {
    let delim = parse_delim(args.dsvsep.as_deref().unwrap_or("|"))?;
    let fields = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    while let Some(line) = cfg.io.read_raw_line()? {
        let row = parse_dsv_line(&line, delim, args.collapse, args.csv)?;
        cfg.io.write_row(&project(&row, &fields))?;
    }
    cfg.io.flush()
}

#[derive(Args, Debug, Clone)]
pub struct WriteDsvArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to output (default: all)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// DSV field separator (default '|'; `\t` for tab)
    #[arg(short = 's', long = "dsvsep")]
    pub dsvsep: Option<String>,
}

fn make_field(val: &str, delim: char) -> String {
    if !val.contains(delim) {
        return val.to_string();
    }
    let mut out = String::new();
    for c in val.chars() {
        if c == delim || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn run_write(mut cfg: Config, args: &WriteDsvArgs) -> CliResult<()> {
    let delim = parse_delim(args.dsvsep.as_deref().unwrap_or("|"))?;
    let fields = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let projected = project(&row, &fields);
        let line: Vec<String> = projected.iter().map(|v| make_field(v, delim)).collect();
        cfg.io.write_text(&format!("{}\n", line.join(&delim.to_string())))?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_pipe_by_default() {
        let row = parse_dsv_line("a|b|c", '|', false, false).unwrap();
        assert_eq!(row, vec!["a", "b", "c"]);
    }

    #[test]
    fn backslash_escapes_the_delimiter() {
        let row = parse_dsv_line(r"a\|b|c", '|', false, false).unwrap();
        assert_eq!(row, vec!["a|b", "c"]);
    }

    #[test]
    fn collapses_runs_of_separators() {
        let row = parse_dsv_line("a||||b", '|', true, false).unwrap();
        assert_eq!(row, vec!["a", "b"]);
    }
}
