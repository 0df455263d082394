//! `edit`: sed-style field substitution (`spec.md` §4.5.10), grounded in
//! `examples/original_source/csvfix/src/csved_edit.cpp`.

use clap::Args;
use regex::Regex;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;
use crate::field_list::parse_field_list;
use crate::regexutil::compile_regex;

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to apply edits to (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Substitute command `s<delim>pattern<delim>replacement<delim>[gi]` (repeatable)
    #[arg(short = 'e', long = "edit")]
    pub edit: Vec<String>,
}

struct SubCmd {
    regex: Regex,
    replacement: String,
    global: bool,
}

fn read_field(chars: &[char], i: &mut usize, sep: char) -> CliResult<String> {
    let mut f = String::new();
    loop {
        let c = *chars
            .get(*i)
            .ok_or_else(|| format!("invalid value for -e: {}", chars.iter().collect::<String>()))?;
        *i += 1;
        if c == '\\' {
            let next = chars.get(*i).copied().unwrap_or(sep);
            f.push('\\');
            f.push(next);
            *i += 1;
        } else if c != sep {
            f.push(c);
        } else {
            break;
        }
    }
    Ok(f)
}

fn unescape_sep(s: &str, sep: char) -> String {
    s.replace(&format!("\\{}", sep), &sep.to_string())
}

fn parse_sub(spec: &str) -> CliResult<SubCmd> {
    let chars: Vec<char> = spec.chars().collect();
    if chars.is_empty() {
        return Err("empty value for -e".into());
    }
    if chars[0] != 's' {
        return Err(format!("edit sub command missing from {}", spec).into());
    }
    if chars.len() < 2 {
        return Err(format!("invalid value for -e: {}", spec).into());
    }
    let sep = chars[1];
    if sep == '\\' {
        return Err(format!("invalid value for -e: {}", spec).into());
    }
    let mut i = 2;
    let pattern = unescape_sep(&read_field(&chars, &mut i, sep)?, sep);
    let replacement = unescape_sep(&read_field(&chars, &mut i, sep)?, sep);
    let opts: String = chars[i..].iter().collect();

    if pattern.is_empty() {
        return Err("need expression to search for".into());
    }
    let icase = opts.contains('i');
    let global = opts.contains('g');
    let regex = compile_regex(&pattern, icase)?;
    Ok(SubCmd { regex, replacement, global })
}

pub fn run(mut cfg: Config, args: &EditArgs) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let subs: Vec<SubCmd> = args.edit.iter().map(|s| parse_sub(s)).collect::<CliResult<_>>()?;

    while let Some(row) = cfg.io.read_csv()? {
        let filter = cfg.filter(&row)?;
        let mut row = row;
        if let crate::command::Filter::Skip = filter {
            continue;
        }
        if let crate::command::Filter::Transform = filter {
            for (i, field) in row.iter_mut().enumerate() {
                if cols.is_empty() || cols.contains(&i) {
                    for sub in &subs {
                        let replaced = if sub.global {
                            sub.regex.replace_all(field, sub.replacement.as_str()).into_owned()
                        } else {
                            sub.regex.replace(field, sub.replacement.as_str()).into_owned()
                        };
                        *field = replaced;
                    }
                }
            }
        }
        cfg.io.write_row(&row)?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_substitute() {
        let sub = parse_sub("s/abc/XXX/g").unwrap();
        assert!(sub.global);
        assert_eq!(sub.replacement, "XXX");
        assert!(sub.regex.is_match("xxabcxx"));
    }

    #[test]
    fn custom_delimiter_allows_slash_in_pattern() {
        let sub = parse_sub("s|a/b|c|").unwrap();
        assert!(sub.regex.is_match("a/b"));
        assert_eq!(sub.replacement, "c");
    }
}
