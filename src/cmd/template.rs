//! `template`: fill a textual template with per-row field substitutions
//! (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/inc/csved_template.h`. Output is a
//! non-CSV textual artefact, like `sql_insert`'s generated statements.

use std::fs;

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;

#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Template text with `%(N)` field placeholders (1-based)
    #[arg(short = 't', long = "tmpl", conflicts_with = "tmpl_file")]
    pub tmpl: Option<String>,

    /// Read the template text from a file instead of -t
    #[arg(long = "tf")]
    pub tmpl_file: Option<String>,
}

fn replace_columns(tmpl: &str, row: &[String]) -> CliResult<String> {
    let mut out = String::new();
    let chars: Vec<char> = tmpl.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' && chars.get(i + 1) == Some(&'(') {
            let close = chars[i + 2..]
                .iter()
                .position(|&c| c == ')')
                .map(|p| i + 2 + p)
                .ok_or("unterminated %( placeholder in template")?;
            let spec: String = chars[i + 2..close].iter().collect();
            let n: i64 = spec
                .trim()
                .parse()
                .map_err(|_| format!("invalid field reference %({})", spec))?;
            if n <= 0 {
                return Err(format!("field numbers must be greater than zero: %({})", spec).into());
            }
            out.push_str(row.get((n - 1) as usize).map(String::as_str).unwrap_or(""));
            i = close + 1;
        } else if chars[i] == '%' && chars.get(i + 1) == Some(&'%') {
            out.push('%');
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

pub fn run(mut cfg: Config, args: &TemplateArgs) -> CliResult<()> {
    let tmpl = match (&args.tmpl, &args.tmpl_file) {
        (Some(t), None) => t.clone(),
        (None, Some(path)) => {
            fs::read_to_string(path).map_err(|e| format!("cannot read template file '{}': {}", path, e))?
        }
        _ => return Err("template needs exactly one of -t or -tf".into()),
    };

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let rendered = replace_columns(&tmpl, &row)?;
        cfg.io.write_text(&rendered)?;
        cfg.io.write_text("\n")?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_field_placeholders() {
        let row = vec!["Ann".to_string(), "42".to_string()];
        assert_eq!(
            replace_columns("name=%(1), age=%(2)", &row).unwrap(),
            "name=Ann, age=42"
        );
    }

    #[test]
    fn literal_percent_escape() {
        let row = vec![];
        assert_eq!(replace_columns("100%%", &row).unwrap(), "100%");
    }
}
