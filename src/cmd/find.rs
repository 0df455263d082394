//! `find`/`remove`: regex, range, length and field-count matching
//! (`spec.md` §4.5.5), grounded in
//! `examples/original_source/csvfix/src/csved_find.cpp`.

use clap::Args;
use regex::Regex;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;
use crate::expr::Program;
use crate::field_list::parse_field_list;
use crate::num::{is_number, to_real};
use crate::regexutil::compile_regex;

#[derive(Args, Debug, Clone)]
pub struct FindArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fields to search (default: all fields)
    #[arg(short = 'f', long = "cols")]
    pub cols: Option<String>,

    /// Regex to search for (repeatable)
    #[arg(short = 'e', long = "expr")]
    pub expr: Vec<String>,

    /// Literal (non-regex) text to search for (repeatable)
    #[arg(short = 's', long = "str")]
    pub str_: Vec<String>,

    /// Case-insensitive regex (repeatable)
    #[arg(long = "ei")]
    pub expr_ic: Vec<String>,

    /// Case-insensitive literal text (repeatable)
    #[arg(long = "si")]
    pub str_ic: Vec<String>,

    /// Value range `low:high` (numeric if both ends are numbers, repeatable)
    #[arg(short = 'r', long = "range")]
    pub range: Vec<String>,

    /// Field length or length range `n` or `min:max` (repeatable)
    #[arg(short = 'l', long = "len")]
    pub len: Vec<String>,

    /// Field-count range `n` or `min:max`
    #[arg(long = "fc")]
    pub field_count: Option<String>,

    /// Output only the match count
    #[arg(short = 'n', long = "num")]
    pub count_only: bool,

    /// Post-filter: only consider a row if this expression is truthy
    #[arg(long = "if")]
    pub if_expr: Option<String>,
}

struct Matcher {
    regexes: Vec<Regex>,
    ranges: Vec<(String, String, bool)>,
    lengths: Vec<(i64, i64)>,
}

fn parse_range_part(s: &str, flag: &str) -> CliResult<(i64, i64)> {
    let parts: Vec<&str> = s.split(':').collect();
    let (lo, hi) = match parts.len() {
        1 => (parts[0], parts[0]),
        2 => (parts[0], parts[1]),
        _ => return Err(format!("invalid {} range: {}", flag, s).into()),
    };
    let lo: i64 = lo.parse().map_err(|_| format!("invalid {} range: {}", flag, s))?;
    let hi: i64 = hi.parse().map_err(|_| format!("invalid {} range: {}", flag, s))?;
    if lo > hi {
        return Err(format!("invalid {} range: {}", flag, s).into());
    }
    Ok((lo, hi))
}

fn parse_field_count(s: Option<&str>) -> CliResult<(i64, i64)> {
    match s {
        None => Ok((0, i64::MAX)),
        Some(s) => {
            let parts: Vec<&str> = s.split(':').collect();
            match parts.len() {
                1 => parse_range_part(parts[0], "-fc"),
                2 => {
                    let lo = if parts[0].is_empty() { "0" } else { parts[0] };
                    let hi = if parts[1].is_empty() { "1000000" } else { parts[1] };
                    if parts[0].is_empty() && parts[1].is_empty() {
                        return Err("invalid range for -fc flag".into());
                    }
                    parse_range_part(&format!("{}:{}", lo, hi), "-fc")
                }
                _ => Err(format!("invalid field count for -fc flag: {}", s).into()),
            }
        }
    }
}

impl Matcher {
    fn build(args: &FindArgs) -> CliResult<Self> {
        let mut regexes = Vec::new();
        for e in &args.expr {
            regexes.push(compile_regex(e, false)?);
        }
        for e in &args.expr_ic {
            regexes.push(compile_regex(e, true)?);
        }
        for s in &args.str_ {
            regexes.push(compile_regex(&regex::escape(s), false)?);
        }
        for s in &args.str_ic {
            regexes.push(compile_regex(&regex::escape(s), true)?);
        }

        let mut ranges = Vec::new();
        for r in &args.range {
            let parts: Vec<&str> = r.splitn(2, ':').collect();
            if parts.len() != 2 {
                return Err(format!("invalid range: {}", r).into());
            }
            let (a, b) = (parts[0].to_string(), parts[1].to_string());
            let isnum = is_number(&a) && is_number(&b);
            if isnum {
                if to_real(&a) > to_real(&b) {
                    return Err(format!("invalid range: {}", r).into());
                }
            } else if a > b {
                return Err(format!("invalid range: {}", r).into());
            }
            ranges.push((a, b, isnum));
        }

        let mut lengths = Vec::new();
        for l in &args.len {
            lengths.push(parse_range_part(l, "-l")?);
        }

        Ok(Matcher { regexes, ranges, lengths })
    }

    fn have_criteria(&self) -> bool {
        !self.regexes.is_empty() || !self.ranges.is_empty() || !self.lengths.is_empty()
    }

    fn matches_value(&self, s: &str) -> bool {
        if self.regexes.iter().any(|re| re.is_match(s)) {
            return true;
        }
        for (lo, hi, isnum) in &self.ranges {
            if *isnum {
                if is_number(s) {
                    let d = to_real(s);
                    if d >= to_real(lo) && d <= to_real(hi) {
                        return true;
                    }
                }
            } else if s >= lo.as_str() && s <= hi.as_str() {
                return true;
            }
        }
        let len = s.chars().count() as i64;
        if self.lengths.iter().any(|(lo, hi)| len >= *lo && len <= *hi) {
            return true;
        }
        false
    }

    fn matches_row(&self, row: &Row, cols: &[usize]) -> bool {
        row.iter()
            .enumerate()
            .any(|(i, v)| (cols.is_empty() || cols.contains(&i)) && self.matches_value(v))
    }
}

fn run(mut cfg: Config, args: &FindArgs, remove: bool) -> CliResult<()> {
    let cols = match &args.cols {
        Some(s) => parse_field_list(s)?,
        None => vec![],
    };
    let matcher = Matcher::build(args)?;
    let (min_fields, max_fields) = parse_field_count(args.field_count.as_deref())?;
    let if_expr = args.if_expr.as_deref().map(Program::compile).transpose()?;

    if !matcher.have_criteria() && args.field_count.is_none() && if_expr.is_none() {
        return Err("find/remove need at least one -e, -r, -l, -fc or -if flag".into());
    }

    let mut count = 0u64;
    while let Some(row) = cfg.io.read_csv()? {
        if let Some(prog) = &if_expr {
            cfg.bind_row(&row);
            let es = prog.eval_bool(&row, &mut cfg.ctx)?;
            if (es && remove) || (!es && !remove) {
                continue;
            }
        }

        if args.field_count.is_some() {
            let n = row.len() as i64;
            let fcok = n >= min_fields && n <= max_fields;
            if (remove && fcok) || (!remove && !fcok) {
                continue;
            }
        }

        let matched = if matcher.have_criteria() {
            matcher.matches_row(&row, &cols)
        } else {
            !remove
        };

        if remove ^ matched {
            count += 1;
            if !args.count_only {
                cfg.io.write_row(&row)?;
            }
        }
    }

    if args.count_only {
        cfg.io.write_text(&format!("{}\n", count))?;
    }
    cfg.io.flush()
}

pub fn run_find(cfg: Config, args: &FindArgs) -> CliResult<()> {
    run(cfg, args, false)
}

pub fn run_remove(cfg: Config, args: &FindArgs) -> CliResult<()> {
    run(cfg, args, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_range_matches_only_numbers_in_bounds() {
        let m = Matcher {
            regexes: vec![],
            ranges: vec![("5".to_string(), "10".to_string(), true)],
            lengths: vec![],
        };
        assert!(m.matches_value("7"));
        assert!(!m.matches_value("3"));
        assert!(!m.matches_value("abc"));
    }

    #[test]
    fn length_range_counts_chars() {
        let m = Matcher {
            regexes: vec![],
            ranges: vec![],
            lengths: vec![(2, 4)],
        };
        assert!(m.matches_value("abc"));
        assert!(!m.matches_value("a"));
    }
}
