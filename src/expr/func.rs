//! Built-in function dictionary (`spec.md` §4.2 "Built-in functions"),
//! grounded in `examples/original_source/alib/src/a_expr.cpp`.
//!
//! The dictionary is a process-global, initialise-once, read-only table
//! (`spec.md` §5/§9 "Shared resources"/"Global singletons"): built with
//! `OnceLock` rather than a mutable registration API, since this crate has
//! no plugin ABI (`spec.md` §1 Non-goals) to register functions at runtime.

use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};

use crate::error::CliResult;
use crate::field_list::CommaList;
use crate::num::{fmt_num, is_integer, is_number, to_integer, to_real};
use crate::regexutil::compile_regex;

use super::eval::EvalCtx;

pub type FuncPtr = fn(&[String], &mut EvalCtx) -> CliResult<String>;

pub struct FuncEntry {
    pub arity: usize,
    pub call: FuncPtr,
}

fn table() -> &'static ahash::AHashMap<&'static str, FuncEntry> {
    static TABLE: OnceLock<ahash::AHashMap<&'static str, FuncEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m = ahash::AHashMap::new();
        macro_rules! reg {
            ($name:literal, $arity:literal, $f:expr) => {
                m.insert($name, FuncEntry { arity: $arity, call: $f });
            };
        }
        reg!("if", 3, f_if);
        reg!("not", 1, f_not);
        reg!("int", 1, f_int);
        reg!("abs", 1, f_abs);
        reg!("sign", 1, f_sign);
        reg!("trim", 1, f_trim);
        reg!("upper", 1, f_upper);
        reg!("lower", 1, f_lower);
        reg!("len", 1, f_len);
        reg!("substr", 3, f_substr);
        reg!("pos", 2, f_pos);
        reg!("isnum", 1, f_isnum);
        reg!("isint", 1, f_isint);
        reg!("isempty", 1, f_isempty);
        reg!("isdate", 1, f_isdate);
        reg!("bool", 1, f_bool);
        reg!("random", 0, f_random);
        reg!("today", 0, f_today);
        reg!("now", 0, f_now);
        reg!("streq", 2, f_streq);
        reg!("match", 2, f_match);
        reg!("env", 1, f_env);
        reg!("min", 2, f_min);
        reg!("max", 2, f_max);
        reg!("day", 1, f_day);
        reg!("month", 1, f_month);
        reg!("year", 1, f_year);
        reg!("index", 2, f_index);
        reg!("pick", 2, f_pick);
        reg!("field", 1, f_field);
        reg!("find", 1, f_find);
        reg!("round", 2, f_round);
        m
    })
}

pub fn lookup_arity(name: &str) -> Option<usize> {
    table().get(name).map(|e| e.arity)
}

pub fn call(name: &str, args: &[String], ctx: &mut EvalCtx) -> CliResult<String> {
    match table().get(name) {
        Some(entry) => (entry.call)(args, ctx),
        None => Err(format!("unknown function: {}()", name).into()),
    }
}

fn need_num(args: &[String], i: usize) -> CliResult<f64> {
    let s = &args[i];
    if !is_number(s) {
        return Err(format!("not a number: {}", s).into());
    }
    Ok(to_real(s))
}

fn f_if(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if super::eval::to_bool(&args[0]) {
        args[1].clone()
    } else {
        args[2].clone()
    })
}

fn f_not(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if super::eval::to_bool(&args[0]) { "0" } else { "1" }.to_string())
}

fn f_int(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(fmt_num(need_num(args, 0)?.trunc()))
}

fn f_abs(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(fmt_num(need_num(args, 0)?.abs()))
}

fn f_sign(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    let n = need_num(args, 0)?;
    Ok(if n > 0.0 {
        "1"
    } else if n < 0.0 {
        "-1"
    } else {
        "0"
    }
    .to_string())
}

fn f_trim(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(args[0].trim().to_string())
}

fn f_upper(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(args[0].to_uppercase())
}

fn f_lower(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(args[0].to_lowercase())
}

fn f_len(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(args[0].chars().count().to_string())
}

fn f_substr(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    let chars: Vec<char> = args[0].chars().collect();
    let start = need_num(args, 1)? as i64 - 1;
    if start < 0 {
        return Err("invalid position in substr()".into());
    }
    let len = need_num(args, 2)? as i64;
    if len < 0 {
        return Err("invalid length in substr()".into());
    }
    let start = start as usize;
    if start >= chars.len() {
        return Ok(String::new());
    }
    let end = (start + len as usize).min(chars.len());
    Ok(chars[start..end].iter().collect())
}

fn f_pos(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    match args[0].find(args[1].as_str()) {
        Some(byte_idx) => Ok((args[0][..byte_idx].chars().count() + 1).to_string()),
        None => Ok("0".to_string()),
    }
}

fn f_isnum(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if is_number(&args[0]) { "1" } else { "0" }.to_string())
}

fn f_isint(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if is_integer(&args[0]) { "1" } else { "0" }.to_string())
}

fn f_isempty(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if args[0].trim().is_empty() { "1" } else { "0" }.to_string())
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn f_isdate(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if parse_iso_date(&args[0]).is_some() { "1" } else { "0" }.to_string())
}

fn f_bool(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if super::eval::to_bool(&args[0]) { "1" } else { "0" }.to_string())
}

fn f_random(_args: &[String], ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(fmt_num_precise(ctx.next_random()))
}

fn fmt_num_precise(n: f64) -> String {
    format!("{}", n)
}

fn f_today(_args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(Local::now().date_naive().format("%Y-%m-%d").to_string())
}

fn f_now(_args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(Local::now().format("%H:%M:%S").to_string())
}

fn f_streq(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(if args[0].eq_ignore_ascii_case(&args[1]) { "1" } else { "0" }.to_string())
}

fn f_match(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    let re = compile_regex(&args[1], false)?;
    Ok(if re.is_match(&args[0]) { "1" } else { "0" }.to_string())
}

fn f_env(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(std::env::var(&args[0]).unwrap_or_default())
}

fn f_min(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    if is_number(&args[0]) && is_number(&args[1]) {
        Ok(if to_real(&args[0]) < to_real(&args[1]) {
            args[0].clone()
        } else {
            args[1].clone()
        })
    } else {
        Ok(if args[0] < args[1] { args[0].clone() } else { args[1].clone() })
    }
}

fn f_max(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    if is_number(&args[0]) && is_number(&args[1]) {
        Ok(if to_real(&args[0]) > to_real(&args[1]) {
            args[0].clone()
        } else {
            args[1].clone()
        })
    } else {
        Ok(if args[0] > args[1] { args[0].clone() } else { args[1].clone() })
    }
}

fn f_day(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(parse_iso_date(&args[0]).map(|d| d.day().to_string()).unwrap_or_default())
}

fn f_month(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(parse_iso_date(&args[0]).map(|d| d.month().to_string()).unwrap_or_default())
}

fn f_year(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    Ok(parse_iso_date(&args[0]).map(|d| d.year().to_string()).unwrap_or_default())
}

fn f_index(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    let cl = CommaList::new(&args[1]);
    Ok(match cl.index_of(&args[0]) {
        Some(i) => (i + 1).to_string(),
        None => "0".to_string(),
    })
}

fn f_pick(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    if !is_integer(&args[0]) {
        return Err("first parameter of pick() must be an integer".into());
    }
    let n = to_integer(&args[0]);
    if n <= 0 {
        return Err("first parameter of pick() must be greater than zero".into());
    }
    let cl = CommaList::new(&args[1]);
    Ok(cl.get((n - 1) as usize).unwrap_or("").to_string())
}

fn f_field(args: &[String], ctx: &mut EvalCtx) -> CliResult<String> {
    if !is_integer(&args[0]) {
        return Err("argument of field() must be an integer".into());
    }
    let n = to_integer(&args[0]);
    if n <= 0 {
        return Err("argument of field() must be greater than zero".into());
    }
    Ok(ctx.row.get((n - 1) as usize).cloned().unwrap_or_default())
}

fn f_find(args: &[String], ctx: &mut EvalCtx) -> CliResult<String> {
    let re = compile_regex(&args[0], false)?;
    for (i, field) in ctx.row.iter().enumerate() {
        if re.is_match(field) {
            return Ok((i + 1).to_string());
        }
    }
    Ok("0".to_string())
}

fn f_round(args: &[String], _ctx: &mut EvalCtx) -> CliResult<String> {
    let n = need_num(args, 0)?;
    let digits = need_num(args, 1)? as i32;
    let factor = 10f64.powi(digits);
    Ok(fmt_num((n * factor).round() / factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_documented_functions_registered() {
        for name in [
            "if", "not", "int", "abs", "sign", "trim", "upper", "lower", "len", "substr", "pos",
            "isnum", "isint", "isempty", "isdate", "bool", "random", "today", "now", "streq",
            "match", "env", "min", "max", "day", "month", "year", "index", "pick", "field",
            "find", "round",
        ] {
            assert!(lookup_arity(name).is_some(), "missing function {}", name);
        }
    }

    #[test]
    fn arities_match_spec() {
        assert_eq!(lookup_arity("if"), Some(3));
        assert_eq!(lookup_arity("substr"), Some(3));
        assert_eq!(lookup_arity("random"), Some(0));
        assert_eq!(lookup_arity("today"), Some(0));
        assert_eq!(lookup_arity("round"), Some(2));
    }
}
