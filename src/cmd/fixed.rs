//! `read_fixed`/`write_fixed`: fixed-width conversion (`spec.md` §4.5.9),
//! grounded in `examples/original_source/csvfix/src/csved_fixed.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;

fn build_fields(spec: &str) -> CliResult<Vec<(usize, usize)>> {
    let mut fields = Vec::new();
    for part in spec.split(',') {
        let tmp: Vec<&str> = part.split(':').collect();
        if tmp.len() != 2 {
            return Err(format!("invalid field specification: {}", part).into());
        }
        let f1: i64 = tmp[0]
            .parse()
            .map_err(|_| format!("invalid field specification: {}", part))?;
        let f2: i64 = tmp[1]
            .parse()
            .map_err(|_| format!("invalid field specification: {}", part))?;
        if f1 == 0 || f2 == 0 {
            return Err(format!("invalid field specification: {}", part).into());
        }
        fields.push((f1 as usize, f2 as usize));
    }
    if fields.is_empty() {
        return Err("need fields specified with -f flag".into());
    }
    Ok(fields)
}

#[derive(Args, Debug, Clone)]
pub struct ReadFixedArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Field spec: `start:len,...` (1-based start)
    #[arg(short = 'f', long = "cols")]
    pub cols: String,

    /// Retain trailing spaces on output (default: right-trim)
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,
}

pub fn run_read(mut cfg: Config, args: &ReadFixedArgs) -> CliResult<()> {
    let fields = build_fields(&args.cols)?;
    let trim = !args.keep;

    while let Some(line) = cfg.io.read_raw_line()? {
        let len = line.chars().count();
        let chars: Vec<char> = line.chars().collect();
        let mut row: Row = Vec::with_capacity(fields.len());
        for &(start, width) in &fields {
            if start > len {
                row.push(String::new());
            } else {
                let end = (start - 1 + width).min(len);
                let val: String = chars[start - 1..end].iter().collect();
                row.push(if trim { val.trim_end().to_string() } else { val });
            }
        }
        cfg.io.write_row(&row)?;
    }
    cfg.io.flush()
}

#[derive(Args, Debug, Clone)]
pub struct WriteFixedArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Field spec: `field:width,...` (1-based field index)
    #[arg(short = 'f', long = "cols")]
    pub cols: String,

    /// Print an 80-column ruler before the output
    #[arg(long = "ruler")]
    pub ruler: bool,
}

fn ruler() -> String {
    "123456789 ".repeat(8)
}

pub fn run_write(mut cfg: Config, args: &WriteFixedArgs) -> CliResult<()> {
    let fields = build_fields(&args.cols)?;

    if args.ruler {
        cfg.io.write_text(&format!("{}\n", ruler()))?;
    }

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let mut line = String::new();
        for &(field, width) in &fields {
            let val = row.get(field - 1).map(String::as_str).unwrap_or("");
            if val.chars().count() >= width {
                line.extend(val.chars().take(width));
            } else {
                line.push_str(val);
                line.push_str(&" ".repeat(width - val.chars().count()));
            }
        }
        cfg.io.write_text(&format!("{}\n", line))?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_len_pairs() {
        assert_eq!(build_fields("1:3,5:2").unwrap(), vec![(1, 3), (5, 2)]);
    }

    #[test]
    fn rejects_malformed_spec() {
        assert!(build_fields("1").is_err());
    }
}
