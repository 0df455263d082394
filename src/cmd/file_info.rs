//! `file_info`: prepend file name and line number to each row
//! (`spec.md` SPEC_FULL.md §4 supplemental commands), grounded in
//! `examples/original_source/csvfix/src/csved_fileinfo.cpp`.

use clap::Args;

use crate::command::{CommonArgs, Config};
use crate::error::CliResult;

#[derive(Args, Debug, Clone)]
pub struct FileInfoArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Strip any directory component from the file name
    #[arg(short = 'b', long = "base")]
    pub basename: bool,

    /// Output file name and line number as two separate fields (default: one combined field)
    #[arg(long = "tc")]
    pub two_cols: bool,
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

pub fn run(mut cfg: Config, args: &FileInfoArgs) -> CliResult<()> {
    while let Some(row) = cfg.io.read_csv()? {
        match cfg.filter(&row)? {
            crate::command::Filter::Skip => continue,
            crate::command::Filter::Pass => cfg.io.write_row(&row)?,
            crate::command::Filter::Transform => {
                let fname = cfg.io.current_file().to_string();
                let fname = if args.basename { basename(&fname).to_string() } else { fname };
                let line = cfg.io.current_line();

                let mut out = Vec::with_capacity(row.len() + 2);
                if args.two_cols {
                    out.push(fname);
                    out.push(line.to_string());
                } else {
                    out.push(format!("{} ({})", fname, line));
                }
                out.extend(row.iter().cloned());
                cfg.io.write_row(&out)?;
            }
        }
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directory_for_basename() {
        assert_eq!(basename("/a/b/c.csv"), "c.csv");
        assert_eq!(basename("c.csv"), "c.csv");
    }
}
