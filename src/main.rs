//! `csvfix`: reads CSV-shaped tabular data from one or more input
//! streams, transforms it through a single user-selected sub-command,
//! and writes the result to a single output stream (`spec.md` §1).

use std::process;

use crate::cli::Cli;
use crate::error::CliError;

mod cli;
mod cmd;
mod command;
mod csv;
mod error;
mod expr;
mod field_list;
mod io_manager;
mod num;
mod regexutil;
mod sort;

#[cfg(test)]
mod test;

fn main() {
    let mut cli = Cli::new();
    match cli.run() {
        // normal exit
        Ok(()) => {}
        Err(CliError::Io(e)) => {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                exit(&format!("{}", e), 1)
            }
        }
        Err(e) => exit(&format!("{}", e), 1),
    }
}

fn exit(msg: &str, code: i32) {
    eprintln!("csvfix: {}", msg);
    process::exit(code);
}
