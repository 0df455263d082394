//! One module per CSVfix sub-command (`spec.md` §2 "Transformation
//! commands" + SPEC_FULL.md's supplemental commands). Each module
//! exposes `pub fn run(cfg: Config, args: &XxxArgs) -> CliResult<()>`
//! (or, where one binary covers more than one original command, several
//! `run_*` functions) — dispatched from `cli.rs`'s `SubCommand` match,
//! which replaces the original's runtime `Dictionary<Command>` registry
//! with `clap`'s own ahead-of-time-typed enum (`spec.md` §9 REDESIGN
//! FLAGS discussion, resolved in DESIGN.md).

pub mod atable;
pub mod block;
pub mod diff;
pub mod dsv;
pub mod echo;
pub mod edit;
pub mod erase;
pub mod escape;
pub mod eval;
pub mod exclude;
pub mod file_info;
pub mod find;
pub mod fixed;
pub mod flatten;
pub mod fmerge;
pub mod headtail;
pub mod inter;
pub mod map;
pub mod merge;
pub mod money;
pub mod number;
pub mod pivot;
pub mod printf;
pub mod rowsort;
pub mod seq;
pub mod sort;
pub mod split;
pub mod sql;
pub mod squash;
pub mod summary;
pub mod template;
pub mod timestamp;
pub mod trim;
pub mod unique;
pub mod validate;
