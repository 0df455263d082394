//! CLI surface: one `clap::Subcommand` variant per CSVfix command,
//! dispatched to its `cmd::*::run`. This is the ahead-of-time-typed
//! replacement for the original tool's runtime `Dictionary<Command>`
//! registry (`spec.md` §4.4 "command registry", §9 REDESIGN FLAGS;
//! resolution recorded in DESIGN.md), following
//! `markschl-seqtool/src/cli.rs`'s `Cli`/`SubCommand`/`run!` shape.

use clap::{Parser, Subcommand};

use crate::cmd;
use crate::command::Config;
use crate::error::CliResult;

#[derive(Parser, Debug)]
#[command(name = "csvfix", version, about = "Read, transform and write CSV-shaped tabular data")]
struct ClapCli {
    #[command(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    /// Multi-key buffered sort
    Sort(cmd::sort::SortArgs),
    /// K-way merge of already-sorted inputs
    Fmerge(cmd::fmerge::FmergeArgs),
    /// Compare two CSV files and report differences
    Diff(cmd::diff::DiffArgs),
    /// Interleave rows from multiple sorted inputs on a key
    Inter(cmd::inter::InterArgs),
    /// Coalesce consecutive rows sharing a key into one row
    Flatten(cmd::flatten::FlattenArgs),
    /// Invert `flatten`, splitting a wide row into several narrow ones
    Unflatten(cmd::flatten::UnflattenArgs),
    /// Find rows matching regex/range/length/field-count criteria
    Find(cmd::find::FindArgs),
    /// Remove rows matching regex/range/length/field-count criteria
    Remove(cmd::find::FindArgs),
    /// Per-row expression evaluation, appending or replacing fields
    Eval(cmd::eval::EvalArgs),
    /// Generate `INSERT` statements from row data
    #[command(name = "sql_insert")]
    SqlInsert(cmd::sql::SqlInsertArgs),
    /// Generate `UPDATE` statements from row data
    #[command(name = "sql_update")]
    SqlUpdate(cmd::sql::SqlUpdateArgs),
    /// Generate `DELETE` statements from row data
    #[command(name = "sql_delete")]
    SqlDelete(cmd::sql::SqlDeleteArgs),
    /// Numeric/frequency summaries over buffered rows
    Summary(cmd::summary::SummaryArgs),
    /// Parse fixed-width records into CSV
    #[command(name = "read_fixed")]
    ReadFixed(cmd::fixed::ReadFixedArgs),
    /// Render CSV fields as fixed-width records
    #[command(name = "write_fixed")]
    WriteFixed(cmd::fixed::WriteFixedArgs),
    /// Parse a delimiter-separated format into CSV
    #[command(name = "dsv_read")]
    DsvRead(cmd::dsv::ReadDsvArgs),
    /// Render CSV as a delimiter-separated format
    #[command(name = "dsv_write")]
    DsvWrite(cmd::dsv::WriteDsvArgs),
    /// Sed-style per-field substitution
    Edit(cmd::edit::EditArgs),
    /// Delete field values matching/not-matching a regex
    Erase(cmd::erase::EraseArgs),
    /// Tag or filter rows inside/outside an expression-delimited block
    Block(cmd::block::BlockArgs),
    /// Rule-file driven per-row validation
    Validate(cmd::validate::ValidateArgs),
    /// Cross-tabulate rows into a column/row/fact pivot table
    Pivot(cmd::pivot::PivotArgs),
    /// Remove listed fields (column projection/exclusion)
    Exclude(cmd::exclude::ExcludeArgs),
    /// Combine multiple fields into one
    Merge(cmd::merge::MergeArgs),
    /// Emit a constant row, or the input unchanged
    Echo(cmd::echo::EchoArgs),
    /// Prepend file name and line number to each row
    #[command(name = "file_info")]
    FileInfo(cmd::file_info::FileInfoArgs),
    /// Emit only the first N rows
    Head(cmd::headtail::HeadArgs),
    /// Emit only the last N rows
    Tail(cmd::headtail::TailArgs),
    /// Render rows via a `%N`-placeholder format string
    Printf(cmd::printf::PrintfArgs),
    /// Prepend an auto-incrementing sequence number field
    Seq(cmd::seq::SeqArgs),
    /// Trim leading/trailing whitespace on fields
    Trim(cmd::trim::TrimArgs),
    /// Normalise a numeric field to fixed 2-decimal money form
    Money(cmd::money::MoneyArgs),
    /// Fill a text template with per-row field substitutions
    Template(cmd::template::TemplateArgs),
    /// Prepend the current date/time to each row
    Timestamp(cmd::timestamp::TimestampArgs),
    /// Substitute field values via a from/to value-list pair
    Map(cmd::map::MapArgs),
    /// Normalise EN/EU-formatted numeric fields to plain numeric form
    Number(cmd::number::NumberArgs),
    /// Backslash-encode special characters in field values
    Escape(cmd::escape::EscapeArgs),
    /// Reverse `escape`'s backslash encoding
    Unescape(cmd::escape::UnescapeArgs),
    /// Group rows by key and accumulate the remaining fields
    Squash(cmd::squash::SquashArgs),
    /// Render buffered rows as a fixed-width ASCII table
    Atable(cmd::atable::AtableArgs),
    /// Drop duplicate rows, or show only the duplicates
    Unique(cmd::unique::UniqueArgs),
    /// Split one field into several at fixed positions
    #[command(name = "split_fixed")]
    SplitFixed(cmd::split::SplitFixedArgs),
    /// Split one field into several at a character or char-type transition
    #[command(name = "split_char")]
    SplitChar(cmd::split::SplitCharArgs),
    /// Sort the fields within each row
    Rowsort(cmd::rowsort::RowSortArgs),
}

pub struct Cli(ClapCli);

impl Cli {
    pub fn new() -> Self {
        Self(ClapCli::parse())
    }

    pub fn run(&mut self) -> CliResult<()> {
        use SubCommand::*;
        macro_rules! run {
            ($cmdmod:ident, $runner:ident, $opts:expr) => {
                cmd::$cmdmod::$runner(Config::new(&$opts.common)?, $opts)
            };
            ($cmdmod:ident, $opts:expr) => {
                cmd::$cmdmod::run(Config::new(&$opts.common)?, $opts)
            };
        }
        match &self.0.command {
            Sort(opts) => run!(sort, opts),
            Fmerge(opts) => run!(fmerge, opts),
            Diff(opts) => run!(diff, opts),
            Inter(opts) => run!(inter, opts),
            Flatten(opts) => run!(flatten, opts),
            Unflatten(opts) => run!(flatten, run_unflatten, opts),
            Find(opts) => run!(find, run_find, opts),
            Remove(opts) => run!(find, run_remove, opts),
            Eval(opts) => run!(eval, opts),
            SqlInsert(opts) => run!(sql, run_insert, opts),
            SqlUpdate(opts) => run!(sql, run_update, opts),
            SqlDelete(opts) => run!(sql, run_delete, opts),
            Summary(opts) => run!(summary, opts),
            ReadFixed(opts) => run!(fixed, run_read, opts),
            WriteFixed(opts) => run!(fixed, run_write, opts),
            DsvRead(opts) => run!(dsv, run_read, opts),
            DsvWrite(opts) => run!(dsv, run_write, opts),
            Edit(opts) => run!(edit, opts),
            Erase(opts) => run!(erase, opts),
            Block(opts) => run!(block, opts),
            Validate(opts) => cmd::validate::run(&opts.common, opts),
            Pivot(opts) => run!(pivot, opts),
            Exclude(opts) => run!(exclude, opts),
            Merge(opts) => run!(merge, opts),
            Echo(opts) => run!(echo, opts),
            FileInfo(opts) => run!(file_info, opts),
            Head(opts) => run!(headtail, run_head, opts),
            Tail(opts) => run!(headtail, run_tail, opts),
            Printf(opts) => run!(printf, opts),
            Seq(opts) => run!(seq, opts),
            Trim(opts) => run!(trim, opts),
            Money(opts) => run!(money, opts),
            Template(opts) => run!(template, opts),
            Timestamp(opts) => run!(timestamp, opts),
            Map(opts) => run!(map, opts),
            Number(opts) => run!(number, opts),
            Escape(opts) => run!(escape, opts),
            Unescape(opts) => run!(escape, run_unescape, opts),
            Squash(opts) => run!(squash, opts),
            Atable(opts) => run!(atable, opts),
            Unique(opts) => run!(unique, opts),
            SplitFixed(opts) => run!(split, run_fixed, opts),
            SplitChar(opts) => run!(split, run_char, opts),
            Rowsort(opts) => run!(rowsort, opts),
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
