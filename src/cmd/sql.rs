//! `sql_insert`/`sql_update`/`sql_delete`: SQL statement generation
//! (`spec.md` §4.5.7), grounded in
//! `examples/original_source/csvfix/src/csved_sql.cpp`.

use clap::Args;

use crate::command::{expand_escapes, CommonArgs, Config};
use crate::csv::Row;
use crate::error::CliResult;

#[derive(Debug, Clone)]
struct ColSpec {
    field: usize,
    name: String,
}

fn build_cols(spec: &str) -> CliResult<Vec<ColSpec>> {
    let mut have_names = false;
    let mut cols = Vec::new();
    if spec.trim().is_empty() {
        return Ok(cols);
    }
    for part in spec.split(',') {
        let tmp: Vec<&str> = part.splitn(2, ':').collect();
        if tmp.is_empty() || tmp[0].is_empty() {
            return Err("empty column specification".into());
        }
        let icol: i64 = tmp[0]
            .parse()
            .map_err(|_| format!("field index must be integer in {}", part))?;
        if icol <= 0 {
            return Err(format!("field index must be greater than zero in {}", part).into());
        }
        if tmp.len() == 1 && have_names {
            return Err("must specify all column names".into());
        }
        have_names = have_names || tmp.len() == 2;
        let name = if tmp.len() == 2 { tmp[1].to_string() } else { String::new() };
        cols.push(ColSpec { field: (icol - 1) as usize, name });
    }
    Ok(cols)
}

fn have_names(cols: &[ColSpec]) -> bool {
    !cols.is_empty() && !cols[0].name.is_empty()
}

fn sql_quote(s: &str) -> String {
    s.replace('\'', "''")
}

struct SqlCommon {
    table: String,
    sep: String,
    no_quote: Vec<usize>,
    quote_nulls: bool,
    empty_nulls: bool,
}

impl SqlCommon {
    fn empty_to_null(&self, f: &str) -> String {
        if self.empty_nulls && f.is_empty() {
            "NULL".to_string()
        } else {
            f.to_string()
        }
    }

    fn no_null_quote(&self, s: &str) -> bool {
        s == "NULL" && !self.quote_nulls
    }

    fn quote_value(&self, col_pos: usize, field: &str) -> String {
        let value = self.empty_to_null(field);
        if !self.no_quote.contains(&col_pos) && !self.no_null_quote(&value) {
            format!("'{}'", sql_quote(&value))
        } else {
            value
        }
    }

    fn where_clause(&self, row: &Row, where_cols: &[ColSpec]) -> CliResult<String> {
        let mut wc = String::new();
        for (i, col) in where_cols.iter().enumerate() {
            let value = row
                .get(col.field)
                .ok_or_else(|| format!("required field {} missing in input", col.field + 1))?;
            if !wc.is_empty() {
                wc.push_str(" AND ");
            }
            let quoted = self.empty_to_null(value);
            let op = if quoted == "NULL" { " IS " } else { " = " };
            wc.push_str(&col.name);
            wc.push_str(op);
            wc.push_str(&self.quote_value(i, value));
        }
        Ok(format!("WHERE {}", wc))
    }
}

#[derive(Args, Debug, Clone)]
pub struct SqlCommonArgs {
    /// Table name
    #[arg(short = 't', long = "table")]
    pub table: String,

    /// Statement separator (default '\n;\n')
    #[arg(short = 's', long = "sqlsep")]
    pub sep: Option<String>,

    /// Fields not to quote (1-based comma list)
    #[arg(long = "nq")]
    pub no_quote: Option<String>,

    /// Force quoting of NULL values
    #[arg(long = "qn")]
    pub quote_nulls: bool,

    /// Convert empty CSV fields to NULL
    #[arg(long = "en")]
    pub empty_nulls: bool,
}

impl SqlCommonArgs {
    fn resolve(&self) -> CliResult<SqlCommon> {
        let sep = match &self.sep {
            Some(s) => expand_escapes(s)?,
            None => "\n;\n".to_string(),
        };
        let no_quote = match &self.no_quote {
            Some(s) if !s.trim().is_empty() => crate::field_list::parse_field_list(s)?,
            _ => vec![],
        };
        Ok(SqlCommon {
            table: self.table.clone(),
            sep,
            no_quote,
            quote_nulls: self.quote_nulls,
            empty_nulls: self.empty_nulls,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct SqlInsertArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub sql: SqlCommonArgs,

    /// Columns to insert: `field:col_name,...`
    #[arg(short = 'f', long = "cols")]
    pub cols: String,
}

pub fn run_insert(mut cfg: Config, args: &SqlInsertArgs) -> CliResult<()> {
    let sql = args.sql.resolve()?;
    let data_cols = build_cols(&args.cols)?;
    if !have_names(&data_cols) {
        return Err("sql_insert: need column names specified by -f flag".into());
    }

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let mut col_names = String::from("( ");
        for (i, c) in data_cols.iter().enumerate() {
            if i != 0 {
                col_names.push_str(", ");
            }
            col_names.push_str(&c.name);
        }
        col_names.push_str(" )");

        let mut vals = String::new();
        for (i, c) in data_cols.iter().enumerate() {
            let field = row
                .get(c.field)
                .ok_or_else(|| format!("required field {} missing from input", c.field + 1))?;
            if !vals.is_empty() {
                vals.push_str(", ");
            }
            vals.push_str(&sql.quote_value(i, field));
        }

        let stmt = format!("INSERT INTO {} {} VALUES( {})", sql.table, col_names, vals);
        cfg.io.write_text(&stmt)?;
        cfg.io.write_text(&sql.sep)?;
    }
    cfg.io.flush()
}

#[derive(Args, Debug, Clone)]
pub struct SqlUpdateArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub sql: SqlCommonArgs,

    /// Columns for the SET clause: `field:col_name,...`
    #[arg(short = 'f', long = "cols")]
    pub cols: String,

    /// Columns for the WHERE clause: `field:col_name,...`
    #[arg(short = 'w', long = "where")]
    pub where_: String,
}

pub fn run_update(mut cfg: Config, args: &SqlUpdateArgs) -> CliResult<()> {
    let sql = args.sql.resolve()?;
    let data_cols = build_cols(&args.cols)?;
    let where_cols = build_cols(&args.where_)?;
    if !have_names(&data_cols) {
        return Err("sql_update: need column names specified by -f flag".into());
    }
    if !have_names(&where_cols) {
        return Err("sql_update: need column names specified by -w flag".into());
    }

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let mut set_clause = String::new();
        for (i, c) in data_cols.iter().enumerate() {
            let field = row
                .get(c.field)
                .ok_or_else(|| format!("required field {} missing from input", c.field + 1))?;
            if !set_clause.is_empty() {
                set_clause.push_str(", ");
            }
            set_clause.push_str(&c.name);
            set_clause.push_str(" = ");
            set_clause.push_str(&sql.quote_value(i, field));
        }
        let where_clause = sql.where_clause(&row, &where_cols)?;

        let stmt = format!("UPDATE {} SET {} {}", sql.table, set_clause, where_clause);
        cfg.io.write_text(&stmt)?;
        cfg.io.write_text(&sql.sep)?;
    }
    cfg.io.flush()
}

#[derive(Args, Debug, Clone)]
pub struct SqlDeleteArgs {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(flatten)]
    pub sql: SqlCommonArgs,

    /// Columns for the WHERE clause: `field:col_name,...`
    #[arg(short = 'w', long = "where")]
    pub where_: String,
}

pub fn run_delete(mut cfg: Config, args: &SqlDeleteArgs) -> CliResult<()> {
    let sql = args.sql.resolve()?;
    let where_cols = build_cols(&args.where_)?;
    if !have_names(&where_cols) {
        return Err("sql_delete: need column names specified by -w flag".into());
    }

    while let Some(row) = cfg.io.read_csv()? {
        if cfg.should_skip(&row)? {
            continue;
        }
        let where_clause = sql.where_clause(&row, &where_cols)?;
        let stmt = format!("DELETE FROM {} {}", sql.table, where_clause);
        cfg.io.write_text(&stmt)?;
        cfg.io.write_text(&sql.sep)?;
    }
    cfg.io.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_column_specs_with_names() {
        let cols = build_cols("1:x,2:y").unwrap();
        assert_eq!(cols[0].field, 0);
        assert_eq!(cols[0].name, "x");
        assert_eq!(cols[1].field, 1);
        assert_eq!(cols[1].name, "y");
    }

    #[test]
    fn quotes_embedded_single_quote() {
        assert_eq!(sql_quote("o'brien"), "o''brien");
    }
}
