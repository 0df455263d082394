//! Comma-lists and field lists (`spec.md` §3, GLOSSARY).

use crate::error::CliResult;

/// A plain comma-separated list of values, as used by `index()`/`pick()`
/// and by most `-f`-style flags before they are resolved to field
/// indices.
#[derive(Debug, Clone)]
pub struct CommaList(Vec<String>);

impl CommaList {
    pub fn new(s: &str) -> Self {
        CommaList(s.split(',').map(|p| p.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(|s| s.as_str())
    }

    /// 0-based index of the first matching element, if any.
    pub fn index_of(&self, val: &str) -> Option<usize> {
        self.0.iter().position(|s| s == val)
    }
}

/// Parses a 1-based comma list of field indices (e.g. `1,3,5`) into
/// 0-based indices. An empty string means "all fields", represented here
/// as an empty `Vec`; callers decide how to interpret that.
pub fn parse_field_list(s: &str) -> CliResult<Vec<usize>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|p| {
            let p = p.trim();
            let n: i64 = p
                .parse()
                .map_err(|_| format!("invalid field index: {}", p))?;
            if n <= 0 {
                return Err(format!("field index must be greater than zero: {}", p).into());
            }
            Ok((n - 1) as usize)
        })
        .collect()
}

/// Fetches a 0-based field from a row, defaulting to empty string if the
/// row is shorter than the requested index (the "missing field" rule in
/// `spec.md` §3 that applies to most commands).
pub fn get_field(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_list() {
        assert_eq!(parse_field_list("1,3,5").unwrap(), vec![0, 2, 4]);
    }

    #[test]
    fn empty_means_all() {
        assert_eq!(parse_field_list("").unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn rejects_zero_index() {
        assert!(parse_field_list("0").is_err());
    }

    #[test]
    fn comma_list_index_of() {
        let cl = CommaList::new("a,b,c");
        assert_eq!(cl.index_of("b"), Some(1));
        assert_eq!(cl.index_of("z"), None);
    }
}
