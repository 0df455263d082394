//! Multi-key sort comparator (`spec.md` §4.5.1 `sort`), shared with the
//! field-list comparators used by `fmerge` (§4.5.2) and `summary`'s
//! `-min`/`-max`/`-med` actions (§4.5.8).

use std::cmp::Ordering;

use crate::error::CliResult;
use crate::num::{is_number, to_real};

/// One `idx[:flags]` component of a `sort -f` field spec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortKey {
    pub field: usize,
    pub numeric: bool,
    pub case_insensitive: bool,
    pub descending: bool,
}

/// Parses `idx[:flags],...` where flags are a subset of `A`/`D`
/// (ascending/descending) and `S`/`N`/`I` (string/numeric/case-insensitive).
pub fn parse_sort_spec(s: &str) -> CliResult<Vec<SortKey>> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return Err("empty field spec".into());
            }
            let (idx_str, flags) = match part.split_once(':') {
                Some((i, f)) => (i, f),
                None => (part, ""),
            };
            let idx: i64 = idx_str
                .trim()
                .parse()
                .map_err(|_| format!("invalid field index in sort spec: {}", part))?;
            if idx <= 0 {
                return Err(format!("field index must be greater than zero: {}", part).into());
            }
            let mut key = SortKey {
                field: (idx - 1) as usize,
                numeric: false,
                case_insensitive: false,
                descending: false,
            };
            for c in flags.chars() {
                match c.to_ascii_uppercase() {
                    'A' => key.descending = false,
                    'D' => key.descending = true,
                    'S' => key.numeric = false,
                    'N' => key.numeric = true,
                    'I' => key.case_insensitive = true,
                    other => return Err(format!("unknown sort flag '{}' in {}", other, part).into()),
                }
            }
            Ok(key)
        })
        .collect()
}

fn cmp_one(a: &str, b: &str, key: &SortKey) -> Ordering {
    let ord = if key.numeric {
        if is_number(a) && is_number(b) {
            to_real(a).partial_cmp(&to_real(b)).unwrap_or(Ordering::Equal)
        } else {
            // a row that fails the numeric test sorts as less than one
            // that passes, matching the source's `IsNumber`-gated compare.
            match (is_number(a), is_number(b)) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => a.cmp(b),
            }
        }
    } else if key.case_insensitive {
        a.to_lowercase().cmp(&b.to_lowercase())
    } else {
        a.cmp(b)
    };
    if key.descending {
        ord.reverse()
    } else {
        ord
    }
}

/// Total-ordered, multi-key comparator: ties on one field fall through to
/// the next (`spec.md` §4.5.1).
pub fn compare_rows(a: &[String], b: &[String], keys: &[SortKey]) -> Ordering {
    for key in keys {
        let av = a.get(key.field).map(String::as_str).unwrap_or("");
        let bv = b.get(key.field).map(String::as_str).unwrap_or("");
        let ord = cmp_one(av, bv, key);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Lexicographic, byte-wise comparator over a plain field list, with no
/// per-field direction/type flags (`fmerge`'s merge-key comparator,
/// `spec.md` §4.5.2).
pub fn compare_fields_lex(a: &[String], b: &[String], fields: &[usize]) -> Ordering {
    let cols: Vec<usize> = if fields.is_empty() {
        (0..a.len().max(b.len())).collect()
    } else {
        fields.to_vec()
    };
    for &f in &cols {
        let av = a.get(f).map(String::as_str).unwrap_or("");
        let bv = b.get(f).map(String::as_str).unwrap_or("");
        let ord = av.cmp(bv);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Numeric-if-both-numeric-else-lexical comparator over a field list
/// (`summary -min`/`-max`, `spec.md` §4.5.8).
pub fn compare_fields_numeric_aware(a: &[String], b: &[String], fields: &[usize]) -> Ordering {
    let cols: Vec<usize> = if fields.is_empty() {
        (0..a.len().max(b.len())).collect()
    } else {
        fields.to_vec()
    };
    for &f in &cols {
        let av = a.get(f).map(String::as_str).unwrap_or("");
        let bv = b.get(f).map(String::as_str).unwrap_or("");
        let ord = if is_number(av) && is_number(bv) {
            to_real(av).partial_cmp(&to_real(bv)).unwrap_or(Ordering::Equal)
        } else {
            av.cmp(bv)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let keys = parse_sort_spec("2:DN,1:AS").unwrap();
        assert_eq!(keys[0].field, 1);
        assert!(keys[0].numeric);
        assert!(keys[0].descending);
        assert_eq!(keys[1].field, 0);
        assert!(!keys[1].numeric);
        assert!(!keys[1].descending);
    }

    #[test]
    fn numeric_descending_sort() {
        let keys = parse_sort_spec("2:DN").unwrap();
        let rows = vec![row(&["a", "10"]), row(&["b", "2"]), row(&["c", "100"])];
        let mut sorted = rows;
        sorted.sort_by(|a, b| compare_rows(a, b, &keys));
        assert_eq!(sorted, vec![row(&["c", "100"]), row(&["a", "10"]), row(&["b", "2"])]);
    }

    #[test]
    fn ties_fall_through_to_next_key() {
        let keys = parse_sort_spec("1,2:N").unwrap();
        let rows = vec![row(&["a", "2"]), row(&["a", "1"]), row(&["b", "0"])];
        let mut sorted = rows;
        sorted.sort_by(|a, b| compare_rows(a, b, &keys));
        assert_eq!(sorted, vec![row(&["a", "1"]), row(&["a", "2"]), row(&["b", "0"])]);
    }

    #[test]
    fn lex_field_compare_is_total() {
        let a = row(&["x", "1"]);
        let b = row(&["x", "2"]);
        assert_eq!(compare_fields_lex(&a, &b, &[0, 1]), Ordering::Less);
        assert_eq!(compare_fields_lex(&b, &a, &[0, 1]), Ordering::Greater);
    }
}
