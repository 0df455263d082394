//! Regex compilation shared by the expression engine and the commands that
//! take a `-rx`-style pattern (`find`, `remove`, `validate`, `edit`).
//!
//! Patterns recur across a run (e.g. once per row in `match()`), so we keep
//! a small process-wide cache keyed on `(pattern, case_insensitive)` rather
//! than recompiling on every call.

use std::sync::{Mutex, OnceLock};

use ahash::AHashMap;
use regex::Regex;

use crate::error::CliResult;

fn cache() -> &'static Mutex<AHashMap<(String, bool), Regex>> {
    static CACHE: OnceLock<Mutex<AHashMap<(String, bool), Regex>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(AHashMap::new()))
}

pub fn compile_regex(pattern: &str, case_insensitive: bool) -> CliResult<Regex> {
    let key = (pattern.to_string(), case_insensitive);
    let mut guard = cache().lock().expect("regex cache poisoned");
    if let Some(re) = guard.get(&key) {
        return Ok(re.clone());
    }
    let re = regex::RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| format!("bad regular expression '{}': {}", pattern, e))?;
    guard.insert(key, re.clone());
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_caches() {
        let re1 = compile_regex("^ab+c$", false).unwrap();
        assert!(re1.is_match("abbc"));
        let re2 = compile_regex("^ab+c$", false).unwrap();
        assert!(re2.is_match("abc"));
    }

    #[test]
    fn case_insensitive_flag_is_part_of_key() {
        let sensitive = compile_regex("abc", false).unwrap();
        let insensitive = compile_regex("abc", true).unwrap();
        assert!(!sensitive.is_match("ABC"));
        assert!(insensitive.is_match("ABC"));
    }

    #[test]
    fn reports_bad_pattern() {
        assert!(compile_regex("(unclosed", false).is_err());
    }
}
