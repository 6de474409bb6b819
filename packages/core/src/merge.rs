//! Order-preserving list operations used to assemble query results.

use std::collections::HashSet;

/// Remove repeated entries, keeping the first occurrence of each.
pub fn dedup_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Entries present in both `left` and `right`, compared by string equality.
///
/// The result follows the order of `left` and contains each shared entry once,
/// even when either input repeats it.
pub fn common_entries(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    dedup_in_order(left.iter().filter(|e| right.contains(e.as_str())).cloned())
}
