use std::collections::BTreeSet;
use std::io::BufRead;

use crate::models::Prefix;

/// Derive the prefix for one listing line.
///
/// The name is the first whitespace-delimited token. Names of at least `prefix_length`
/// characters give a wildcard prefix of their first `prefix_length` characters; shorter
/// names give an exact prefix. Blank lines give `None`.
pub fn line_prefix(line: &str, prefix_length: usize) -> Option<Prefix> {
    let name = line.split_whitespace().next()?;
    let mut chars = name.char_indices();
    match chars.nth(prefix_length) {
        Some((end, _)) => Some(Prefix::wildcard(&name[..end])),
        None if name.chars().count() == prefix_length => Some(Prefix::wildcard(name)),
        None => Some(Prefix::exact(name)),
    }
}

/// Collect the distinct prefixes of a listing, skipping the header line
pub fn collect_prefixes<R: BufRead>(
    reader: R,
    prefix_length: usize,
) -> std::io::Result<BTreeSet<Prefix>> {
    let mut prefixes = BTreeSet::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        if let Some(prefix) = line_prefix(&line, prefix_length) {
            prefixes.insert(prefix);
        }
    }
    Ok(prefixes)
}
