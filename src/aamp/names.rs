//! Recovery of parameter names from their CRC32 hashes.
//!
//! The binary format only stores hashes. A [NameTable] maps hashes back
//! to readable names through a seeded dictionary, and guesses the rest
//! from the parent's name (`EnemyList` -> `Enemy_1`) or from a list of
//! numbered patterns. Successful guesses are memoized, so repeated
//! lookups are O(1).
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

const HASHED_NAMES: &str = include_str!("../data/botw_hashed_names.txt");
const NUMBERED_NAMES: &str = include_str!("../data/botw_numbered_names.txt");

#[derive(Debug, Default)]
pub struct NameTable {
    /// Known names. Seeded entries borrow the bundled dictionary.
    names: HashMap<u32, Cow<'static, str>>,
    /// Names discovered by guessing at runtime.
    owned_names: HashMap<u32, String>,
    /// printf-style patterns tried as a last resort, in order.
    numbered_names: Vec<Cow<'static, str>>,
}

impl NameTable {
    /// Creates a table, optionally seeded with the bundled name lists.
    pub fn new(with_botw_names: bool) -> Self {
        let mut table = Self::default();
        if with_botw_names {
            table.names.extend(
                HASHED_NAMES
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(|line| (crc32fast::hash(line.as_bytes()), Cow::Borrowed(line))),
            );
            table.numbered_names.extend(
                NUMBERED_NAMES
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(Cow::Borrowed),
            );
        }
        table
    }

    /// Registers a known name. Idempotent.
    pub fn add_name_reference(&mut self, name: &str) {
        self.names
            .entry(crc32fast::hash(name.as_bytes()))
            .or_insert_with(|| Cow::Owned(name.to_string()));
    }

    /// Seeds known names from a line-oriented blob, one name per line.
    pub fn add_names_from(&mut self, blob: &str) {
        for line in blob.lines().filter(|line| !line.is_empty()) {
            self.add_name_reference(line);
        }
    }

    /// Seeds numbered guessing patterns (e.g. `Child%02d`) from a
    /// line-oriented blob.
    pub fn add_numbered_names_from(&mut self, blob: &str) {
        self.numbered_names.extend(
            blob.lines()
                .filter(|line| !line.is_empty())
                .map(|line| Cow::Owned(line.to_string())),
        );
    }

    /// Resolves a hash to a name, guessing from the parent name and the
    /// entry's position when the hash is unknown.
    pub fn get_name(&mut self, hash: u32, index: usize, parent_hash: u32) -> Option<&str> {
        if self.names.contains_key(&hash) {
            return self.names.get(&hash).map(|name| &**name);
        }
        if self.owned_names.contains_key(&hash) {
            return self.owned_names.get(&hash).map(String::as_str);
        }
        let guess = self.guess_name(hash, index, parent_hash)?;
        Some(self.owned_names.entry(hash).or_insert(guess))
    }

    fn guess_name(&self, hash: u32, index: usize, parent_hash: u32) -> Option<String> {
        if let Some(parent) = self.names.get(&parent_hash) {
            let parent: &str = parent;
            if let Some(found) = test_names(parent, hash, index) {
                return Some(found);
            }
            // Sometimes the parent name is plural and the child names are
            // singular.
            if let Some(found) = test_names("Children", hash, index) {
                return Some(found);
            }
            for suffix in ["s", "es", "List"] {
                if let Some(stem) = parent.strip_suffix(suffix) {
                    if let Some(found) = test_names(stem, hash, index) {
                        return Some(found);
                    }
                }
            }
        }

        // Last resort: try every numbered pattern.
        for pattern in &self.numbered_names {
            for i in 0..index + 2 {
                let candidate = format_numbered(pattern, i);
                if crc32fast::hash(candidate.as_bytes()) == hash {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

fn test_names(prefix: &str, hash: u32, index: usize) -> Option<String> {
    for i in [index, index + 1] {
        for candidate in [
            format!("{prefix}{i}"),
            format!("{prefix}_{i}"),
            format!("{prefix}{i:02}"),
            format!("{prefix}_{i:02}"),
            format!("{prefix}{i:03}"),
            format!("{prefix}_{i:03}"),
        ] {
            if crc32fast::hash(candidate.as_bytes()) == hash {
                return Some(candidate);
            }
        }
    }
    None
}

/// Expands the `%d` and `%0Nd` conversions used by the numbered name
/// patterns.
fn format_numbered(pattern: &str, index: usize) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(pattern.len() + 2);
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('d') => {
                chars.next();
                let _ = write!(out, "{index}");
            }
            Some('0') => {
                chars.next();
                let mut width = 0usize;
                while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
                    width = width * 10 + digit as usize;
                    chars.next();
                }
                if chars.peek() == Some(&'d') {
                    chars.next();
                }
                let _ = write!(out, "{index:0width$}");
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    out
}

/// Returns the process-wide table used by
/// [`ParameterIO::to_text`](crate::aamp::ParameterIO::to_text).
/// Lazily seeded on first use.
pub fn get_default_name_table() -> &'static Mutex<NameTable> {
    static TABLE: OnceLock<Mutex<NameTable>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(NameTable::new(true)))
}
