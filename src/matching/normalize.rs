// Name normalization: canonicalizes a display name into a comparable key.
//
// Two names with the same normalized key are treated as the same identity
// unless the alias table overrides the mapping.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A comparable identity key derived deterministically from a display name.
///
/// Construction goes through [`normalize`]; the inner string is guaranteed
/// to contain only `[a-z0-9]` and single interior spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonicalize a display name into a [`NormalizedKey`].
///
/// Steps: lowercase, Unicode-decompose and drop combining marks, delete
/// every character outside `[a-z0-9 ]`, collapse whitespace runs, trim.
/// Total over all inputs; an empty or all-punctuation name yields the
/// empty key rather than an error.
pub fn normalize(raw: &str) -> NormalizedKey {
    let lowered = raw.to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            key.push(c);
        } else if c.is_whitespace() {
            pending_space = true;
        }
        // Everything else (punctuation, symbols, non-ASCII letters that
        // survive decomposition) is deleted outright.
    }

    NormalizedKey(key)
}

/// Manual overrides for known name mismatches between ranking sources and
/// the player directory (suffix differences, nickname spellings).
///
/// Keys and values are stored normalized, so the configuration file may
/// spell entries in display form. Lookup is single-hop: a chain A->B, B->C
/// is a configuration error and only the first hop is honored.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<NormalizedKey, NormalizedKey>,
}

impl AliasTable {
    /// Build the table from raw (source, target) display-name pairs.
    ///
    /// Both sides are normalized on insert. Entries that normalize to an
    /// empty key or map a name to itself are skipped with a warning, as
    /// are chained entries.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut entries = HashMap::new();
        for (from, to) in pairs {
            let from_key = normalize(from.as_ref());
            let to_key = normalize(to.as_ref());
            if from_key.is_empty() || to_key.is_empty() {
                warn!(
                    "skipping alias '{}' -> '{}': empty normalized key",
                    from.as_ref(),
                    to.as_ref()
                );
                continue;
            }
            if from_key == to_key {
                warn!("skipping alias '{}': maps to itself", from.as_ref());
                continue;
            }
            if entries.insert(from_key.clone(), to_key).is_some() {
                warn!("duplicate alias for '{}', using latest entry", from_key);
            }
        }

        let table = AliasTable { entries };
        for (from, to) in &table.entries {
            if table.entries.contains_key(to) {
                warn!("alias chain detected: '{from}' -> '{to}' -> ...; only one hop is applied");
            }
        }
        table
    }

    /// Apply the alias mapping to a key. Single-hop: returns the mapped
    /// value if present, else the input unchanged.
    pub fn apply(&self, key: NormalizedKey) -> NormalizedKey {
        match self.entries.get(&key) {
            Some(mapped) => mapped.clone(),
            None => key,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
