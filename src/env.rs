//! Environment lookups and exported variable selection

use std::collections::HashMap;

use crate::payload::EnvironmentVariable;

/// Separator between names in the exported variable list
pub const NAME_SEPARATOR: char = '|';

/// Read-only key/value source for step inputs and exported variables.
pub trait EnvLookup {
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key`, or an empty string when it is not set
    fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }
}

/// Lookup backed by the current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Splits a pipe separated list of names.
/// Segments are kept verbatim, including empty ones; an empty input yields no segments.
pub fn split(names: &str) -> Vec<String> {
    if names.is_empty() {
        return Vec::new();
    }
    names.split(NAME_SEPARATOR).map(String::from).collect()
}

/// Resolves every non-empty name in `names` against `lookup`, keeping input order and duplicates.
/// Unset variables resolve to an empty value.
pub fn select<L: EnvLookup + ?Sized>(lookup: &L, names: &str) -> Vec<EnvironmentVariable> {
    split(names)
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| {
            let value = lookup.get_or_empty(&name);
            EnvironmentVariable::new(name, value)
        })
        .collect()
}
