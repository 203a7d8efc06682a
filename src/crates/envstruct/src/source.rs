//! Key-value lookup sources
//!
//! The parser never reads the environment directly. It asks a [`Source`]
//! whether a key exists and, if so, for its string value.

use std::collections::{BTreeMap, HashMap};

/// Lookup collaborator consulted for every key
pub trait Source {
    /// Return the value for `key`, or `None` if the key is absent
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The process environment
///
/// Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

impl Source for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Source for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_map_source() {
        let mut map = HashMap::new();
        map.insert("HOST".to_string(), "localhost".to_string());

        assert_eq!(map.lookup("HOST"), Some("localhost".to_string()));
        assert_eq!(map.lookup("PORT"), None);
    }

    #[test]
    fn test_process_env_distinguishes_empty_from_absent() {
        env::set_var("ENVSTRUCT_SOURCE_EMPTY", "");
        assert_eq!(ProcessEnv.lookup("ENVSTRUCT_SOURCE_EMPTY"), Some(String::new()));
        assert_eq!(ProcessEnv.lookup("ENVSTRUCT_SOURCE_MISSING_12345"), None);
        assert_eq!(ProcessEnv.lookup(""), None);
        env::remove_var("ENVSTRUCT_SOURCE_EMPTY");
    }
}
