//! Name registry and temporary-name synthesis
//!
//! Every identifier the program mentions is reserved up front. Temporaries are
//! drawn from the configured strategy and rejected until one is free, so a
//! synthesized name never shadows a user name or another temporary.

use indexmap::IndexSet;
use rand::{Rng as _, SeedableRng as _, distributions::Alphanumeric, rngs::StdRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Prefix of loop index variables, see [`loop_index`]
const LOOP_INDEX_PREFIX: &str = "_i";

/// Default prefix of counter temporaries
const DEFAULT_PREFIX: &str = "_t";

/// Default length of random temporaries
const DEFAULT_RANDOM_LENGTH: usize = 12;

/// Invalid naming option
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameOptionError {
    /// Prefix that cannot start an identifier
    #[error(
        "temporary prefix `{prefix}` must start with a letter, `_` or `$` and contain only \
         letters, digits, `_` or `$`"
    )]
    InvalidPrefix {
        /// The rejected prefix
        prefix: String,
    },

    /// Prefix whose every counter name is a loop index
    #[error("temporary prefix `{prefix}` collides with loop index names (`_i0`, `_i1`, ...)")]
    LoopIndexPrefix {
        /// The rejected prefix
        prefix: String,
    },

    /// Random length outside the supported range
    #[error("random temporary length {length} must be between 4 and 32")]
    InvalidLength {
        /// The rejected length
        length: usize,
    },
}

/// Prefix for counter temporaries, always a valid identifier start
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemporaryPrefix(String);

impl TemporaryPrefix {
    /// Validates a prefix
    ///
    /// # Errors
    ///
    /// Returns [`NameOptionError::InvalidPrefix`] when the prefix is empty, starts
    /// with a digit or contains characters outside `[A-Za-z0-9_$]`, and
    /// [`NameOptionError::LoopIndexPrefix`] when every counter name it yields
    /// would be a loop index (`_i` followed only by digits).
    pub fn new(prefix: impl Into<String>) -> Result<Self, NameOptionError> {
        let prefix = prefix.into();
        let is_part =
            |character: char| character.is_ascii_alphanumeric() || matches!(character, '_' | '$');
        let valid = prefix
            .chars()
            .next()
            .is_some_and(|first| is_part(first) && !first.is_ascii_digit())
            && prefix.chars().all(is_part);

        if !valid {
            return Err(NameOptionError::InvalidPrefix { prefix });
        }
        if is_loop_index(&format!("{prefix}0")) {
            return Err(NameOptionError::LoopIndexPrefix { prefix });
        }
        Ok(Self(prefix))
    }

    /// The prefix text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TemporaryPrefix {
    fn default() -> Self {
        Self(DEFAULT_PREFIX.to_string())
    }
}

impl TryFrom<String> for TemporaryPrefix {
    type Error = NameOptionError;

    fn try_from(prefix: String) -> Result<Self, Self::Error> {
        Self::new(prefix)
    }
}

impl From<TemporaryPrefix> for String {
    fn from(prefix: TemporaryPrefix) -> Self {
        prefix.0
    }
}

impl fmt::Display for TemporaryPrefix {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Length of random temporaries, between 4 and 32 characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct RandomLength(usize);

impl RandomLength {
    /// Shortest accepted length
    pub const MIN: usize = 4;
    /// Longest accepted length
    pub const MAX: usize = 32;

    /// Validates a length
    ///
    /// # Errors
    ///
    /// Returns [`NameOptionError::InvalidLength`] outside `4..=32`.
    pub fn new(length: usize) -> Result<Self, NameOptionError> {
        if (Self::MIN..=Self::MAX).contains(&length) {
            Ok(Self(length))
        } else {
            Err(NameOptionError::InvalidLength { length })
        }
    }

    /// The length in characters
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RandomLength {
    fn default() -> Self {
        Self(DEFAULT_RANDOM_LENGTH)
    }
}

impl TryFrom<usize> for RandomLength {
    type Error = NameOptionError;

    fn try_from(length: usize) -> Result<Self, Self::Error> {
        Self::new(length)
    }
}

impl From<RandomLength> for usize {
    fn from(length: RandomLength) -> Self {
        length.0
    }
}

/// How temporaries are named
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum TemporaryNames {
    /// `<prefix>0`, `<prefix>1`, ...
    Counter {
        /// Name prefix
        #[serde(default)]
        prefix: TemporaryPrefix,
    },
    /// Fixed-length alphanumeric names
    Random {
        /// Name length
        #[serde(default)]
        length: RandomLength,
        /// Seed for reproducible names, fresh entropy when absent
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for TemporaryNames {
    fn default() -> Self {
        Self::Counter {
            prefix: TemporaryPrefix::default(),
        }
    }
}

/// Candidate source for temporaries
#[derive(Debug)]
enum Generator {
    Counter { prefix: String, next: usize },
    Random { length: usize, rng: StdRng },
}

impl Generator {
    fn new(strategy: &TemporaryNames) -> Self {
        match strategy {
            TemporaryNames::Counter { prefix } => Self::Counter {
                prefix: prefix.as_str().to_string(),
                next: 0,
            },
            TemporaryNames::Random { length, seed } => Self::Random {
                length: length.get(),
                rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            },
        }
    }

    fn candidate(&mut self) -> String {
        match self {
            Self::Counter { prefix, next } => {
                let name = format!("{prefix}{next}");
                *next += 1;
                name
            }
            Self::Random { length, rng } => (0..*length)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect(),
        }
    }
}

/// Name of the index variable of a loop nested `depth` loops deep
///
/// Lijs identifiers cannot start with `_`, so these never meet user names.
#[must_use]
pub fn loop_index(depth: usize) -> String {
    format!("{LOOP_INDEX_PREFIX}{depth}")
}

fn is_loop_index(name: &str) -> bool {
    name.strip_prefix(LOOP_INDEX_PREFIX)
        .is_some_and(|depth| !depth.is_empty() && depth.bytes().all(|byte| byte.is_ascii_digit()))
}

/// Reserved and introduced names of one lowering
#[derive(Debug)]
pub struct NameRegistry {
    reserved: FxHashSet<String>,
    introduced: IndexSet<String>,
    generator: Generator,
}

impl NameRegistry {
    /// Creates an empty registry drawing temporaries from `strategy`
    #[must_use]
    pub fn new(strategy: &TemporaryNames) -> Self {
        Self {
            reserved: FxHashSet::default(),
            introduced: IndexSet::new(),
            generator: Generator::new(strategy),
        }
    }

    /// Marks a name as unavailable for temporaries
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    /// Records a declared name, returning whether it was new
    pub fn introduce(&mut self, name: impl Into<String>) -> bool {
        self.introduced.insert(name.into())
    }

    /// Whether `name` is reserved or already introduced
    #[must_use]
    pub fn is_taken(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.introduced.contains(name)
    }

    /// Synthesizes and introduces a name no other binding uses
    pub fn fresh(&mut self) -> String {
        loop {
            let candidate = self.generator.candidate();
            let starts_with_digit = candidate.starts_with(|first: char| first.is_ascii_digit());
            if starts_with_digit || is_loop_index(&candidate) || self.is_taken(&candidate) {
                continue;
            }
            self.introduced.insert(candidate.clone());
            return candidate;
        }
    }

    /// Introduced names in order of introduction
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.introduced.iter().map(String::as_str)
    }

    /// Consumes the registry, returning the introduced names in order
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        self.introduced.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_names() {
        let mut registry = NameRegistry::new(&TemporaryNames::default());
        assert_eq!(registry.fresh(), "_t0");
        assert_eq!(registry.fresh(), "_t1");
        assert_eq!(registry.into_names(), ["_t0", "_t1"]);
    }

    #[test]
    fn test_reserved_names_are_skipped() {
        let mut registry = NameRegistry::new(&TemporaryNames::default());
        registry.reserve("_t0");
        registry.introduce("_t1");
        assert_eq!(registry.fresh(), "_t2");
    }

    #[test]
    fn test_introduce_is_idempotent() {
        let mut registry = NameRegistry::new(&TemporaryNames::default());
        assert!(registry.introduce("x"));
        assert!(!registry.introduce("x"));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["x"]);
    }

    #[test]
    fn test_loop_index_prefix_rejected() {
        assert_eq!(
            TemporaryPrefix::new("_i"),
            Err(NameOptionError::LoopIndexPrefix {
                prefix: "_i".to_string()
            })
        );
        assert!(matches!(
            TemporaryPrefix::new("_i12"),
            Err(NameOptionError::LoopIndexPrefix { .. })
        ));
    }

    #[test]
    fn test_loop_index_lookalike_prefix_skips_indices() {
        let prefix = TemporaryPrefix::new("_i1x").unwrap();
        let mut registry = NameRegistry::new(&TemporaryNames::Counter { prefix });
        assert_eq!(registry.fresh(), "_i1x0");

        let prefix = TemporaryPrefix::new("_").unwrap();
        let mut registry = NameRegistry::new(&TemporaryNames::Counter { prefix });
        let name = registry.fresh();
        assert!(!is_loop_index(&name), "{name} collides with a loop index");
    }

    #[test]
    fn test_random_names() {
        let strategy = TemporaryNames::Random {
            length: RandomLength::new(8).unwrap(),
            seed: Some(7),
        };
        let mut registry = NameRegistry::new(&strategy);
        let names: Vec<_> = (0..50).map(|_| registry.fresh()).collect();

        let unique: FxHashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        for name in &names {
            assert_eq!(name.len(), 8);
            assert!(!name.starts_with(|first: char| first.is_ascii_digit()));
            assert!(name.chars().all(|character| character.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_seeded_random_names_are_reproducible() {
        let strategy = TemporaryNames::Random {
            length: RandomLength::default(),
            seed: Some(42),
        };
        let first: Vec<_> = {
            let mut registry = NameRegistry::new(&strategy);
            (0..5).map(|_| registry.fresh()).collect()
        };
        let second: Vec<_> = {
            let mut registry = NameRegistry::new(&strategy);
            (0..5).map(|_| registry.fresh()).collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_prefix_validation() {
        assert_eq!(TemporaryPrefix::new("$tmp").unwrap().as_str(), "$tmp");
        assert_eq!(TemporaryPrefix::new("tmp_").unwrap().to_string(), "tmp_");
        assert_eq!(
            TemporaryPrefix::new("1x"),
            Err(NameOptionError::InvalidPrefix {
                prefix: "1x".to_string()
            })
        );
        assert!(matches!(TemporaryPrefix::new(""), Err(_)));
        assert!(matches!(TemporaryPrefix::new("a-b"), Err(_)));
    }

    #[test]
    fn test_length_validation() {
        assert_eq!(RandomLength::new(4).map(RandomLength::get), Ok(4));
        assert_eq!(RandomLength::new(32).map(RandomLength::get), Ok(32));
        assert_eq!(
            RandomLength::new(3),
            Err(NameOptionError::InvalidLength { length: 3 })
        );
        assert!(matches!(RandomLength::new(33), Err(_)));
    }

    #[test]
    fn test_loop_index_names() {
        assert_eq!(loop_index(0), "_i0");
        assert!(is_loop_index("_i12"));
        assert!(!is_loop_index("_i"));
        assert!(!is_loop_index("_item"));
    }
}
