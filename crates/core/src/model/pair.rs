use serde::{Deserialize, Serialize};

/// A single binary-choice question unit: two display strings.
///
/// Pairs are immutable once loaded and are identified by their index within
/// the source file's array.
///
/// # Examples
///
/// ```
/// # use quiz_core::model::Pair;
/// let pair = Pair::new("Tea", "Coffee");
/// assert_eq!(pair.prompt(), "Tea or Coffee?");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    option_a: String,
    option_b: String,
}

impl Pair {
    #[must_use]
    pub fn new(option_a: impl Into<String>, option_b: impl Into<String>) -> Self {
        Self {
            option_a: option_a.into(),
            option_b: option_b.into(),
        }
    }

    /// The fixed stand-in used for rows that fail shape checks during load.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new("A", "B")
    }

    #[must_use]
    pub fn option_a(&self) -> &str {
        &self.option_a
    }

    #[must_use]
    pub fn option_b(&self) -> &str {
        &self.option_b
    }

    /// Question text presented to the user.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("{} or {}?", self.option_a, self.option_b)
    }
}

/// Ordered collection of pairs loaded from one source file.
///
/// Indexing is positional and matches the backing file at load time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairSet {
    pairs: Vec<Pair>,
}

impl PairSet {
    #[must_use]
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair count as the index width used by the scheduler.
    #[must_use]
    pub fn count(&self) -> u32 {
        u32::try_from(self.pairs.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Pair> {
        self.pairs.get(index as usize)
    }

    #[must_use]
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }
}
