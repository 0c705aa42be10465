//! Fresh identifier allocation for synthesized states and symbols.

use std::collections::HashSet;

/// Hands out identifiers that were never produced before and never collide with the names
/// reserved at construction.
///
/// Every identifier is wrapped in parentheses. Hinted identifiers keep their seed readable,
/// which makes a compiled machine traceable back to the part of the source it came from.
#[derive(Debug, Clone, Default)]
pub struct IdentGenerator {
    used: HashSet<String>,
    counter: usize,
}

impl IdentGenerator {
    /// Creates a generator that will never return any of `reserved`.
    pub fn new<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            used: reserved.into_iter().map(Into::into).collect(),
            counter: 0,
        }
    }

    /// Returns an anonymous identifier of the form `(<hex counter>)`.
    ///
    /// The compiler names every state it synthesizes through [`Self::fresh_hinted`]; this is
    /// for callers that have no useful hint.
    pub fn fresh(&mut self) -> String {
        loop {
            let candidate = format!("({:x})", self.counter);
            self.counter += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Returns `(seed)`, or the first unused `(seed<k>)` for `k = 0, 1, ...` in hexadecimal.
    pub fn fresh_hinted(&mut self, seed: &str) -> String {
        let candidate = format!("({seed})");
        if self.used.insert(candidate.clone()) {
            return candidate;
        }

        let mut k = 0usize;
        loop {
            let candidate = format!("({seed}{k:x})");
            k += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Checks whether `name` is reserved or was already handed out.
    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Number of names known to the generator, reserved ones included.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
