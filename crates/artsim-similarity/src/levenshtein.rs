//! Levenshtein edit distance over arbitrary sequences.
//!
//! The metric is generic over the element type and the equality predicate,
//! so the same dynamic program serves word-level comparison of normalized
//! articles and character-level comparison of single words.

/// Levenshtein metric with configurable operation costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levenshtein {
    pub insert_cost: usize,
    pub delete_cost: usize,
    pub replace_cost: usize,
}

impl Default for Levenshtein {
    fn default() -> Self {
        Self { insert_cost: 1, delete_cost: 1, replace_cost: 1 }
    }
}

impl Levenshtein {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_costs(insert_cost: usize, delete_cost: usize, replace_cost: usize) -> Self {
        Self { insert_cost, delete_cost, replace_cost }
    }

    /// Cost of turning `a` into `b`, comparing elements with `eq`.
    ///
    /// Runs in `O(|a|·|b|)` time and keeps two rows of `min(|a|, |b|) + 1`
    /// cells.
    pub fn distance_by<T, F>(&self, a: &[T], b: &[T], eq: F) -> usize
    where
        F: Fn(&T, &T) -> bool,
    {
        if a.is_empty() && b.is_empty() {
            return 0;
        }
        if a.is_empty() {
            return self.insert_cost * b.len();
        }
        if b.is_empty() {
            return self.delete_cost * a.len();
        }

        // Keep the shorter sequence on the columns. Transforming b into a
        // swaps the roles of insertion and deletion.
        if b.len() > a.len() {
            let flipped = Self {
                insert_cost: self.delete_cost,
                delete_cost: self.insert_cost,
                replace_cost: self.replace_cost,
            };
            return flipped.rolling_distance(b, a, |x, y| eq(y, x));
        }
        self.rolling_distance(a, b, eq)
    }

    fn rolling_distance<T, F>(&self, rows: &[T], cols: &[T], eq: F) -> usize
    where
        F: Fn(&T, &T) -> bool,
    {
        let mut prev: Vec<usize> = (0..=cols.len()).map(|j| j * self.insert_cost).collect();
        let mut curr = vec![0; cols.len() + 1];

        for (i, r) in rows.iter().enumerate() {
            curr[0] = (i + 1) * self.delete_cost;
            for (j, c) in cols.iter().enumerate() {
                let del = prev[j + 1] + self.delete_cost;
                let ins = curr[j] + self.insert_cost;
                let sub = if eq(r, c) { prev[j] } else { prev[j] + self.replace_cost };
                curr[j + 1] = del.min(ins).min(sub);
            }
            std::mem::swap(&mut prev, &mut curr);
        }
        prev[cols.len()]
    }

    pub fn distance<T: PartialEq>(&self, a: &[T], b: &[T]) -> usize {
        self.distance_by(a, b, |x, y| x == y)
    }

    /// Normalized similarity in [0, 1]; larger is closer.
    ///
    /// Exactly `1.0` whenever the distance is zero (two empty sequences
    /// included), otherwise `1 - distance / max(|a|, |b|)`.
    pub fn similarity_by<T, F>(&self, a: &[T], b: &[T], eq: F) -> f64
    where
        F: Fn(&T, &T) -> bool,
    {
        let distance = self.distance_by(a, b, eq);
        if distance == 0 {
            return 1.0;
        }
        let max_len = a.len().max(b.len());
        (1.0 - distance as f64 / max_len as f64).max(0.0)
    }

    pub fn similarity<T: PartialEq>(&self, a: &[T], b: &[T]) -> f64 {
        self.similarity_by(a, b, |x, y| x == y)
    }

    /// Word-level distance: each token is one element, compared exactly.
    pub fn distance_words<S: AsRef<str>>(&self, a: &[S], b: &[S]) -> usize {
        self.distance_by(a, b, |x, y| x.as_ref() == y.as_ref())
    }

    pub fn similarity_words<S: AsRef<str>>(&self, a: &[S], b: &[S]) -> f64 {
        self.similarity_by(a, b, |x, y| x.as_ref() == y.as_ref())
    }

    /// Character-level distance between two strings.
    pub fn distance_chars(&self, a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        self.distance(&a, &b)
    }

    pub fn similarity_chars(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        self.similarity(&a, &b)
    }
}
