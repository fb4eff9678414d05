//! # Announcement thresholds.
//!
//! [`ThresholdTable`] lists the seconds-before-restart at which players are told how
//! long is left. The countdown sleeps from one checkpoint to the next, so the table
//! also decides the wake granularity.
//!
//! ## Rules
//! - Entries are kept strictly descending (the constructor sorts and de-duplicates).
//! - The next checkpoint from `remaining` is the **largest** entry `<= remaining - 1`,
//!   or `0` when there is none. It is always strictly below `remaining`, so a
//!   countdown can never stall on the same checkpoint.
//!
//! ## Example
//! ```rust
//! use rebootvisor::ThresholdTable;
//!
//! let table = ThresholdTable::new([60, 30, 10, 5]);
//! assert_eq!(table.next_below(65), 60);
//! assert_eq!(table.next_below(60), 30);
//! assert_eq!(table.next_below(5), 0);
//! ```

/// Descending list of announcement checkpoints, in seconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThresholdTable {
    marks: Vec<u64>,
}

impl ThresholdTable {
    /// Builds a table from checkpoints in any order.
    pub fn new(marks: impl IntoIterator<Item = u64>) -> Self {
        let mut marks: Vec<u64> = marks.into_iter().collect();
        marks.sort_unstable_by(|a, b| b.cmp(a));
        marks.dedup();
        Self { marks }
    }

    /// Checkpoint that follows `remaining`.
    ///
    /// Returns `0` for `remaining <= 1` and whenever no entry fits.
    pub fn next_below(&self, remaining: u64) -> u64 {
        let Some(ceiling) = remaining.checked_sub(1) else {
            return 0;
        };
        self.marks
            .iter()
            .copied()
            .find(|&m| m <= ceiling)
            .unwrap_or(0)
    }

    /// Checkpoints, largest first.
    pub fn as_slice(&self) -> &[u64] {
        &self.marks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }
}

impl From<Vec<u64>> for ThresholdTable {
    fn from(marks: Vec<u64>) -> Self {
        Self::new(marks)
    }
}
