//! Per-task completion statistics.
//!
//! Pure aggregation over a task's marks; nothing is stored. Counts are taken
//! relative to a reference day (normally the day being viewed).

use super::completion::CompletionMark;
use super::day::Day;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    /// Every mark of the task.
    pub total: usize,
    /// Marks in the reference day's year.
    pub this_year: usize,
    /// Marks in the reference day's year and month.
    pub this_month: usize,
}

impl CompletionStats {
    pub fn from_marks(marks: &[CompletionMark], reference: Day) -> Self {
        marks.iter().fold(Self::default(), |mut stats, mark| {
            stats.total += 1;
            if mark.date.same_year(reference) {
                stats.this_year += 1;
                if mark.date.same_month(reference) {
                    stats.this_month += 1;
                }
            }
            stats
        })
    }
}
