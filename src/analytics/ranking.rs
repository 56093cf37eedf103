/// Frequency ranking of habit titles
///
/// Titles are grouped by exact, case-sensitive match. The ordered mapping
/// built here plus the stable sort gives a documented tie-break: titles
/// with equal counts keep the order in which they were first recorded.

use serde::Serialize;

use crate::domain::HabitRecord;

/// Maximum number of titles returned
const TOP_N: usize = 3;

/// One entry of the frequency ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHabit {
    pub title: String,
}

/// Rank habit titles by occurrence count, descending, top 3
///
/// An empty record set yields an empty list - for this statistic that is a
/// valid answer, not a "no records" condition.
pub(crate) fn rank_titles(records: &[HabitRecord]) -> Vec<RankedHabit> {
    // Single pass into an ordered title -> count mapping; order of first
    // encounter is preserved and becomes the tie-break below.
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for record in records {
        match counts.iter_mut().find(|(title, _)| *title == record.title) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.title.as_str(), 1)),
        }
    }

    // sort_by is stable: equal counts keep first-encounter order, which is
    // what makes the ranking deterministic.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(TOP_N)
        .map(|(title, _)| RankedHabit {
            title: title.to_string(),
        })
        .collect()
}
