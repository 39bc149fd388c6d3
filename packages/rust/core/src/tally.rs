//! Counting helpers for grouping denizens by a label.

use std::collections::HashMap;

/// Count occurrences of each label, keeping labels in first-seen order.
pub fn tally<I, S>(labels: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for label in labels {
        let label = label.as_ref();
        match index.get(label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.to_string(), counts.len());
                counts.push((label.to_string(), 1));
            }
        }
    }

    counts
}

/// Order a tally by count, highest first.
///
/// The sort is stable: labels with equal counts stay in first-seen order.
pub fn rank_by_count(mut counts: Vec<(String, usize)>) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
