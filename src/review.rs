use std::fmt::Write as _;

use crate::models::Row;

/// Picks out rows whose confidence is too low to trust without a human pass
///
/// Rows with no confidence at all (error rows) are always reviewable.
#[derive(Debug, Clone)]
pub struct ReviewReporter {
    threshold: f64,
}

impl Default for ReviewReporter {
    fn default() -> Self {
        Self { threshold: 0.75 }
    }
}

impl ReviewReporter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn segments_to_review<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        rows.iter()
            .filter(|row| row.confidence_mean.is_none_or(|mean| mean < self.threshold))
            .collect()
    }

    /// Render the review report, grouping consecutive row ids into ranges
    pub fn report(&self, rows: &[Row]) -> String {
        let flagged = self.segments_to_review(rows);
        if flagged.is_empty() {
            return "No low-confidence segments found that require review.\n".to_string();
        }

        let mut out = format!(
            "The following segments have low confidence scores (below {}) and should be reviewed:\n",
            self.threshold
        );
        let ids: Vec<u32> = flagged.iter().map(|row| row.id).collect();
        for (first, last) in group_consecutive(&ids) {
            if first == last {
                let _ = writeln!(out, "  Segment ID: {first}");
            } else {
                let _ = writeln!(out, "  Segment IDs: {first}-{last}");
            }
        }
        out
    }
}

/// Collapse a sorted id list into inclusive (first, last) ranges
fn group_consecutive(ids: &[u32]) -> Vec<(u32, u32)> {
    let mut groups = Vec::new();
    let mut iter = ids.iter().copied();

    let Some(first) = iter.next() else {
        return groups;
    };
    let mut range = (first, first);

    for id in iter {
        if id == range.1 + 1 {
            range.1 = id;
        } else {
            groups.push(range);
            range = (id, id);
        }
    }
    groups.push(range);
    groups
}
