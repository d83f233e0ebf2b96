// Pickup Tracker - core/dedupe.rs
//
// Collapses records sharing a reference. A later record replaces the earlier
// one in place: the position comes from the first occurrence, the content
// from the last.

use crate::core::model::Record;
use std::collections::HashMap;

/// Deduplicate by `reference`, returning the records and the number of
/// duplicates collapsed.
pub fn dedupe(records: Vec<Record>) -> (Vec<Record>, usize) {
    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut collapsed = 0;

    for record in records {
        match positions.get(&record.reference) {
            Some(&idx) => {
                out[idx] = record;
                collapsed += 1;
            }
            None => {
                positions.insert(record.reference.clone(), out.len());
                out.push(record);
            }
        }
    }

    if collapsed > 0 {
        tracing::debug!(collapsed, kept = out.len(), "Duplicate references collapsed");
    }
    (out, collapsed)
}
