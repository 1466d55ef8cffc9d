use crate::model::MediaRecord;

/// Returns the records whose title contains `query`, ignoring case, in their
/// original order. An empty query keeps every record.
pub fn filter(records: &[MediaRecord], query: &str) -> Vec<MediaRecord> {
    if query.is_empty() {
        return records.to_vec();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
