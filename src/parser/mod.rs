pub mod reconcile;
pub mod sections;

use chrono::{DateTime, Utc};

use crate::store::DocumentRecord;

/// Two-pass pipeline: markdown → blocks → record with positional ids.
pub fn process_document(
    filename: &str,
    markdown: &str,
    existing: Option<&DocumentRecord>,
    now: DateTime<Utc>,
) -> DocumentRecord {
    let blocks = sections::split_sections(markdown);
    reconcile::reconcile_record(filename, blocks, existing, now)
}
