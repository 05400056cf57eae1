use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::store::{DocumentRecord, Section};

/// Merge freshly split blocks into a document's existing sections.
///
/// Identifiers are matched by position: block `i` takes the id of the existing
/// section at `i` if there is one, otherwise a freshly minted `sec{i}` (skipping
/// ids already in use). Content is always the fresh text. Existing sections past
/// the new length are dropped.
///
/// Positional matching does not notice moved paragraphs. Inserting or deleting
/// a block shifts the meaning of every later id.
pub fn reconcile(blocks: Vec<String>, existing: &[Section]) -> Vec<Section> {
    let reused = blocks.len().min(existing.len());
    let taken: HashSet<&str> = existing[..reused].iter().map(|s| s.id.as_str()).collect();
    let mut next = reused + 1;
    let mut minted = Vec::new();

    for _ in reused..blocks.len() {
        let id = loop {
            let candidate = format!("sec{}", next);
            next += 1;
            if !taken.contains(candidate.as_str()) {
                break candidate;
            }
        };
        minted.push(id);
    }

    existing[..reused]
        .iter()
        .map(|s| s.id.clone())
        .chain(minted)
        .zip(blocks)
        .map(|(id, content)| Section { id, content })
        .collect()
}

/// Build the updated record for `filename` from a successful fetch.
pub fn reconcile_record(
    filename: &str,
    blocks: Vec<String>,
    existing: Option<&DocumentRecord>,
    now: DateTime<Utc>,
) -> DocumentRecord {
    let prior: &[Section] = existing.map(|r| r.sections.as_slice()).unwrap_or_default();
    let new_len = blocks.len();
    let sections = reconcile(blocks, prior);

    debug!(
        "{}: {} sections ({} reused, {} minted, {} dropped)",
        filename,
        new_len,
        new_len.min(prior.len()),
        new_len.saturating_sub(prior.len()),
        prior.len().saturating_sub(new_len),
    );

    DocumentRecord {
        filename: filename.to_string(),
        last_updated: now,
        sections,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn blocks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn sections(pairs: &[(&str, &str)]) -> Vec<Section> {
        pairs
            .iter()
            .map(|(id, content)| Section {
                id: id.to_string(),
                content: content.to_string(),
            })
            .collect()
    }

    fn ids(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn new_document_gets_sequential_ids() {
        let out = reconcile(blocks(&["a", "b", "c", "d"]), &[]);
        assert_eq!(ids(&out), vec!["sec1", "sec2", "sec3", "sec4"]);
        assert_eq!(out[3].content, "d");
    }

    #[test]
    fn idempotent_on_unchanged_content() {
        let first = reconcile(blocks(&["a", "b", "c"]), &[]);
        let second = reconcile(blocks(&["a", "b", "c"]), &first);
        assert_eq!(first, second);
    }

    #[test]
    fn changed_text_keeps_ids() {
        let prior = sections(&[("x1", "old a"), ("x2", "old b"), ("x3", "old c")]);
        let out = reconcile(blocks(&["new a", "new b", "new c"]), &prior);
        assert_eq!(ids(&out), vec!["x1", "x2", "x3"]);
        assert_eq!(out[1].content, "new b");
    }

    #[test]
    fn shrinkage_drops_trailing_sections() {
        let prior = sections(&[("s1", "1"), ("s2", "2"), ("s3", "3"), ("s4", "4"), ("s5", "5")]);
        let out = reconcile(blocks(&["one", "two"]), &prior);
        assert_eq!(ids(&out), vec!["s1", "s2"]);
        assert_eq!(out[0].content, "one");
    }

    #[test]
    fn growth_mints_new_ids() {
        let prior = sections(&[("s1", "1"), ("s2", "2")]);
        let out = reconcile(blocks(&["1", "2", "3", "4"]), &prior);
        assert_eq!(ids(&out), vec!["s1", "s2", "sec3", "sec4"]);
        assert_eq!(out[3].content, "4");
    }

    #[test]
    fn minted_ids_skip_reused_ones() {
        let prior = sections(&[("sec4", "a"), ("sec3", "b")]);
        let out = reconcile(blocks(&["a", "b", "c", "d", "e"]), &prior);
        assert_eq!(ids(&out), vec!["sec4", "sec3", "sec5", "sec6", "sec7"]);
        let unique: HashSet<_> = ids(&out).into_iter().collect();
        assert_eq!(unique.len(), out.len());
    }

    #[test]
    fn empty_fetch_empties_record() {
        let prior = sections(&[("sec1", "a")]);
        assert!(reconcile(Vec::new(), &prior).is_empty());
    }

    #[test]
    fn record_gets_run_timestamp() {
        let then = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        let prior = DocumentRecord {
            filename: "ai.md".into(),
            last_updated: then,
            sections: sections(&[("sec1", "old")]),
        };
        let rec = reconcile_record("ai.md", blocks(&["new", "more"]), Some(&prior), now);
        assert_eq!(rec.filename, "ai.md");
        assert_eq!(rec.last_updated, now);
        assert_eq!(ids(&rec.sections), vec!["sec1", "sec2"]);
    }
}
