use std::sync::LazyLock;

use regex::Regex;

// A line break followed by one or more blank (or whitespace-only) lines.
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").unwrap());

/// Split raw markdown into paragraph-level blocks on blank-line boundaries.
///
/// Each block is trimmed; blocks that are empty after trimming are dropped.
/// Order is preserved and no identifiers are assigned here.
pub fn split_sections(raw: &str) -> Vec<String> {
    BLANK_RUN_RE
        .split(raw)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Tests ──
