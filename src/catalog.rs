use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/fmhy/edit/refs/heads/main/docs/";

/// The tracked FMHY docs, in processing order.
pub const DEFAULT_DOCUMENTS: &[&str] = &[
    "adblockvpnguide.md",
    "ai.md",
    "android-iosguide.md",
    "audiopiracyguide.md",
    "beginners-guide.md",
    "devtools.md",
    "downloadpiracyguide.md",
    "edupiracyguide.md",
    "feedback.md",
    "file-tools.md",
    "gaming-tools.md",
    "gamingpiracyguide.md",
    "img-tools.md",
    "index.md",
    "internet-tools.md",
    "linuxguide.md",
    "miscguide.md",
    "non-english.md",
    "posts.md",
    "readingpiracyguide.md",
    "sandbox.md",
    "social-media-tools.md",
    "startpage.md",
    "storage.md",
    "system-tools.md",
    "text-tools.md",
    "torrentpiracyguide.md",
    "unsafesites.md",
    "video-tools.md",
    "videopiracyguide.md",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMeta {
    pub filename: String,
    pub category: String,
    pub raw_url: String,
}

/// `social-media-tools.md` → `social media tools`
pub fn category(filename: &str) -> String {
    filename.replace(".md", "").replace('-', " ")
}

pub fn raw_url(base_url: &str, filename: &str) -> String {
    format!("{}{}", base_url, filename)
}

pub fn catalog(documents: &[String], base_url: &str) -> Vec<DocumentMeta> {
    documents
        .iter()
        .map(|filename| DocumentMeta {
            filename: filename.clone(),
            category: category(filename),
            raw_url: raw_url(base_url, filename),
        })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert_eq!(category("social-media-tools.md"), "social media tools");
        assert_eq!(category("ai.md"), "ai");
        assert_eq!(category("android-iosguide.md"), "android iosguide");
    }

    #[test]
    fn catalog_preserves_order() {
        let docs = vec!["index.md".to_string(), "file-tools.md".to_string()];
        let meta = catalog(&docs, DEFAULT_BASE_URL);
        assert_eq!(meta.len(), 2);
        assert_eq!(meta[0].filename, "index.md");
        assert_eq!(
            meta[1].raw_url,
            "https://raw.githubusercontent.com/fmhy/edit/refs/heads/main/docs/file-tools.md"
        );
        assert_eq!(meta[1].category, "file tools");
    }

    #[test]
    fn default_list() {
        assert_eq!(DEFAULT_DOCUMENTS.len(), 30);
        assert!(DEFAULT_DOCUMENTS.iter().all(|d| d.ends_with(".md")));
    }
}
