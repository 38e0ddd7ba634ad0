//! File categories and extension filtering.
//!
//! Every category owns a fixed, ordered list of lowercase extensions
//! (including the leading dot). Extensions are disjoint across categories;
//! [`Category::ALL`] fixes the iteration order used by [`classify`] should that
//! ever be violated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Semantic category assigned to a file by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Images,
    Videos,
    Audio,
    Documents,
    Other,
    WhatsappBackup,
}

impl Category {
    /// Fixed iteration order for classification and summaries.
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Videos,
        Category::Audio,
        Category::Documents,
        Category::Other,
        Category::WhatsappBackup,
    ];

    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Category::Images => &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".heic"],
            Category::Videos => &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".3gp"],
            Category::Audio => &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".m4a", ".wma"],
            Category::Documents => &[
                ".pdf", ".doc", ".docx", ".txt", ".xls", ".xlsx", ".ppt", ".pptx",
            ],
            Category::Other => &[".zip", ".rar", ".apk", ".json", ".xml"],
            Category::WhatsappBackup => &[".db", ".crypt12", ".crypt14", ".crypt15", ".key"],
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Videos => "videos",
            Category::Audio => "audio",
            Category::Documents => "documents",
            Category::Other => "other",
            Category::WhatsappBackup => "whatsapp_backup",
        }
    }

    /// Resolve a user-supplied category label. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "images" | "image" => Some(Category::Images),
            "videos" | "video" => Some(Category::Videos),
            "audio" => Some(Category::Audio),
            "documents" | "document" => Some(Category::Documents),
            "other" => Some(Category::Other),
            "whatsapp_backup" | "whatsapp-backup" | "whatsapp" => Some(Category::WhatsappBackup),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Ordered, duplicate-free set of active extensions used by the walker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionFilter {
    extensions: Vec<&'static str>,
}

impl ExtensionFilter {
    /// Filter accepting every configured extension.
    #[must_use]
    pub fn all() -> Self {
        Self::from_categories(Category::ALL)
    }

    #[must_use]
    pub fn from_categories<I: IntoIterator<Item = Category>>(categories: I) -> Self {
        let mut seen = BTreeSet::new();
        let mut extensions = Vec::new();
        for category in categories {
            for ext in category.extensions() {
                if seen.insert(*ext) {
                    extensions.push(*ext);
                }
            }
        }
        Self { extensions }
    }

    /// Return the active extension the (case-insensitive) name ends with.
    #[must_use]
    pub fn matching_extension(&self, name: &str) -> Option<&'static str> {
        let lowered = name.to_lowercase();
        self.extensions
            .iter()
            .copied()
            .find(|ext| lowered.ends_with(ext))
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.matching_extension(name).is_some()
    }

    #[must_use]
    pub fn contains(&self, extension: &str) -> bool {
        let lowered = extension.to_lowercase();
        self.extensions.iter().any(|ext| *ext == lowered)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extensions.iter().copied()
    }
}

/// Build the extension filter for the selected category labels.
///
/// An empty selection means every category. Unknown labels are skipped
/// without error, so a selection made only of unknown labels yields an
/// empty filter that matches nothing.
#[must_use]
pub fn category_extensions<S: AsRef<str>>(selected: &[S]) -> ExtensionFilter {
    if selected.is_empty() {
        return ExtensionFilter::all();
    }

    let categories = selected.iter().filter_map(|label| {
        let category = Category::from_label(label.as_ref());
        if category.is_none() {
            log::debug!("Ignoring unknown category '{}'", label.as_ref());
        }
        category
    });

    ExtensionFilter::from_categories(categories)
}

/// Classify a file name into the first category (in [`Category::ALL`] order)
/// whose extension list contains a suffix of the lower-cased name.
#[must_use]
pub fn classify(name: &str) -> Option<Category> {
    let lowered = name.to_lowercase();
    Category::ALL.into_iter().find(|category| {
        category
            .extensions()
            .iter()
            .any(|ext| lowered.ends_with(ext))
    })
}
