/// A parsed `llms.txt` manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDocument {
    /// Text of the `# ` heading, empty if the manifest has none
    pub title: String,

    /// Text of the `>` blockquote line
    pub description: Option<String>,

    /// Free text between the description and the first section
    pub details: Option<String>,

    /// Sections in document order
    pub sections: Vec<ManifestSection>,
}

impl ManifestDocument {
    /// Total number of links across all sections
    pub fn link_count(&self) -> usize {
        self.sections.iter().map(|s| s.links.len()).sum()
    }
}

/// A `## ` section of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSection {
    pub title: String,

    /// True when the title is "Optional" in any case
    pub is_optional: bool,

    /// Links in document order
    pub links: Vec<ManifestLink>,
}

impl ManifestSection {
    /// Creates an empty section, deriving the optional flag from the title
    pub fn new(title: &str) -> Self {
        let title = title.trim().to_string();
        let is_optional = title.eq_ignore_ascii_case("optional");
        Self {
            title,
            is_optional,
            links: Vec::new(),
        }
    }
}

/// One `- [title](url): notes` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLink {
    pub title: String,

    /// The URL as written, possibly relative
    pub url: String,

    pub notes: Option<String>,
}
