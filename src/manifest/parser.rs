use crate::manifest::types::{ManifestDocument, ManifestLink, ManifestSection};

/// Parses the text of an `llms.txt` manifest
///
/// # Grammar
///
/// The parser makes a single pass over the lines of the input:
///
/// | Line | Effect |
/// |------|--------|
/// | `# Title` | sets the document title (a later one replaces an earlier one) |
/// | `> text` | sets the description and starts collecting details |
/// | `## Name` | ends details, closes the open section, opens a new one |
/// | `- [t](u): n` or `* [t](u)` | adds a link to the open section |
///
/// While details are being collected every line other than a heading is kept,
/// blank lines included. List lines that do not match the link pattern, and
/// list lines seen before any section, are dropped. Parsing never fails.
///
/// # Example
///
/// ```
/// use docsmith::manifest::parse_manifest;
///
/// let text = "# Docs\n> Short\n\nLonger text.\n## Guides\n- [Intro](/intro.md): Start here\n";
/// let doc = parse_manifest(text);
/// assert_eq!(doc.description.as_deref(), Some("Short"));
/// assert_eq!(doc.details.as_deref(), Some("Longer text."));
/// assert_eq!(doc.sections[0].links[0].notes.as_deref(), Some("Start here"));
/// ```
pub fn parse_manifest(text: &str) -> ManifestDocument {
    let mut doc = ManifestDocument::default();
    let mut current: Option<ManifestSection> = None;
    let mut details: Option<Vec<&str>> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(heading) = trimmed.strip_prefix("## ") {
            flush_details(&mut doc, &mut details);
            if let Some(section) = current.take() {
                doc.sections.push(section);
            }
            current = Some(ManifestSection::new(heading));
        } else if let Some(title) = trimmed.strip_prefix("# ") {
            doc.title = title.trim().to_string();
        } else if let Some(lines) = details.as_mut() {
            lines.push(line.trim_end());
        } else if let Some(description) = trimmed.strip_prefix('>') {
            doc.description = Some(description.trim().to_string());
            details = Some(Vec::new());
        } else if trimmed.starts_with('-') || trimmed.starts_with('*') {
            match current.as_mut() {
                Some(section) => {
                    if let Some(link) = parse_link_line(trimmed) {
                        section.links.push(link);
                    } else {
                        tracing::trace!("Dropping malformed manifest entry: {}", trimmed);
                    }
                }
                None => tracing::trace!("Dropping manifest entry outside a section: {}", trimmed),
            }
        }
    }

    flush_details(&mut doc, &mut details);
    if let Some(section) = current.take() {
        doc.sections.push(section);
    }

    doc
}

/// Joins collected detail lines into the document, if any were collected
fn flush_details(doc: &mut ManifestDocument, details: &mut Option<Vec<&str>>) {
    if let Some(lines) = details.take() {
        let joined = lines.join("\n");
        let joined = joined.trim();
        if !joined.is_empty() {
            doc.details = Some(joined.to_string());
        }
    }
}

/// Parses a list line of the form `- [title](url)` with an optional `: notes` suffix
fn parse_link_line(line: &str) -> Option<ManifestLink> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))?
        .trim_start();

    let rest = rest.strip_prefix('[')?;
    let title_end = rest.find(']')?;
    let title = rest[..title_end].trim();

    let rest = rest[title_end + 1..].strip_prefix('(')?;
    let url_end = rest.find(')')?;
    let url = rest[..url_end].trim();

    if title.is_empty() || url.is_empty() {
        return None;
    }

    let notes = rest[url_end + 1..]
        .trim_start()
        .strip_prefix(':')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Some(ManifestLink {
        title: title.to_string(),
        url: url.to_string(),
        notes,
    })
}
