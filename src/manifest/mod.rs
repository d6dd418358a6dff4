//! Manifest module for `llms.txt` documents
//!
//! An `llms.txt` manifest is a small Markdown document that lists a site's
//! documentation pages by section:
//!
//! ```text
//! # Project
//! > One line description
//!
//! Free text details.
//!
//! ## Docs
//! - [Guide](https://docs.example/guide.md): Getting started
//!
//! ## Optional
//! - [Changelog](https://docs.example/changelog.md)
//! ```
//!
//! # Example
//!
//! ```
//! use docsmith::manifest::parse_manifest;
//!
//! let doc = parse_manifest("# Project\n## Docs\n- [Guide](/guide.md)\n");
//! assert_eq!(doc.title, "Project");
//! assert_eq!(doc.sections[0].links[0].url, "/guide.md");
//! ```

mod parser;
mod types;

pub use parser::parse_manifest;
pub use types::{ManifestDocument, ManifestLink, ManifestSection};
