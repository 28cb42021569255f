//! Package descriptor (`.nuspec`) parsing.
//!
//! Only the `<metadata>` block is read. Elements are matched by local name so
//! any schema namespace version is accepted.

use std::path::Path;

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::local_files::FileSystem;

/// Metadata elements this tool refuses to pack.
pub const UNSUPPORTED_ELEMENTS: &[&str] = &[
    "packageTypes",
    "repository",
    "readme",
    "icon",
    "frameworkReferences",
    "serviceable",
];

/// Inline `<license type="...">value</license>` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseMetadata {
    pub kind: String,
    pub value: String,
}

/// Parsed view of a descriptor's metadata. Blank elements read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataDocument {
    pub id: Option<String>,
    pub version: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub owners: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub project_url: Option<String>,
    pub license_url: Option<String>,
    pub icon_url: Option<String>,
    pub docs_url: Option<String>,
    pub bug_tracker_url: Option<String>,
    pub package_source_url: Option<String>,
    pub project_source_url: Option<String>,
    pub tags: Option<String>,
    pub release_notes: Option<String>,
    pub copyright: Option<String>,
    pub require_license_acceptance: bool,
    pub license: Option<LicenseMetadata>,
    /// Names from `UNSUPPORTED_ELEMENTS` present in the document, in document order.
    pub unsupported_elements: Vec<String>,
}

impl MetadataDocument {
    /// URL-valued elements with their element names, in a fixed order.
    pub fn urls(&self) -> Vec<(&'static str, &str)> {
        [
            ("projectUrl", &self.project_url),
            ("licenseUrl", &self.license_url),
            ("iconUrl", &self.icon_url),
            ("docsUrl", &self.docs_url),
            ("bugTrackerUrl", &self.bug_tracker_url),
            ("packageSourceUrl", &self.package_source_url),
            ("projectSourceUrl", &self.project_source_url),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

/// Read and parse a descriptor file.
pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<MetadataDocument> {
    let content = fs.read(path)?;
    parse(&content, &path.display().to_string())
}

pub fn parse(text: &str, origin: &str) -> Result<MetadataDocument> {
    let doc = Document::parse(text).map_err(|e| Error::descriptor_invalid(origin, e.to_string()))?;

    let root = doc.root_element();
    if root.tag_name().name() != "package" {
        return Err(Error::descriptor_invalid(
            origin,
            format!("expected <package> root element, found <{}>", root.tag_name().name()),
        ));
    }

    let metadata = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "metadata")
        .ok_or_else(|| Error::descriptor_invalid(origin, "missing <metadata> element"))?;

    let mut document = MetadataDocument::default();

    for node in metadata.children().filter(Node::is_element) {
        let name = node.tag_name().name();
        let slot = match name {
            "id" => &mut document.id,
            "version" => &mut document.version,
            "title" => &mut document.title,
            "authors" => &mut document.authors,
            "owners" => &mut document.owners,
            "description" => &mut document.description,
            "summary" => &mut document.summary,
            "projectUrl" => &mut document.project_url,
            "licenseUrl" => &mut document.license_url,
            "iconUrl" => &mut document.icon_url,
            "docsUrl" => &mut document.docs_url,
            "bugTrackerUrl" => &mut document.bug_tracker_url,
            "packageSourceUrl" => &mut document.package_source_url,
            "projectSourceUrl" => &mut document.project_source_url,
            "tags" => &mut document.tags,
            "releaseNotes" => &mut document.release_notes,
            "copyright" => &mut document.copyright,
            "requireLicenseAcceptance" => {
                document.require_license_acceptance =
                    element_text(node).is_some_and(|v| v.eq_ignore_ascii_case("true"));
                continue;
            }
            "license" => {
                document.license = Some(LicenseMetadata {
                    kind: node.attribute("type").unwrap_or_default().to_string(),
                    value: element_text(node).unwrap_or_default(),
                });
                continue;
            }
            other => {
                if UNSUPPORTED_ELEMENTS.contains(&other) {
                    document.unsupported_elements.push(other.to_string());
                }
                continue;
            }
        };
        *slot = element_text(node);
    }

    Ok(document)
}

fn element_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let trimmed = text.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
