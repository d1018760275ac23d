//! IMS content package manifest.
//!
//! Lists every item document of the package as one `resource` entry.

use std::collections::HashSet;

use qtipack_core::error::{PackageError, Result};

use crate::xml::{Document, Element};

pub const MANIFEST_FILENAME: &str = "imsmanifest.xml";
pub const MANIFEST_IDENTIFIER: &str = "MANIFEST-QTIPACK";
pub const ITEM_RESOURCE_TYPE: &str = "imsqti_item_xmlv2p1";

pub const IMSCP_NAMESPACE: &str = "http://www.imsglobal.org/xsd/imscp_v1p1";
pub const IMSMD_NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsmd_v1p2";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const MANIFEST_SCHEMA_LOCATION: &str = "http://www.imsglobal.org/xsd/imscp_v1p1 http://www.imsglobal.org/xsd/imscp_v1p1.xsd http://www.imsglobal.org/xsd/imsmd_v1p2 http://www.imsglobal.org/xsd/imsmd_v1p2p4.xsd";

/// One `resource` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub resource_id: String,
    pub href: String,
}

/// The package index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

/// Resource identifier for a filename: every non-alphanumeric character becomes `_`.
pub fn resource_id(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Build the manifest for the given item filenames, in order.
///
/// Fails with [`PackageError::DuplicateFile`] if a filename repeats or two
/// filenames map to the same resource identifier.
pub fn build_manifest<I, S>(filenames: I) -> Result<Manifest>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen_files = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut entries = Vec::new();

    for filename in filenames {
        let filename = filename.as_ref();
        let id = resource_id(filename);
        if filename == MANIFEST_FILENAME
            || !seen_files.insert(filename.to_string())
            || !seen_ids.insert(id.clone())
        {
            return Err(PackageError::DuplicateFile {
                filename: filename.to_string(),
            });
        }
        entries.push(ManifestEntry {
            resource_id: id,
            href: filename.to_string(),
        });
    }

    Ok(Manifest { entries })
}

impl Manifest {
    /// Filenames referenced by the manifest, in order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.href.as_str())
    }

    pub fn to_document(&self) -> Document {
        let metadata = Element::new("metadata")
            .child(Element::new("schema").text("QTIv2.1 Package"))
            .child(Element::new("schemaversion").text("1.0.0"));

        let resources = Element::new("resources").children(self.entries.iter().map(|entry| {
            Element::new("resource")
                .attr("identifier", &entry.resource_id)
                .attr("type", ITEM_RESOURCE_TYPE)
                .attr("href", &entry.href)
                .child(Element::new("file").attr("href", &entry.href))
        }));

        Document::new(
            Element::new("manifest")
                .attr("xmlns", IMSCP_NAMESPACE)
                .attr("xmlns:imsmd", IMSMD_NAMESPACE)
                .attr("xmlns:xsi", XSI_NAMESPACE)
                .attr("identifier", MANIFEST_IDENTIFIER)
                .attr("xsi:schemaLocation", MANIFEST_SCHEMA_LOCATION)
                .child(metadata)
                .child(Element::new("organizations"))
                .child(resources),
        )
    }
}
