//! Asset descriptors
//!
//! Builds the client-facing view of a stored file. The url mirrors the
//! on-disk layout under the public mount: `/<mount>/[<category>/]<name>`.

use serde::{Deserialize, Serialize};

use crate::storage::category::Category;
use crate::storage::validation::extension_of;

pub const MIME_SVG: &str = "image/svg+xml";
pub const MIME_PNG: &str = "image/png";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Externally visible representation of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub category: String,
}

/// MIME type implied by a file name's extension. Content is never sniffed.
pub fn infer_mime_type(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("svg") => MIME_SVG,
        Some("png") => MIME_PNG,
        _ => MIME_OCTET_STREAM,
    }
}

#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    mount: String,
}

impl ManifestBuilder {
    /// `mount` is the public prefix the store root is served under.
    pub fn new(mount: &str) -> Self {
        Self {
            mount: mount.trim_end_matches('/').to_string(),
        }
    }

    /// Public prefix without a trailing slash.
    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn public_url(&self, category: &Category, name: &str) -> String {
        let name = urlencoding::encode(name);
        match category {
            Category::Default => format!("{}/{}", self.mount, name),
            Category::Named(category) => {
                format!("{}/{}/{}", self.mount, urlencoding::encode(category), name)
            }
        }
    }

    /// Descriptor for a stored file. An unknown size is reported as 0.
    pub fn to_descriptor(
        &self,
        category: &Category,
        name: &str,
        size: Option<u64>,
    ) -> AssetDescriptor {
        AssetDescriptor {
            name: name.to_string(),
            url: self.public_url(category, name),
            mime_type: infer_mime_type(name).to_string(),
            size: size.unwrap_or(0),
            category: category.as_str().to_string(),
        }
    }

    /// Inverse of [`ManifestBuilder::public_url`]: the (category, name) pair
    /// a url addresses, percent-decoded but not yet sanitized.
    pub fn decode_public_url(&self, url: &str) -> Option<(Option<String>, String)> {
        let rest = url.strip_prefix(&self.mount)?.strip_prefix('/')?;
        let segments: Vec<&str> = rest.split('/').collect();

        let decode = |s: &str| urlencoding::decode(s).ok().map(|d| d.into_owned());
        match segments.as_slice() {
            [name] => Some((None, decode(*name)?)),
            [category, name] => Some((Some(decode(*category)?), decode(*name)?)),
            _ => None,
        }
    }
}
