//! File system storage management
//!
//! Category resolution, path sanitizing, per-category file operations,
//! cross-category lookup and asset descriptors. The filesystem is the only
//! source of truth; nothing here caches directory state.

pub mod category;
pub mod filesystem;
pub mod locator;
pub mod manifest;
pub mod operations;
pub mod results;
pub mod validation;

pub use category::{Category, CategoryDir, CategoryIndex, CategoryResolver, DEFAULT_CATEGORY};
pub use locator::CrossCategoryLocator;
pub use manifest::{AssetDescriptor, ManifestBuilder, infer_mime_type};
pub use operations::AssetStore;
pub use results::{Located, StoredFile};
pub use validation::{sanitize_segment, validate_name};
