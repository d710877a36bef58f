//! Asset operations
//!
//! The list, upload, delete and fetch operations exposed to the HTTP layer.
//! Every call re-reads the filesystem.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::assets::results::{
    DeleteOutcome, FetchedAsset, Rejection, UploadItem, UploadReport,
};
use crate::config::{ServerConfig, UploadLimits};
use crate::error::{StorageError, UploadError};
use crate::storage::manifest::infer_mime_type;
use crate::storage::validation::{extension_of, sanitize_segment};
use crate::storage::{
    AssetDescriptor, AssetStore, Category, CategoryIndex, CategoryResolver, CrossCategoryLocator,
    ManifestBuilder,
};

/// Category-partitioned icon store rooted at one directory.
#[derive(Debug, Clone)]
pub struct IconStore {
    resolver: CategoryResolver,
    index: CategoryIndex,
    locator: CrossCategoryLocator,
    manifest: ManifestBuilder,
    limits: UploadLimits,
}

impl IconStore {
    pub fn new(root: impl Into<PathBuf>, public_mount: &str, limits: UploadLimits) -> Self {
        let root = root.into();
        let resolver = CategoryResolver::new(&root);
        let index = CategoryIndex::new(&root);
        Self {
            locator: CrossCategoryLocator::new(resolver.clone(), index.clone()),
            resolver,
            index,
            manifest: ManifestBuilder::new(public_mount),
            limits,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.startup.storage_root_path(),
            &config.startup.public_mount,
            config.limits.clone(),
        )
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn resolver(&self) -> &CategoryResolver {
        &self.resolver
    }

    pub fn manifest(&self) -> &ManifestBuilder {
        &self.manifest
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Create the store root if needed.
    pub fn ensure_root(&self) -> Result<(), StorageError> {
        self.resolver.ensure_root()
    }

    /// Descriptors for one category, or for everything when no category (or
    /// `default`) is given: root assets first, then each category in index
    /// order. An unusable category name lists as empty.
    pub fn list(&self, category: Option<&str>) -> Result<Vec<AssetDescriptor>, StorageError> {
        let category = match Category::parse(category) {
            Ok(category) => category,
            Err(e) => {
                warn!("Listing unusable category: {e}");
                return Ok(Vec::new());
            }
        };

        let categories = match category {
            Category::Named(_) => vec![category],
            Category::Default => {
                let mut all = vec![Category::Default];
                all.extend(self.index.list_categories().into_iter().map(Category::Named));
                all
            }
        };

        let mut out = Vec::new();
        for category in categories {
            let store = AssetStore::open(self.resolver.dir_for(category));
            for file in store.list()? {
                out.push(
                    self.manifest
                        .to_descriptor(store.category(), &file.name, file.size),
                );
            }
        }
        Ok(out)
    }

    /// Store a batch of files under one category.
    ///
    /// Policy violations reject single items and never stop the batch. An
    /// I/O failure aborts the remainder and is returned as-is.
    pub fn upload(
        &self,
        category: Option<&str>,
        items: Vec<UploadItem>,
    ) -> Result<UploadReport, StorageError> {
        let store = AssetStore::open(self.resolver.resolve(category)?);

        let mut report = UploadReport::default();
        for (position, item) in items.into_iter().enumerate() {
            let name = match self.check_item(position, &item) {
                Ok(name) => name,
                Err(err) => {
                    warn!("Rejected upload {:?}: {}", item.file_name, err);
                    report.rejected.push(Rejection::new(&item.file_name, &err));
                    continue;
                }
            };

            let size = store.put(&name, &item.bytes)?;
            report
                .files
                .push(self.manifest.to_descriptor(store.category(), &name, Some(size)));
        }

        info!(
            "Upload to category {}: {} stored, {} rejected",
            store.category(),
            report.files.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    /// Validate one upload item against the batch limits and type policy,
    /// returning its sanitized name. Nothing is written here.
    ///
    /// An allowed extension is enough; the declared MIME type is only
    /// consulted when the name has no extension.
    pub fn check_item(&self, position: usize, item: &UploadItem) -> Result<String, UploadError> {
        if position >= self.limits.max_files_per_upload {
            return Err(UploadError::CountExceeded {
                name: item.file_name.clone(),
                limit: self.limits.max_files_per_upload,
            });
        }

        let name = sanitize_segment(&item.file_name);
        if name.is_empty() {
            return Err(UploadError::InvalidName(item.file_name.clone()));
        }

        // The extension decides. A declared type only counts for names
        // without one.
        let type_ok = match extension_of(&name) {
            Some(ext) => self.limits.is_extension_allowed(&ext),
            None => item
                .content_type
                .as_deref()
                .is_some_and(|mime| self.limits.is_mime_allowed(mime)),
        };
        if !type_ok {
            return Err(UploadError::TypeNotAllowed { name });
        }

        let limit = self.limits.max_file_size_bytes();
        if item.size > limit {
            return Err(UploadError::SizeExceeded {
                name,
                size: item.size,
                limit,
            });
        }

        Ok(name)
    }

    /// Delete a file, searching every category when none is given.
    pub fn delete(
        &self,
        file_name: &str,
        category: Option<&str>,
    ) -> Result<DeleteOutcome, StorageError> {
        let located = self.locator.locate(file_name, category)?;
        let store = AssetStore::open(located.dir);
        store.delete(&located.name)?;

        Ok(DeleteOutcome {
            ok: true,
            deleted_name: located.name,
            category_found: store.category().as_str().to_string(),
        })
    }

    /// Read a file's content, located the same way as [`IconStore::delete`].
    pub fn fetch(
        &self,
        file_name: &str,
        category: Option<&str>,
    ) -> Result<FetchedAsset, StorageError> {
        let located = self.locator.locate(file_name, category)?;
        let store = AssetStore::open(located.dir);
        let bytes = store.get(&located.name)?;

        Ok(FetchedAsset {
            mime_type: infer_mime_type(&located.name),
            category: store.category().as_str().to_string(),
            name: located.name,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn icon_store(tmp: &TempDir) -> IconStore {
        IconStore::new(tmp.path(), "/uploads", UploadLimits::default())
    }

    fn svg(name: &str, body: &str) -> UploadItem {
        UploadItem::new(name, Some("image/svg+xml".into()), body.as_bytes().to_vec())
    }

    #[test]
    fn upload_then_list_includes_file_with_size() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);

        let report = store
            .upload(Some("UI"), vec![svg("home.svg", "<svg></svg>")])
            .unwrap();
        assert_eq!(report.files.len(), 1);
        assert!(report.rejected.is_empty());

        let listed = store.list(Some("UI")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "home.svg");
        assert_eq!(listed[0].size, 11);
        assert_eq!(listed[0].url, "/uploads/UI/home.svg");
        assert_eq!(listed[0].category, "UI");
    }

    #[test]
    fn default_and_omitted_category_are_the_same() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        store
            .upload(Some("default"), vec![svg("root.svg", "<svg/>")])
            .unwrap();

        let listed = store.list(None).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "default");
        assert_eq!(listed[0].url, "/uploads/root.svg");
        assert!(tmp.path().join("root.svg").is_file());
    }

    #[test]
    fn listing_everything_puts_root_first() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        store.upload(Some("UI"), vec![svg("b.svg", "b")]).unwrap();
        store.upload(None, vec![svg("a.svg", "a")]).unwrap();

        let listed = store.list(Some("default")).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].category, "default");
        assert_eq!(listed[1].category, "UI");
    }

    #[test]
    fn listing_missing_or_invalid_category_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        assert!(store.list(Some("Nope")).unwrap().is_empty());
        assert!(store.list(Some("..")).unwrap().is_empty());
    }

    #[test]
    fn rejected_items_do_not_block_the_batch() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);

        let report = store
            .upload(
                Some("Apps"),
                vec![
                    UploadItem::new("tool.exe", None, b"MZ".to_vec()),
                    svg("ok.svg", "<svg/>"),
                    UploadItem::new("..", None, b"x".to_vec()),
                ],
            )
            .unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].name, "ok.svg");
        assert_eq!(
            report.rejected,
            vec![
                Rejection {
                    name: "tool.exe".into(),
                    kind: ErrorKind::TypeNotAllowed
                },
                Rejection {
                    name: "..".into(),
                    kind: ErrorKind::InvalidName
                },
            ]
        );
        assert_eq!(report.batch_failure(), None);

        let names: Vec<String> = store.list(None).unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["ok.svg".to_string()]);
    }

    #[test]
    fn allowed_extension_wins_over_declared_type() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);

        let item = UploadItem::new("logo.svg", Some("text/xml".into()), b"<svg/>".to_vec());
        assert_eq!(store.check_item(0, &item).unwrap(), "logo.svg");

        let item = UploadItem::new("real.png", Some("application/octet-stream".into()), vec![1]);
        assert_eq!(store.check_item(0, &item).unwrap(), "real.png");

        let item = UploadItem::new(".svg", Some("image/svg+xml".into()), b"<svg/>".to_vec());
        assert_eq!(store.check_item(0, &item).unwrap(), ".svg");
    }

    #[test]
    fn declared_type_cannot_rescue_a_disallowed_extension() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);

        let item = UploadItem::new("evil.exe", Some("image/png".into()), b"MZ".to_vec());
        assert!(matches!(
            store.check_item(0, &item),
            Err(UploadError::TypeNotAllowed { .. })
        ));
    }

    #[test]
    fn extensionless_name_is_judged_by_declared_type() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);

        let item = UploadItem::new("icon", Some("image/svg+xml".into()), b"<svg/>".to_vec());
        assert_eq!(store.check_item(0, &item).unwrap(), "icon");

        for declared in [None, Some("application/octet-stream".to_string())] {
            let item = UploadItem::new("icon", declared, b"<svg/>".to_vec());
            assert!(matches!(
                store.check_item(0, &item),
                Err(UploadError::TypeNotAllowed { .. })
            ));
        }
    }

    #[test]
    fn fully_rejected_batch_reports_first_rejection() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);

        let report = store
            .upload(
                Some("Apps"),
                vec![
                    UploadItem::new("setup.exe", None, b"MZ".to_vec()),
                    UploadItem::new("..", None, b"x".to_vec()),
                ],
            )
            .unwrap();
        assert!(report.files.is_empty());
        assert_eq!(report.batch_failure(), Some(ErrorKind::TypeNotAllowed));
        assert!(!tmp.path().join("Apps").exists());
    }

    #[test]
    fn size_and_count_limits_are_per_item() {
        let tmp = TempDir::new().unwrap();
        let limits = UploadLimits {
            max_file_size_mb: 1,
            max_files_per_upload: 2,
            ..UploadLimits::default()
        };
        let store = IconStore::new(tmp.path(), "/uploads", limits);

        let report = store
            .upload(
                None,
                vec![
                    UploadItem::skipped("huge.png", None, 2 * 1024 * 1024),
                    svg("one.svg", "1"),
                    svg("two.svg", "2"),
                ],
            )
            .unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].name, "one.svg");
        assert_eq!(report.rejected[0].kind, ErrorKind::SizeExceeded);
        assert_eq!(report.rejected[1].kind, ErrorKind::CountExceeded);
    }

    #[test]
    fn upload_sanitizes_names() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        let report = store
            .upload(Some("../UI"), vec![svg("../../etc/evil.svg", "x")])
            .unwrap();

        assert_eq!(report.files[0].name, "evil.svg");
        assert!(tmp.path().join("UI").join("evil.svg").is_file());
    }

    #[test]
    fn delete_without_category_prefers_root() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        store.upload(None, vec![svg("a.svg", "root")]).unwrap();
        store.upload(Some("X"), vec![svg("a.svg", "x")]).unwrap();

        let outcome = store.delete("a.svg", None).unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome {
                ok: true,
                deleted_name: "a.svg".into(),
                category_found: "default".into(),
            }
        );
        assert!(!tmp.path().join("a.svg").exists());
        assert!(tmp.path().join("X").join("a.svg").is_file());
    }

    #[test]
    fn delete_falls_back_to_category() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        store.upload(Some("Social"), vec![svg("s.svg", "s")]).unwrap();

        let outcome = store.delete("s.svg", None).unwrap();
        assert_eq!(outcome.category_found, "Social");
        assert!(store.list(Some("Social")).unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        store.upload(Some("UI"), vec![svg("keep.svg", "k")]).unwrap();

        assert!(matches!(
            store.delete("never.svg", None),
            Err(StorageError::NotFound(_))
        ));
        assert_eq!(store.list(None).unwrap().len(), 1);
    }

    #[test]
    fn fetch_returns_bytes_and_type() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        store.upload(Some("UI"), vec![svg("p.svg", "<svg/>")]).unwrap();

        let fetched = store.fetch("p.svg", None).unwrap();
        assert_eq!(fetched.bytes, b"<svg/>");
        assert_eq!(fetched.mime_type, "image/svg+xml");
        assert_eq!(fetched.category, "UI");
    }

    #[test]
    fn descriptor_url_round_trips_to_the_same_file() {
        let tmp = TempDir::new().unwrap();
        let store = icon_store(&tmp);
        let report = store
            .upload(Some("My Set"), vec![svg("a b&c.svg", "<svg>rt</svg>")])
            .unwrap();
        let url = &report.files[0].url;

        let (category, name) = store.manifest().decode_public_url(url).unwrap();
        let dir = store.resolver().resolve(category.as_deref()).unwrap();
        let bytes = AssetStore::open(dir).get(&name).unwrap();
        assert_eq!(bytes, b"<svg>rt</svg>");
        assert_eq!(
            fs::read(tmp.path().join("My Set").join("a b&c.svg")).unwrap(),
            bytes
        );
    }
}
