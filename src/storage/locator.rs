//! Cross-category lookup
//!
//! Finds the directory holding a file name when the caller may not know its
//! category. The root is always searched before any subcategory, so a
//! default-category asset shadows same-named files elsewhere.

use log::debug;

use crate::error::StorageError;
use crate::storage::category::{Category, CategoryIndex, CategoryResolver};
use crate::storage::operations::AssetStore;
use crate::storage::results::Located;
use crate::storage::validation::validate_name;

#[derive(Debug, Clone)]
pub struct CrossCategoryLocator {
    resolver: CategoryResolver,
    index: CategoryIndex,
}

impl CrossCategoryLocator {
    pub fn new(resolver: CategoryResolver, index: CategoryIndex) -> Self {
        Self { resolver, index }
    }

    /// Locate `file_name`, optionally restricted to one category.
    ///
    /// An explicit non-default category is the only candidate. Otherwise the
    /// root is checked first, then every category in index order.
    pub fn locate(
        &self,
        file_name: &str,
        category: Option<&str>,
    ) -> Result<Located, StorageError> {
        let name = validate_name(file_name)?;

        let requested = Category::parse(category)?;
        let candidates = match requested {
            Category::Named(_) => vec![requested],
            Category::Default => {
                let mut all = vec![Category::Default];
                all.extend(self.index.list_categories().into_iter().map(Category::Named));
                all
            }
        };

        for candidate in candidates {
            let store = AssetStore::open(self.resolver.dir_for(candidate));
            if store.contains(&name) {
                let path = store.dir().path().join(&name);
                debug!("Located {} in category {}", name, store.category());
                return Ok(Located {
                    dir: store.dir().clone(),
                    name,
                    path,
                });
            }
        }

        Err(StorageError::NotFound(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn locator(tmp: &TempDir) -> CrossCategoryLocator {
        CrossCategoryLocator::new(
            CategoryResolver::new(tmp.path()),
            CategoryIndex::new(tmp.path()),
        )
    }

    fn write(tmp: &TempDir, rel: &str) {
        let path = tmp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"<svg/>").unwrap();
    }

    #[test]
    fn root_wins_over_subcategory() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "a.svg");
        write(&tmp, "X/a.svg");

        let found = locator(&tmp).locate("a.svg", None).unwrap();
        assert!(found.dir.category().is_default());
        assert_eq!(found.path, tmp.path().join("a.svg"));
    }

    #[test]
    fn falls_back_to_subcategories() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "UI/menu.svg");

        let found = locator(&tmp).locate("menu.svg", Some("default")).unwrap();
        assert_eq!(found.dir.category(), &Category::Named("UI".into()));
    }

    #[test]
    fn explicit_category_does_not_fall_back() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "a.svg");
        fs::create_dir(tmp.path().join("X")).unwrap();

        assert!(matches!(
            locator(&tmp).locate("a.svg", Some("X")),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn explicit_category_hit() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "a.svg");
        write(&tmp, "X/a.svg");

        let found = locator(&tmp).locate("a.svg", Some("X")).unwrap();
        assert_eq!(found.path, tmp.path().join("X").join("a.svg"));
    }

    #[test]
    fn in_flight_uploads_are_not_matches() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "UI/.a.svg.99-0.upload.tmp");

        assert!(matches!(
            locator(&tmp).locate(".a.svg.99-0.upload.tmp", None),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn directories_are_not_matches() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("UI").join("nested.svg")).unwrap();

        assert!(matches!(
            locator(&tmp).locate("nested.svg", None),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn traversal_name_is_sanitized_before_lookup() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "passwd");

        let found = locator(&tmp).locate("../../etc/passwd", None).unwrap();
        assert_eq!(found.name, "passwd");
        assert!(found.path.starts_with(tmp.path()));
    }

    #[test]
    fn empty_name_is_invalid() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            locator(&tmp).locate("/", None),
            Err(StorageError::InvalidName(_))
        ));
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("absent");
        let locator =
            CrossCategoryLocator::new(CategoryResolver::new(&root), CategoryIndex::new(&root));
        assert!(matches!(
            locator.locate("a.svg", None),
            Err(StorageError::NotFound(_))
        ));
    }
}
