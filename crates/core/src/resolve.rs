//! Remote object kind resolution
//!
//! Object stores have no native directory concept: a "directory" is any
//! prefix with at least one object beneath it, a "file" is an exact key
//! match. Pull classifies each argument's remote prefix with two cheap
//! page-size-1 listing probes before any data moves.

use crate::error::Result;
use crate::traits::{DatasetRef, DatasetStore, ListOptions};

/// Classification of a remote prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// At least one object shares the prefix
    Directory,
    /// Exactly one object whose key is the prefix verbatim
    File,
    /// Neither
    NotFound,
}

/// Probes are existence checks, not real listings
const PROBE_PAGE_SIZE: i32 = 1;

/// Classify one remote prefix.
///
/// The empty prefix is the dataset root and is always a directory; no
/// remote call is made for it. Otherwise the prefix is probed first in
/// directory form (trailing separator) and then as an exact key.
pub async fn resolve_kind(
    store: &dyn DatasetStore,
    dataset: &DatasetRef,
    prefix: &str,
) -> Result<ObjectKind> {
    if prefix.is_empty() {
        return Ok(ObjectKind::Directory);
    }

    let page = store
        .list_objects(
            dataset,
            ListOptions {
                prefix: Some(directory_prefix(prefix)),
                max_keys: Some(PROBE_PAGE_SIZE),
                ..Default::default()
            },
        )
        .await?;
    if !page.objects.is_empty() {
        return Ok(ObjectKind::Directory);
    }

    // No object under the directory form; check for an exact key.
    let page = store
        .list_objects(
            dataset,
            ListOptions {
                prefix: Some(prefix.to_owned()),
                max_keys: Some(PROBE_PAGE_SIZE),
                ..Default::default()
            },
        )
        .await?;
    match page.objects.as_slice() {
        [object] if object.key == prefix => Ok(ObjectKind::File),
        _ => Ok(ObjectKind::NotFound),
    }
}

/// Directory form of a prefix: guaranteed trailing separator, so listing
/// distinguishes `a/...` from keys that merely start with `a`.
pub(crate) fn directory_prefix(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_owned()
    } else {
        format!("{prefix}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockDatasetStore, ObjectEntry, ObjectPage};

    fn page(keys: &[&str]) -> ObjectPage {
        ObjectPage {
            objects: keys.iter().map(|key| ObjectEntry::key(*key)).collect(),
            next_token: None,
        }
    }

    #[tokio::test]
    async fn test_empty_prefix_is_directory_without_remote_calls() {
        let store = MockDatasetStore::new();
        // no expectations: any listing call would panic the mock
        let kind = resolve_kind(&store, &DatasetRef::new("ds"), "").await.unwrap();
        assert_eq!(kind, ObjectKind::Directory);
    }

    #[tokio::test]
    async fn test_prefix_with_contents_is_directory() {
        let mut store = MockDatasetStore::new();
        store
            .expect_list_objects()
            .withf(|_, options| {
                options.prefix.as_deref() == Some("a/") && options.max_keys == Some(1)
            })
            .times(1)
            .returning(|_, _| Ok(page(&["a/x.bin"])));

        let kind = resolve_kind(&store, &DatasetRef::new("ds"), "a").await.unwrap();
        assert_eq!(kind, ObjectKind::Directory);
    }

    #[tokio::test]
    async fn test_exact_key_match_is_file() {
        let mut store = MockDatasetStore::new();
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix.as_deref() == Some("a/"))
            .times(1)
            .returning(|_, _| Ok(page(&[])));
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix.as_deref() == Some("a"))
            .times(1)
            .returning(|_, _| Ok(page(&["a"])));

        let kind = resolve_kind(&store, &DatasetRef::new("ds"), "a").await.unwrap();
        assert_eq!(kind, ObjectKind::File);
    }

    #[tokio::test]
    async fn test_longer_key_sharing_the_prefix_is_not_a_file() {
        let mut store = MockDatasetStore::new();
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix.as_deref() == Some("a/"))
            .times(1)
            .returning(|_, _| Ok(page(&[])));
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix.as_deref() == Some("a"))
            .times(1)
            .returning(|_, _| Ok(page(&["ab"])));

        let kind = resolve_kind(&store, &DatasetRef::new("ds"), "a").await.unwrap();
        assert_eq!(kind, ObjectKind::NotFound);
    }

    #[tokio::test]
    async fn test_nothing_matching_is_not_found() {
        let mut store = MockDatasetStore::new();
        store
            .expect_list_objects()
            .times(2)
            .returning(|_, _| Ok(page(&[])));

        let kind = resolve_kind(&store, &DatasetRef::new("ds"), "ghost")
            .await
            .unwrap();
        assert_eq!(kind, ObjectKind::NotFound);
    }
}
