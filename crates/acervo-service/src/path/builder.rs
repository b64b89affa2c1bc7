//! Builds the `/`-joined ancestor path of a folder or file.

use std::collections::HashSet;

use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::result::AppResult;
use acervo_database::FolderLookup;
use acervo_entity::folder::{Folder, PATH_SEPARATOR};

/// Path of an entity named `name` whose parent is `parent_folder_id`.
///
/// Walks the parent chain up to a root folder, prepending each ancestor's
/// name. Fails with `NotFound` when an ancestor does not resolve and with
/// `Validation` when a folder id repeats in the chain.
pub async fn build_path<F: FolderLookup + ?Sized>(
    folders: &F,
    name: &str,
    parent_folder_id: Option<Uuid>,
) -> AppResult<String> {
    let mut segments = vec![name.to_string()];
    let mut visited = HashSet::new();
    let mut current = parent_folder_id;

    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(AppError::validation(format!(
                "Folder hierarchy cycle detected at {id}"
            )));
        }
        let ancestor = folders
            .folder(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        segments.push(ancestor.name);
        current = ancestor.parent_folder_id;
    }

    segments.reverse();
    Ok(segments.join(&PATH_SEPARATOR.to_string()))
}

/// Path of a file stored in `folder`.
pub fn file_path(folder: &Folder, filename: &str) -> String {
    folder.child_path(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFolders;
    use acervo_core::error::ErrorKind;

    #[tokio::test]
    async fn test_root_path_is_name() {
        let folders = FakeFolders::default();
        assert_eq!(build_path(&folders, "A", None).await.unwrap(), "A");
    }

    #[tokio::test]
    async fn test_nested_path() {
        let folders = FakeFolders::default();
        let a = folders.add("A", None);
        let b = folders.add("B", Some(a));

        assert_eq!(build_path(&folders, "B", Some(a)).await.unwrap(), "A/B");
        assert_eq!(build_path(&folders, "C", Some(b)).await.unwrap(), "A/B/C");
    }

    #[tokio::test]
    async fn test_idempotent_on_unchanged_chain() {
        let folders = FakeFolders::default();
        let a = folders.add("A", None);
        let first = build_path(&folders, "x", Some(a)).await.unwrap();
        let second = build_path(&folders, "x", Some(a)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_ancestor_is_not_found() {
        let folders = FakeFolders::default();
        let err = build_path(&folders, "x", Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cycle_fails_fast() {
        let folders = FakeFolders::default();
        let a = folders.add("A", None);
        let b = folders.add("B", Some(a));
        folders.set_parent(a, Some(b));

        let err = build_path(&folders, "x", Some(b)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("cycle"));
    }

    #[test]
    fn test_file_path() {
        let folders = FakeFolders::default();
        let a = folders.add("A", None);
        let folder = folders.get(a);
        assert_eq!(file_path(&folder, "tcc_1.pdf"), "A/tcc_1.pdf");
    }
}
