//! Descendant walks over the folder hierarchy.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::result::AppResult;
use acervo_database::FolderLookup;
use acervo_entity::folder::{Folder, PATH_SEPARATOR};

/// Every folder id under `root`, `root` first, in breadth-first order.
///
/// Loads one level per query. A folder reached twice means the hierarchy
/// contains a cycle and the walk fails with `Validation`.
pub async fn descendant_scope<F: FolderLookup + ?Sized>(
    folders: &F,
    root: Uuid,
) -> AppResult<Vec<Uuid>> {
    let mut scope = vec![root];
    let mut visited = HashSet::from([root]);
    let mut frontier = vec![root];

    while !frontier.is_empty() {
        let children = folders.child_folder_ids(&frontier).await?;
        frontier = Vec::with_capacity(children.len());
        for (child, _parent) in children {
            if !visited.insert(child) {
                return Err(AppError::validation(format!(
                    "Folder hierarchy cycle detected at {child}"
                )));
            }
            scope.push(child);
            frontier.push(child);
        }
    }

    Ok(scope)
}

/// New paths for `root` and its descendants once `root` lives at `root_path`.
///
/// `descendants` holds the folders below `root` (in any order). Folders not
/// connected to `root` are ignored.
pub fn subtree_paths(
    root: Uuid,
    root_path: &str,
    descendants: &[Folder],
) -> AppResult<Vec<(Uuid, String)>> {
    let mut children: HashMap<Uuid, Vec<&Folder>> = HashMap::new();
    for folder in descendants {
        if let Some(parent) = folder.parent_folder_id {
            children.entry(parent).or_default().push(folder);
        }
    }

    let mut paths = vec![(root, root_path.to_string())];
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([(root, root_path.to_string())]);

    while let Some((id, path)) = queue.pop_front() {
        for child in children.get(&id).into_iter().flatten() {
            if !visited.insert(child.id) {
                return Err(AppError::validation(format!(
                    "Folder hierarchy cycle detected at {}",
                    child.id
                )));
            }
            let child_path = format!("{path}{PATH_SEPARATOR}{}", child.name);
            paths.push((child.id, child_path.clone()));
            queue.push_back((child.id, child_path));
        }
    }

    Ok(paths)
}
