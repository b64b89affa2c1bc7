//! Organization folder tree.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_database::FolderStore;
use acervo_database::repositories::OrganizationRepository;
use acervo_entity::folder::{Folder, FolderNode};

use crate::context::RequestContext;

/// Builds the nested folder tree of an organization.
#[derive(Debug, Clone)]
pub struct TreeService {
    folder_repo: Arc<dyn FolderStore>,
    org_repo: Arc<OrganizationRepository>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folder_repo: Arc<dyn FolderStore>, org_repo: Arc<OrganizationRepository>) -> Self {
        Self {
            folder_repo,
            org_repo,
        }
    }

    /// Returns the root folders of an organization with their subtrees.
    ///
    /// Members see their own organization; admins see any.
    pub async fn organization_tree(
        &self,
        ctx: &RequestContext,
        organization_id: Uuid,
    ) -> Result<Vec<FolderNode>, AppError> {
        if !ctx.is_admin() && ctx.organization_id != organization_id {
            return Err(AppError::forbidden(
                "Cannot view the folders of another organization",
            ));
        }
        if self.org_repo.find_by_id(organization_id).await?.is_none() {
            return Err(AppError::not_found("Organization not found"));
        }

        let folders = self.folder_repo.find_by_organization(organization_id).await?;
        let with_files: HashSet<Uuid> = self
            .folder_repo
            .ids_with_files(organization_id)
            .await?
            .into_iter()
            .collect();

        Ok(build_tree(folders, &with_files))
    }
}

/// Nests a flat folder list. Folders whose parent is absent from the list
/// become roots. Siblings are ordered by name.
pub fn build_tree(folders: Vec<Folder>, with_files: &HashSet<Uuid>) -> Vec<FolderNode> {
    let known: HashSet<Uuid> = folders.iter().map(|f| f.id).collect();
    let mut children: HashMap<Option<Uuid>, Vec<Folder>> = HashMap::new();
    for folder in folders {
        let parent = folder.parent_folder_id.filter(|p| known.contains(p));
        children.entry(parent).or_default().push(folder);
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut visited = HashSet::new();
    nest(None, &mut children, with_files, &mut visited)
}

fn nest(
    parent: Option<Uuid>,
    children: &mut HashMap<Option<Uuid>, Vec<Folder>>,
    with_files: &HashSet<Uuid>,
    visited: &mut HashSet<Uuid>,
) -> Vec<FolderNode> {
    let Some(level) = children.remove(&parent) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(level.len());
    for folder in level {
        if !visited.insert(folder.id) {
            continue;
        }
        let subfolders = nest(Some(folder.id), children, with_files, visited);
        nodes.push(FolderNode {
            id: folder.id,
            has_files: with_files.contains(&folder.id),
            has_subfolders: !subfolders.is_empty(),
            name: folder.name,
            path: folder.path,
            parent_folder_id: folder.parent_folder_id,
            subfolders,
        });
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(name: &str, path: &str, parent: Option<Uuid>) -> Folder {
        Folder {
            id: Uuid::new_v4(),
            name: name.into(),
            path: path.into(),
            parent_folder_id: parent,
            organization_id: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_tree_nests_and_sorts() {
        let root = folder("Theses", "Theses", None);
        let b = folder("B", "Theses/B", Some(root.id));
        let a = folder("A", "Theses/A", Some(root.id));
        let deep = folder("Final", "Theses/A/Final", Some(a.id));
        let other = folder("Archive", "Archive", None);

        let with_files = HashSet::from([deep.id]);
        let (a_id, deep_id) = (a.id, deep.id);
        let tree = build_tree(vec![root, b, a, deep, other], &with_files);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "Archive");
        assert!(!tree[0].has_subfolders);

        let theses = &tree[1];
        assert_eq!(theses.subfolders[0].id, a_id);
        assert_eq!(theses.subfolders[1].name, "B");
        assert!(theses.has_subfolders);
        assert!(!theses.has_files);

        let final_node = &theses.subfolders[0].subfolders[0];
        assert_eq!(final_node.id, deep_id);
        assert!(final_node.has_files);
        assert!(final_node.subfolders.is_empty());
    }

    #[test]
    fn test_orphans_become_roots() {
        let orphan = folder("Lost", "Gone/Lost", Some(Uuid::new_v4()));
        let tree = build_tree(vec![orphan], &HashSet::new());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Lost");
    }

    #[test]
    fn test_empty_organization() {
        assert!(build_tree(Vec::new(), &HashSet::new()).is_empty());
    }
}
