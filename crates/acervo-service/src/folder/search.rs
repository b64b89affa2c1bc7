//! Folder and file search across an organization.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use acervo_auth::acl::FolderAccessResolver;
use acervo_core::error::AppError;
use acervo_database::{FileStore, FolderStore};
use acervo_entity::file::File;
use acervo_entity::folder::Folder;
use acervo_entity::permission::AccessLevel;

use super::service::WithAccess;
use crate::context::RequestContext;
use crate::path::descendant_scope;

/// Matches of a search, each tagged with the caller's access level.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub folders: Vec<WithAccess<Folder>>,
    pub files: Vec<WithAccess<File>>,
}

/// Searches folders by name and files by name within what a user may see.
#[derive(Debug, Clone)]
pub struct SearchService {
    folder_repo: Arc<dyn FolderStore>,
    file_repo: Arc<dyn FileStore>,
    access: Arc<FolderAccessResolver>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(
        folder_repo: Arc<dyn FolderStore>,
        file_repo: Arc<dyn FileStore>,
        access: Arc<FolderAccessResolver>,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            access,
        }
    }

    /// Searches an organization, or only the subtree of `folder_id` when
    /// given. Members search their own organization; admins any.
    ///
    /// Admins and system managers see every match with MANAGE. Everyone
    /// else sees matches in folders they hold a grant on; a file carries
    /// the level of its folder.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        organization_id: Uuid,
        term: &str,
        folder_id: Option<Uuid>,
    ) -> Result<SearchResults, AppError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::validation("Search term cannot be empty"));
        }
        if !ctx.is_admin() && ctx.organization_id != organization_id {
            return Err(AppError::forbidden(
                "Cannot search the folders of another organization",
            ));
        }
        let org = organization_id;

        let scope = match folder_id {
            Some(id) => {
                let root = self
                    .folder_repo
                    .folder(id)
                    .await?
                    .filter(|f| f.organization_id == org)
                    .ok_or_else(|| AppError::not_found("Folder not found"))?;
                Some(descendant_scope(self.folder_repo.as_ref(), root.id).await?)
            }
            None => None,
        };

        if ctx.bypasses_folder_acl() {
            let folders = self.folder_repo.search(org, scope.as_deref(), term).await?;
            let files = self.file_repo.search(org, scope.as_deref(), term).await?;
            return Ok(SearchResults {
                folders: tag_all(folders, AccessLevel::Manage),
                files: tag_all(files, AccessLevel::Manage),
            });
        }

        let grants = self.access.permitted_folders(ctx.user_id).await?;
        let visible = visible_folders(&grants, scope.as_deref());
        if visible.is_empty() {
            return Ok(SearchResults::default());
        }

        let folders = self
            .folder_repo
            .search(org, Some(&visible), term)
            .await?;
        let files = self
            .file_repo
            .search(org, Some(&visible), term)
            .await?;

        Ok(SearchResults {
            folders: tag_by(folders, &grants, |f| f.id),
            files: tag_by(files, &grants, |f| f.folder_id),
        })
    }
}

/// Granted folders, narrowed to `scope` when one is given.
fn visible_folders(grants: &HashMap<Uuid, AccessLevel>, scope: Option<&[Uuid]>) -> Vec<Uuid> {
    match scope {
        Some(scope) => scope
            .iter()
            .copied()
            .filter(|id| grants.contains_key(id))
            .collect(),
        None => grants.keys().copied().collect(),
    }
}

fn tag_all<T>(items: Vec<T>, level: AccessLevel) -> Vec<WithAccess<T>> {
    items
        .into_iter()
        .map(|item| WithAccess::new(item, level))
        .collect()
}

fn tag_by<T>(
    items: Vec<T>,
    grants: &HashMap<Uuid, AccessLevel>,
    folder_of: impl Fn(&T) -> Uuid,
) -> Vec<WithAccess<T>> {
    items
        .into_iter()
        .filter_map(|item| {
            let level = grants.get(&folder_of(&item)).copied()?;
            Some(WithAccess::new(item, level))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_folders_intersects_scope() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let grants = HashMap::from([(a, AccessLevel::Read), (b, AccessLevel::Manage)]);

        let scoped = visible_folders(&grants, Some(&[b, c]));
        assert_eq!(scoped, vec![b]);

        let mut all = visible_folders(&grants, None);
        all.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_tag_by_uses_folder_grant() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let grants = HashMap::from([(a, AccessLevel::Read)]);

        let tagged = tag_by(vec![a, b], &grants, |id| *id);
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].item, a);
        assert_eq!(tagged[0].access_level, AccessLevel::Read);
    }
}
