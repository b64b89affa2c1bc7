//! In-memory fakes of the lookup seams.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use acervo_core::result::AppResult;
use acervo_database::{AccessHistorySink, FolderLookup};
use acervo_entity::audit::CreateAccessHistoryEntry;
use acervo_entity::folder::Folder;

/// Folder hierarchy held in a map. Paths are computed on insert.
#[derive(Default)]
pub struct FakeFolders {
    folders: Mutex<HashMap<Uuid, Folder>>,
}

impl FakeFolders {
    pub fn add(&self, name: &str, parent: Option<Uuid>) -> Uuid {
        let mut folders = self.folders.lock().unwrap();
        let path = match parent {
            Some(p) => folders[&p].child_path(name),
            None => name.to_string(),
        };
        let folder = Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            path,
            parent_folder_id: parent,
            organization_id: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = folder.id;
        folders.insert(id, folder);
        id
    }

    pub fn set_parent(&self, id: Uuid, parent: Option<Uuid>) {
        if let Some(folder) = self.folders.lock().unwrap().get_mut(&id) {
            folder.parent_folder_id = parent;
        }
    }

    pub fn get(&self, id: Uuid) -> Folder {
        self.folders.lock().unwrap()[&id].clone()
    }
}

#[async_trait]
impl FolderLookup for FakeFolders {
    async fn folder(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folders.lock().unwrap().get(&id).cloned())
    }

    async fn child_folder_ids(&self, parent_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Uuid)>> {
        Ok(self
            .folders
            .lock()
            .unwrap()
            .values()
            .filter_map(|f| {
                f.parent_folder_id
                    .filter(|p| parent_ids.contains(p))
                    .map(|p| (f.id, p))
            })
            .collect())
    }
}

/// Audit sink that keeps entries in memory, optionally failing every append.
#[derive(Default)]
pub struct MemorySink {
    pub entries: Mutex<Vec<CreateAccessHistoryEntry>>,
    pub fail: bool,
}

#[async_trait]
impl AccessHistorySink for MemorySink {
    async fn append(&self, entry: &CreateAccessHistoryEntry) -> AppResult<()> {
        if self.fail {
            return Err(acervo_core::AppError::database("sink unavailable"));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
