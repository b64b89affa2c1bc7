//! TCC records: registration, listing, editing and file download.
//!
//! The thesis document and the defense record are ordinary files uploaded
//! through the file endpoints; a TCC references them by id. Access to a
//! TCC and its files follows the TCC role rules, not folder grants.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::info;
use uuid::Uuid;

use acervo_auth::TccScope;
use acervo_core::error::AppError;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_database::{CourseStore, FileStore, StudentStore, TccStore, UserLookup};
use acervo_entity::audit::{AuditAction, AuditTarget};
use acervo_entity::course::Course;
use acervo_entity::file::File;
use acervo_entity::tcc::{CreateTcc, Tcc, TccFileKind, TccFilter, TccRecord, TccType, UpdateTcc};
use acervo_storage::StorageManager;

use super::course::{course_in_org, user_in_org};
use super::course_scope;
use super::student::student_in_org;
use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::file::Download;
use crate::file::service::file_in_org;
use crate::user::service::{optional, required};

/// Earliest accepted defense year.
const FIRST_YEAR: i32 = 1900;

/// Input for registering a TCC.
#[derive(Debug, Clone)]
pub struct NewTcc {
    pub title: String,
    pub year: i32,
    pub keywords: Option<String>,
    pub tcc_type: TccType,
    pub author_id: Uuid,
    pub supervisor_id: Option<Uuid>,
    pub course_id: Uuid,
    pub file_id: Uuid,
    pub defense_record_file_id: Option<Uuid>,
}

/// Partial update of a TCC.
#[derive(Debug, Clone, Default)]
pub struct TccUpdate {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub keywords: Option<String>,
    pub tcc_type: Option<TccType>,
    pub author_id: Option<Uuid>,
    pub supervisor_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
}

/// Listing filters accepted from the caller.
#[derive(Debug, Clone, Default)]
pub struct TccQuery {
    pub search: Option<String>,
    pub tcc_type: Option<TccType>,
    pub year: Option<i32>,
    pub course_id: Option<Uuid>,
}

/// Manages TCC records under the TCC role rules.
#[derive(Debug, Clone)]
pub struct TccService {
    tccs: Arc<dyn TccStore>,
    students: Arc<dyn StudentStore>,
    courses: Arc<dyn CourseStore>,
    files: Arc<dyn FileStore>,
    users: Arc<dyn UserLookup>,
    storage: Arc<StorageManager>,
    recorder: AuditRecorder,
}

impl TccService {
    /// Creates a new TCC service.
    pub fn new(
        tccs: Arc<dyn TccStore>,
        students: Arc<dyn StudentStore>,
        courses: Arc<dyn CourseStore>,
        files: Arc<dyn FileStore>,
        users: Arc<dyn UserLookup>,
        storage: Arc<StorageManager>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            tccs,
            students,
            courses,
            files,
            users,
            storage,
            recorder,
        }
    }

    /// Lists TCCs of the caller's organization. Coordinators only see the
    /// courses they coordinate.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: TccQuery,
        page: PageRequest,
    ) -> Result<PageResponse<TccRecord>, AppError> {
        let filter = TccFilter {
            search: optional(query.search),
            tcc_type: query.tcc_type,
            year: query.year,
            course_id: query.course_id,
            coordinator_id: ctx.tcc_actor().listing_coordinator(),
        };
        self.tccs.list(ctx.organization_id, &filter, &page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<TccRecord, AppError> {
        let record = self.record(ctx, id).await?;
        ctx.tcc_actor().require_read(&record_scope(&record))?;
        Ok(record)
    }

    /// Registers a TCC. The caller must be allowed to modify records of
    /// the target course.
    pub async fn create(&self, ctx: &RequestContext, input: NewTcc) -> Result<Tcc, AppError> {
        let course = course_in_org(self.courses.as_ref(), ctx, input.course_id).await?;
        ctx.tcc_actor().require_modify(&course_scope(&course))?;

        let title = required(&input.title, "title")?;
        let year = defense_year(input.year)?;
        self.require_author(ctx, input.author_id, &course).await?;
        if let Some(supervisor_id) = input.supervisor_id {
            user_in_org(self.users.as_ref(), ctx, supervisor_id, "Supervisor not found").await?;
        }
        let file = file_in_org(self.files.as_ref(), ctx, input.file_id).await?;
        if let Some(defense_id) = input.defense_record_file_id {
            file_in_org(self.files.as_ref(), ctx, defense_id).await?;
        }

        let tcc = self
            .tccs
            .create(&CreateTcc {
                organization_id: ctx.organization_id,
                title: title.to_string(),
                year,
                keywords: optional(input.keywords),
                tcc_type: input.tcc_type,
                author_id: input.author_id,
                supervisor_id: input.supervisor_id,
                course_id: course.id,
                file_id: file.id,
                defense_record_file_id: input.defense_record_file_id,
            })
            .await?;

        info!(created_by = %ctx.user_id, tcc_id = %tcc.id, course_id = %course.id, "TCC registered");
        Ok(tcc)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: TccUpdate,
    ) -> Result<Tcc, AppError> {
        let record = self.record(ctx, id).await?;
        let actor = ctx.tcc_actor();
        actor.require_modify(&record_scope(&record))?;

        let course_id = input.course_id.unwrap_or(record.tcc.course_id);
        let course = course_in_org(self.courses.as_ref(), ctx, course_id).await?;
        if course.id != record.tcc.course_id {
            actor.require_modify(&course_scope(&course))?;
        }

        let title = input
            .title
            .as_deref()
            .map(|t| required(t, "title"))
            .transpose()?
            .map(str::to_string);
        let year = input.year.map(defense_year).transpose()?;
        if input.author_id.is_some() || input.course_id.is_some() {
            self.require_author(ctx, input.author_id.unwrap_or(record.tcc.author_id), &course)
                .await?;
        }
        if let Some(supervisor_id) = input.supervisor_id {
            user_in_org(self.users.as_ref(), ctx, supervisor_id, "Supervisor not found").await?;
        }

        let updated = self
            .tccs
            .update(
                record.tcc.id,
                &UpdateTcc {
                    title,
                    year,
                    keywords: optional(input.keywords),
                    tcc_type: input.tcc_type,
                    author_id: input.author_id,
                    supervisor_id: input.supervisor_id,
                    course_id: input.course_id,
                    defense_record_file_id: None,
                },
            )
            .await?;

        info!(updated_by = %ctx.user_id, tcc_id = %updated.id, "TCC updated");
        Ok(updated)
    }

    /// Attaches (or replaces) the defense record file.
    pub async fn attach_defense_record(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        file_id: Uuid,
    ) -> Result<Tcc, AppError> {
        let record = self.record(ctx, id).await?;
        ctx.tcc_actor().require_modify(&record_scope(&record))?;
        let file = file_in_org(self.files.as_ref(), ctx, file_id).await?;

        let updated = self
            .tccs
            .update(
                record.tcc.id,
                &UpdateTcc {
                    defense_record_file_id: Some(file.id),
                    ..UpdateTcc::default()
                },
            )
            .await?;

        info!(updated_by = %ctx.user_id, tcc_id = %updated.id, file_id = %file.id, "Defense record attached");
        Ok(updated)
    }

    /// Soft-deletes a TCC. Its files stay in place.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let record = self.record(ctx, id).await?;
        ctx.tcc_actor().require_delete(&record_scope(&record))?;

        if !self.tccs.soft_delete(record.tcc.id).await? {
            return Err(AppError::not_found("TCC not found"));
        }

        info!(deleted_by = %ctx.user_id, tcc_id = %record.tcc.id, "TCC deleted");
        Ok(())
    }

    /// Opens the thesis document or the defense record. Records
    /// DOWNLOAD_FILE.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        kind: TccFileKind,
    ) -> Result<Download, AppError> {
        let record = self.record(ctx, id).await?;
        ctx.tcc_actor().require_read(&record_scope(&record))?;

        let file_id = record.tcc.file_for(kind).ok_or_else(|| match kind {
            TccFileKind::Main => AppError::not_found("TCC file not found"),
            TccFileKind::Defense => AppError::not_found("No defense record attached"),
        })?;
        let file: File = file_in_org(self.files.as_ref(), ctx, file_id).await?;

        let body = self.storage.stream(&file.filename).await.map_err(|e| {
            if e.is_not_found() {
                AppError::not_found("File content not found in storage")
            } else {
                e
            }
        })?;

        self.recorder
            .record(ctx.user_id, AuditTarget::File(file.id), AuditAction::DownloadFile);

        info!(user_id = %ctx.user_id, tcc_id = %record.tcc.id, file_id = %file.id, "TCC file downloaded");
        Ok(Download { file, body })
    }

    async fn record(&self, ctx: &RequestContext, id: Uuid) -> Result<TccRecord, AppError> {
        self.tccs
            .find(ctx.organization_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("TCC not found"))
    }

    /// The author must be a live student enrolled in `course`.
    async fn require_author(
        &self,
        ctx: &RequestContext,
        author_id: Uuid,
        course: &Course,
    ) -> Result<(), AppError> {
        let student = student_in_org(self.students.as_ref(), ctx, author_id).await?;
        if student.course_id != course.id {
            return Err(AppError::validation(
                "The author is not enrolled in this course",
            ));
        }
        Ok(())
    }
}

fn record_scope(record: &TccRecord) -> TccScope {
    TccScope {
        organization_id: record.tcc.organization_id,
        coordinator_id: record.coordinator_id,
    }
}

fn defense_year(year: i32) -> Result<i32, AppError> {
    let latest = Utc::now().year() + 1;
    if !(FIRST_YEAR..=latest).contains(&year) {
        return Err(AppError::validation(format!(
            "year must be between {FIRST_YEAR} and {latest}"
        )));
    }
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acervo_core::error::ErrorKind;

    #[test]
    fn test_defense_year_bounds() {
        assert_eq!(defense_year(2024).unwrap(), 2024);
        assert_eq!(defense_year(FIRST_YEAR).unwrap(), FIRST_YEAR);
        assert_eq!(defense_year(1899).unwrap_err().kind, ErrorKind::Validation);
        assert!(defense_year(Utc::now().year() + 2).is_err());
    }
}
