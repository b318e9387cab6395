//! UpdateTask command

use crate::context::{logged, BoardContext};
use crate::error::{BoardError, Result};
use crate::types::{CropId, FarmId, Priority, TaskId, TaskKind, TaskPatch};
use chrono::NaiveDate;
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Update a task's details.
///
/// Lane placement is not editable here; moves go through `MoveTask` and
/// completion through `CompleteTask`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateTask {
    /// The task ID to update
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TaskKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<FarmId>,
    /// An explicit `null` removes the crop
    #[serde(
        default,
        deserialize_with = "crate::types::clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub crop_id: Option<Option<CropId>>,
}

impl_operation!(UpdateTask, verb = "update", noun = "task", description = "Update a task's details");

impl UpdateTask {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            title: None,
            kind: None,
            due_date: None,
            priority: None,
            notes: None,
            farm_id: None,
            crop_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_farm(mut self, farm: FarmId) -> Self {
        self.farm_id = Some(farm);
        self
    }

    pub fn with_crop(mut self, crop: CropId) -> Self {
        self.crop_id = Some(Some(crop));
        self
    }

    /// Detach the task from its crop
    pub fn without_crop(mut self) -> Self {
        self.crop_id = Some(None);
        self
    }

    fn patch(&self) -> Result<TaskPatch> {
        let title = match self.title.as_deref().map(str::trim) {
            Some("") => return Err(BoardError::invalid_value("title", "title cannot be blank")),
            other => other.map(str::to_string),
        };
        let patch = TaskPatch {
            title,
            kind: self.kind,
            due_date: self.due_date,
            priority: self.priority,
            notes: self.notes.clone(),
            farm_id: self.farm_id,
            crop_id: self.crop_id,
            ..TaskPatch::default()
        };
        if patch.is_empty() {
            return Err(BoardError::invalid_value("patch", "nothing to update"));
        }
        Ok(patch)
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let patch = self.patch()?;

            let _guard = ctx.coordinator().lock().await;
            ctx.store().get(self.id)?;

            let saved = ctx.client().update_task(self.id, &patch).await?;
            ctx.store().insert(saved.clone());
            ctx.coordinator().publish();
            info!(task = %self.id, "task updated");

            Ok(serde_json::to_value(&saved)?)
        }
        .await;

        logged(self, result)
    }
}
