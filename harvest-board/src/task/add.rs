//! AddTask command

use crate::context::{logged, BoardContext};
use crate::error::{BoardError, Result};
use crate::types::{CropId, FarmId, Lane, NewTask, Priority, TaskKind};
use chrono::NaiveDate;
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Add a new task to the end of the `to_do` lane
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTask {
    /// The task title (required)
    pub title: String,
    /// Farm the work happens on (required)
    pub farm_id: Option<FarmId>,
    /// When the work is due (required)
    pub due_date: Option<NaiveDate>,
    /// Kind of work
    #[serde(default, rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    /// Crop the work is about
    pub crop_id: Option<CropId>,
}

impl_operation!(AddTask, verb = "add", noun = "task", description = "Create a new task on the board");

impl AddTask {
    /// Create a new AddTask command with the required fields
    pub fn new(title: impl Into<String>, farm_id: FarmId, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            farm_id: Some(farm_id),
            due_date: Some(due_date),
            kind: TaskKind::default(),
            priority: Priority::default(),
            notes: String::new(),
            crop_id: None,
        }
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_crop(mut self, crop_id: CropId) -> Self {
        self.crop_id = Some(crop_id);
        self
    }

    fn validate(&self) -> Result<(FarmId, NaiveDate)> {
        if self.title.trim().is_empty() {
            return Err(BoardError::missing_field("title"));
        }
        let farm = self.farm_id.ok_or_else(|| BoardError::missing_field("farm_id"))?;
        let due = self
            .due_date
            .ok_or_else(|| BoardError::missing_field("due_date"))?;
        Ok((farm, due))
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let (farm_id, due_date) = self.validate()?;

            let _guard = ctx.coordinator().lock().await;
            let new = NewTask {
                title: self.title.trim().to_string(),
                kind: self.kind,
                due_date,
                priority: self.priority,
                notes: self.notes.clone(),
                farm_id,
                crop_id: self.crop_id,
                status: Lane::ToDo,
                order_key: ctx.next_todo_key(),
            };

            let created = ctx.client().create_task(&new).await?;
            info!(task = %created.id, "task created");
            ctx.store().insert(created.clone());
            ctx.coordinator().publish();

            Ok(serde_json::to_value(&created)?)
        }
        .await;

        logged(self, result)
    }
}
