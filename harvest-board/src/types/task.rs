//! Task types: Task, TaskPatch, NewTask

use super::ids::{CropId, FarmId, TaskId};
use super::lane::Lane;
use super::order::OrderKey;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// What kind of field work a task is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Watering,
    Fertilizing,
    Harvesting,
    Planting,
    Weeding,
    #[default]
    #[serde(other)]
    Other,
}

/// Task urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Lenient mapping from a stored value; anything unrecognized is medium
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => Priority::from_name(&s),
            _ => Priority::default(),
        })
    }
}

/// Deserialize a field that distinguishes "absent" from an explicit `null`.
///
/// Used with `#[serde(default)]`: a missing key stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(value))`.
pub(crate) fn clearable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A task card on the board.
///
/// Only `status` and `order_key` matter to the ordering core; everything else
/// is payload carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    /// Lane membership
    #[serde(default)]
    pub status: Lane,

    /// Position within the lane
    #[serde(default)]
    pub order_key: OrderKey,

    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: TaskKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<FarmId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_id: Option<CropId>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a task in `to_do` with key 0
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            status: Lane::ToDo,
            order_key: OrderKey::ZERO,
            title: title.into(),
            kind: TaskKind::default(),
            due_date: None,
            priority: Priority::default(),
            notes: String::new(),
            farm_id: None,
            crop_id: None,
            completed: false,
        }
    }

    pub fn with_status(mut self, status: Lane) -> Self {
        self.status = status;
        self
    }

    pub fn with_order_key(mut self, key: impl Into<OrderKey>) -> Self {
        self.order_key = key.into();
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_farm(mut self, farm: FarmId) -> Self {
        self.farm_id = Some(farm);
        self
    }

    pub fn with_crop(mut self, crop: CropId) -> Self {
        self.crop_id = Some(crop);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// A partial update to a task record. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Lane>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_key: Option<OrderKey>,
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
    /// `Some(None)` clears the crop
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub crop_id: Option<Option<CropId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// The patch a move persists: new lane and key, nothing else
    pub fn placement(status: Lane, order_key: OrderKey) -> Self {
        Self {
            status: Some(status),
            order_key: Some(order_key),
            ..Self::default()
        }
    }

    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when the patch touches lane placement
    pub fn moves(&self) -> bool {
        self.status.is_some() || self.order_key.is_some()
    }

    /// Apply the set fields to a task
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(key) = self.order_key {
            task.order_key = key;
        }
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(kind) = self.kind {
            task.kind = kind;
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(ref notes) = self.notes {
            task.notes = notes.clone();
        }
        if let Some(farm) = self.farm_id {
            task.farm_id = Some(farm);
        }
        if let Some(crop) = self.crop_id {
            task.crop_id = crop;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Fields of a task that does not have an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub notes: String,
    pub farm_id: FarmId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_id: Option<CropId>,
    pub status: Lane,
    pub order_key: OrderKey,
}

impl NewTask {
    /// Materialize the record once the store has assigned an id
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            status: self.status,
            order_key: self.order_key,
            title: self.title,
            kind: self.kind,
            due_date: Some(self.due_date),
            priority: self.priority,
            notes: self.notes,
            farm_id: Some(self.farm_id),
            crop_id: self.crop_id,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new(TaskId::new(1), "Water tomatoes");
        assert_eq!(task.status, Lane::ToDo);
        assert_eq!(task.order_key, OrderKey::ZERO);
        assert!(!task.completed);
    }

    #[test]
    fn test_sparse_record_deserializes() {
        let task: Task = serde_json::from_value(json!({
            "id": 9,
            "title": "Weed row 4",
            "status": "someday",
            "type": "weeding",
            "priority": "urgent"
        }))
        .unwrap();

        assert_eq!(task.status, Lane::ToDo);
        assert_eq!(task.order_key, OrderKey::ZERO);
        assert_eq!(task.kind, TaskKind::Weeding);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_priority_names_are_lenient() {
        assert_eq!(Priority::from_name(" HIGH "), Priority::High);
        assert_eq!(Priority::from_name("low"), Priority::Low);
        let priority: Priority = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(priority, Priority::Medium);
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), json!("high"));
    }

    #[test]
    fn test_patch_crop_absent_null_and_set() {
        let untouched: TaskPatch = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert_eq!(untouched.crop_id, None);

        let cleared: TaskPatch = serde_json::from_value(json!({"crop_id": null})).unwrap();
        assert_eq!(cleared.crop_id, Some(None));
        assert_eq!(serde_json::to_value(&cleared).unwrap(), json!({"crop_id": null}));

        let set: TaskPatch = serde_json::from_value(json!({"crop_id": 12})).unwrap();
        assert_eq!(set.crop_id, Some(Some(CropId::new(12))));

        let mut task = Task::new(TaskId::new(1), "Thin carrots").with_crop(CropId::new(3));
        cleared.apply_to(&mut task);
        assert_eq!(task.crop_id, None);
    }

    #[test]
    fn test_patch_apply() {
        let mut task = Task::new(TaskId::new(1), "Plant garlic");
        let patch = TaskPatch {
            title: Some("Plant hardneck garlic".into()),
            completed: Some(true),
            ..TaskPatch::default()
        };
        patch.apply_to(&mut task);

        assert_eq!(task.title, "Plant hardneck garlic");
        assert!(task.completed);
        assert_eq!(task.status, Lane::ToDo);
        assert!(!patch.moves());
    }

    #[test]
    fn test_placement_patch_serializes_only_placement() {
        let patch = TaskPatch::placement(Lane::InProgress, OrderKey::new(2.5));
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"status": "in_progress", "order_key": 2.5})
        );
        assert!(patch.moves());
        assert!(TaskPatch::default().is_empty());
    }
}
