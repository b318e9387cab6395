//! Task list filtering: text search, completion filter and counts

use crate::types::{CropId, FarmId, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display names for the farms and crops tasks refer to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Names {
    farms: HashMap<FarmId, String>,
    crops: HashMap<CropId, String>,
}

impl Names {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_farm(mut self, id: FarmId, name: impl Into<String>) -> Self {
        self.farms.insert(id, name.into());
        self
    }

    pub fn with_crop(mut self, id: CropId, name: impl Into<String>) -> Self {
        self.crops.insert(id, name.into());
        self
    }

    /// The farm name shown for a task
    pub fn farm_name(&self, task: &Task) -> &str {
        task.farm_id
            .and_then(|id| self.farms.get(&id))
            .map(String::as_str)
            .unwrap_or("Unknown Farm")
    }

    /// The crop name shown for a task; `None` when the task has no crop
    pub fn crop_name(&self, task: &Task) -> Option<&str> {
        task.crop_id.map(|id| {
            self.crops
                .get(&id)
                .map(String::as_str)
                .unwrap_or("Unknown Crop")
        })
    }
}

/// Filter on the completion flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

/// A search term plus a completion filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Case-insensitive match on title, farm name or crop name
    fn matches_search(&self, task: &Task, names: &Names) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();

        task.title.to_lowercase().contains(&term)
            || names.farm_name(task).to_lowercase().contains(&term)
            || names
                .crop_name(task)
                .is_some_and(|crop| crop.to_lowercase().contains(&term))
    }

    pub fn matches(&self, task: &Task, names: &Names) -> bool {
        self.status.matches(task) && self.matches_search(task, names)
    }

    /// Tasks passing the filter, input order preserved
    pub fn apply<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>, names: &Names) -> Vec<Task> {
        tasks
            .into_iter()
            .filter(|t| self.matches(t, names))
            .cloned()
            .collect()
    }
}

/// How many tasks each completion filter would show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut counts, task| {
            counts.all += 1;
            if task.completed {
                counts.completed += 1;
            } else {
                counts.pending += 1;
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskId;

    fn names() -> Names {
        Names::new()
            .with_farm(FarmId::new(1), "Willow Creek")
            .with_crop(CropId::new(10), "Heirloom Tomatoes")
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::new(TaskId::new(1), "Water greenhouse").with_farm(FarmId::new(1)),
            Task::new(TaskId::new(2), "Stake plants")
                .with_farm(FarmId::new(1))
                .with_crop(CropId::new(10))
                .with_completed(true),
            Task::new(TaskId::new(3), "Fix pump").with_farm(FarmId::new(2)),
        ]
    }

    #[test]
    fn test_search_title_farm_and_crop() {
        let tasks = tasks();
        let names = names();

        let by_title = TaskFilter::new().with_search("PUMP").apply(&tasks, &names);
        assert_eq!(by_title.len(), 1);

        let by_farm = TaskFilter::new().with_search("willow").apply(&tasks, &names);
        assert_eq!(by_farm.len(), 2);

        let by_crop = TaskFilter::new().with_search("tomato").apply(&tasks, &names);
        assert_eq!(by_crop[0].id, TaskId::new(2));

        let by_unknown_farm = TaskFilter::new().with_search("unknown farm").apply(&tasks, &names);
        assert_eq!(by_unknown_farm[0].id, TaskId::new(3));
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let tasks = tasks();
        assert_eq!(TaskFilter::new().with_search("  ").apply(&tasks, &names()).len(), 3);
    }

    #[test]
    fn test_status_filter() {
        let tasks = tasks();
        let pending = TaskFilter::new()
            .with_status(StatusFilter::Pending)
            .apply(&tasks, &names());
        assert_eq!(pending.len(), 2);

        let done = TaskFilter::new()
            .with_status(StatusFilter::Completed)
            .with_search("stake")
            .apply(&tasks, &names());
        assert_eq!(done.len(), 1);
    }

    #[test]
    fn test_counts() {
        let counts = StatusCounts::of(&tasks());
        assert_eq!(
            counts,
            StatusCounts {
                all: 3,
                pending: 2,
                completed: 1
            }
        );
    }

    #[test]
    fn test_crop_name_fallbacks() {
        let names = names();
        let no_crop = Task::new(TaskId::new(1), "x");
        let unknown_crop = Task::new(TaskId::new(2), "y").with_crop(CropId::new(77));
        assert_eq!(names.crop_name(&no_crop), None);
        assert_eq!(names.crop_name(&unknown_crop), Some("Unknown Crop"));
    }
}
