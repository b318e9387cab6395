//! The grouped board: every lane with its tasks in display order

use super::ids::TaskId;
use super::lane::Lane;
use super::task::Task;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tasks partitioned into the four lanes, each in display order.
///
/// All four lanes are always present, possibly empty. Built by
/// [`crate::group::group`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoardView {
    lanes: BTreeMap<Lane, Vec<Task>>,
}

impl BoardView {
    /// A board with four empty lanes
    pub fn empty() -> Self {
        Self {
            lanes: Lane::ALL.iter().map(|lane| (*lane, Vec::new())).collect(),
        }
    }

    pub(crate) fn lane_mut(&mut self, lane: Lane) -> &mut Vec<Task> {
        self.lanes.entry(lane).or_default()
    }

    /// Tasks of one lane in display order
    pub fn lane(&self, lane: Lane) -> &[Task] {
        self.lanes.get(&lane).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate lanes in board order
    pub fn lanes(&self) -> impl Iterator<Item = (Lane, &[Task])> {
        self.lanes.iter().map(|(lane, tasks)| (*lane, tasks.as_slice()))
    }

    /// Lane and index of a task, if present
    pub fn position_of(&self, id: TaskId) -> Option<(Lane, usize)> {
        self.lanes.iter().find_map(|(lane, tasks)| {
            tasks
                .iter()
                .position(|t| t.id == id)
                .map(|index| (*lane, index))
        })
    }

    /// Look up a task anywhere on the board
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.lanes.values().flatten().find(|t| t.id == id)
    }

    /// Number of tasks on the board
    pub fn len(&self) -> usize {
        self.lanes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Task count per lane
    pub fn counts(&self) -> BTreeMap<Lane, usize> {
        self.lanes
            .iter()
            .map(|(lane, tasks)| (*lane, tasks.len()))
            .collect()
    }

    /// All tasks, lane by lane, in display order
    pub fn into_tasks(self) -> Vec<Task> {
        self.lanes.into_values().flatten().collect()
    }
}

impl Default for BoardView {
    fn default() -> Self {
        Self::empty()
    }
}
