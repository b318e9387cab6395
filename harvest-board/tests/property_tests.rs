//! Property-based tests for lane grouping and order key allocation

use harvest_board::types::{allocate, gap_exhausted, rebalance};
use harvest_board::{group, Lane, OrderKey, Task, TaskId};
use proptest::prelude::*;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};

/// Status strings as they might arrive from the record store
fn status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["to_do", "in_progress", "completed", "overdue"])
            .prop_map(String::from),
        prop::sample::select(vec!["In Progress", "TODO", "to-do", "", "archived", "done"])
            .prop_map(String::from),
    ]
}

/// Tasks with unique ids, arbitrary statuses and keys
fn tasks_strategy() -> impl Strategy<Value = Vec<(Task, String)>> {
    prop::collection::vec((status_strategy(), -1.0e6f64..1.0e6), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (status, key))| {
                let task: Task = serde_json::from_value(json!({
                    "id": i as i64 + 1,
                    "status": status,
                    "order_key": key,
                    "title": format!("task {}", i),
                }))
                .unwrap();
                (task, status)
            })
            .collect()
    })
}

/// A lane with strictly ascending, well separated keys
fn lane_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::btree_set(-10_000i32..10_000, 0..30).prop_map(|keys: BTreeSet<i32>| {
        keys.into_iter()
            .enumerate()
            .map(|(i, key)| {
                Task::new(TaskId::new(i as i64 + 1), format!("t{}", i)).with_order_key(key as f64)
            })
            .collect()
    })
}

fn keys(lane: &[Task]) -> Vec<f64> {
    lane.iter().map(|t| t.order_key.value()).collect()
}

proptest! {
    #[test]
    fn test_group_partitions_input(rows in tasks_strategy()) {
        let expected_lane: HashMap<TaskId, Lane> = rows
            .iter()
            .map(|(task, raw)| (task.id, Lane::from_status(raw)))
            .collect();
        let tasks: Vec<Task> = rows.into_iter().map(|(task, _)| task).collect();

        let board = group(&tasks);

        prop_assert_eq!(board.len(), tasks.len());
        let mut seen = BTreeSet::new();
        for (lane, lane_tasks) in board.lanes() {
            for task in lane_tasks {
                prop_assert!(seen.insert(task.id), "task {} appears twice", task.id);
                prop_assert_eq!(expected_lane[&task.id], lane);
            }
            prop_assert!(keys(lane_tasks).windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_group_is_idempotent(rows in tasks_strategy()) {
        let tasks: Vec<Task> = rows.into_iter().map(|(task, _)| task).collect();
        prop_assert_eq!(group(&tasks), group(&tasks));

        let regrouped = group(&group(&tasks).into_tasks());
        prop_assert_eq!(regrouped, group(&tasks));
    }

    #[test]
    fn test_allocate_keeps_lane_ascending(lane in lane_strategy(), target in 0usize..40) {
        let key = allocate(&lane, target);
        let index = target.min(lane.len());

        if index > 0 {
            prop_assert!(key > lane[index - 1].order_key);
        }
        if index < lane.len() {
            prop_assert!(key < lane[index].order_key);
        }
        if lane.is_empty() {
            prop_assert_eq!(key, OrderKey::ZERO);
        }
        prop_assert!(!gap_exhausted(&lane, index));

        let mut after = keys(&lane);
        after.insert(index, key.value());
        prop_assert!(after.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_partial_rebalance_never_reorders(lane in lane_strategy(), applied in 0usize..30) {
        let assignments = rebalance(&lane);
        prop_assert_eq!(assignments.len(), lane.len());

        let mut tasks = lane.clone();
        for (id, key) in assignments.iter().take(applied) {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == *id) {
                task.order_key = *key;
            }
        }

        let order: Vec<TaskId> = group(&tasks).lane(Lane::ToDo).iter().map(|t| t.id).collect();
        let original: Vec<TaskId> = lane.iter().map(|t| t.id).collect();
        prop_assert_eq!(order, original);
    }
}
