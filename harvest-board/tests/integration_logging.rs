//! Integration tests for activity logging

use chrono::NaiveDate;
use harvest_board::board::GetBoard;
use harvest_board::client::MemoryRecords;
use harvest_board::task::{AddTask, GetTask, ListTasks, MoveTask, UpdateTask};
use harvest_board::{
    BoardConfig, BoardContext, BoardOperationProcessor, FarmId, OperationProcessor, TaskId,
};
use std::sync::Arc;

fn due() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 4).unwrap()
}

async fn setup(config: BoardConfig) -> (Arc<MemoryRecords>, BoardContext) {
    let records = Arc::new(MemoryRecords::new());
    let ctx = BoardContext::in_memory(records.clone(), config)
        .await
        .unwrap();
    (records, ctx)
}

#[test_log::test(tokio::test)]
async fn test_activity_logging_end_to_end() {
    let (_records, ctx) = setup(BoardConfig::default()).await;
    let processor = BoardOperationProcessor::with_actor("grower[session123]");

    // Add a task (logged)
    let result = processor
        .process(&AddTask::new("First task", FarmId::new(1), due()), &ctx)
        .await
        .unwrap();
    let task_id = TaskId::new(result["id"].as_i64().unwrap());

    // Update the task (logged)
    processor
        .process(&UpdateTask::new(task_id).with_title("Updated task"), &ctx)
        .await
        .unwrap();

    // Move it (logged)
    processor
        .process(&MoveTask::to_lane(task_id, "in_progress"), &ctx)
        .await
        .unwrap();

    // Get task (unlogged - should not add to activity log)
    processor.process(&GetTask::new(task_id), &ctx).await.unwrap();

    let entries = ctx.read_activity(None);
    assert_eq!(entries.len(), 3); // AddTask, UpdateTask, MoveTask (not GetTask)
    assert_eq!(entries[0].op, "move task"); // Newest first
    assert_eq!(entries[1].op, "update task");
    assert_eq!(entries[2].op, "add task"); // Oldest last

    for entry in &entries {
        assert_eq!(entry.actor, Some("grower[session123]".to_string()));
    }

    assert_eq!(entries[2].input["title"], "First task");
    assert_eq!(entries[1].output["title"], "Updated task");
    assert_eq!(entries[0].output["task"]["status"], "in_progress");
}

#[test_log::test(tokio::test)]
async fn test_unlogged_operations_dont_create_logs() {
    let (_records, ctx) = setup(BoardConfig::default()).await;
    let processor = BoardOperationProcessor::new();

    let result = processor
        .process(&AddTask::new("Task", FarmId::new(1), due()), &ctx)
        .await
        .unwrap();
    let task_id = TaskId::new(result["id"].as_i64().unwrap());
    assert_eq!(ctx.read_activity(None).len(), 1);

    // Read operations and a no-op move
    processor.process(&GetTask::new(task_id), &ctx).await.unwrap();
    processor.process(&ListTasks::new(), &ctx).await.unwrap();
    processor.process(&GetBoard, &ctx).await.unwrap();
    processor
        .process(&MoveTask::to_position(task_id, "to_do", 0), &ctx)
        .await
        .unwrap();

    assert_eq!(ctx.read_activity(None).len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_failed_save_is_logged() {
    let (records, ctx) = setup(BoardConfig::default()).await;
    let processor = BoardOperationProcessor::new();

    let result = processor
        .process(&AddTask::new("Task", FarmId::new(1), due()), &ctx)
        .await
        .unwrap();
    let task_id = TaskId::new(result["id"].as_i64().unwrap());

    records.fail_next_updates(1);
    let result = processor
        .process(&MoveTask::to_lane(task_id, "completed"), &ctx)
        .await;
    assert!(result.is_err());

    let entries = ctx.read_activity(None);
    assert_eq!(entries.len(), 2); // AddTask + failed MoveTask
    assert_eq!(entries[0].op, "move task");
    assert!(entries[0].output["error"]
        .as_str()
        .unwrap()
        .contains("rejected"));
}

#[test_log::test(tokio::test)]
async fn test_rejected_input_is_not_logged() {
    let (_records, ctx) = setup(BoardConfig::default()).await;
    let processor = BoardOperationProcessor::new();

    let result = processor
        .process(&UpdateTask::new(TaskId::new(404)).with_title("Nope"), &ctx)
        .await;
    assert!(result.is_err());

    let result = processor
        .process(&MoveTask::to_lane(TaskId::new(404), "overdue"), &ctx)
        .await;
    assert!(result.is_err());

    assert!(ctx.read_activity(None).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_actor_from_config() {
    let config = BoardConfig {
        actor: Some("field-tablet".into()),
        ..BoardConfig::default()
    };
    let (_records, ctx) = setup(config).await;

    BoardOperationProcessor::new()
        .process(&AddTask::new("Task", FarmId::new(1), due()), &ctx)
        .await
        .unwrap();
    BoardOperationProcessor::with_actor("manager")
        .process(&AddTask::new("Other", FarmId::new(1), due()), &ctx)
        .await
        .unwrap();

    let entries = ctx.read_activity(None);
    assert_eq!(entries[0].actor.as_deref(), Some("manager"));
    assert_eq!(entries[1].actor.as_deref(), Some("field-tablet"));
}
