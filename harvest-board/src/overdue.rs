//! Overdue detection

use crate::types::{Lane, Task, TaskId};
use chrono::NaiveDate;

/// An unfinished task whose due date is before `today`.
///
/// Tasks already in the `completed` or `overdue` lane never qualify.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.completed || matches!(task.status, Lane::Completed | Lane::Overdue) {
        return false;
    }
    task.due_date.is_some_and(|due| due < today)
}

/// Ids of overdue tasks, earliest due date first
pub fn overdue_tasks(tasks: &[Task], today: NaiveDate) -> Vec<TaskId> {
    let mut overdue: Vec<&Task> = tasks.iter().filter(|t| is_overdue(t, today)).collect();
    overdue.sort_by_key(|t| t.due_date);
    overdue.into_iter().map(|t| t.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let task = Task::new(TaskId::new(1), "Mow").with_due_date(date(10));
        assert!(!is_overdue(&task, date(10)));
        assert!(is_overdue(&task, date(11)));
    }

    #[test]
    fn test_finished_or_undated_tasks_never_overdue() {
        let today = date(20);
        let done = Task::new(TaskId::new(1), "a")
            .with_due_date(date(1))
            .with_completed(true);
        let in_done_lane = Task::new(TaskId::new(2), "b")
            .with_due_date(date(1))
            .with_status(Lane::Completed);
        let already = Task::new(TaskId::new(3), "c")
            .with_due_date(date(1))
            .with_status(Lane::Overdue);
        let undated = Task::new(TaskId::new(4), "d");

        for task in [done, in_done_lane, already, undated] {
            assert!(!is_overdue(&task, today), "{} should not be overdue", task.title);
        }
    }

    #[test]
    fn test_overdue_tasks_sorted_by_due_date() {
        let tasks = vec![
            Task::new(TaskId::new(1), "late").with_due_date(date(5)),
            Task::new(TaskId::new(2), "later").with_due_date(date(2)),
            Task::new(TaskId::new(3), "fine").with_due_date(date(30)),
            Task::new(TaskId::new(4), "working")
                .with_due_date(date(3))
                .with_status(Lane::InProgress),
        ];
        assert_eq!(
            overdue_tasks(&tasks, date(15)),
            vec![TaskId::new(2), TaskId::new(4), TaskId::new(1)]
        );
    }
}
