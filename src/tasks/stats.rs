//! Aggregate statistics over a user's tasks.

use chrono::Utc;

use crate::models::{Task, TaskPriority, TaskStatistics, TaskStatus};

/// Tallies a task list into `TaskStatistics`.
///
/// Overdue and due-today comparisons are date-only: the time-of-day portion
/// of `due_date` is truncated before comparing against today's date, and
/// completed tasks never count toward either bucket.
pub fn compute(tasks: &[Task]) -> TaskStatistics {
    let today = Utc::now().date_naive();

    let mut stats = TaskStatistics {
        total: tasks.len(),
        ..Default::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Cancelled => stats.cancelled += 1,
        }

        match task.priority {
            TaskPriority::Low => stats.by_priority.low += 1,
            TaskPriority::Medium => stats.by_priority.medium += 1,
            TaskPriority::High => stats.by_priority.high += 1,
            TaskPriority::Urgent => stats.by_priority.urgent += 1,
        }

        if task.status != TaskStatus::Completed {
            let due = task.due_date.date_naive();
            if due < today {
                stats.overdue += 1;
            } else if due == today {
                stats.due_today += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateTaskData;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn task_due_in(days: i64, status: TaskStatus, priority: TaskPriority) -> Task {
        Task::new(
            CreateTaskData {
                title: "Task".to_string(),
                description: String::new(),
                status: Some(status),
                priority: Some(priority),
                due_date: Utc::now() + Duration::days(days),
                tags: None,
            },
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_overdue_and_due_today_buckets() {
        let tasks = vec![
            task_due_in(-1, TaskStatus::Pending, TaskPriority::Medium), // yesterday
            task_due_in(0, TaskStatus::InProgress, TaskPriority::Medium), // today
            task_due_in(1, TaskStatus::Pending, TaskPriority::Medium),  // tomorrow
        ];

        let stats = compute(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.due_today, 1);
    }

    #[test]
    fn test_completed_tasks_never_count_as_overdue_or_due_today() {
        let tasks = vec![
            task_due_in(-2, TaskStatus::Completed, TaskPriority::High),
            task_due_in(0, TaskStatus::Completed, TaskPriority::High),
        ];

        let stats = compute(&tasks);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.due_today, 0);
    }

    #[test]
    fn test_status_tallies() {
        let tasks = vec![
            task_due_in(5, TaskStatus::Pending, TaskPriority::Low),
            task_due_in(5, TaskStatus::Pending, TaskPriority::Low),
            task_due_in(5, TaskStatus::InProgress, TaskPriority::Low),
            task_due_in(5, TaskStatus::Completed, TaskPriority::Low),
            task_due_in(5, TaskStatus::Cancelled, TaskPriority::Low),
        ];

        let stats = compute(&tasks);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.cancelled, 1);
    }

    #[test]
    fn test_priority_buckets_are_zero_filled() {
        let tasks = vec![
            task_due_in(5, TaskStatus::Pending, TaskPriority::Urgent),
            task_due_in(5, TaskStatus::Pending, TaskPriority::Urgent),
        ];

        let stats = compute(&tasks);
        assert_eq!(stats.by_priority.urgent, 2);
        assert_eq!(stats.by_priority.high, 0);
        assert_eq!(stats.by_priority.medium, 0);
        assert_eq!(stats.by_priority.low, 0);
    }

    #[test]
    fn test_empty_task_list_is_all_zeroes() {
        assert_eq!(compute(&[]), TaskStatistics::default());
    }
}
