use uuid::Uuid;

use crate::models::{
    CreateTaskData, Task, TaskFilters, TaskSortOptions, TaskStatistics, UpdateTaskData,
};

use super::{query, stats};

/// In-memory task collection plus the CRUD and query operations over it.
///
/// Every lookup that takes a task id also takes the caller's user id and
/// requires BOTH to match. A wrong owner and a missing task produce the same
/// `None`/`false`, so callers cannot tell other users' task ids apart from
/// ids that never existed.
pub struct TaskService {
    tasks: Vec<Task>,
}

impl Default for TaskService {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskService {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Builds a service over a pre-seeded collection. Used by tests and the
    /// demo binary.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Creates a task owned by `user_id` and appends it to the collection.
    pub async fn create_task(&mut self, data: CreateTaskData, user_id: Uuid) -> Task {
        let task = Task::new(data, user_id);
        self.tasks.push(task.clone());
        task
    }

    /// Applies a partial update to the task matching both `id` and `user_id`.
    ///
    /// A provided title or description is re-trimmed; if it is empty after
    /// trimming the current value is kept. `updated_at` is refreshed on every
    /// successful update. Returns `None` on a failed dual-match lookup.
    pub async fn update_task(
        &mut self,
        id: Uuid,
        updates: &UpdateTaskData,
        user_id: Uuid,
    ) -> Option<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id && task.user_id == user_id)?;

        if let Some(title) = &updates.title {
            let trimmed = title.trim();
            if !trimmed.is_empty() {
                task.title = trimmed.to_string();
            }
        }
        if let Some(description) = &updates.description {
            let trimmed = description.trim();
            if !trimmed.is_empty() {
                task.description = trimmed.to_string();
            }
        }
        if let Some(status) = updates.status {
            task.status = status;
        }
        if let Some(priority) = updates.priority {
            task.priority = priority;
        }
        if let Some(due_date) = updates.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = &updates.tags {
            task.tags = tags.clone();
        }
        task.updated_at = chrono::Utc::now();

        Some(task.clone())
    }

    /// Removes the task matching both `id` and `user_id`. Returns `false`
    /// (and leaves the collection untouched) on a failed dual-match lookup.
    pub async fn delete_task(&mut self, id: Uuid, user_id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks
            .retain(|task| !(task.id == id && task.user_id == user_id));
        self.tasks.len() < before
    }

    /// Dual-match lookup without mutation.
    pub fn get_task_by_id(&self, id: Uuid, user_id: Uuid) -> Option<Task> {
        self.tasks
            .iter()
            .find(|task| task.id == id && task.user_id == user_id)
            .cloned()
    }

    /// All tasks owned by `user_id`, in store order.
    pub fn get_tasks_by_user_id(&self, user_id: Uuid) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect()
    }

    /// The user's tasks narrowed by `filters` and optionally sorted.
    pub fn get_filtered_tasks(
        &self,
        filters: &TaskFilters,
        user_id: Uuid,
        sort: Option<&TaskSortOptions>,
    ) -> Vec<Task> {
        query::filter_and_sort(self.get_tasks_by_user_id(user_id), filters, sort)
    }

    /// Aggregate statistics over the user's tasks.
    pub fn get_task_statistics(&self, user_id: Uuid) -> TaskStatistics {
        stats::compute(&self.get_tasks_by_user_id(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn create_data(title: &str) -> CreateTaskData {
        CreateTaskData {
            title: title.to_string(),
            description: "description".to_string(),
            status: None,
            priority: None,
            due_date: Utc::now() + Duration::days(1),
            tags: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let mut service = TaskService::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let created = service.create_task(create_data("My Task"), owner).await;

        let fetched = service.get_task_by_id(created.id, owner).unwrap();
        assert_eq!(fetched, created);

        // Same id under a different owner is indistinguishable from absence
        assert!(service.get_task_by_id(created.id, other).is_none());
    }

    #[tokio::test]
    async fn test_update_partial_overwrite() {
        let mut service = TaskService::new();
        let owner = Uuid::new_v4();
        let created = service.create_task(create_data("Original"), owner).await;

        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;

        let updated = service
            .update_task(
                created.id,
                &UpdateTaskData {
                    title: Some("  Renamed  ".to_string()),
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
                owner,
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.status, TaskStatus::Completed);
        // Untouched fields keep their values
        assert_eq!(updated.description, "description");
        assert_eq!(updated.priority, TaskPriority::Medium);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_whitespace_title_keeps_old_value() {
        let mut service = TaskService::new();
        let owner = Uuid::new_v4();
        let created = service.create_task(create_data("Keep Me"), owner).await;

        let updated = service
            .update_task(
                created.id,
                &UpdateTaskData {
                    title: Some("   ".to_string()),
                    description: Some("".to_string()),
                    ..Default::default()
                },
                owner,
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Keep Me");
        assert_eq!(updated.description, "description");
    }

    #[tokio::test]
    async fn test_update_wrong_owner_does_not_mutate() {
        let mut service = TaskService::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let created = service.create_task(create_data("Protected"), owner).await;

        let result = service
            .update_task(
                created.id,
                &UpdateTaskData {
                    title: Some("Hijacked".to_string()),
                    ..Default::default()
                },
                other,
            )
            .await;
        assert!(result.is_none());

        let untouched = service.get_task_by_id(created.id, owner).unwrap();
        assert_eq!(untouched.title, "Protected");
        assert_eq!(untouched.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_delete_dual_match() {
        let mut service = TaskService::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let created = service.create_task(create_data("Doomed"), owner).await;

        // Wrong owner: refused and nothing removed
        assert!(!service.delete_task(created.id, other).await);
        assert_eq!(service.get_tasks_by_user_id(owner).len(), 1);

        assert!(service.delete_task(created.id, owner).await);
        assert!(service.get_tasks_by_user_id(owner).is_empty());

        // Already gone
        assert!(!service.delete_task(created.id, owner).await);
    }

    #[tokio::test]
    async fn test_get_tasks_by_user_id_scopes_by_owner() {
        let mut service = TaskService::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        service.create_task(create_data("Alice 1"), alice).await;
        service.create_task(create_data("Bob 1"), bob).await;
        service.create_task(create_data("Alice 2"), alice).await;

        let for_alice = service.get_tasks_by_user_id(alice);
        assert_eq!(for_alice.len(), 2);
        assert!(for_alice.iter().all(|t| t.user_id == alice));
    }

    #[tokio::test]
    async fn test_filtered_tasks_are_owner_scoped() {
        let mut service = TaskService::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let mut completed = create_data("Alice done");
        completed.status = Some(TaskStatus::Completed);
        service.create_task(completed, alice).await;

        let mut bob_completed = create_data("Bob done");
        bob_completed.status = Some(TaskStatus::Completed);
        service.create_task(bob_completed, bob).await;

        let filters = TaskFilters {
            status: Some(crate::models::StatusFilter::Only(TaskStatus::Completed)),
            ..Default::default()
        };
        let results = service.get_filtered_tasks(&filters, alice, None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Alice done");
    }
}
