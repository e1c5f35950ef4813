//! Per-session task state.
//!
//! The task orchestrator mirrors the signed-in user's tasks into a local
//! working set and applies mutations optimistically: the local copy is
//! patched from the store's return value rather than re-fetching the whole
//! collection.
//!
//! Mutations require an authenticated session and fail hard with
//! [`AppError::NotAuthenticated`] otherwise. Queries degrade softly instead,
//! returning empty results so read paths never have to handle an auth error.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{
    CreateTaskData, Task, TaskFilters, TaskSortOptions, TaskStatistics, TaskStatus, UpdateTaskData,
};
use crate::session::{SessionHandle, SessionOrchestrator};

use super::TaskService;

pub struct TaskOrchestrator {
    session: Weak<RefCell<SessionOrchestrator>>,
    service: TaskService,
    tasks: Vec<Task>,
    is_loading: bool,
    error: Option<String>,
    synced_user: Option<Uuid>,
}

impl TaskOrchestrator {
    pub fn new(session: &SessionHandle) -> Self {
        Self::with_service(session, TaskService::new())
    }

    /// Builds the orchestrator over a pre-seeded task service. Used by tests
    /// and the demo binary.
    pub fn with_service(session: &SessionHandle, service: TaskService) -> Self {
        let mut orchestrator = Self {
            session: Rc::downgrade(session),
            service,
            tasks: Vec::new(),
            is_loading: false,
            error: None,
            synced_user: None,
        };
        orchestrator.sync_with_session();
        orchestrator
    }

    fn session(&self) -> SessionHandle {
        self.session
            .upgrade()
            .expect("task orchestrator used outside an active session scope")
    }

    fn current_user(&self) -> Option<Uuid> {
        let session = self.session();
        let session = session.borrow();
        if session.is_authenticated() {
            session.user().map(|user| user.id)
        } else {
            None
        }
    }

    fn require_user(&self) -> Result<Uuid, AppError> {
        self.current_user().ok_or(AppError::NotAuthenticated)
    }

    /// Re-derives the local working set from the session's current identity.
    ///
    /// A no-op while the signed-in user is unchanged. On a change of identity
    /// (login, logout, or a different user signing in) the working set is
    /// reloaded from the store, or cleared when nobody is signed in.
    pub fn sync_with_session(&mut self) {
        let current = self.current_user();
        if current == self.synced_user {
            return;
        }

        self.synced_user = current;
        self.error = None;
        self.tasks = match current {
            Some(user_id) => self.service.get_tasks_by_user_id(user_id),
            None => Vec::new(),
        };
    }

    /// Validates and creates a task for the signed-in user, appending it to
    /// the local working set.
    pub async fn create_task(&mut self, data: CreateTaskData) -> Result<Task, AppError> {
        let user_id = self.require_user()?;

        if let Err(errors) = data.validate() {
            let err = AppError::from(errors);
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.is_loading = true;
        self.error = None;
        let task = self.service.create_task(data, user_id).await;
        self.tasks.push(task.clone());
        self.is_loading = false;
        Ok(task)
    }

    /// Applies a partial update and patches the local copy in place.
    pub async fn update_task(
        &mut self,
        id: Uuid,
        updates: &UpdateTaskData,
    ) -> Result<Task, AppError> {
        let user_id = self.require_user()?;

        if let Err(errors) = updates.validate() {
            let err = AppError::from(errors);
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.is_loading = true;
        self.error = None;
        let updated = self.service.update_task(id, updates, user_id).await;
        self.is_loading = false;

        match updated {
            Some(task) => {
                if let Some(local) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *local = task.clone();
                }
                Ok(task)
            }
            None => {
                let err = AppError::NotFound(format!("Task with id {} not found", id));
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Deletes the task and drops it from the local working set.
    pub async fn delete_task(&mut self, id: Uuid) -> Result<(), AppError> {
        let user_id = self.require_user()?;

        self.is_loading = true;
        self.error = None;
        let removed = self.service.delete_task(id, user_id).await;
        self.is_loading = false;

        if removed {
            self.tasks.retain(|task| task.id != id);
            Ok(())
        } else {
            let err = AppError::NotFound(format!("Task with id {} not found", id));
            self.error = Some(err.to_string());
            Err(err)
        }
    }

    /// Dual-match lookup through the store. `None` when unauthenticated.
    pub fn get_task_by_id(&self, id: Uuid) -> Option<Task> {
        let user_id = self.current_user()?;
        self.service.get_task_by_id(id, user_id)
    }

    /// The signed-in user's tasks in the given status. Empty when
    /// unauthenticated.
    pub fn get_tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        if self.current_user().is_none() {
            return Vec::new();
        }
        self.tasks
            .iter()
            .filter(|task| task.status == status)
            .cloned()
            .collect()
    }

    /// Filtered and optionally sorted view over the signed-in user's tasks.
    /// Empty when unauthenticated.
    pub fn get_filtered_tasks(
        &self,
        filters: &TaskFilters,
        sort: Option<&TaskSortOptions>,
    ) -> Vec<Task> {
        match self.current_user() {
            Some(user_id) => self.service.get_filtered_tasks(filters, user_id, sort),
            None => Vec::new(),
        }
    }

    /// Aggregate statistics over the signed-in user's tasks. All zeroes when
    /// unauthenticated.
    pub fn get_task_statistics(&self) -> TaskStatistics {
        match self.current_user() {
            Some(user_id) => self.service.get_task_statistics(user_id),
            None => TaskStatistics::default(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RegisterData;
    use crate::config::Config;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    async fn signed_in_session() -> SessionHandle {
        let config = Config::default();
        let handle =
            SessionOrchestrator::new(&config, Box::new(MemoryStorage::new())).into_handle();
        let result = handle
            .borrow_mut()
            .register(&RegisterData {
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;
        assert!(result.success);
        handle
    }

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
    async fn test_create_task_requires_authentication() {
        let config = Config::default();
        let handle =
            SessionOrchestrator::new(&config, Box::new(MemoryStorage::new())).into_handle();
        let mut orchestrator = TaskOrchestrator::new(&handle);

        let result = orchestrator.create_task(create_data("Nope")).await;
        assert!(matches!(result, Err(AppError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_queries_return_empty_when_unauthenticated() {
        let config = Config::default();
        let handle =
            SessionOrchestrator::new(&config, Box::new(MemoryStorage::new())).into_handle();
        let orchestrator = TaskOrchestrator::new(&handle);

        assert!(orchestrator
            .get_filtered_tasks(&TaskFilters::default(), None)
            .is_empty());
        assert!(orchestrator
            .get_tasks_by_status(TaskStatus::Pending)
            .is_empty());
        assert_eq!(orchestrator.get_task_statistics(), TaskStatistics::default());
        assert!(orchestrator.get_task_by_id(Uuid::new_v4()).is_none());
    }

    #[tokio::test]
    async fn test_create_task_invalid_data_sets_error() {
        let handle = signed_in_session().await;
        let mut orchestrator = TaskOrchestrator::new(&handle);

        let result = orchestrator.create_task(create_data("")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(orchestrator.error().is_some());
        assert!(orchestrator.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_optimistic_create_update_delete() {
        let handle = signed_in_session().await;
        let mut orchestrator = TaskOrchestrator::new(&handle);

        let task = orchestrator
            .create_task(create_data("Do the thing"))
            .await
            .unwrap();
        assert_eq!(orchestrator.tasks().len(), 1);
        // The store-backed lookup sees the new task too.
        assert_eq!(orchestrator.get_task_by_id(task.id).unwrap(), task);

        let updated = orchestrator
            .update_task(
                task.id,
                &UpdateTaskData {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(orchestrator.tasks()[0].status, TaskStatus::Completed);

        orchestrator.delete_task(task.id).await.unwrap();
        assert!(orchestrator.tasks().is_empty());
        assert!(orchestrator.error().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let handle = signed_in_session().await;
        let mut orchestrator = TaskOrchestrator::new(&handle);

        let result = orchestrator
            .update_task(Uuid::new_v4(), &UpdateTaskData::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(orchestrator.error().is_some());
    }

    #[tokio::test]
    #[should_panic(expected = "outside an active session scope")]
    async fn test_use_after_session_dropped_panics() {
        let handle = signed_in_session().await;
        let orchestrator = TaskOrchestrator::new(&handle);

        drop(handle);

        // The session handle is gone; any operation is a programming error.
        let _ = orchestrator.get_task_statistics();
    }

    #[tokio::test]
    async fn test_logout_clears_working_set_on_sync() {
        let handle = signed_in_session().await;
        let mut orchestrator = TaskOrchestrator::new(&handle);
        orchestrator
            .create_task(create_data("Ephemeral"))
            .await
            .unwrap();
        assert_eq!(orchestrator.tasks().len(), 1);

        handle.borrow_mut().logout();
        orchestrator.sync_with_session();

        assert!(orchestrator.tasks().is_empty());
        assert!(matches!(
            orchestrator.create_task(create_data("Nope")).await,
            Err(AppError::NotAuthenticated)
        ));
    }
}
