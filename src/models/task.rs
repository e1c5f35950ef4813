use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Maximum number of tags on a single task.
const MAX_TAGS: u64 = 10;
/// Maximum length of a single tag.
const MAX_TAG_LENGTH: usize = 50;

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.chars().count() > MAX_TAG_LENGTH) {
        return Err(ValidationError::new("tag_too_long"));
    }
    Ok(())
}

/// Represents the priority of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority. Default for new tasks.
    Medium,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

impl TaskPriority {
    /// Sort rank: urgent outranks high outranks medium outranks low.
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
            TaskPriority::Urgent => 4,
        }
    }
}

/// Represents the status of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started. Default for new tasks.
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is finished.
    Completed,
    /// Task was abandoned.
    Cancelled,
}

impl TaskStatus {
    /// Sort rank following the task lifecycle: pending < in_progress < completed < cancelled.
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 1,
            TaskStatus::InProgress => 2,
            TaskStatus::Completed => 3,
            TaskStatus::Cancelled => 4,
        }
    }
}

/// A task entity as held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
    /// Identifier of the owning user. Ownership is enforced on every
    /// mutating and read-by-id operation.
    pub user_id: Uuid,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskData {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters.
    #[validate(length(max = 1000))]
    pub description: String,

    /// Defaults to `pending` when omitted.
    pub status: Option<TaskStatus>,

    /// Defaults to `medium` when omitted.
    pub priority: Option<TaskPriority>,

    pub due_date: DateTime<Utc>,

    /// Defaults to an empty list when omitted. At most 10 tags of up to
    /// 50 characters each.
    #[validate(length(max = "MAX_TAGS"), custom = "validate_tags")]
    pub tags: Option<Vec<String>>,
}

/// Partial update for an existing task. Every field is optional; omitted
/// fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskData {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = "MAX_TAGS"), custom = "validate_tags")]
    pub tags: Option<Vec<String>>,
}

/// Status narrowing for a task query. The `all` sentinel is accepted from
/// callers (filter widgets send it) and is equivalent to no filter at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[serde(rename = "all")]
    All,
    #[serde(untagged)]
    Only(TaskStatus),
}

/// Priority narrowing for a task query, with the same `all` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityFilter {
    #[serde(rename = "all")]
    All,
    #[serde(untagged)]
    Only(TaskPriority),
}

/// Inclusive due-date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueDateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Query parameters for narrowing a user's task list. All fields are optional
/// and combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilters {
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
    /// Case-insensitive substring match against title, description, or any tag.
    pub search_term: Option<String>,
    pub due_date_range: Option<DueDateRange>,
    /// A task matches when any of its tags appears in this set.
    pub tags: Option<Vec<String>>,
}

/// Sortable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortField {
    /// Case-insensitive lexical order.
    Title,
    DueDate,
    CreatedAt,
    /// Rank order: urgent > high > medium > low.
    Priority,
    /// Rank order: pending < in_progress < completed < cancelled.
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSortOptions {
    pub field: TaskSortField,
    pub order: SortOrder,
}

/// Per-priority tallies. All four buckets are always present, zero-filled
/// when a user has no tasks at that priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub urgent: usize,
}

/// Aggregate statistics over a user's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistics {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Tasks whose due date (date-only) is strictly before today and that are
    /// not completed.
    pub overdue: usize,
    /// Tasks due today (date-only) that are not completed.
    pub due_today: usize,
    pub by_priority: PriorityCounts,
}

impl Task {
    /// Creates a new `Task` from `CreateTaskData` and the owner's user id.
    ///
    /// Trims title and description, applies the status/priority/tags defaults,
    /// and sets `created_at`/`updated_at` to the current time.
    pub fn new(data: CreateTaskData, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: data.title.trim().to_string(),
            description: data.description.trim().to_string(),
            status: data.status.unwrap_or(TaskStatus::Pending),
            priority: data.priority.unwrap_or(TaskPriority::Medium),
            due_date: data.due_date,
            user_id,
            tags: data.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}
