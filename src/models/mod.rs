pub mod task;
pub mod user;

pub use task::{
    CreateTaskData, DueDateRange, PriorityCounts, PriorityFilter, SortOrder, StatusFilter, Task,
    TaskFilters, TaskPriority, TaskSortField, TaskSortOptions, TaskStatistics, TaskStatus,
    UpdateTaskData,
};
pub use user::User;
