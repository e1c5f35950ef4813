//! Filter and sort engine over task slices.
//!
//! Filters combine with AND; each one narrows the set further. Sorting is
//! stable, so tasks that compare equal keep their store order.

use crate::models::{
    PriorityFilter, SortOrder, StatusFilter, Task, TaskFilters, TaskSortField, TaskSortOptions,
};

/// Narrows a task list by every filter present in `filters`.
pub fn apply_filters(tasks: Vec<Task>, filters: &TaskFilters) -> Vec<Task> {
    let mut filtered = tasks;

    if let Some(StatusFilter::Only(status)) = filters.status {
        filtered.retain(|task| task.status == status);
    }

    if let Some(PriorityFilter::Only(priority)) = filters.priority {
        filtered.retain(|task| task.priority == priority);
    }

    if let Some(term) = &filters.search_term {
        let term = term.to_lowercase();
        filtered.retain(|task| {
            task.title.to_lowercase().contains(&term)
                || task.description.to_lowercase().contains(&term)
                || task.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
        });
    }

    if let Some(range) = &filters.due_date_range {
        filtered.retain(|task| task.due_date >= range.start && task.due_date <= range.end);
    }

    if let Some(tags) = &filters.tags {
        if !tags.is_empty() {
            filtered.retain(|task| task.tags.iter().any(|tag| tags.contains(tag)));
        }
    }

    filtered
}

/// Stable in-place sort by the requested field and direction.
pub fn sort_tasks(tasks: &mut [Task], sort: &TaskSortOptions) {
    tasks.sort_by(|a, b| {
        let ordering = match sort.field {
            TaskSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            TaskSortField::DueDate => a.due_date.cmp(&b.due_date),
            TaskSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskSortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
            TaskSortField::Status => a.status.rank().cmp(&b.status.rank()),
        };
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Convenience wrapper: filter, then optionally sort.
pub fn filter_and_sort(
    tasks: Vec<Task>,
    filters: &TaskFilters,
    sort: Option<&TaskSortOptions>,
) -> Vec<Task> {
    let mut result = apply_filters(tasks, filters);
    if let Some(sort) = sort {
        sort_tasks(&mut result, sort);
    }
    result
}
