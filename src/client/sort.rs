use std::cmp::Ordering;

use crate::models::Todo;

/// Presentation orderings offered by the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Created,
    /// Case-insensitive by title.
    Title,
    /// Open todos before completed ones.
    CompletedLast,
    /// Completed todos before open ones.
    CompletedFirst,
}

/// Stable sort, so todos that compare equal keep their server order.
pub fn sort_todos(todos: &mut [Todo], order: SortOrder) {
    todos.sort_by(|a, b| compare(a, b, order));
}

fn compare(a: &Todo, b: &Todo, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Created => b.created_at.cmp(&a.created_at),
        SortOrder::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
        SortOrder::CompletedLast => a.completed.cmp(&b.completed),
        SortOrder::CompletedFirst => b.completed.cmp(&a.completed),
    }
}
