//! Drag-and-drop planning for the kanban board.

use shared_types::{Task, TaskOrder};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("Card position {index} is outside a column of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Move the card at `from` to `to` within `column` (already in board order)
/// and number the whole column contiguously from zero.
pub fn plan_reorder(
    column: &[Arc<Task>],
    from: usize,
    to: usize,
) -> Result<Vec<TaskOrder>, ReorderError> {
    let len = column.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfRange { index, len });
        }
    }

    let mut ids: Vec<&str> = column.iter().map(|t| t.id.as_str()).collect();
    let moved = ids.remove(from);
    ids.insert(to, moved);

    Ok(ids
        .into_iter()
        .zip(0u32..)
        .map(|(id, order)| TaskOrder {
            id: id.to_string(),
            order,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(ids: &[&str]) -> Vec<Arc<Task>> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let mut task = Task::new(*id, "p1", "u1");
                task.id = (*id).to_string();
                task.order = (i as u32) * 10;
                Arc::new(task)
            })
            .collect()
    }

    fn order_of(plan: &[TaskOrder]) -> Vec<(&str, u32)> {
        plan.iter().map(|o| (o.id.as_str(), o.order)).collect()
    }

    #[test]
    fn test_move_down() {
        let plan = plan_reorder(&column(&["a", "b", "c"]), 0, 2).unwrap();
        assert_eq!(order_of(&plan), vec![("b", 0), ("c", 1), ("a", 2)]);
    }

    #[test]
    fn test_move_up() {
        let plan = plan_reorder(&column(&["a", "b", "c"]), 2, 0).unwrap();
        assert_eq!(order_of(&plan), vec![("c", 0), ("a", 1), ("b", 2)]);
    }

    #[test]
    fn test_same_slot_renumbers() {
        let plan = plan_reorder(&column(&["a", "b"]), 1, 1).unwrap();
        assert_eq!(order_of(&plan), vec![("a", 0), ("b", 1)]);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            plan_reorder(&column(&["a"]), 0, 3),
            Err(ReorderError::OutOfRange { index: 3, len: 1 })
        );
        assert!(plan_reorder(&[], 0, 0).is_err());
    }
}
