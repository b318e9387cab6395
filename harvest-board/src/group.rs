//! Status grouping: partition tasks into lanes in display order

use crate::types::{BoardView, Task};

/// Partition tasks into the four lanes, each sorted by order key.
///
/// Pure. Ties keep their input order because the sort is stable. Lane
/// membership comes from `status`, which already maps unknown values to
/// `to_do` when records are read.
pub fn group(tasks: &[Task]) -> BoardView {
    let mut board = BoardView::empty();

    for task in tasks {
        board.lane_mut(task.status).push(task.clone());
    }
    for lane in crate::types::Lane::ALL {
        board
            .lane_mut(lane)
            .sort_by(|a, b| a.order_key.total_cmp(&b.order_key));
    }

    board
}
