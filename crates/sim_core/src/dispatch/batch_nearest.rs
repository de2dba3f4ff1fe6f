//! Batch minimum-distance dispatch via bipartite assignment.
//!
//! Poses dispatch as a one-to-one bipartite matching minimizing total grid
//! taxicab distance, solved with `pathfinding::kuhn_munkres`. `kuhn_munkres`
//! requires rows <= columns and maximizes total weight, so the smaller side
//! is used for rows and edge weights are negated distances.

use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

use super::{Candidate, DispatchPolicy};
use crate::geometry::distance;

/// Below this many candidates on the smaller side, a full assignment search
/// is not worth the setup cost; fall back to greedy nearest instead.
const GREEDY_FALLBACK_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateBatchNearest;

impl DispatchPolicy for ImmediateBatchNearest {
    fn assign(
        &self,
        waiting_trips: &[Candidate],
        idle_vehicles: &[Candidate],
        city_size: u32,
    ) -> Vec<(usize, usize)> {
        if waiting_trips.is_empty() || idle_vehicles.is_empty() {
            return Vec::new();
        }
        if waiting_trips.len().min(idle_vehicles.len()) <= GREEDY_FALLBACK_THRESHOLD {
            return super::ImmediateNearest.assign(waiting_trips, idle_vehicles, city_size);
        }

        // Rows are the smaller side so kuhn_munkres's rows <= columns holds.
        let (rows, columns, transposed) = if waiting_trips.len() <= idle_vehicles.len() {
            (waiting_trips, idle_vehicles, false)
        } else {
            (idle_vehicles, waiting_trips, true)
        };

        let max_distance = 2 * city_size as i64;
        let weights: Vec<i64> = rows
            .iter()
            .flat_map(|&(_, row_loc)| {
                columns.iter().map(move |&(_, col_loc)| {
                    max_distance - distance(row_loc, col_loc, city_size) as i64
                })
            })
            .collect();
        let matrix = Matrix::from_vec(rows.len(), columns.len(), weights)
            .expect("row-major weights sized rows * columns");

        let (_, row_to_column) = kuhn_munkres(&matrix);

        row_to_column
            .into_iter()
            .enumerate()
            .map(|(row, column)| {
                let (row_index, _) = rows[row];
                let (column_index, _) = columns[column];
                if transposed {
                    (column_index, row_index)
                } else {
                    (row_index, column_index)
                }
            })
            .collect()
    }
}
