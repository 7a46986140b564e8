//! Ranking of search results.
//!
//! The search returns a Pareto set with no useful order; this presents the
//! most useful options first.

use std::cmp::{Ordering, Reverse};

use super::Path;

/// Rank paths by preference.
///
/// Paths are ranked by:
/// 1. Arrival time (earlier is better)
/// 2. Number of transfers (fewer is better)
/// 3. Generalized cost (lower is better)
/// 4. Departure time (later is better)
///
/// Returns paths sorted best-first.
pub fn rank_paths(mut paths: Vec<Path>) -> Vec<Path> {
    paths.sort_by(compare);
    paths
}

fn compare(a: &Path, b: &Path) -> Ordering {
    rank_key(a).cmp(&rank_key(b))
}

fn rank_key(path: &Path) -> (i32, u32, i32, Reverse<i32>) {
    (
        path.end_time(),
        path.number_of_transfers(),
        path.c1(),
        Reverse(path.start_time()),
    )
}
