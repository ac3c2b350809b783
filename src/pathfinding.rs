//! Breadth-first shortest-path search over a generated maze.
//!
//! The solver explores the open-wall adjacency of a finished [`Maze`] from its entry cell and
//! reconstructs the minimum-hop route to the exit from a predecessor map. Neighbor candidates are
//! generated in a fixed North, South, East, West order, so ties between equally short routes
//! resolve the same way on every run.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    direction::Direction,
    maze::{Cell, Maze},
};

/// Observable snapshot of one solving step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveStep {
    /// A cell was dequeued and inspected.
    Visit(usize),
    /// The search finished; this final element carries the complete reconstructed route.
    ///
    /// An empty route means the queue drained without reaching the exit, which only happens when
    /// the supplied grid violates the connectivity contract.
    Path(Vec<usize>),
}

/// Computes the shortest entry-to-exit route in one shot.
///
/// This drives the identical algorithm as [`solve_steps`] to exhaustion. Given a connected grid
/// the returned route is non-empty, starts at the entry, ends at the exit and is of minimal
/// length among all wall-respecting routes. When entry and exit coincide the route is the
/// single-cell sequence. On a disconnected grid, which is a caller contract violation, the search
/// fails fast and returns an empty route.
#[must_use]
pub fn solve(maze: &Maze) -> Vec<usize> {
    let mut run = solve_steps(maze);
    let mut path = Vec::new();
    while let Some(step) = run.advance() {
        if let SolveStep::Path(found) = step {
            path = found;
        }
    }

    path
}

/// Starts a stepwise solving run over the given maze.
///
/// Each [`advance`](SolveRun::advance) call dequeues one cell and yields it as a
/// [`SolveStep::Visit`]; the final element is the complete route.
#[must_use]
pub fn solve_steps(maze: &Maze) -> SolveRun<'_> {
    let mut queue = VecDeque::new();
    queue.push_back(maze.entry());
    let mut visited = HashSet::new();
    let _ = visited.insert(maze.entry());

    SolveRun {
        maze,
        queue,
        visited,
        predecessors: HashMap::new(),
        reached: None,
        finished: false,
    }
}

/// Derives the direction string of a route.
///
/// Emits one `N`/`S`/`E`/`W` character per consecutive step by comparing linear-index deltas.
/// This is purely a display projection of the index route; non-adjacent consecutive indices
/// contribute nothing.
#[must_use]
pub fn to_directions(maze: &Maze, path: &[usize]) -> String {
    path.iter()
        .zip(path.iter().skip(1))
        .filter_map(|(&from, &to)| Direction::between(maze.width(), from, to))
        .map(Direction::letter)
        .collect()
}

/// Resumable breadth-first search run owning all loop-local state.
///
/// The run borrows the maze immutably, so several searches over the same grid can coexist.
pub struct SolveRun<'maze> {
    /// The maze being searched.
    maze: &'maze Maze,
    /// Cells discovered but not yet inspected, in hop-distance order.
    queue: VecDeque<usize>,
    /// Cells enqueued so far; guards against enqueueing a cell twice.
    visited: HashSet<usize>,
    /// Maps each discovered cell to the cell it was reached from.
    predecessors: HashMap<usize, usize>,
    /// The exit cell once it has been dequeued, ready for reconstruction.
    reached: Option<usize>,
    /// Whether the run has yielded its final element.
    finished: bool,
}

impl SolveRun<'_> {
    /// Performs one search step and returns its snapshot, or `None` once the run is exhausted.
    pub fn advance(&mut self) -> Option<SolveStep> {
        if self.finished {
            return None;
        }

        if let Some(exit) = self.reached {
            self.finished = true;
            return Some(SolveStep::Path(self.reconstruct(exit)));
        }

        let Some(current) = self.queue.pop_front() else {
            // Queue drained without dequeueing the exit: the grid is disconnected, which the
            // generator never produces. Fail fast with an empty route.
            self.finished = true;
            return Some(SolveStep::Path(Vec::new()));
        };

        if current == self.maze.exit() {
            // Terminating on dequeue rather than enqueue is safe: BFS dequeue order is
            // non-decreasing in hop distance.
            self.reached = Some(current);
            return Some(SolveStep::Visit(current));
        }

        for neighbor in accessible_neighbors(self.maze, current) {
            if self.visited.insert(neighbor) {
                let _ = self.predecessors.insert(neighbor, current);
                self.queue.push_back(neighbor);
            }
        }

        Some(SolveStep::Visit(current))
    }

    /// Walks the predecessor map from the exit back to the entry and reverses the result.
    fn reconstruct(&self, exit: usize) -> Vec<usize> {
        let mut path = vec![exit];
        let mut current = exit;
        while current != self.maze.entry() {
            let Some(&previous) = self.predecessors.get(&current) else {
                return Vec::new();
            };
            path.push(previous);
            current = previous;
        }
        path.reverse();

        path
    }
}

impl crate::stepwise::Stepwise for SolveRun<'_> {
    type Step = SolveStep;

    fn advance(&mut self) -> Option<SolveStep> {
        Self::advance(self)
    }
}

/// Yields the traversable neighbors of a cell in North, South, East, West order.
///
/// A direction is traversable iff its bit is clear on the current cell's own mask; thanks to the
/// wall-symmetry invariant the neighbor's mask never needs checking. Bounds are still verified so
/// a hand-built grid with open border walls cannot walk off the grid.
fn accessible_neighbors(maze: &Maze, current: usize) -> Vec<usize> {
    let cell = maze.cell(current);
    if matches!(cell, Cell::Obstacle) {
        return Vec::new();
    }
    let (x, y) = maze.coords(current);
    let mut neighbors = Vec::new();

    if cell.is_open_toward(Direction::North) && y > 0 {
        neighbors.push(current - maze.width());
    }
    if cell.is_open_toward(Direction::South) && y + 1 < maze.height() {
        neighbors.push(current + maze.width());
    }
    if cell.is_open_toward(Direction::East) && x + 1 < maze.width() {
        neighbors.push(current + 1);
    }
    if cell.is_open_toward(Direction::West) && x > 0 {
        neighbors.push(current - 1);
    }

    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generator, maze::CLOSED};

    /// Enumerates every simple entry-to-exit route by depth-first search and returns the length
    /// of the shortest one, measured in cells.
    fn brute_force_shortest(maze: &Maze) -> usize {
        fn explore(
            maze: &Maze,
            current: usize,
            seen: &mut HashSet<usize>,
            best: &mut usize,
            depth: usize,
        ) {
            if current == maze.exit() {
                *best = (*best).min(depth);
                return;
            }
            for neighbor in accessible_neighbors(maze, current) {
                if seen.insert(neighbor) {
                    explore(maze, neighbor, seen, best, depth + 1);
                    let _ = seen.remove(&neighbor);
                }
            }
        }

        let mut seen = HashSet::new();
        let _ = seen.insert(maze.entry());
        let mut best = usize::MAX;
        explore(maze, maze.entry(), &mut seen, &mut best, 1);
        best
    }

    fn open_two_by_two(entry: usize, exit: usize) -> Maze {
        let cells = vec![Cell::Open(0); 4];
        Maze::from_cells(2, 2, entry, exit, cells).expect("failed to build maze")
    }

    #[test]
    fn test_fully_open_grid_takes_south_before_east() {
        // From cell 0 both routes to 3 are two hops; the pinned North, South, East, West
        // exploration order must pick the one through cell 2.
        let maze = open_two_by_two(0, 3);

        let path = solve(&maze);
        assert_eq!(path, vec![0, 2, 3]);
        assert_eq!(to_directions(&maze, &path), "SE");
    }

    #[test]
    fn test_entry_equals_exit_yields_single_cell() {
        let maze = open_two_by_two(2, 2);
        assert_eq!(solve(&maze), vec![2]);
    }

    #[test]
    fn test_disconnected_grid_fails_fast_with_empty_route() {
        let cells = vec![Cell::Open(CLOSED); 4];
        let maze = Maze::from_cells(2, 2, 0, 3, cells).expect("failed to build maze");

        assert_eq!(solve(&maze), Vec::<usize>::new());
    }

    #[test]
    fn test_solved_route_connects_entry_to_exit() {
        let mut maze = Maze::new(11, 9, (0, 0), (10, 8), true, false).expect("failed to create maze");
        generator::generate(&mut maze, 42).expect("failed to generate maze");

        let path = solve(&maze);
        assert_eq!(path.first(), Some(&maze.entry()));
        assert_eq!(path.last(), Some(&maze.exit()));
        for (&from, &to) in path.iter().zip(path.iter().skip(1)) {
            let direction = Direction::between(maze.width(), from, to).expect("non-adjacent step");
            assert!(maze.cell(from).is_open_toward(direction));
        }
        assert_eq!(to_directions(&maze, &path).len(), path.len() - 1);
    }

    #[test]
    fn test_directions_skip_row_wrapping_pairs() {
        // Cells 1 and 2 of a 2x2 grid differ by one but sit on different rows; the projection
        // must not report an eastward move for them.
        let maze = open_two_by_two(0, 3);
        assert_eq!(to_directions(&maze, &[1, 2]), "");
        assert_eq!(to_directions(&maze, &[2, 1]), "");
    }

    #[test]
    fn test_route_is_shortest_against_brute_force() {
        // A non-perfect maze has alternative routes, making optimality worth checking.
        let mut maze = Maze::new(9, 7, (0, 0), (8, 6), false, false).expect("failed to create maze");
        generator::generate(&mut maze, 13).expect("failed to generate maze");

        let path = solve(&maze);
        assert_eq!(path.len(), brute_force_shortest(&maze));
    }

    #[test]
    fn test_stepwise_visits_end_with_the_full_route() {
        let mut maze = Maze::new(9, 7, (0, 0), (8, 6), true, false).expect("failed to create maze");
        generator::generate(&mut maze, 99).expect("failed to generate maze");

        let mut run = solve_steps(&maze);
        let mut visits = Vec::new();
        let mut final_path = None;
        while let Some(step) = run.advance() {
            match step {
                SolveStep::Visit(cell) => visits.push(cell),
                SolveStep::Path(path) => final_path = Some(path),
            }
        }
        assert_eq!(run.advance(), None);

        assert_eq!(visits.first(), Some(&maze.entry()));
        assert_eq!(visits.last(), Some(&maze.exit()));
        let unique: HashSet<usize> = visits.iter().copied().collect();
        assert_eq!(unique.len(), visits.len(), "a cell was dequeued twice");
        assert_eq!(final_path, Some(solve(&maze)));
    }
}
