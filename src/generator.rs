//! Maze generation through loop-erased random walks (Wilson's algorithm).
//!
//! Generation repeatedly performs loop-erased random walks from unvisited cells until each walk
//! hits the already-committed spanning tree, then carves the walked passages into the grid. The
//! result is a uniform random spanning tree over all non-obstacle cells, optionally augmented
//! with extra loop edges when a non-perfect maze was requested. The whole process is driven by an
//! explicitly seeded random source, so a fixed seed reproduces the grid bit for bit in both the
//! one-shot and the stepwise execution mode.

use std::{collections::HashSet, mem};

use rand::{rngs::StdRng, seq::SliceRandom as _, Rng as _, SeedableRng as _};

use crate::{
    direction::Direction,
    error::MazeError,
    maze::{Cell, Maze},
};

/// Cell offsets of the "42" sign relative to the grid center.
///
/// The sign is carved unconditionally into every generated maze and requires a width greater
/// than 8 and a height greater than 6 to fit.
const SIGN_OFFSETS: [(isize, isize); 18] = [
    (-1, 0),
    (-2, 0),
    (-3, 0),
    (-3, -1),
    (-3, -2),
    (-1, 1),
    (-1, 2),
    (1, 0),
    (2, 0),
    (3, 0),
    (3, -1),
    (3, -2),
    (2, -2),
    (1, -2),
    (1, 1),
    (1, 2),
    (2, 2),
    (3, 2),
];

/// Wall masks identifying a dead end, one per single open direction.
const DEAD_END_MASKS: [u8; 4] = [0b0111, 0b1011, 0b1101, 0b1110];

/// Transient per-cell bookkeeping of the random walk.
///
/// This state is private to a generation run and is resolved to plain committed cells once the
/// run finishes; it never appears in the [`Maze`] itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WalkState {
    /// Not yet part of any tree or in-progress walk.
    Unvisited,
    /// Tentatively part of the current walk's path.
    Pending,
    /// Revisited while pending in the current path; triggers loop erasure.
    LoopMarker,
    /// Finished tree member.
    Committed,
}

/// Observable snapshot of one generation step.
///
/// Yielded by [`GenerationRun::advance`] after each unit of work so an animation driver can
/// render the committed tree and the walk in progress.
#[derive(Clone, Debug)]
pub struct GenerationStep {
    /// Cells already committed to the spanning tree.
    pub committed: HashSet<usize>,
    /// The current walk's path, oldest cell first.
    pub path: Vec<usize>,
}

/// Generates the maze in one shot.
///
/// This runs the identical algorithm as [`generate_steps`] driven to exhaustion, so the grid it
/// commits is bit-for-bit the one a stepwise run with the same seed would leave behind.
///
/// # Errors
///
/// - [`MazeError::GridTooSmall`] when the dimensions cannot fit the "42" sign.
/// - [`MazeError::InvalidEntryExit`] when the entry or exit lands on an obstacle cell.
///
/// Both failures happen before any randomness is consumed and leave the maze unmutated.
pub fn generate(maze: &mut Maze, seed: u64) -> Result<(), MazeError> {
    let mut run = generate_steps(maze, seed)?;
    while run.advance().is_some() {}

    Ok(())
}

/// Starts a stepwise generation run.
///
/// Validation and the decorative layout happen here, up front; the returned run then performs one
/// walk step per [`advance`](GenerationRun::advance) call.
///
/// # Errors
///
/// - [`MazeError::GridTooSmall`] when the dimensions cannot fit the "42" sign.
/// - [`MazeError::InvalidEntryExit`] when the entry or exit lands on an obstacle cell.
pub fn generate_steps(maze: &mut Maze, seed: u64) -> Result<GenerationRun<'_>, MazeError> {
    GenerationRun::new(maze, seed)
}

/// Resumable generation run owning all loop-local state.
///
/// The run holds the seeded random source, the set of still-available cells, the adjacency list
/// and the in-progress walk path. Dropping the run mid-way simply abandons the partially carved
/// maze; there are no cleanup obligations.
pub struct GenerationRun<'maze> {
    /// The maze being carved.
    maze: &'maze mut Maze,
    /// Seeded random source driving every random decision of the run.
    rng: StdRng,
    /// Playable neighbors per cell; obstacles are excluded entirely.
    neighbors: Vec<Vec<usize>>,
    /// Transient walk bookkeeping per cell.
    walk: Vec<WalkState>,
    /// Cells not yet part of any tree or in-progress walk.
    available: Vec<usize>,
    /// Position of each cell inside [`available`](Self::available), or `usize::MAX` when absent.
    slots: Vec<usize>,
    /// Cells already committed to the spanning tree.
    committed: HashSet<usize>,
    /// The current walk's path, oldest cell first.
    path: Vec<usize>,
    /// Whether the run has finished all of its work.
    finished: bool,
}

impl<'maze> GenerationRun<'maze> {
    /// Validates the maze, lays out the decorative obstacles and seeds the tree root.
    ///
    /// # Errors
    ///
    /// - [`MazeError::GridTooSmall`] when the dimensions cannot fit the "42" sign.
    /// - [`MazeError::InvalidEntryExit`] when the entry or exit lands on an obstacle cell.
    fn new(maze: &'maze mut Maze, seed: u64) -> Result<Self, MazeError> {
        let width = maze.width();
        let height = maze.height();
        if width <= 8 || height <= 6 {
            return Err(MazeError::GridTooSmall);
        }

        // The obstacle layout is computed on a scratch buffer first so a rejected entry or exit
        // leaves the maze untouched.
        let mut obstacle = vec![false; maze.len()];
        if maze.heart() {
            mask_heart(width, height, &mut obstacle);
        }
        mask_sign(width, height, &mut obstacle);

        if blocked(&obstacle, maze.entry()) || blocked(&obstacle, maze.exit()) {
            return Err(MazeError::InvalidEntryExit);
        }

        for (idx, &masked) in obstacle.iter().enumerate() {
            if masked {
                maze.set_obstacle(idx);
            }
        }

        let neighbors = playable_neighbors(width, height, &obstacle);

        let mut available = Vec::new();
        let mut slots = vec![usize::MAX; maze.len()];
        for (idx, (&masked, slot)) in obstacle.iter().zip(slots.iter_mut()).enumerate() {
            if !masked {
                *slot = available.len();
                available.push(idx);
            }
        }

        let mut run = Self {
            maze,
            rng: StdRng::seed_from_u64(seed),
            neighbors,
            walk: vec![WalkState::Unvisited; obstacle.len()],
            available,
            slots,
            committed: HashSet::new(),
            path: Vec::new(),
            finished: false,
        };

        // The very first pop designates the permanent tree root: a single fully-walled committed
        // cell with no prior walk.
        if let Some(root) = run.pop_random_available() {
            run.set_walk(root, WalkState::Committed);
            let _ = run.committed.insert(root);
        } else {
            run.finished = true;
        }

        Ok(run)
    }

    /// Performs one walk step and returns its snapshot, or `None` once generation has finished.
    pub fn advance(&mut self) -> Option<GenerationStep> {
        if self.finished {
            return None;
        }

        if self.path.is_empty() {
            let Some(start) = self.pop_random_available() else {
                // Spanning tree complete; optionally open loops at dead ends, then stop.
                if !self.maze.is_perfect() {
                    self.open_dead_ends();
                }
                self.finished = true;
                return Some(self.snapshot());
            };
            self.set_walk(start, WalkState::Pending);
            self.path.push(start);
        }

        self.walk_step();
        Some(self.snapshot())
    }

    /// Advances the in-progress walk by one random neighbor.
    fn walk_step(&mut self) {
        let Some(&current) = self.path.last() else {
            return;
        };
        let choice = self
            .neighbors
            .get(current)
            .and_then(|candidates| candidates.choose(&mut self.rng))
            .copied();
        let Some(next) = choice else {
            // A cell sealed off by obstacles has nowhere to walk; commit it as its own
            // single-node component.
            self.commit_path();
            return;
        };
        let Some(&state) = self.walk.get(next) else {
            return;
        };

        match state {
            WalkState::Unvisited => {
                self.remove_available(next);
                self.set_walk(next, WalkState::Pending);
                self.path.push(next);
            }
            // A pending neighbor means the walk crossed itself. The cell is only ever marked as a
            // loop within this same call; the marker triggers erasure of the loop suffix and is
            // then resolved back to pending.
            WalkState::Pending | WalkState::LoopMarker => {
                self.set_walk(next, WalkState::LoopMarker);
                self.erase_loop(next);
                self.set_walk(next, WalkState::Pending);
            }
            WalkState::Committed => {
                self.path.push(next);
                self.commit_path();
            }
        }
    }

    /// Erases the path suffix created since the first visit of `found`.
    ///
    /// Every erased cell is reset to unvisited and returned to the available set; the walk then
    /// continues from the re-found cell.
    fn erase_loop(&mut self, found: usize) {
        while let Some(&tail) = self.path.last() {
            if tail == found {
                break;
            }
            if let Some(cell) = self.path.pop() {
                self.set_walk(cell, WalkState::Unvisited);
                self.restore_available(cell);
            }
        }
    }

    /// Commits the finished walk path to the spanning tree.
    ///
    /// This is the only point where walls actually open: for every consecutive pair the facing
    /// wall bits on both sides are cleared, then every path cell becomes a committed tree member.
    fn commit_path(&mut self) {
        let path = mem::take(&mut self.path);

        for (&previous, &current) in path.iter().zip(path.iter().skip(1)) {
            if let Some(direction) = Direction::between(self.maze.width(), previous, current) {
                self.maze.open_passage(previous, current, direction);
            }
        }

        for &cell in &path {
            self.set_walk(cell, WalkState::Committed);
            let _ = self.committed.insert(cell);
        }
    }

    /// Opens one extra passage at every dead end, turning the tree into a looped maze.
    ///
    /// The scan walks cells in index order and only touches cells whose mask still matches a
    /// single-opening pattern at visit time; existing openings are never removed.
    fn open_dead_ends(&mut self) {
        for cell in 0..self.maze.len() {
            let Cell::Open(mask) = self.maze.cell(cell) else {
                continue;
            };
            if !DEAD_END_MASKS.contains(&mask) {
                continue;
            }
            let choice = self
                .neighbors
                .get(cell)
                .and_then(|candidates| candidates.choose(&mut self.rng))
                .copied();
            let Some(neighbor) = choice else {
                continue;
            };
            if let Some(direction) = Direction::between(self.maze.width(), cell, neighbor) {
                self.maze.open_passage(cell, neighbor, direction);
            }
        }
    }

    /// Captures the current committed set and walk path for observers.
    fn snapshot(&self) -> GenerationStep {
        GenerationStep {
            committed: self.committed.clone(),
            path: self.path.clone(),
        }
    }

    /// Pops one uniformly random cell from the available set.
    fn pop_random_available(&mut self) -> Option<usize> {
        if self.available.is_empty() {
            return None;
        }
        let pos = self.rng.gen_range(0..self.available.len());
        Some(self.remove_at(pos))
    }

    /// Removes the cell stored at the given position of the available vector.
    fn remove_at(&mut self, pos: usize) -> usize {
        let cell = self.available.swap_remove(pos);
        self.set_slot(cell, usize::MAX);
        if let Some(&moved) = self.available.get(pos) {
            self.set_slot(moved, pos);
        }
        cell
    }

    /// Removes a specific cell from the available set.
    fn remove_available(&mut self, cell: usize) {
        let Some(&pos) = self.slots.get(cell) else {
            return;
        };
        if pos != usize::MAX {
            let _ = self.remove_at(pos);
        }
    }

    /// Returns an erased cell to the available set.
    fn restore_available(&mut self, cell: usize) {
        self.set_slot(cell, self.available.len());
        self.available.push(cell);
    }

    /// Writes the walk state of a cell.
    fn set_walk(&mut self, cell: usize, state: WalkState) {
        if let Some(slot) = self.walk.get_mut(cell) {
            *slot = state;
        }
    }

    /// Writes the available-set position of a cell.
    fn set_slot(&mut self, cell: usize, pos: usize) {
        if let Some(slot) = self.slots.get_mut(cell) {
            *slot = pos;
        }
    }
}

impl crate::stepwise::Stepwise for GenerationRun<'_> {
    type Step = GenerationStep;

    fn advance(&mut self) -> Option<GenerationStep> {
        Self::advance(self)
    }
}

/// Reports whether a cell of the scratch obstacle buffer is blocked.
///
/// Out-of-range cells count as blocked.
fn blocked(obstacle: &[bool], cell: usize) -> bool {
    obstacle.get(cell).copied().unwrap_or(true)
}

/// Marks every cell outside the heart silhouette as an obstacle.
///
/// The silhouette is evaluated per cell from the closed-form heart inequality in normalized
/// coordinates; cells where the expression is positive lie outside the heart.
#[expect(
    clippy::suboptimal_flops,
    reason = "The silhouette must match previously generated grids digit for digit, so the \
              arithmetic keeps its original evaluation order instead of fused operations."
)]
fn mask_heart(width: usize, height: usize, obstacle: &mut [bool]) {
    let half_width = width as f64 / 2.0;
    let half_height = height as f64 / 2.0;
    let scale_x = width as f64 / 2.5;
    let scale_y = height as f64 / 2.5;

    for y in 0..height {
        let py = (half_height - y as f64) / scale_y + 0.2;
        for x in 0..width {
            let px = (x as f64 - half_width) / scale_x;
            let equation = (px * px + py * py - 1.0).powi(3) - px * px * py * py * py;
            if equation > 0.0 {
                if let Some(slot) = obstacle.get_mut(y * width + x) {
                    *slot = true;
                }
            }
        }
    }
}

/// Marks the cells of the "42" sign around the grid center as obstacles.
fn mask_sign(width: usize, height: usize, obstacle: &mut [bool]) {
    let center_x = width / 2;
    let center_y = height / 2;

    for (dx, dy) in SIGN_OFFSETS {
        let Some(x) = center_x.checked_add_signed(dx) else {
            continue;
        };
        let Some(y) = center_y.checked_add_signed(dy) else {
            continue;
        };
        if x < width && y < height {
            if let Some(slot) = obstacle.get_mut(y * width + x) {
                *slot = true;
            }
        }
    }
}

/// Builds the playable 4-neighborhood adjacency list.
///
/// Out-of-bounds and obstacle neighbors are omitted entirely, so cells adjacent to obstacles
/// simply have fewer walk candidates.
fn playable_neighbors(width: usize, height: usize, obstacle: &[bool]) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); obstacle.len()];

    for y in 0..height {
        for x in 0..width {
            let cell = y * width + x;
            if blocked(obstacle, cell) {
                continue;
            }
            let mut adjacent = Vec::new();
            if x > 0 && !blocked(obstacle, cell - 1) {
                adjacent.push(cell - 1);
            }
            if x < width - 1 && !blocked(obstacle, cell + 1) {
                adjacent.push(cell + 1);
            }
            if y > 0 && !blocked(obstacle, cell - width) {
                adjacent.push(cell - width);
            }
            if y < height - 1 && !blocked(obstacle, cell + width) {
                adjacent.push(cell + width);
            }
            if let Some(slot) = neighbors.get_mut(cell) {
                *slot = adjacent;
            }
        }
    }

    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::CLOSED;

    /// Counts playable cells in a maze.
    fn playable_count(maze: &Maze) -> usize {
        (0..maze.len())
            .filter(|&idx| !maze.cell(idx).is_obstacle())
            .count()
    }

    /// Counts open wall pairs by scanning each cell's East and South sides once.
    fn open_pairs(maze: &Maze) -> usize {
        let mut pairs = 0;
        for idx in 0..maze.len() {
            let (x, y) = maze.coords(idx);
            if x + 1 < maze.width() && maze.cell(idx).is_open_toward(Direction::East) {
                pairs += 1;
            }
            if y + 1 < maze.height() && maze.cell(idx).is_open_toward(Direction::South) {
                pairs += 1;
            }
        }
        pairs
    }

    /// Flood-fills the open-wall graph from the entry and returns the reached cell count.
    fn reachable_count(maze: &Maze) -> usize {
        let mut seen = HashSet::new();
        let _ = seen.insert(maze.entry());
        let mut stack = vec![maze.entry()];

        while let Some(current) = stack.pop() {
            let (x, y) = maze.coords(current);
            let cell = maze.cell(current);
            let moves = [
                (Direction::North, y > 0, current.wrapping_sub(maze.width())),
                (Direction::South, y + 1 < maze.height(), current + maze.width()),
                (Direction::East, x + 1 < maze.width(), current + 1),
                (Direction::West, x > 0, current.wrapping_sub(1)),
            ];
            for (direction, in_bounds, next) in moves {
                if in_bounds && cell.is_open_toward(direction) && seen.insert(next) {
                    stack.push(next);
                }
            }
        }

        seen.len()
    }

    fn generated(width: usize, height: usize, seed: u64, perfect: bool, heart: bool) -> Maze {
        let exit = (width - 1, height - 1);
        let mut maze =
            Maze::new(width, height, (0, 0), exit, perfect, heart).expect("failed to create maze");
        generate(&mut maze, seed).expect("failed to generate maze");
        maze
    }

    #[test]
    fn test_generation_is_deterministic() {
        let first = generated(11, 9, 42, true, false);
        let second = generated(11, 9, 42, true, false);

        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_differ() {
        let first = generated(11, 9, 42, true, false);
        let second = generated(11, 9, 43, true, false);

        assert_ne!(first, second);
    }

    #[test]
    fn test_stepwise_matches_one_shot() {
        let one_shot = generated(11, 9, 7, true, false);

        let mut stepped =
            Maze::new(11, 9, (0, 0), (10, 8), true, false).expect("failed to create maze");
        {
            let mut run = generate_steps(&mut stepped, 7).expect("failed to start run");
            while run.advance().is_some() {}
        }

        assert_eq!(one_shot, stepped);
    }

    #[test]
    fn test_throttled_run_preserves_final_grid() {
        use crate::stepwise::{Stepwise as _, Tempo};

        let one_shot = generated(11, 9, 55, true, false);

        let mut stepped =
            Maze::new(11, 9, (0, 0), (10, 8), true, false).expect("failed to create maze");
        {
            let run = generate_steps(&mut stepped, 55).expect("failed to start run");
            let mut throttled = Tempo::new(run, 7);
            while throttled.advance().is_some() {}
        }

        assert_eq!(one_shot, stepped);
    }

    #[test]
    fn test_committed_set_grows_monotonically() {
        let mut maze = Maze::new(9, 7, (0, 0), (8, 6), true, false).expect("failed to create maze");
        let mut run = generate_steps(&mut maze, 3).expect("failed to start run");

        let mut previous: HashSet<usize> = HashSet::new();
        while let Some(step) = run.advance() {
            assert!(previous.is_subset(&step.committed));
            for &cell in &step.path {
                assert!(!step.committed.contains(&cell));
            }
            previous = step.committed;
        }
    }

    #[test]
    fn test_sign_cells_are_obstacles() {
        let maze = generated(9, 7, 1, true, false);

        let obstacles = maze.len() - playable_count(&maze);
        assert_eq!(obstacles, SIGN_OFFSETS.len());
        for (dx, dy) in SIGN_OFFSETS {
            let x = (9 / 2_usize).checked_add_signed(dx).expect("sign cell in bounds");
            let y = (7 / 2_usize).checked_add_signed(dy).expect("sign cell in bounds");
            assert!(maze.cell_at(x, y).is_obstacle());
        }
    }

    #[test]
    fn test_wall_symmetry_and_no_openings_into_obstacles() {
        let maze = generated(11, 9, 99, false, false);

        for idx in 0..maze.len() {
            let cell = maze.cell(idx);
            if cell.is_obstacle() {
                continue;
            }
            let (x, y) = maze.coords(idx);
            for direction in Direction::ALL {
                if !cell.is_open_toward(direction) {
                    continue;
                }
                let neighbor = match direction {
                    Direction::North => {
                        assert!(y > 0, "open wall off the top edge");
                        idx - maze.width()
                    }
                    Direction::South => {
                        assert!(y + 1 < maze.height(), "open wall off the bottom edge");
                        idx + maze.width()
                    }
                    Direction::East => {
                        assert!(x + 1 < maze.width(), "open wall off the right edge");
                        idx + 1
                    }
                    Direction::West => {
                        assert!(x > 0, "open wall off the left edge");
                        idx - 1
                    }
                };
                assert!(
                    !maze.cell(neighbor).is_obstacle(),
                    "open wall into an obstacle"
                );
                assert!(
                    maze.cell(neighbor).is_open_toward(direction.opposite()),
                    "asymmetric wall pair"
                );
            }
        }
    }

    #[test]
    fn test_perfect_maze_is_spanning_tree() {
        let maze = generated(11, 9, 1234, true, false);

        let playable = playable_count(&maze);
        assert_eq!(open_pairs(&maze), playable - 1);
        assert_eq!(reachable_count(&maze), playable);
    }

    #[test]
    fn test_non_perfect_only_opens_dead_ends_further() {
        // Same seed: the random stream is identical until augmentation, so the perfect maze is
        // exactly the spanning tree underneath the non-perfect one.
        let perfect = generated(11, 9, 77, true, false);
        let looped = generated(11, 9, 77, false, false);

        for idx in 0..perfect.len() {
            let (Cell::Open(before), Cell::Open(after)) = (perfect.cell(idx), looped.cell(idx))
            else {
                assert_eq!(perfect.cell(idx), looped.cell(idx));
                continue;
            };
            // Augmentation may only clear bits, never close a passage.
            assert_eq!(after & !before, 0);
        }

        // Every newly opened pair must touch a cell that was a dead end in the spanning tree.
        let mut opened = 0;
        for idx in 0..perfect.len() {
            let (x, y) = perfect.coords(idx);
            let sides = [
                (Direction::East, x + 1 < perfect.width(), idx + 1),
                (Direction::South, y + 1 < perfect.height(), idx + perfect.width()),
            ];
            for (direction, in_bounds, neighbor) in sides {
                if !in_bounds
                    || perfect.cell(idx).is_open_toward(direction)
                    || !looped.cell(idx).is_open_toward(direction)
                {
                    continue;
                }
                opened += 1;
                let endpoint_was_dead_end = [idx, neighbor].iter().any(|&cell| {
                    matches!(perfect.cell(cell), Cell::Open(mask) if DEAD_END_MASKS.contains(&mask))
                });
                assert!(endpoint_was_dead_end, "loop opened away from any dead end");
            }
        }
        assert!(opened > 0, "augmentation opened no extra passage");
        assert!(open_pairs(&looped) > open_pairs(&perfect));
        assert_eq!(reachable_count(&looped), playable_count(&looped));
    }

    #[test]
    fn test_grid_too_small_leaves_maze_untouched() {
        let mut maze = Maze::new(8, 7, (0, 0), (7, 6), true, false).expect("failed to create maze");

        assert_eq!(generate(&mut maze, 5), Err(MazeError::GridTooSmall));
        for idx in 0..maze.len() {
            assert_eq!(maze.cell(idx), Cell::Open(CLOSED));
        }
    }

    #[test]
    fn test_endpoint_on_sign_cell_rejected_without_mutation() {
        // (5, 3) is one cell right of the center of a 9x7 grid, inside the sign.
        let mut maze = Maze::new(9, 7, (5, 3), (0, 0), true, false).expect("failed to create maze");

        assert_eq!(generate(&mut maze, 5), Err(MazeError::InvalidEntryExit));
        for idx in 0..maze.len() {
            assert_eq!(maze.cell(idx), Cell::Open(CLOSED));
        }
    }

    #[test]
    fn test_heart_masks_the_outside() {
        let mut maze =
            Maze::new(21, 15, (10, 3), (10, 11), true, true).expect("failed to create maze");
        generate(&mut maze, 21).expect("failed to generate maze");

        assert!(maze.cell_at(0, 0).is_obstacle());
        assert!(maze.cell_at(20, 14).is_obstacle());
        assert!(!maze.cell_at(10, 3).is_obstacle());

        let playable = playable_count(&maze);
        assert_eq!(open_pairs(&maze), playable - 1);
        assert_eq!(reachable_count(&maze), playable);
    }
}
