//! Stepwise A* search.
//!
//! [`SearchTask`] is an explicit resumable state machine rather than a
//! blocking function: [`step`](SearchTask::step) advances the search to its
//! next suspension point (one cell-state transition) and returns whether it
//! finished, so a driver can interleave many searches, animate them at a
//! fixed cadence, or freeze them all behind a pause gate without threads.
//! Non-animated searches are simply driven to completion with
//! [`run`](SearchTask::run).

use std::cell::RefCell;
use std::rc::Rc;

use wayfield_core::{Field, Point};

use crate::input::SearchConfig;
use crate::overlay::{CellState, Overlay};
use crate::result::{ResultInner, SearchResult};
use crate::SearchInput;

enum Phase {
    /// Pick the open cell with the lowest f-score and mark it BEST.
    Select,
    /// Decide whether the marked cell is the target.
    Goal { best: usize },
    /// Expand the marked cell's 8 neighbors, one insertion per step.
    Expand { best: usize, next_dir: usize },
    /// Re-mark the found path BEST, one cell per step, then resolve.
    Retrace { cells: Vec<usize>, next: usize },
    Done,
}

/// One in-flight A* search over an immutable walkability snapshot.
pub struct SearchTask {
    walkable: Field<bool>,
    target: Point,
    config: SearchConfig,
    inner: Rc<RefCell<ResultInner>>,
    result: SearchResult,
    /// Visited-and-frontier cells, in insertion order. Minimal-f selection
    /// scans front to back with a strict `<`, so among equal f-scores the
    /// first-seen cell wins — there is no secondary tie-break.
    open: Vec<usize>,
    closed: Vec<usize>,
    phase: Phase,
}

impl SearchTask {
    pub(crate) fn new(input: SearchInput) -> Self {
        let SearchInput {
            walkable,
            start,
            target,
            config,
        } = input;
        let overlay = Overlay::new(walkable.width(), walkable.height());
        let result = SearchResult::new(overlay, target);
        let inner = result.inner();
        let mut task = Self {
            walkable,
            target,
            config,
            inner,
            result,
            open: Vec::new(),
            closed: Vec::new(),
            phase: Phase::Select,
        };
        match (task.idx(start), task.idx(target)) {
            (Some(si), Some(_)) => task.open.push(si),
            // Degenerate input (start or target outside the snapshot):
            // resolve an empty path immediately.
            _ => {
                task.resolve(Vec::new());
                task.phase = Phase::Done;
            }
        }
        task
    }

    /// A handle to this search's live result.
    pub fn result(&self) -> SearchResult {
        self.result.clone()
    }

    /// Whether the search has resolved its path.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    /// Drive the search to completion.
    pub fn run(&mut self) {
        while !self.step() {}
    }

    /// Advance to the next suspension point. Returns `true` once the path
    /// has resolved; further calls are no-ops.
    pub fn step(&mut self) -> bool {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Done => return true,

                Phase::Select => {
                    if self.open.is_empty() {
                        self.reset_visited();
                        self.resolve(Vec::new());
                        return true;
                    }
                    let mut best = self.open[0];
                    {
                        let inner = self.inner.borrow();
                        for &i in &self.open[1..] {
                            if inner.overlay.cell(i).f < inner.overlay.cell(best).f {
                                best = i;
                            }
                        }
                    }
                    self.set_state(best, CellState::Best);
                    self.phase = Phase::Goal { best };
                    return false;
                }

                Phase::Goal { best } => {
                    if self.point(best) == self.target {
                        // Walk the parent chain target→start.
                        let mut cells = Vec::new();
                        let mut cur = Some(best);
                        {
                            let inner = self.inner.borrow();
                            while let Some(i) = cur {
                                cells.push(i);
                                cur = inner.overlay.cell(i).parent;
                            }
                        }
                        self.reset_visited();
                        self.phase = Phase::Retrace { cells, next: 0 };
                        continue;
                    }
                    self.open.retain(|&i| i != best);
                    self.phase = Phase::Expand { best, next_dir: 0 };
                    continue;
                }

                Phase::Expand { best, next_dir } => {
                    let bp = self.point(best);
                    let bg = self.inner.borrow().overlay.cell(best).g;
                    let dirs = bp.neighbors_8();
                    for d in next_dir..dirs.len() {
                        let np = dirs[d];
                        let Some(ni) = self.idx(np) else { continue };
                        if !self.walkable[np] {
                            continue;
                        }
                        if self.closed.contains(&ni) {
                            continue;
                        }
                        let g = bg + self.config.heuristic.distance(bp, np);
                        let f = g + self.config.heuristic.distance(np, self.target);
                        if self.open.contains(&ni) {
                            // An open entry with equal-or-better f wins;
                            // only a strictly lower f replaces it.
                            if f >= self.inner.borrow().overlay.cell(ni).f {
                                continue;
                            }
                            self.open.retain(|&i| i != ni);
                        }
                        {
                            let mut inner = self.inner.borrow_mut();
                            let cell = inner.overlay.cell_mut(ni);
                            cell.g = g;
                            cell.f = f;
                            cell.parent = Some(best);
                        }
                        self.open.push(ni);
                        self.set_state(ni, CellState::Open);
                        self.phase = Phase::Expand {
                            best,
                            next_dir: d + 1,
                        };
                        return false;
                    }
                    self.closed.push(best);
                    self.set_state(best, CellState::Closed);
                    self.phase = Phase::Select;
                    return false;
                }

                Phase::Retrace { cells, next } => {
                    if next < cells.len() {
                        let i = cells[next];
                        self.set_state(i, CellState::Best);
                        self.phase = Phase::Retrace {
                            cells,
                            next: next + 1,
                        };
                        return false;
                    }
                    let path: Vec<Point> = cells.iter().rev().map(|&i| self.point(i)).collect();
                    self.resolve(path);
                    return true;
                }
            }
        }
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if self.walkable.contains(p) {
            Some((p.y * self.walkable.width() + p.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    fn point(&self, i: usize) -> Point {
        let w = self.walkable.width();
        Point::new(i as i32 % w, i as i32 / w)
    }

    /// Reset every visited (open ∪ closed) cell to `Unknown`.
    fn reset_visited(&mut self) {
        let visited: Vec<usize> = self.open.iter().chain(self.closed.iter()).copied().collect();
        for i in visited {
            self.set_state(i, CellState::Unknown);
        }
    }

    fn set_state(&mut self, idx: usize, state: CellState) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            inner.overlay.cell_mut(idx).state = state;
            inner.changed.clone()
        };
        // Overlay changes are only worth broadcasting when someone can
        // watch them land one at a time.
        if self.config.use_delay {
            changed.notify();
        }
    }

    fn resolve(&mut self, path: Vec<Point>) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            debug_assert!(inner.path.is_none(), "a path resolves exactly once");
            inner.path = Some(path);
            inner.changed.clone()
        };
        changed.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{search, Heuristic};
    use std::cell::Cell;

    fn open_grid(w: i32, h: i32) -> Field<bool> {
        Field::filled(w, h, true)
    }

    fn input(walkable: Field<bool>, start: Point, target: Point) -> SearchInput {
        SearchInput {
            walkable,
            start,
            target,
            config: SearchConfig::default(),
        }
    }

    fn resolved(mut task: SearchTask) -> Vec<Point> {
        task.run();
        task.result().path().expect("path must resolve after run")
    }

    /// Every non-empty path must be an 8-adjacent walkable start→target
    /// sequence.
    fn assert_valid_path(path: &[Point], walkable: &Field<bool>, start: Point, target: Point) {
        assert_eq!(*path.first().unwrap(), start);
        assert_eq!(*path.last().unwrap(), target);
        for pair in path.windows(2) {
            assert_eq!(pair[0].king_distance(pair[1]), 1, "non-adjacent step");
        }
        for &p in &path[1..] {
            assert!(walkable[p], "path crosses non-walkable cell {p}");
        }
    }

    #[test]
    fn empty_grid_euclidean_goes_diagonal() {
        let task = search(input(open_grid(5, 5), Point::new(0, 0), Point::new(4, 4)));
        let path = resolved(task);
        let diagonal: Vec<Point> = (0..5).map(|i| Point::new(i, i)).collect();
        assert_eq!(path, diagonal);
    }

    #[test]
    fn wall_row_routes_through_the_gap() {
        let mut walkable = open_grid(5, 5);
        for x in 1..5 {
            walkable[Point::new(x, 3)] = false;
        }
        let (start, target) = (Point::new(2, 2), Point::new(2, 4));
        let task = search(input(walkable.clone(), start, target));
        let path = resolved(task);
        assert_valid_path(&path, &walkable, start, target);
        assert!(path.contains(&Point::new(0, 3)), "only opening is (0, 3)");
    }

    #[test]
    fn unreachable_resolves_empty_and_blank() {
        let mut walkable = open_grid(3, 3);
        for y in 0..3 {
            walkable[Point::new(1, y)] = false;
        }
        let task = search(input(walkable, Point::new(0, 1), Point::new(2, 1)));
        let result = task.result();
        let path = resolved(task);
        assert!(path.is_empty());
        assert!(result.overlay().is_blank(), "overlay must reset to Unknown");
    }

    #[test]
    fn start_equals_target() {
        let p = Point::new(2, 2);
        let path = resolved(search(input(open_grid(4, 4), p, p)));
        assert_eq!(path, vec![p]);
    }

    #[test]
    fn out_of_bounds_endpoints_resolve_empty_immediately() {
        let task = search(input(open_grid(3, 3), Point::new(9, 9), Point::new(1, 1)));
        assert!(task.is_finished());
        assert_eq!(task.result().path(), Some(Vec::new()));

        let task = search(input(open_grid(3, 3), Point::new(1, 1), Point::new(-1, 0)));
        assert!(task.is_finished());
        assert_eq!(task.result().path(), Some(Vec::new()));
    }

    #[test]
    fn manhattan_path_cost_matches_analytic_distance() {
        let (start, target) = (Point::new(0, 0), Point::new(5, 2));
        let mut inp = input(open_grid(6, 6), start, target);
        inp.config.heuristic = Heuristic::Manhattan;
        let path = resolved(search(inp));
        let cost: f64 = path
            .windows(2)
            .map(|w| Heuristic::Manhattan.distance(w[0], w[1]))
            .sum();
        assert!((cost - 7.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_path_cost_matches_octile_distance() {
        let (start, target) = (Point::new(0, 0), Point::new(4, 4));
        let mut inp = input(open_grid(5, 5), start, target);
        inp.config.heuristic = Heuristic::Diagonal;
        let path = resolved(search(inp));
        let cost: f64 = path
            .windows(2)
            .map(|w| Heuristic::Diagonal.distance(w[0], w[1]))
            .sum();
        assert!((cost - 4.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn path_is_valid_around_scattered_walls() {
        let mut walkable = open_grid(8, 8);
        for p in [
            Point::new(3, 0),
            Point::new(3, 1),
            Point::new(3, 2),
            Point::new(3, 3),
            Point::new(5, 7),
            Point::new(5, 6),
            Point::new(5, 5),
            Point::new(1, 4),
        ] {
            walkable[p] = false;
        }
        let (start, target) = (Point::new(0, 0), Point::new(7, 7));
        let path = resolved(search(input(walkable.clone(), start, target)));
        assert_valid_path(&path, &walkable, start, target);
    }

    #[test]
    fn animated_search_steps_and_notifies() {
        let mut inp = input(open_grid(4, 4), Point::new(0, 0), Point::new(3, 3));
        inp.config.use_delay = true;
        let mut task = search(inp);
        let result = task.result();

        let changes = Rc::new(Cell::new(0u32));
        {
            let changes = Rc::clone(&changes);
            result.on_change(move || changes.set(changes.get() + 1));
        }

        // First suspension point: the start cell is selected and marked BEST.
        assert!(!task.step());
        assert_eq!(result.state_at(Point::new(0, 0)), CellState::Best);
        assert_eq!(changes.get(), 1);
        assert!(!result.is_resolved());

        let mut steps = 1;
        while !task.step() {
            steps += 1;
            assert!(steps < 10_000, "search must terminate");
        }
        assert!(result.is_resolved());
        assert_eq!(result.path().unwrap().len(), 4);
        // Every state transition plus resolution notified.
        assert!(changes.get() > steps);
    }

    #[test]
    fn silent_search_notifies_only_on_resolution() {
        let mut task = search(input(open_grid(4, 4), Point::new(0, 0), Point::new(3, 0)));
        let result = task.result();
        let changes = Rc::new(Cell::new(0u32));
        {
            let changes = Rc::clone(&changes);
            result.on_change(move || changes.set(changes.get() + 1));
        }
        task.run();
        assert_eq!(changes.get(), 1);
    }
}
