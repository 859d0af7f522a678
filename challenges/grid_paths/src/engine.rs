use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::direction::Direction;
use crate::grid::{Cell, VisitedGrid};
use crate::oracle::{Barrier, FloodFill, NoPruning, SplitOracle};
use crate::pattern::Pattern;

/// Historical budget for the 8x8 search: three hours.
pub const DEFAULT_TIMEOUT_MS: u64 = 3 * 60 * 60 * 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

/// Which split oracle guards each tentative move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Pruning {
    /// Flood fill the free cells and compare against their count.
    #[default]
    FloodFill,
    /// Local barrier check on the entered cell only.
    Barrier,
    /// Barrier check first, flood fill when it passes.
    Combined,
    /// Never prune.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub timeout: Duration,
    pub pruning: Pruning,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            timeout: DEFAULT_TIMEOUT,
            pruning: Pruning::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Recursion entries that passed the deadline check.
    pub nodes: u64,
    /// Tentative moves rejected by the split oracle.
    pub pruned: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub total_paths: u64,
    /// When set, `total_paths` is only a lower bound.
    pub timed_out: bool,
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total paths: {}", self.total_paths)?;
        write!(f, "Time (ms): {}", self.elapsed_millis())?;
        if self.timed_out {
            write!(f, "\nSearch timed out, the count is a lower bound.")?;
        }
        Ok(())
    }
}

/// Depth-first enumeration of the paths matching a pattern.
///
/// The visited grid and the counters belong to one engine, so independent
/// searches never share state. Each call to `run` starts from a clean count.
pub struct Engine<'p, O> {
    pattern: &'p Pattern,
    grid: VisitedGrid,
    oracle: O,
    timeout: Duration,
    deadline: Option<Instant>,
    target: Cell,
    paths: u64,
    timed_out: bool,
    stats: SearchStats,
}

impl<'p, O: SplitOracle> Engine<'p, O> {
    pub fn new(pattern: &'p Pattern, oracle: O, timeout: Duration) -> Self {
        let grid = VisitedGrid::new(pattern.size());
        let target = grid.target();
        Engine {
            pattern,
            grid,
            oracle,
            timeout,
            deadline: None,
            target,
            paths: 0,
            timed_out: false,
            stats: SearchStats::default(),
        }
    }

    pub fn run(&mut self) -> SearchResult {
        let start = Instant::now();
        // a timeout too large to represent means no deadline at all
        self.deadline = start.checked_add(self.timeout);
        self.paths = 0;
        self.timed_out = false;
        self.stats = SearchStats::default();

        self.explore(Cell::ORIGIN, 0, None);
        debug_assert_eq!(self.grid.visited_count(), 1);

        let result = SearchResult {
            total_paths: self.paths,
            timed_out: self.timed_out,
            elapsed: start.elapsed(),
            stats: self.stats,
        };
        if result.timed_out {
            warn!(
                "deadline of {:?} exceeded after {} nodes, {} paths found so far",
                self.timeout, self.stats.nodes, self.paths
            );
        } else {
            info!(
                "found {} paths in {:?} ({} nodes, {} pruned)",
                result.total_paths, result.elapsed, self.stats.nodes, self.stats.pruned
            );
        }
        result
    }

    fn explore(&mut self, cell: Cell, step: usize, prev: Option<Direction>) {
        if self.timed_out || self.deadline.is_some_and(|deadline| Instant::now() > deadline) {
            self.timed_out = true;
            return;
        }
        self.stats.nodes += 1;

        if step == self.pattern.len() {
            if cell == self.target {
                self.paths += 1;
            }
            return;
        }
        // the target is the last cell of every path, arriving early is a dead end
        if cell == self.target {
            return;
        }

        let pattern = self.pattern;
        for &dir in pattern[step].candidates() {
            if prev.is_some_and(|p| dir == p.opposite()) {
                continue;
            }
            let Some(next) = self.grid.neighbor(cell, dir) else {
                continue;
            };
            if self.grid.is_visited(next) {
                continue;
            }

            self.grid.visit(next);
            if self.oracle.is_split(&self.grid, next) {
                self.grid.release(next);
                self.stats.pruned += 1;
                continue;
            }
            self.explore(next, step + 1, Some(dir));
            self.grid.release(next);

            if self.timed_out {
                break;
            }
        }
    }
}

/// Runs a search with the oracle selected by `options`.
pub fn run(pattern: &Pattern, options: &SearchOptions) -> SearchResult {
    debug!(
        "searching {n}x{n} grid, pattern {pattern} ({} forced moves), {:?} pruning",
        pattern.forced_moves(),
        options.pruning,
        n = pattern.size(),
    );
    match options.pruning {
        Pruning::FloodFill => Engine::new(pattern, FloodFill::new(), options.timeout).run(),
        Pruning::Barrier => Engine::new(pattern, Barrier, options.timeout).run(),
        Pruning::Combined => {
            Engine::new(pattern, (Barrier, FloodFill::new()), options.timeout).run()
        }
        Pruning::None => Engine::new(pattern, NoPruning, options.timeout).run(),
    }
}
