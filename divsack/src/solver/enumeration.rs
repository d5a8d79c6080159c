use std::iter;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Instant;

use anyhow::{Result, bail};
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use thousands::Separable;

use crate::model::{Comparison, Program, VarId};
use crate::solver::{Assignment, SolveLimits, SolveOutcome, SolveStatus, SolverAdapter};

/// Number of nodes visited between two checks of the deadline
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Exact depth-first branch-and-bound over the binary variables of a [`Program`].
///
/// Targets of max-equalities are not branched on: their value is derived once all other variables
/// are fixed. Any other variable must have a domain of at most two values.
///
/// Branches are cut when a constraint row can no longer be satisfied by the unassigned variables,
/// or when the objective bound cannot beat the incumbent. The combinations of the first
/// [`split_depth`](EnumerationSolver::split_depth) variables form independent subtrees that are
/// searched in parallel, sharing the incumbent objective. Among assignments of equal objective,
/// the first one in depth-first order (every variable tried at its upper bound first) is returned,
/// regardless of the number of workers.
#[derive(Debug, Clone, Copy)]
pub struct EnumerationSolver {
    /// Number of leading variables whose combinations are distributed over the workers
    pub split_depth: usize,
}

impl Default for EnumerationSolver {
    fn default() -> Self {
        Self { split_depth: 6 }
    }
}

impl EnumerationSolver {
    pub fn new(split_depth: usize) -> Self {
        Self { split_depth }
    }
}

impl SolverAdapter for EnumerationSolver {
    fn name(&self) -> &str {
        "enumeration"
    }

    fn solve(&self, program: &Program, limits: &SolveLimits) -> SolveOutcome {
        let start = Instant::now();
        let layout = match Layout::new(program) {
            Ok(layout) => layout,
            Err(e) => return SolveOutcome::error(format!("{e:#}")),
        };
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(limits.n_workers.max(1))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => return SolveOutcome::error(format!("failed to build worker pool: {e}")),
        };

        let split_depth = self.split_depth.min(layout.branch.len());
        let prefixes = match split_depth {
            0 => vec![vec![]],
            _ => (0..split_depth)
                .map(|pos| layout.domain(pos).collect_vec())
                .multi_cartesian_product()
                .collect_vec(),
        };
        debug!(
            "[ENUM] {} branching variables, {} subtrees on {} workers",
            layout.branch.len(),
            prefixes.len(),
            pool.current_num_threads()
        );

        let shared = Shared {
            incumbent: AtomicI64::new(i64::MIN),
            deadline: start.checked_add(limits.time_limit()),
            timed_out: AtomicBool::new(false),
        };

        let results = pool.install(|| {
            prefixes
                .par_iter()
                .map(|prefix| {
                    let mut subtree = Subtree::new(&layout, &shared, prefix);
                    subtree.dfs(prefix.len());
                    (subtree.best, subtree.n_nodes)
                })
                .collect::<Vec<_>>()
        });

        //ties go to the earliest subtree
        let mut best: Option<(i128, Vec<i64>)> = None;
        let mut n_nodes = 0u64;
        for (subtree_best, nodes) in results {
            n_nodes += nodes;
            if let Some((obj, values)) = subtree_best {
                if best.as_ref().is_none_or(|(b, _)| obj > *b) {
                    best = Some((obj, values));
                }
            }
        }

        let timed_out = shared.timed_out.load(Ordering::Relaxed);
        let outcome = match (best, timed_out) {
            (Some((_, values)), false) => {
                SolveOutcome::solved(SolveStatus::Optimal, Assignment::new(values))
            }
            (Some((_, values)), true) => {
                SolveOutcome::solved(SolveStatus::Feasible, Assignment::new(values))
            }
            (None, false) => SolveOutcome::unsolved(SolveStatus::Infeasible),
            (None, true) => SolveOutcome::unsolved(SolveStatus::TimeoutNoSolution),
        };

        info!(
            "[ENUM] search finished in {:.3}ms ({} nodes): {}",
            start.elapsed().as_secs_f64() * 1000.0,
            n_nodes.separate_with_commas(),
            outcome.status
        );
        outcome
    }
}

/// Static view of a program, arranged for the search
struct Layout<'a> {
    program: &'a Program,
    /// Variables to branch on, in index order
    branch: Vec<VarId>,
    /// `(lower, upper)` of every branching variable
    bounds: Vec<(i64, i64)>,
    /// `(row, coefficient)` of every branching variable
    columns: Vec<Vec<(usize, i64)>>,
    obj_coeffs: Vec<i64>,
    /// Lowest activity of every row reachable by the variables from a depth onwards, `[depth][row]`
    row_min: Vec<Vec<i128>>,
    /// Highest activity of every row reachable by the variables from a depth onwards, `[depth][row]`
    row_max: Vec<Vec<i128>>,
    /// Highest objective contribution of the variables from a depth onwards
    obj_max: Vec<i128>,
}

impl<'a> Layout<'a> {
    fn new(program: &'a Program) -> Result<Self> {
        let mut derived = vec![false; program.n_variables()];
        for max_eq in program.max_equalities() {
            derived[max_eq.target.index()] = true;
        }

        let mut branch = vec![];
        let mut position = vec![None; program.n_variables()];
        for id in program.var_ids().filter(|id| !derived[id.index()]) {
            let var = program.variable(id);
            if var.upper.saturating_sub(var.lower) > 1 {
                bail!(
                    "variable {} has domain [{}, {}], only two-valued variables can be enumerated",
                    var.name,
                    var.lower,
                    var.upper
                );
            }
            position[id.index()] = Some(branch.len());
            branch.push(id);
        }
        let bounds = branch
            .iter()
            .map(|&v| (program.variable(v).lower, program.variable(v).upper))
            .collect_vec();

        let n_rows = program.constraints().len();
        let mut columns = vec![vec![]; branch.len()];
        let mut derived_min = vec![0i128; n_rows];
        let mut derived_max = vec![0i128; n_rows];
        for (r, row) in program.constraints().iter().enumerate() {
            for &(var, c) in row.expr.terms() {
                match position[var.index()] {
                    Some(pos) => columns[pos].push((r, c)),
                    None => {
                        let (lo, hi) = contribution_range(program, var, c);
                        derived_min[r] += lo;
                        derived_max[r] += hi;
                    }
                }
            }
        }

        let mut obj_coeffs = vec![0; branch.len()];
        let mut derived_obj_max = 0i128;
        for &(var, c) in program.objective().terms() {
            match position[var.index()] {
                Some(pos) => obj_coeffs[pos] = c,
                None => derived_obj_max += contribution_range(program, var, c).1,
            }
        }

        //suffix sums, from the last depth backwards
        let n = branch.len();
        let mut row_min = vec![derived_min; n + 1];
        let mut row_max = vec![derived_max; n + 1];
        let mut obj_max = vec![derived_obj_max; n + 1];
        for pos in (0..n).rev() {
            row_min[pos] = row_min[pos + 1].clone();
            row_max[pos] = row_max[pos + 1].clone();
            for &(r, c) in &columns[pos] {
                let (lo, hi) = contribution_range(program, branch[pos], c);
                row_min[pos][r] += lo;
                row_max[pos][r] += hi;
            }
            obj_max[pos] =
                obj_max[pos + 1] + contribution_range(program, branch[pos], obj_coeffs[pos]).1;
        }

        Ok(Self {
            program,
            branch,
            bounds,
            columns,
            obj_coeffs,
            row_min,
            row_max,
            obj_max,
        })
    }

    /// Values of the branching variable at `pos`, upper bound first
    fn domain(&self, pos: usize) -> impl Iterator<Item = i64> + use<> {
        let (lower, upper) = self.bounds[pos];
        iter::once(upper).chain((lower < upper).then_some(lower))
    }
}

/// `(min, max)` of `c * x` over the domain of `x`
fn contribution_range(program: &Program, var: VarId, c: i64) -> (i128, i128) {
    let v = program.variable(var);
    let (a, b) = (c as i128 * v.lower as i128, c as i128 * v.upper as i128);
    (a.min(b), a.max(b))
}

struct Shared {
    incumbent: AtomicI64,
    deadline: Option<Instant>,
    timed_out: AtomicBool,
}

/// Mutable state of the search through one subtree
struct Subtree<'a> {
    layout: &'a Layout<'a>,
    shared: &'a Shared,
    values: Vec<i64>,
    row_lhs: Vec<i128>,
    obj: i128,
    best: Option<(i128, Vec<i64>)>,
    n_nodes: u64,
}

impl<'a> Subtree<'a> {
    fn new(layout: &'a Layout<'a>, shared: &'a Shared, prefix: &[i64]) -> Self {
        let program = layout.program;
        let mut subtree = Self {
            layout,
            shared,
            values: program.variables().iter().map(|v| v.lower).collect(),
            row_lhs: vec![0; program.constraints().len()],
            obj: 0,
            best: None,
            n_nodes: 0,
        };
        for (pos, &value) in prefix.iter().enumerate() {
            subtree.assign(pos, value);
        }
        subtree
    }

    fn assign(&mut self, pos: usize, value: i64) {
        self.values[self.layout.branch[pos].index()] = value;
        for &(r, c) in &self.layout.columns[pos] {
            self.row_lhs[r] += c as i128 * value as i128;
        }
        self.obj += self.layout.obj_coeffs[pos] as i128 * value as i128;
    }

    fn unassign(&mut self, pos: usize, value: i64) {
        for &(r, c) in &self.layout.columns[pos] {
            self.row_lhs[r] -= c as i128 * value as i128;
        }
        self.obj -= self.layout.obj_coeffs[pos] as i128 * value as i128;
    }

    fn dfs(&mut self, depth: usize) {
        if self.shared.timed_out.load(Ordering::Relaxed) {
            return;
        }
        self.n_nodes += 1;
        if self.n_nodes % DEADLINE_CHECK_INTERVAL == 1
            && self.shared.deadline.is_some_and(|d| Instant::now() >= d)
        {
            self.shared.timed_out.store(true, Ordering::Relaxed);
            return;
        }

        if !self.rows_reachable(depth) {
            return;
        }
        let bound = self.obj + self.layout.obj_max[depth];
        if self.best.as_ref().is_some_and(|(b, _)| bound <= *b) {
            return;
        }
        //strict: an equal incumbent from another subtree must not cut this one
        if bound < self.shared.incumbent.load(Ordering::Relaxed) as i128 {
            return;
        }

        if depth == self.layout.branch.len() {
            self.evaluate_leaf();
            return;
        }
        for value in self.layout.domain(depth) {
            self.assign(depth, value);
            self.dfs(depth + 1);
            self.unassign(depth, value);
        }
    }

    fn rows_reachable(&self, depth: usize) -> bool {
        let (row_min, row_max) = (&self.layout.row_min[depth], &self.layout.row_max[depth]);
        self.layout
            .program
            .constraints()
            .iter()
            .enumerate()
            .all(|(r, row)| {
                let lo = self.row_lhs[r] + row_min[r];
                let hi = self.row_lhs[r] + row_max[r];
                let rhs = row.rhs as i128;
                match row.cmp {
                    Comparison::LessOrEqual => lo <= rhs,
                    Comparison::GreaterOrEqual => hi >= rhs,
                    Comparison::Equal => lo <= rhs && rhs <= hi,
                }
            })
    }

    fn evaluate_leaf(&mut self) {
        let program = self.layout.program;
        for max_eq in program.max_equalities() {
            match max_eq
                .max_of_terms(&self.values)
                .and_then(|v| i64::try_from(v).ok())
            {
                Some(v) => self.values[max_eq.target.index()] = v,
                None => return,
            }
        }
        if !program.is_feasible(&self.values) {
            return;
        }
        let obj = program.objective_value(&self.values);
        if self.best.as_ref().is_none_or(|(b, _)| obj > *b) {
            self.best = Some((obj, self.values.clone()));
            if let Ok(obj) = i64::try_from(obj) {
                self.shared.incumbent.fetch_max(obj, Ordering::Relaxed);
            }
        }
    }
}
