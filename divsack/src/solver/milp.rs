use std::time::Instant;

use anyhow::{Result, anyhow, bail};
use good_lp::solvers::microlp::microlp;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, variable,
};
use log::{debug, info};

use crate::model::{Comparison, LinearExpr, Program, VarKind};
use crate::solver::{Assignment, SolveLimits, SolveOutcome, SolveStatus, SolverAdapter};

/// Largest magnitude an `f64` coefficient holds without rounding
const MAX_EXACT: i64 = 1 << 53;

/// Adapter over `good_lp`, solving with the pure-Rust `microlp` branch-and-bound.
///
/// Max-equalities are linearized with one selector binary per term:
/// `target >= term` for every term, `target <= term + M * (1 - selector)` and exactly one selector set.
///
/// `microlp` runs single-threaded and to completion, the time limit and worker count are not enforced.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpSolver;

impl SolverAdapter for MilpSolver {
    fn name(&self) -> &str {
        "milp"
    }

    fn solve(&self, program: &Program, limits: &SolveLimits) -> SolveOutcome {
        let start = Instant::now();
        debug!(
            "[MILP] time limit of {}s and {} workers are not enforced by microlp",
            limits.time_limit_secs, limits.n_workers
        );
        let outcome = match solve_program(program) {
            Ok(outcome) => outcome,
            Err(e) => SolveOutcome::error(format!("{e:#}")),
        };
        info!(
            "[MILP] solve finished in {:.3}ms: {}",
            start.elapsed().as_secs_f64() * 1000.0,
            outcome.status
        );
        outcome
    }
}

fn solve_program(program: &Program) -> Result<SolveOutcome> {
    let mut pb = ProblemVariables::new();
    let vars = program
        .variables()
        .iter()
        .map(|v| match v.kind {
            VarKind::Binary if !v.is_fixed() => Ok(pb.add(variable().binary())),
            _ => Ok(pb.add(
                variable()
                    .integer()
                    .min(exact(v.lower)?)
                    .max(exact(v.upper)?),
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    //selector binaries of the max-equalities, added before the model takes ownership of the variables
    let selectors = program
        .max_equalities()
        .iter()
        .map(|m| m.terms.iter().map(|_| pb.add(variable().binary())).collect())
        .collect::<Vec<Vec<Variable>>>();

    let objective = to_expression(program.objective(), &vars)?;
    let mut model = pb.maximise(objective).using(microlp);

    for row in program.constraints() {
        let lhs = to_expression(&row.expr, &vars)?;
        let rhs = exact(row.rhs)?;
        model = match row.cmp {
            Comparison::LessOrEqual => model.with(lhs.leq(rhs)),
            Comparison::GreaterOrEqual => model.with(lhs.geq(rhs)),
            Comparison::Equal => model.with(lhs.eq(rhs)),
        };
    }

    for (max_eq, selectors) in program.max_equalities().iter().zip(&selectors) {
        let target = vars[max_eq.target.index()];
        let target_upper = program.variable(max_eq.target).upper as i128;
        for (term, &z) in max_eq.terms.iter().zip(selectors) {
            let big_m = target_upper - lower_bound(program, term);
            let big_m = exact(i64::try_from(big_m.max(0))?)?;
            let term = to_expression(term, &vars)?;
            model = model.with(Expression::from(target).geq(term.clone()));
            model = model.with(Expression::from(target).leq(term + big_m - big_m * z));
        }
        let chosen: Expression = selectors.iter().copied().sum();
        model = model.with(chosen.eq(1));
    }

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => return Ok(SolveOutcome::unsolved(SolveStatus::Infeasible)),
        Err(e) => bail!("microlp failed: {e}"),
    };

    let values = vars
        .iter()
        .map(|&v| solution.value(v).round() as i64)
        .collect::<Vec<_>>();
    if !program.is_feasible(&values) {
        bail!("rounded microlp solution violates the program");
    }
    Ok(SolveOutcome::solved(
        SolveStatus::Optimal,
        Assignment::new(values),
    ))
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Result<Expression> {
    let mut e = Expression::default();
    for &(var, c) in expr.terms() {
        e += vars[var.index()] * exact(c)?;
    }
    Ok(e)
}

/// Lowest value `expr` takes over the variable domains
fn lower_bound(program: &Program, expr: &LinearExpr) -> i128 {
    expr.terms()
        .iter()
        .map(|&(var, c)| {
            let v = program.variable(var);
            (c as i128 * v.lower as i128).min(c as i128 * v.upper as i128)
        })
        .sum()
}

fn exact(c: i64) -> Result<f64> {
    match c.unsigned_abs() <= MAX_EXACT as u64 {
        true => Ok(c as f64),
        false => Err(anyhow!("coefficient {c} is not exactly representable as f64")),
    }
}
