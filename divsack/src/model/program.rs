use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use anyhow::{Result, anyhow};

/// Handle to a variable of a [`Program`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Binary,
    Integer,
}

/// Integer variable with an inclusive domain `[lower, upper]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    pub lower: i64,
    pub upper: i64,
}

impl Variable {
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0,
            upper: 1,
        }
    }

    pub fn integer(name: impl Into<String>, lower: i64, upper: i64) -> Self {
        assert!(lower <= upper, "empty domain [{lower}, {upper}]");
        Self {
            name: name.into(),
            kind: VarKind::Integer,
            lower,
            upper,
        }
    }

    /// Whether the domain is a single value
    pub fn is_fixed(&self) -> bool {
        self.lower == self.upper
    }
}

/// Weighted sum of variables with integer coefficients.
/// Terms are kept merged per variable, in variable order, without zero coefficients.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(VarId, i64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(var: VarId, coeff: i64) -> Self {
        match coeff {
            0 => Self::new(),
            _ => Self {
                terms: vec![(var, coeff)],
            },
        }
    }

    /// Builds the expression, merging repeated variables.
    /// Fails if a merged coefficient overflows.
    pub fn from_terms(terms: impl IntoIterator<Item = (VarId, i64)>) -> Result<Self> {
        let mut merged: BTreeMap<VarId, i64> = BTreeMap::new();
        for (var, coeff) in terms {
            let c = merged.entry(var).or_default();
            *c = c
                .checked_add(coeff)
                .ok_or_else(|| anyhow!("coefficient overflow on variable {}", var.index()))?;
        }
        Ok(Self {
            terms: merged.into_iter().filter(|(_, c)| *c != 0).collect(),
        })
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Multiplies every coefficient by `factor`
    pub fn scaled(&self, factor: i64) -> Result<Self> {
        let terms = self
            .terms
            .iter()
            .map(|&(var, c)| {
                c.checked_mul(factor)
                    .map(|c| (var, c))
                    .ok_or_else(|| anyhow!("coefficient overflow scaling by {factor}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_terms(terms)
    }

    /// `self - other`
    pub fn minus(&self, other: &LinearExpr) -> Result<Self> {
        let negated = other
            .terms
            .iter()
            .map(|&(var, c)| {
                c.checked_neg()
                    .map(|c| (var, c))
                    .ok_or_else(|| anyhow!("coefficient overflow negating"))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_terms(self.terms.iter().copied().chain(negated))
    }

    /// Value of the expression under a full assignment of the program's variables
    pub fn evaluate(&self, values: &[i64]) -> i128 {
        self.terms
            .iter()
            .map(|&(var, c)| c as i128 * values[var.index()] as i128)
            .sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl Comparison {
    pub fn holds(&self, lhs: i128, rhs: i128) -> bool {
        match self {
            Comparison::LessOrEqual => lhs <= rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
            Comparison::Equal => lhs == rhs,
        }
    }
}

/// What a constraint row encodes, for inspection and logging
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Weight,
    Volume,
    MinValue,
    ItemConcentration,
    TypeConcentration(String),
    ManufacturerConcentration(String),
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::Weight => write!(f, "weight"),
            ConstraintKind::Volume => write!(f, "volume"),
            ConstraintKind::MinValue => write!(f, "min_value"),
            ConstraintKind::ItemConcentration => write!(f, "item_concentration"),
            ConstraintKind::TypeConcentration(t) => write!(f, "type_concentration[{t}]"),
            ConstraintKind::ManufacturerConcentration(m) => {
                write!(f, "manufacturer_concentration[{m}]")
            }
        }
    }
}

/// `expr <cmp> rhs`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub expr: LinearExpr,
    pub cmp: Comparison,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        self.cmp.holds(self.expr.evaluate(values), self.rhs as i128)
    }
}

/// `target == max(terms)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaxEquality {
    pub target: VarId,
    pub terms: Vec<LinearExpr>,
}

impl MaxEquality {
    /// Value the target has to take, `None` for an empty set of terms
    pub fn max_of_terms(&self, values: &[i64]) -> Option<i128> {
        self.terms.iter().map(|t| t.evaluate(values)).max()
    }

    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        self.max_of_terms(values) == Some(values[self.target.index()] as i128)
    }
}

/// Integer linear program: maximize `objective` subject to the linear constraints and
/// max-equalities, every variable within its domain.
#[derive(Clone, Debug, Default)]
pub struct Program {
    variables: Vec<Variable>,
    objective: LinearExpr,
    constraints: Vec<LinearConstraint>,
    max_equalities: Vec<MaxEquality>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        VarId(self.variables.len() - 1)
    }

    /// Fixes the domain of a variable to a single value
    pub fn pin(&mut self, var: VarId, value: i64) {
        let v = &mut self.variables[var.index()];
        assert!(
            (v.lower..=v.upper).contains(&value),
            "pinned value outside the domain"
        );
        (v.lower, v.upper) = (value, value);
    }

    pub fn maximize(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn add_max_equality(&mut self, max_eq: MaxEquality) {
        self.max_equalities.push(max_eq);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.index()]
    }

    pub fn n_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn var_ids(&self) -> impl Iterator<Item = VarId> + use<> {
        (0..self.variables.len()).map(VarId)
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn max_equalities(&self) -> &[MaxEquality] {
        &self.max_equalities
    }

    pub fn objective_value(&self, values: &[i64]) -> i128 {
        self.objective.evaluate(values)
    }

    /// Whether a full assignment respects every domain, constraint and max-equality
    pub fn is_feasible(&self, values: &[i64]) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(var, v)| (var.lower..=var.upper).contains(v))
            && self.constraints.iter().all(|c| c.is_satisfied(values))
            && self.max_equalities.iter().all(|m| m.is_satisfied(values))
    }
}
