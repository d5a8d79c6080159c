use std::collections::BTreeSet;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};

use crate::entities::{Instance, Item, Parameters};
use crate::model::{
    Comparison, ConstraintKind, LinearConstraint, LinearExpr, MaxEquality, Program, VarId,
    Variable,
};
use crate::util::{FixedPoint, LinearizationMode};

/// Program built by the [`Formulator`], along with the handles needed to read a solution back.
#[derive(Clone, Debug)]
pub struct Formulation {
    pub program: Program,
    /// Decision variable of every item, indexed by item id
    pub decisions: Vec<VarId>,
    /// Item pinned into the group by [`LinearizationMode::ForceMax`]
    pub pinned_item: Option<usize>,
    /// Auxiliary variable of [`LinearizationMode::MaxEquality`]
    pub max_value_var: Option<VarId>,
}

/// Encodes an instance and its parameters as a 0/1 integer linear program.
///
/// Every row is multiplied through by the [`FixedPoint`] scale. A share limit
/// "`part / r <= total`" is multiplied by `r * scale` and emitted as
/// `scale * part - units(r) * total <= 0`. Limits that are not a whole number of units are
/// rejected, so the rows agree with [`score`](crate::eval::score).
#[derive(Debug, Clone, Copy)]
pub struct Formulator {
    pub linearization: LinearizationMode,
    pub fixed_point: FixedPoint,
}

impl Formulator {
    pub fn new(linearization: LinearizationMode, fixed_point: FixedPoint) -> Self {
        Self {
            linearization,
            fixed_point,
        }
    }

    pub fn formulate(&self, instance: &Instance, params: &Parameters) -> Result<Formulation> {
        self.fixed_point.check_limits(params)?;
        let scale = self.fixed_point.scale() as i64;
        let mut program = Program::new();

        let decisions = instance
            .items
            .iter()
            .map(|item| program.add_variable(Variable::binary(format!("included_{}", item.id))))
            .collect::<Vec<_>>();

        //per item amounts as linear expressions over the decision variables
        let weighted = |amount: fn(&Item) -> u64| -> Result<LinearExpr> {
            let terms = instance
                .items
                .iter()
                .zip(&decisions)
                .map(|(item, &var)| Ok((var, to_coeff(amount(item))?)))
                .collect::<Result<Vec<_>>>()?;
            LinearExpr::from_terms(terms)
        };
        let total_value = weighted(|i| i.value)?;
        let total_weight = weighted(|i| i.weight)?;
        let total_volume = weighted(|i| i.volume)?;

        program.maximize(total_value.scaled(scale).context("objective")?);

        program.add_constraint(LinearConstraint {
            kind: ConstraintKind::Weight,
            expr: total_weight.scaled(scale).context("weight constraint")?,
            cmp: Comparison::LessOrEqual,
            rhs: scaled_rhs(params.max_weight, scale).context("weight constraint")?,
        });
        program.add_constraint(LinearConstraint {
            kind: ConstraintKind::Volume,
            expr: total_volume.scaled(scale).context("volume constraint")?,
            cmp: Comparison::LessOrEqual,
            rhs: scaled_rhs(params.max_volume, scale).context("volume constraint")?,
        });
        if params.min_value > 0 {
            program.add_constraint(LinearConstraint {
                kind: ConstraintKind::MinValue,
                expr: total_value.scaled(scale).context("min value constraint")?,
                cmp: Comparison::GreaterOrEqual,
                rhs: scaled_rhs(params.min_value, scale).context("min value constraint")?,
            });
        }

        let mut pinned_item = None;
        let mut max_value_var = None;

        if let Some(r) = params.high_value_max {
            let bound = total_value
                .scaled(to_coeff(self.fixed_point.units(r))?)
                .context("item concentration bound")?;
            match self.linearization {
                LinearizationMode::ForceMax => {
                    if let Some(max_item) = instance.max_value_item() {
                        let var = decisions[max_item.id];
                        program.pin(var, 1);
                        pinned_item = Some(max_item.id);
                        let part = LinearExpr::term(var, to_coeff(max_item.value)?)
                            .scaled(scale)
                            .context("item concentration")?;
                        program.add_constraint(concentration_row(
                            ConstraintKind::ItemConcentration,
                            &part,
                            &bound,
                        )?);
                        debug!("[MODEL] pinned item {} (value {})", max_item.id, max_item.value);
                    }
                }
                LinearizationMode::MaxEquality => {
                    if let Some(max_item) = instance.max_value_item() {
                        let var = program.add_variable(Variable::integer(
                            "max_item_value",
                            0,
                            to_coeff(max_item.value)?,
                        ));
                        let terms = instance
                            .items
                            .iter()
                            .zip(&decisions)
                            .map(|(item, &d)| Ok(LinearExpr::term(d, to_coeff(item.value)?)))
                            .collect::<Result<Vec<_>>>()?;
                        program.add_max_equality(MaxEquality { target: var, terms });
                        let part = LinearExpr::term(var, scale);
                        program.add_constraint(concentration_row(
                            ConstraintKind::ItemConcentration,
                            &part,
                            &bound,
                        )?);
                        max_value_var = Some(var);
                    }
                }
                LinearizationMode::MaxAll => {
                    for (item, &var) in instance.items.iter().zip(&decisions) {
                        let part = LinearExpr::term(var, to_coeff(item.value)?)
                            .scaled(scale)
                            .context("item concentration")?;
                        program.add_constraint(concentration_row(
                            ConstraintKind::ItemConcentration,
                            &part,
                            &bound,
                        )?);
                    }
                }
            }
        }

        if let Some(r) = params.high_type_max {
            let labels = instance
                .items
                .iter()
                .map(|i| i.product_type.as_str())
                .collect::<BTreeSet<_>>();
            for label in labels {
                let row = self.label_row(
                    instance,
                    &decisions,
                    &total_value,
                    r,
                    |i| i.product_type == label,
                    ConstraintKind::TypeConcentration(label.to_string()),
                )?;
                program.add_constraint(row);
            }
        }

        if let Some(r) = params.high_man_max {
            let labels = instance
                .items
                .iter()
                .map(|i| i.manufacturer.as_str())
                .collect::<BTreeSet<_>>();
            for label in labels {
                let row = self.label_row(
                    instance,
                    &decisions,
                    &total_value,
                    r,
                    |i| i.manufacturer == label,
                    ConstraintKind::ManufacturerConcentration(label.to_string()),
                )?;
                program.add_constraint(row);
            }
        }

        info!(
            "[MODEL] formulated program with {} variables, {} constraints and {} max-equalities ({:?})",
            program.n_variables(),
            program.constraints().len(),
            program.max_equalities().len(),
            self.linearization
        );

        Ok(Formulation {
            program,
            decisions,
            pinned_item,
            max_value_var,
        })
    }

    /// `scale * value(items with the label) - units(r) * total <= 0`
    fn label_row(
        &self,
        instance: &Instance,
        decisions: &[VarId],
        total_value: &LinearExpr,
        r: f64,
        has_label: impl Fn(&Item) -> bool,
        kind: ConstraintKind,
    ) -> Result<LinearConstraint> {
        let scale = self.fixed_point.scale() as i64;
        let terms = instance
            .items
            .iter()
            .zip(decisions)
            .filter(|(item, _)| has_label(*item))
            .map(|(item, &var)| Ok((var, to_coeff(item.value)?)))
            .collect::<Result<Vec<_>>>()?;
        let part = LinearExpr::from_terms(terms)?
            .scaled(scale)
            .with_context(|| format!("{kind} constraint"))?;
        let bound = total_value
            .scaled(to_coeff(self.fixed_point.units(r))?)
            .with_context(|| format!("{kind} constraint"))?;
        concentration_row(kind, &part, &bound)
    }
}

/// `part - bound <= 0`
fn concentration_row(
    kind: ConstraintKind,
    part: &LinearExpr,
    bound: &LinearExpr,
) -> Result<LinearConstraint> {
    let expr = part
        .minus(bound)
        .with_context(|| format!("{kind} constraint"))?;
    Ok(LinearConstraint {
        kind,
        expr,
        cmp: Comparison::LessOrEqual,
        rhs: 0,
    })
}

fn to_coeff(amount: u64) -> Result<i64> {
    i64::try_from(amount).map_err(|_| anyhow!("amount {amount} does not fit a program coefficient"))
}

fn scaled_rhs(amount: u64, scale: i64) -> Result<i64> {
    to_coeff(amount)?
        .checked_mul(scale)
        .ok_or_else(|| anyhow!("amount {amount} overflows when scaled by {scale}"))
}
