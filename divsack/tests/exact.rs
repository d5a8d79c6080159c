#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::prelude::SmallRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    use divsack::assemble::assemble;
    use divsack::entities::{Group, Instance, Item, Parameters};
    use divsack::eval::score;
    use divsack::model::{ConstraintKind, Formulator, Program, Variable};
    use divsack::select::select;
    use divsack::solver::{
        Assignment, EnumerationSolver, SolveLimits, SolveOutcome, SolveStatus, SolverAdapter,
    };
    use divsack::util::{FixedPoint, LinearizationMode, SelectionConfig, SelectionStrategy};

    const LABELS: [&str; 3] = ["x", "y", "z"];

    fn instance(items: &[(u64, u64, u64, &str, &str)]) -> Instance {
        Instance::from_items(
            items
                .iter()
                .map(|&(value, weight, volume, m, t)| Item::new(0, value, weight, volume, m, t)),
        )
    }

    fn scenario_2() -> (Instance, Parameters) {
        let instance = instance(&[
            (9, 10, 10, "a", "p1"),
            (3, 4, 9, "b", "p2"),
            (3, 5, 2, "c", "p1"),
            (6, 4, 4, "c", "p1"),
            (3, 2, 2, "c", "p2"),
            (3, 1, 1, "c", "p2"),
        ]);
        let params = Parameters::try_new(20, 20, 10, Some(0.8), Some(0.7), Some(0.7)).unwrap();
        (instance, params)
    }

    /// The highest-value item does not fit, but the two others form a valid group
    fn unreachable_max_item() -> (Instance, Parameters) {
        let instance = instance(&[(10, 30, 0, "a", "t"), (5, 1, 0, "b", "u"), (5, 1, 0, "c", "v")]);
        let params = Parameters::try_new(20, 20, 0, Some(0.8), None, None).unwrap();
        (instance, params)
    }

    fn random_instance(rng: &mut SmallRng, n_items: usize) -> (Instance, Parameters) {
        let items = (0..n_items)
            .map(|id| {
                Item::new(
                    id,
                    rng.random_range(1..15),
                    rng.random_range(0..10),
                    rng.random_range(0..10),
                    LABELS[rng.random_range(0..LABELS.len())],
                    LABELS[rng.random_range(0..LABELS.len())],
                )
            })
            .collect();
        let params = Parameters::try_new(
            rng.random_range(10..40),
            rng.random_range(10..40),
            rng.random_range(0..10),
            Some(rng.random_range(300..1000u32) as f64 / 1000.0),
            Some(rng.random_range(400..1000u32) as f64 / 1000.0),
            Some(rng.random_range(400..1000u32) as f64 / 1000.0),
        )
        .unwrap();
        (Instance::new(items), params)
    }

    fn config(linearization: LinearizationMode) -> SelectionConfig {
        SelectionConfig {
            strategy: SelectionStrategy::ExactOptimization,
            linearization,
            ..SelectionConfig::default()
        }
    }

    fn subsets(instance: &Instance) -> impl Iterator<Item = Group> + '_ {
        instance.items.iter().cloned().powerset().map(Group::from_iter)
    }

    #[test_case(LinearizationMode::ForceMax; "force max")]
    #[test_case(LinearizationMode::MaxEquality; "max equality")]
    #[test_case(LinearizationMode::MaxAll; "max all")]
    fn exact_diverse_selection(linearization: LinearizationMode) {
        let (instance, params) = scenario_2();
        let selection = select(
            &instance,
            &params,
            &config(linearization),
            Some(&EnumerationSolver::default()),
        )
        .unwrap();

        assert_eq!(selection.status, Some(SolveStatus::Optimal));
        assert_eq!(selection.group.item_ids().collect_vec(), vec![0, 2, 4, 5]);
        assert!(selection.validation.valid);
        assert_eq!(selection.validation.total_value, 18);
        assert_eq!(selection.validation.total_weight, 18);
        assert_eq!(selection.validation.total_volume, 15);
    }

    #[test]
    fn force_max_infeasible_when_max_item_excluded() {
        let (instance, params) = unreachable_max_item();
        let solver = EnumerationSolver::default();

        let forced = select(&instance, &params, &config(LinearizationMode::ForceMax), Some(&solver))
            .unwrap();
        assert_eq!(forced.status, Some(SolveStatus::Infeasible));
        assert!(forced.group.is_empty());
        //no floor, so the empty group still passes
        assert!(forced.validation.valid);

        for linearization in [LinearizationMode::MaxEquality, LinearizationMode::MaxAll] {
            let selection = select(&instance, &params, &config(linearization), Some(&solver)).unwrap();
            assert_eq!(selection.status, Some(SolveStatus::Optimal));
            assert_eq!(selection.group.item_ids().collect_vec(), vec![1, 2]);
            assert!(selection.validation.valid);
        }
    }

    #[test]
    fn exact_accepts_share_at_limit() {
        let instance = instance(&[(5, 1, 1, "a", "t"), (5, 1, 1, "b", "u")]);
        let params = Parameters::try_new(10, 10, 0, Some(0.5), Some(0.5), Some(0.5)).unwrap();
        let selection = select(
            &instance,
            &params,
            &config(LinearizationMode::MaxAll),
            Some(&EnumerationSolver::default()),
        )
        .unwrap();
        assert_eq!(selection.validation.total_value, 10);
        assert!(selection.validation.valid);
    }

    #[test]
    fn limit_finer_than_scale_is_rejected() {
        //the item share 2/3 lies between 0.6666 and 667 thousandths
        let instance = instance(&[(2, 1, 1, "a", "t"), (1, 1, 1, "b", "u")]);
        let params = Parameters::try_new(10, 10, 0, Some(0.6666), None, None).unwrap();
        let solver = EnumerationSolver::default();

        let coarse = config(LinearizationMode::MaxAll);
        assert!(Formulator::new(coarse.linearization, coarse.fixed_point)
            .formulate(&instance, &params)
            .is_err());
        assert!(select(&instance, &params, &coarse, Some(&solver)).is_err());

        let fine = SelectionConfig {
            fixed_point: FixedPoint::try_new(10_000).unwrap(),
            ..coarse
        };
        let selection = select(&instance, &params, &fine, Some(&solver)).unwrap();
        assert_eq!(selection.status, Some(SolveStatus::Optimal));
        assert!(selection.group.is_empty());
        assert!(selection.validation.valid);
    }

    #[test]
    fn zero_scale_config_is_rejected() {
        let config = r#"{"linearization": "max_all", "fixed_point": {"scale": 0}}"#;
        assert!(serde_json::from_str::<SelectionConfig>(config).is_err());

        let config = r#"{"linearization": "max_all", "fixed_point": {"scale": 10}}"#;
        let config = serde_json::from_str::<SelectionConfig>(config).unwrap();
        assert_eq!(config.fixed_point.scale(), 10);
    }

    #[test_case(0; "no floor")]
    #[test_case(3; "with floor")]
    fn exact_empty_instance(min_value: u64) {
        let params = Parameters::try_new(10, 10, min_value, Some(0.5), None, None).unwrap();
        let selection = select(
            &Instance::default(),
            &params,
            &config(LinearizationMode::ForceMax),
            Some(&EnumerationSolver::default()),
        )
        .unwrap();

        assert!(selection.group.is_empty());
        assert_eq!(selection.validation.total_value, 0);
        assert_eq!(selection.validation.valid, min_value == 0);
        let expected = match min_value {
            0 => SolveStatus::Optimal,
            _ => SolveStatus::Infeasible,
        };
        assert_eq!(selection.status, Some(expected));
    }

    #[test]
    fn formulation_rows() {
        let (instance, params) = scenario_2();
        let fp = FixedPoint::default();

        let force_max = Formulator::new(LinearizationMode::ForceMax, fp)
            .formulate(&instance, &params)
            .unwrap();
        assert_eq!(force_max.pinned_item, Some(0));
        assert!(force_max.program.variable(force_max.decisions[0]).is_fixed());
        //weight, volume, min value, item, 2 types, 3 manufacturers
        assert_eq!(force_max.program.constraints().len(), 9);
        assert_eq!(force_max.program.n_variables(), 6);

        let max_eq = Formulator::new(LinearizationMode::MaxEquality, fp)
            .formulate(&instance, &params)
            .unwrap();
        assert_eq!(max_eq.pinned_item, None);
        assert!(max_eq.max_value_var.is_some());
        assert_eq!(max_eq.program.n_variables(), 7);
        assert_eq!(max_eq.program.max_equalities().len(), 1);
        assert_eq!(max_eq.program.constraints().len(), 9);

        let max_all = Formulator::new(LinearizationMode::MaxAll, fp)
            .formulate(&instance, &params)
            .unwrap();
        let n_item_rows = max_all
            .program
            .constraints()
            .iter()
            .filter(|c| c.kind == ConstraintKind::ItemConcentration)
            .count();
        assert_eq!(n_item_rows, 6);
        assert_eq!(max_all.program.constraints().len(), 14);
        let type_rows = max_all
            .program
            .constraints()
            .iter()
            .filter_map(|c| match &c.kind {
                ConstraintKind::TypeConcentration(t) => Some(t.as_str()),
                _ => None,
            })
            .collect_vec();
        assert_eq!(type_rows, vec!["p1", "p2"]);
    }

    #[test]
    fn formulation_omits_absent_limits() {
        let instance = instance(&[(1, 1, 1, "a", "t"), (2, 2, 2, "b", "u")]);
        let params = Parameters::capacity_only(5, 5);
        let formulation = Formulator::new(LinearizationMode::ForceMax, FixedPoint::default())
            .formulate(&instance, &params)
            .unwrap();

        let kinds = formulation
            .program
            .constraints()
            .iter()
            .map(|c| c.kind.clone())
            .collect_vec();
        assert_eq!(kinds, vec![ConstraintKind::Weight, ConstraintKind::Volume]);
        assert_eq!(formulation.pinned_item, None);
    }

    #[test]
    fn formulation_overflow_is_an_error() {
        let instance = instance(&[(u64::MAX, 1, 1, "a", "t")]);
        let params = Parameters::capacity_only(5, 5);
        let config = config(LinearizationMode::ForceMax);
        assert!(select(&instance, &params, &config, Some(&EnumerationSolver::default())).is_err());
    }

    #[test_case(0; "seed 0")]
    #[test_case(1; "seed 1")]
    #[test_case(2; "seed 2")]
    fn max_all_feasible_groups_are_valid(seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..10 {
            let (instance, params) = random_instance(&mut rng, 7);
            let formulation = Formulator::new(LinearizationMode::MaxAll, FixedPoint::default())
                .formulate(&instance, &params)
                .unwrap();

            for group in subsets(&instance) {
                let mut values = vec![0; formulation.program.n_variables()];
                for id in group.item_ids() {
                    values[formulation.decisions[id].index()] = 1;
                }
                if formulation.program.is_feasible(&values) {
                    assert!(score(&group, &params).valid, "group {:?}", group.item_ids().collect_vec());
                }
            }
        }
    }

    #[test_case(LinearizationMode::MaxEquality, 3; "max equality")]
    #[test_case(LinearizationMode::MaxAll, 4; "max all")]
    fn exact_matches_exhaustive_search(linearization: LinearizationMode, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let solver = EnumerationSolver::default();
        for _ in 0..10 {
            let (instance, params) = random_instance(&mut rng, 8);
            let best_value = subsets(&instance)
                .map(|g| score(&g, &params))
                .filter(|r| r.valid)
                .map(|r| r.total_value)
                .max();

            let selection = select(&instance, &params, &config(linearization), Some(&solver)).unwrap();
            match best_value {
                Some(value) => {
                    assert_eq!(selection.status, Some(SolveStatus::Optimal));
                    assert!(selection.validation.valid);
                    assert_eq!(selection.validation.total_value, value);
                }
                None => assert_eq!(selection.status, Some(SolveStatus::Infeasible)),
            }
        }
    }

    #[test]
    fn result_independent_of_workers() {
        let mut rng = SmallRng::seed_from_u64(5);
        let solver = EnumerationSolver::new(3);
        for _ in 0..5 {
            let (instance, params) = random_instance(&mut rng, 12);
            let formulation = Formulator::new(LinearizationMode::MaxAll, FixedPoint::default())
                .formulate(&instance, &params)
                .unwrap();
            let outcomes = [1, 2, 4].map(|n_workers| {
                let limits = SolveLimits {
                    n_workers,
                    ..SolveLimits::default()
                };
                solver.solve(&formulation.program, &limits)
            });
            assert!(outcomes.iter().all_equal());
        }
    }

    #[test]
    fn zero_time_limit() {
        let (instance, params) = scenario_2();
        let formulation = Formulator::new(LinearizationMode::ForceMax, FixedPoint::default())
            .formulate(&instance, &params)
            .unwrap();
        let limits = SolveLimits {
            time_limit_secs: 0,
            n_workers: 2,
        };
        let outcome = EnumerationSolver::default().solve(&formulation.program, &limits);

        assert!(matches!(
            outcome.status,
            SolveStatus::TimeoutNoSolution | SolveStatus::Feasible
        ));
        assert_eq!(outcome.assignment.is_some(), outcome.status == SolveStatus::Feasible);
    }

    #[test]
    fn free_integer_variable_is_an_error() {
        let mut program = Program::new();
        program.add_variable(Variable::integer("count", 0, 5));
        let outcome = EnumerationSolver::default().solve(&program, &SolveLimits::default());

        assert_eq!(outcome.status, SolveStatus::Error);
        assert!(outcome.assignment.is_none());
        assert!(outcome.diagnostic.is_some());
    }

    #[test]
    fn assemble_keeps_instance_order() {
        let (instance, params) = scenario_2();
        let formulation = Formulator::new(LinearizationMode::MaxAll, FixedPoint::default())
            .formulate(&instance, &params)
            .unwrap();
        let chosen = [5, 1, 3];
        let mut values = vec![0; formulation.program.n_variables()];
        for id in chosen {
            values[formulation.decisions[id].index()] = 1;
        }
        let assignment = Assignment::new(values);

        let outcome = SolveOutcome::solved(SolveStatus::Feasible, assignment.clone());
        let group = assemble(&instance, &formulation, &outcome);
        assert_eq!(group.item_ids().collect_vec(), vec![1, 3, 5]);

        let unsolved = SolveOutcome::unsolved(SolveStatus::TimeoutNoSolution);
        assert!(assemble(&instance, &formulation, &unsolved).is_empty());
    }

    #[test]
    fn missing_solver_yields_empty_selection() {
        let (instance, params) = scenario_2();
        let selection = select(&instance, &params, &config(LinearizationMode::ForceMax), None).unwrap();

        assert_eq!(selection.status, None);
        assert!(selection.group.is_empty());
        assert!(!selection.validation.valid);
    }

    #[test]
    fn greedy_strategies_through_select() {
        let (instance, params) = scenario_2();
        let greedy = SelectionConfig {
            strategy: SelectionStrategy::Greedy,
            ..SelectionConfig::default()
        };
        let selection = select(&instance, &params, &greedy, None).unwrap();
        assert_eq!(selection.status, None);
        assert_eq!(selection.validation.total_value, 21);

        let post_check = SelectionConfig {
            strategy: SelectionStrategy::GreedyWithPostCheck,
            ..SelectionConfig::default()
        };
        let selection = select(&instance, &params, &post_check, None).unwrap();
        assert!(selection.group.is_empty());
    }

    #[cfg(feature = "milp")]
    #[test_case(LinearizationMode::ForceMax; "force max")]
    #[test_case(LinearizationMode::MaxEquality; "max equality")]
    #[test_case(LinearizationMode::MaxAll; "max all")]
    fn milp_diverse_selection(linearization: LinearizationMode) {
        use divsack::solver::MilpSolver;

        let (instance, params) = scenario_2();
        let selection = select(&instance, &params, &config(linearization), Some(&MilpSolver)).unwrap();

        assert_eq!(selection.status, Some(SolveStatus::Optimal));
        assert!(selection.validation.valid);
        assert_eq!(selection.validation.total_value, 18);
    }
}
