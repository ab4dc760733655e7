use orc_core::{OrcError, TransportProblem, TransportSolver};
use orc_transport::{SolverOptions, SuccessiveShortestPath};
use proptest::prelude::*;

/// Line metric over `len` points: cost(i, j) = |i - j|.
fn line_costs(len: usize) -> Vec<Option<f64>> {
    let mut costs = Vec::with_capacity(len * len);
    for i in 0..len {
        for j in 0..len {
            costs.push(Some((i as f64 - j as f64).abs()));
        }
    }
    costs
}

fn solve(supply: Vec<f64>, demand: Vec<f64>, costs: Vec<Option<f64>>) -> Result<f64, OrcError> {
    let problem = TransportProblem::new(supply, demand, costs)?;
    SuccessiveShortestPath::default()
        .solve(&problem)
        .map(|plan| plan.cost)
}

#[test]
fn identical_distributions_cost_nothing() {
    let mass = vec![0.2, 0.3, 0.5];
    let cost = solve(mass.clone(), mass, line_costs(3)).unwrap();
    assert!(cost.abs() < 1e-12);
}

#[test]
fn shifting_mass_on_a_line_matches_closed_form() {
    // Wasserstein-1 on a line equals the L1 distance between CDFs.
    let a = vec![0.5, 0.5, 0.0, 0.0];
    let b = vec![0.0, 0.0, 0.5, 0.5];
    let cost = solve(a, b, line_costs(4)).unwrap();
    assert!((cost - 2.0).abs() < 1e-9, "cost = {cost}");
}

#[test]
fn solver_undoes_greedy_choices() {
    // Greedy shipping origin 0 -> destination 0 forces origin 1 onto the
    // expensive lane; the optimum crosses instead.
    let costs = vec![Some(1.0), Some(2.0), Some(1.0), Some(100.0)];
    let cost = solve(vec![1.0, 1.0], vec![1.0, 1.0], costs).unwrap();
    assert!((cost - 3.0).abs() < 1e-9, "cost = {cost}");
}

#[test]
fn plan_respects_marginals() {
    let supply = vec![0.1, 0.6, 0.3];
    let demand = vec![0.4, 0.4, 0.2];
    let problem = TransportProblem::new(supply.clone(), demand.clone(), line_costs(3)).unwrap();
    let plan = SuccessiveShortestPath::default().solve(&problem).unwrap();
    let mut rows = vec![0.0; 3];
    let mut cols = vec![0.0; 3];
    for (i, j, amount) in &plan.flows {
        rows[*i] += amount;
        cols[*j] += amount;
    }
    for (got, want) in rows.iter().zip(&supply).chain(cols.iter().zip(&demand)) {
        assert!((got - want).abs() < 1e-9);
    }
}

#[test]
fn forbidden_lanes_make_the_problem_infeasible() {
    let err = solve(vec![1.0], vec![1.0], vec![None]).unwrap_err();
    assert!(matches!(err, OrcError::Solver(ref info) if info.code == "transport-infeasible"));
}

#[test]
fn augmentation_budget_is_enforced() {
    let solver = SuccessiveShortestPath::new(SolverOptions {
        max_augmentations: Some(1),
        ..SolverOptions::default()
    });
    let problem = TransportProblem::new(vec![0.5, 0.5], vec![0.5, 0.5], line_costs(2)).unwrap();
    let err = solver.solve(&problem).unwrap_err();
    assert_eq!(err.code(), "transport-iteration-limit");
}

#[test]
fn empty_problem_is_free() {
    let cost = solve(Vec::new(), Vec::new(), Vec::new()).unwrap();
    assert_eq!(cost, 0.0);
}

fn normalised(raw: Vec<f64>) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|value| value / total).collect()
}

proptest! {
    #[test]
    fn cost_is_symmetric_under_a_symmetric_metric(
        a in prop::collection::vec(0.01f64..1.0, 5),
        b in prop::collection::vec(0.01f64..1.0, 5),
    ) {
        let a = normalised(a);
        let b = normalised(b);
        let forward = solve(a.clone(), b.clone(), line_costs(5)).unwrap();
        let backward = solve(b, a, line_costs(5)).unwrap();
        prop_assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn line_cost_matches_cdf_distance(
        a in prop::collection::vec(0.01f64..1.0, 6),
        b in prop::collection::vec(0.01f64..1.0, 6),
    ) {
        let a = normalised(a);
        let b = normalised(b);
        let mut expected = 0.0;
        let mut running = 0.0;
        for (x, y) in a.iter().zip(&b) {
            running += x - y;
            expected += f64::abs(running);
        }
        let cost = solve(a, b, line_costs(6)).unwrap();
        prop_assert!((cost - expected).abs() < 1e-8, "cost {} expected {}", cost, expected);
    }
}
