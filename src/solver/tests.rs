use std::collections::HashSet;

use proptest::prelude::*;

use crate::expression::{ExprRef, Term, Value};
use crate::solve_target;
use crate::solver::{
    ConfigError, Generation, ReachableSet, SolverConfig, SolverError, TchislaSolver,
};

fn digit_count(expr: &str) -> usize {
    expr.chars().filter(|c| c.is_ascii_digit()).count()
}

fn assert_only_seed_digits(expr: &str, seed: char) {
    assert!(
        expr.chars().filter(|c| c.is_ascii_digit()).all(|c| c == seed),
        "foreign digits in {expr}"
    );
}

#[test]
fn reachable_set_admits_each_key_once() {
    let set = ReachableSet::new(1e-8);
    assert!(set.insert_if_absent(Value::Int(5)));
    assert!(!set.insert_if_absent(Value::Int(5)));
    assert!(set.insert_if_absent(Value::Int(-5)));
    assert!(set.insert_if_absent(Value::Float(0.5)));
    assert!(!set.insert_if_absent(Value::Float(0.5)));
}

#[test]
fn reachable_set_quantises_floats_by_precision() {
    let set = ReachableSet::new(1e-8);
    assert!(set.insert_if_absent(Value::Float(0.5)));
    // lands in the same quantisation bucket
    assert!(!set.insert_if_absent(Value::Float(0.500_000_001)));
    // three quanta away
    assert!(set.insert_if_absent(Value::Float(0.500_000_03)));
}

#[test]
fn reachable_set_keeps_large_floats_in_their_own_domain() {
    let set = ReachableSet::new(1e-8);
    let span = 1e-8 * i64::MAX as f64;
    assert!(set.insert_if_absent(Value::Float(span * 1.5)));
    assert!(!set.insert_if_absent(Value::Float(span * 1.5)));
    assert!(set.insert_if_absent(Value::Float(span * 1.25)));
}

#[test]
fn reachable_set_admits_each_key_once_across_threads() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let set = ReachableSet::new(1e-8);
    let admitted = AtomicUsize::new(0);
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for key in 0..1_000i64 {
                    if set.insert_if_absent(Value::Int(key)) {
                        admitted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });
    assert_eq!(admitted.load(Ordering::Relaxed), 1_000);
}

#[test]
fn reachable_set_survives_rehashing() {
    let set = ReachableSet::new(1e-8);
    for key in 0..10_000i64 {
        assert!(set.insert_if_absent(Value::Int(key * 11)));
    }
    for key in 0..10_000i64 {
        assert!(!set.insert_if_absent(Value::Int(key * 11)));
    }
}

#[test]
fn generation_iterates_partitions_in_order_skipping_empties() {
    let term = |n: i64| Term {
        expr: ExprRef::new(0, n as u32),
        value: Value::Int(n),
    };
    let mut generation = Generation::new(3);
    generation.part_mut(0).push(term(1));
    generation.part_mut(2).push(term(3));
    generation.part_mut(0).push(term(2));
    let values: Vec<i64> = generation.iter().map(|t| t.value.as_i64()).collect();
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(generation.len(), 3);
    assert!(!generation.is_empty());
    assert!(Generation::new(2).is_empty());
}

#[test]
fn pair_schedule_covers_every_split_once() {
    for prior in 0..12usize {
        let pairs: Vec<(usize, usize)> = TchislaSolver::pair_schedule(prior).collect();
        assert_eq!(pairs.len(), (prior + 1) / 2);
        let pass = prior + 1;
        let mut seen = HashSet::new();
        for (i, j) in pairs {
            // generation indices are zero-based, digit counts one-based
            let (a, b) = (i + 1, j + 1);
            assert!(a <= b);
            assert_eq!(a + b, pass);
            assert!(seen.insert((a, b)));
        }
        for a in 1..=pass / 2 {
            assert!(seen.contains(&(a, pass - a)), "missing split ({a}, {})", pass - a);
        }
    }
}

#[test]
fn admitted_values_are_distinct_across_a_whole_solve() {
    let config = SolverConfig {
        search_depth: 4,
        ..Default::default()
    };
    let mut solver = TchislaSolver::new(999_983, 3, config);
    assert!(!solver.solve());
    let fresh = ReachableSet::new(config.precision);
    let mut total = 0usize;
    for generation in solver.generations() {
        for term in generation.iter() {
            assert!(
                fresh.insert_if_absent(term.value),
                "value {:?} admitted twice",
                term.value
            );
            total += 1;
        }
    }
    assert_eq!(total, solver.generation_sizes().iter().sum::<usize>());
}

#[test]
fn rendered_generations_use_only_seed_digits_in_exact_counts() {
    let config = SolverConfig {
        search_depth: 3,
        ..Default::default()
    };
    let mut solver = TchislaSolver::new(999_983, 7, config);
    assert!(!solver.solve());
    let view = solver.pools().view();
    for (index, generation) in solver.generations().iter().enumerate() {
        for term in generation.iter() {
            let rendering = view.render(term.expr);
            let digits: Vec<char> = rendering
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            assert_eq!(digits.len(), index + 1, "wrong digit count in {rendering}");
            assert!(digits.iter().all(|&c| c == '7'), "foreign digit in {rendering}");
        }
    }
}

#[test]
fn finds_the_trivial_single_digit_solution() {
    let result = solve_target(1, 1, &SolverConfig::default()).expect("valid arguments");
    assert_eq!(result.as_deref(), Some("1"));
}

#[test]
fn finds_ten_from_ones_with_three_digits() {
    let result = solve_target(10, 1, &SolverConfig::default())
        .expect("valid arguments")
        .expect("10 is reachable from ones");
    assert_only_seed_digits(&result, '1');
    assert_eq!(digit_count(&result), 3);
}

#[test]
fn finds_seven_from_twos() {
    let result = solve_target(7, 2, &SolverConfig::default())
        .expect("valid arguments")
        .expect("7 is reachable from twos");
    assert_only_seed_digits(&result, '2');
}

#[test]
fn finds_one_hundred_from_ones() {
    let result = solve_target(100, 1, &SolverConfig::default())
        .expect("valid arguments")
        .expect("100 is reachable from ones");
    assert_only_seed_digits(&result, '1');
}

#[test]
fn finds_2016_from_fives() {
    let config = SolverConfig {
        value_max_limit: 1e7,
        value_min_limit: 1e-2,
        power_limit: 10,
        search_depth: 8,
        ..Default::default()
    };
    let result = solve_target(2016, 5, &config)
        .expect("valid arguments")
        .expect("2016 is reachable from fives");
    assert_only_seed_digits(&result, '5');
}

#[test]
fn reports_not_found_within_a_shallow_depth() {
    let config = SolverConfig {
        search_depth: 3,
        ..Default::default()
    };
    assert_eq!(solve_target(13, 7, &config).expect("valid arguments"), None);
}

#[test]
fn trace_mode_completes_passes_without_finding() {
    let config = SolverConfig {
        search_depth: 2,
        trace: true,
        ..Default::default()
    };
    assert_eq!(solve_target(3, 1, &config).expect("valid arguments"), None);
}

#[test]
fn forced_multithreading_finds_the_same_target() {
    let config = SolverConfig {
        multithread_threshold: 0,
        ..Default::default()
    };
    let result = solve_target(100, 1, &config)
        .expect("valid arguments")
        .expect("100 is reachable from ones");
    assert_only_seed_digits(&result, '1');
}

#[test]
fn rejects_invalid_arguments() {
    let config = SolverConfig::default();
    assert_eq!(solve_target(0, 1, &config), Err(SolverError::InvalidTarget(0)));
    assert_eq!(solve_target(-3, 1, &config), Err(SolverError::InvalidTarget(-3)));
    assert_eq!(solve_target(5, 0, &config), Err(SolverError::InvalidSeed(0)));
    assert_eq!(solve_target(5, 10, &config), Err(SolverError::InvalidSeed(10)));

    let bad = SolverConfig {
        precision: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        solve_target(5, 5, &bad),
        Err(SolverError::Config(ConfigError::PrecisionOutOfRange(_)))
    ));
    let bad = SolverConfig {
        power_limit: 0,
        ..Default::default()
    };
    assert!(bad.validate().is_err());
    let bad = SolverConfig {
        search_depth: 0,
        ..Default::default()
    };
    assert_eq!(bad.validate(), Err(ConfigError::ZeroSearchDepth));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn single_and_multi_thread_runs_agree(
        target in 1i64..=400,
        seed in 1u32..=9,
        depth in 1usize..=5,
    ) {
        let single = SolverConfig {
            multithread_threshold: usize::MAX,
            search_depth: depth,
            ..Default::default()
        };
        let multi = SolverConfig {
            multithread_threshold: 0,
            search_depth: depth,
            ..Default::default()
        };
        let sequential = solve_target(target, seed, &single).expect("valid arguments");
        let threaded = solve_target(target, seed, &multi).expect("valid arguments");
        prop_assert_eq!(sequential.is_some(), threaded.is_some());
        if let (Some(a), Some(b)) = (sequential, threaded) {
            prop_assert_eq!(digit_count(&a), digit_count(&b));
        }
    }
}
