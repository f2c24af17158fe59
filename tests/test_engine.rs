use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use hyperga::{
    chromosome::Chromosome,
    error::{GeneticError, Result, ResultExt},
    evolution::{
        ElitismPolicy, Evaluation, EvolutionEngine, EvolutionEngineBuilder, EvolutionOptions,
        Execution, LogLevel,
    },
    rng::RandomNumberGenerator,
    space::{Limit, SearchSpace},
};

fn x_of(chromosome: &Chromosome) -> f64 {
    chromosome
        .value("x")
        .and_then(|value| value.as_f64())
        .unwrap_or_default()
}

fn identity(chromosome: &Chromosome) -> Result<Evaluation> {
    Ok(Evaluation::new(x_of(chromosome)))
}

fn parabola(chromosome: &Chromosome) -> Result<Evaluation> {
    let x = x_of(chromosome);
    Ok(Evaluation::new(-(x - 3.0).powi(2)).with_mae((x - 3.0).abs()))
}

fn x_space(low: f64, high: f64) -> SearchSpace {
    SearchSpace::new().with("x", Limit::continuous(low, high).unwrap())
}

fn quiet() -> hyperga::evolution::options::EvolutionOptionsBuilder {
    EvolutionOptions::builder().log_level(LogLevel::None)
}

#[test]
fn test_elitism_preserves_the_incumbent() {
    let options = quiet()
        .population_size(4)
        .elitism(2)
        .crossover_rate(0.0)
        .mutation_rate(0.0)
        .num_generations(3)
        .build();
    let mut engine = EvolutionEngine::new(
        x_space(0.0, 10.0),
        identity,
        options,
        RandomNumberGenerator::from_seed(42),
    )
    .unwrap();
    let initial_max = engine
        .population()
        .iter()
        .map(x_of)
        .fold(f64::NEG_INFINITY, f64::max);

    let result = engine.run().unwrap();

    let best = engine.history().best();
    assert_eq!(best.len(), 4);
    assert!(best.windows(2).all(|w| w[0] <= w[1]), "{:?}", best);
    assert_eq!(best[0], initial_max);
    assert_eq!(result.fitness, initial_max);
    assert_eq!(x_of(&result.chromosome), initial_max);
}

#[test]
fn test_history_has_one_entry_per_generation_and_is_ordered() {
    for seed in 0..5 {
        let options = quiet().population_size(6).num_generations(7).build();
        let mut engine = EvolutionEngine::new(
            x_space(-10.0, 10.0),
            parabola,
            options,
            RandomNumberGenerator::from_seed(seed),
        )
        .unwrap();

        engine.run().unwrap();

        let history = engine.history();
        assert_eq!(history.len(), 8);
        for stats in history.iter() {
            assert!(
                stats.worst <= stats.average && stats.average <= stats.best,
                "{:?}",
                stats
            );
        }
    }
}

#[test]
fn test_zero_generations_only_scores_the_initial_population() {
    let options = quiet().population_size(4).num_generations(0).build();
    let mut engine = EvolutionEngine::new(
        x_space(0.0, 1.0),
        identity,
        options,
        RandomNumberGenerator::from_seed(1),
    )
    .unwrap();
    let initial: Vec<f64> = engine.population().iter().map(x_of).collect();

    let result = engine.run().unwrap();

    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.population().len(), 4);
    assert_eq!(
        result.fitness,
        initial.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    );
}

#[test]
fn test_search_converges_towards_optimum() {
    let options = quiet()
        .population_size(20)
        .num_generations(30)
        .mutation_rate(0.3)
        .build();
    let mut engine = EvolutionEngine::new(
        x_space(-10.0, 10.0),
        parabola,
        options,
        RandomNumberGenerator::from_seed(2024),
    )
    .unwrap();

    let result = engine.run().unwrap();

    assert!(result.fitness > -0.25, "fitness {}", result.fitness);
    assert!((x_of(&result.chromosome) - 3.0).abs() < 0.5);
    let best = engine.history().best();
    assert!(best.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        result.chromosome.metrics().mae,
        Some((x_of(&result.chromosome) - 3.0).abs())
    );
}

#[test]
fn test_odd_population_is_rejected_before_sampling() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let challenge = move |chromosome: &Chromosome| -> Result<Evaluation> {
        counter.fetch_add(1, Ordering::SeqCst);
        identity(chromosome)
    };

    let result = EvolutionEngine::new(
        x_space(0.0, 1.0),
        challenge,
        quiet().population_size(5).build(),
        RandomNumberGenerator::from_seed(1),
    );

    match result {
        Err(GeneticError::Configuration(msg)) => assert!(msg.contains("even")),
        _ => panic!("Expected Configuration error"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_invalid_rates_and_elitism_are_rejected() {
    for options in [
        quiet().mutation_rate(1.2).build(),
        quiet().crossover_rate(-0.5).build(),
        quiet().population_size(4).elitism(6).build(),
    ] {
        let result = EvolutionEngine::new(
            x_space(0.0, 1.0),
            identity,
            options,
            RandomNumberGenerator::from_seed(1),
        );
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }
}

#[test]
fn test_empty_search_space_is_rejected() {
    let result = EvolutionEngine::new(
        SearchSpace::new(),
        identity,
        quiet().build(),
        RandomNumberGenerator::from_seed(1),
    );

    assert!(matches!(result, Err(GeneticError::Configuration(_))));
}

#[test]
fn test_unrepresentable_continuous_range_is_rejected() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let challenge = move |chromosome: &Chromosome| -> Result<Evaluation> {
        counter.fetch_add(1, Ordering::SeqCst);
        identity(chromosome)
    };
    let space = SearchSpace::new().with(
        "x",
        Limit::Continuous {
            low: -f64::MAX,
            high: f64::MAX,
        },
    );

    let result = EvolutionEngine::new(
        space,
        challenge,
        quiet().build(),
        RandomNumberGenerator::from_seed(1),
    );

    assert!(matches!(result, Err(GeneticError::Configuration(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failing_fitness_aborts_the_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let challenge = move |chromosome: &Chromosome| -> Result<Evaluation> {
        if counter.fetch_add(1, Ordering::SeqCst) == 9 {
            "nan-loss".parse::<f64>().context("Training diverged")?;
        }
        identity(chromosome)
    };
    let options = quiet()
        .population_size(4)
        .elitism(0)
        .num_generations(10)
        .build();
    let mut engine = EvolutionEngine::new(
        x_space(0.0, 1.0),
        challenge,
        options,
        RandomNumberGenerator::from_seed(1),
    )
    .unwrap();

    match engine.run() {
        Err(GeneticError::Other(msg)) => assert!(msg.starts_with("Training diverged")),
        other => panic!("Expected the fitness error, got {:?}", other.map(|r| r.fitness)),
    }
    // Generations 0 and 1 completed, generation 2 failed on its second chromosome.
    assert_eq!(engine.history().len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 10);
}

#[test]
fn test_non_finite_fitness_is_an_error() {
    let challenge = |_: &Chromosome| -> Result<Evaluation> { Ok(Evaluation::new(f64::NAN)) };
    let mut engine = EvolutionEngine::new(
        x_space(0.0, 1.0),
        challenge,
        quiet().population_size(2).elitism(0).build(),
        RandomNumberGenerator::from_seed(1),
    )
    .unwrap();

    assert!(matches!(
        engine.run(),
        Err(GeneticError::FitnessCalculation(_))
    ));
    assert!(engine.history().is_empty());
}

#[test]
fn test_population_size_per_elitism_policy() {
    for (policy, expected) in [(ElitismPolicy::Augment, 8), (ElitismPolicy::Replace, 6)] {
        let options = quiet()
            .population_size(6)
            .elitism(2)
            .num_generations(4)
            .elitism_policy(policy)
            .build();
        let mut engine = EvolutionEngine::new(
            x_space(0.0, 10.0),
            identity,
            options,
            RandomNumberGenerator::from_seed(8),
        )
        .unwrap();

        engine.run().unwrap();

        assert_eq!(engine.population().len(), expected, "{:?}", policy);
        let best = engine.history().best();
        assert!(best.windows(2).all(|w| w[0] <= w[1]), "{:?}", policy);
    }
}

#[test]
fn test_elite_is_a_sorted_subset() {
    let options = quiet().population_size(8).elitism(3).build();
    let mut engine = EvolutionEngine::new(
        x_space(0.0, 10.0),
        identity,
        options,
        RandomNumberGenerator::from_seed(13),
    )
    .unwrap();
    engine.evaluate_population().unwrap();
    let before: Vec<f64> = engine.population().iter().map(x_of).collect();

    let elite = engine.elite().unwrap();

    assert_eq!(elite.len(), 3);
    assert!(elite.windows(2).all(|w| w[0] >= w[1]));
    for chromosome in &elite {
        assert!(engine
            .population()
            .iter()
            .any(|member| member.values() == chromosome.values()));
    }
    let mut sorted = before.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(elite.iter().map(x_of).collect::<Vec<_>>(), sorted[..3].to_vec());
    // The live population keeps its order.
    assert_eq!(engine.population().iter().map(x_of).collect::<Vec<_>>(), before);
}

#[test]
fn test_parallel_and_sequential_runs_agree() {
    let run = |execution: Execution| {
        let options = quiet()
            .population_size(10)
            .num_generations(6)
            .execution(execution)
            .build();
        let mut engine = EvolutionEngine::new(
            x_space(-10.0, 10.0),
            parabola,
            options,
            RandomNumberGenerator::from_seed(99),
        )
        .unwrap();
        let result = engine.run().unwrap();
        (engine.history().clone(), result.fitness)
    };

    assert_eq!(run(Execution::Sequential), run(Execution::Parallel));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut engine = EvolutionEngineBuilder::new()
            .with_search_space(
                SearchSpace::new()
                    .with("x", Limit::continuous(-10.0, 10.0).unwrap())
                    .with("layers", Limit::discrete(1, 6, 1).unwrap())
                    .with("cell", Limit::categorical(["gru", "lstm"]).unwrap()),
            )
            .with_challenge(parabola as fn(&Chromosome) -> Result<Evaluation>)
            .with_options(quiet().population_size(6).num_generations(5).build())
            .with_seed(5)
            .build()
            .unwrap();
        let result = engine.run().unwrap();
        (result.chromosome.values().clone(), result.fitness)
    };

    assert_eq!(run(), run());
}

#[test]
fn test_verbose_logging_runs() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let options = EvolutionOptions::builder()
        .population_size(4)
        .num_generations(2)
        .log_level(LogLevel::Verbose)
        .build();
    let mut engine = EvolutionEngine::new(
        x_space(0.0, 1.0),
        identity,
        options,
        RandomNumberGenerator::from_seed(3),
    )
    .unwrap();

    assert!(engine.run().is_ok());
    assert!(engine
        .fitness_report()
        .unwrap()
        .contains("Average fitness is"));
}
