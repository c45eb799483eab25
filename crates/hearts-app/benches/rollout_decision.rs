use criterion::{Criterion, criterion_group, criterion_main};
use hearts_bot::strategy::{MonteCarlo, RandomStrategy, RolloutConfig, Strategy};
use hearts_core::model::deal::Deal;
use hearts_core::random::RandomGenerator;
use hearts_core::state::game::GameState;
use hearts_core::state::knowable::KnowableState;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

/// Advances a fresh deal until the player to act has a real choice.
fn decision_state(seed: u64) -> KnowableState {
    let mut rng = RandomGenerator::seeded(seed);
    let deal = Deal::random(&mut rng);
    let mut game = GameState::new(&deal);
    loop {
        let legal = game.legal_plays();
        if legal.len() > 1 {
            return KnowableState::from_game(&game);
        }
        game.play_card(legal.first().expect("legal plays are never empty"));
    }
}

fn bench_rollout_decision(c: &mut Criterion) {
    let knowable = decision_state(17);
    let config = RolloutConfig {
        min_alternates: 20,
        max_alternates: 20,
        time_budget: Duration::ZERO,
        parallel: false,
    };
    let engine = MonteCarlo::new(Arc::new(RandomStrategy::new()), config, None);

    c.bench_function("rollout_decision_20_alternates", |b| {
        b.iter(|| {
            let mut rng = RandomGenerator::seeded(23);
            engine.choose_play(black_box(&knowable), &mut rng)
        })
    });
}

fn bench_possibility_analysis(c: &mut Criterion) {
    let knowable = decision_state(17);

    c.bench_function("analyze_and_actualize", |b| {
        b.iter(|| {
            let analyzer = black_box(&knowable).analyze();
            let mut rng = RandomGenerator::seeded(29);
            let index = rng.range128(analyzer.possibilities());
            analyzer.actualize(index)
        })
    });
}

criterion_group!(benches, bench_rollout_decision, bench_possibility_analysis);
criterion_main!(benches);
