use crate::strategy::Strategy;
use hearts_core::model::card::Card;
use hearts_core::random::RandomGenerator;
use hearts_core::state::knowable::KnowableState;

/// Uniform pick over the legal plays. The baseline rollout policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub const fn new() -> Self {
        Self
    }
}

impl Strategy for RandomStrategy {
    fn choose_play(&self, state: &KnowableState, rng: &mut RandomGenerator) -> Card {
        let legal = state.legal_plays();
        legal
            .nth(rng.range64(legal.len() as u64) as usize)
            .expect("legal plays are never empty")
    }
}
