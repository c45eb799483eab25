mod monte_carlo;
mod random;

pub use monte_carlo::{MonteCarlo, RolloutConfig};
pub use random::RandomStrategy;

use hearts_core::model::card::Card;
use hearts_core::outcome::GameOutcome;
use hearts_core::random::RandomGenerator;
use hearts_core::state::game::GameState;
use hearts_core::state::knowable::KnowableState;

/// A card picker. This is the whole capability set: given what the current
/// player knows, return one of their legal plays.
///
/// Implementations must be shareable across rollout workers, so anything
/// stateful needs its own synchronization.
pub trait Strategy: Send + Sync {
    fn choose_play(&self, state: &KnowableState, rng: &mut RandomGenerator) -> Card;
}

/// Plays `game` to its terminal state using `policy` for every seat.
pub fn play_out(
    game: &mut GameState,
    policy: &dyn Strategy,
    rng: &mut RandomGenerator,
) -> GameOutcome {
    while !game.is_terminal() {
        let knowable = KnowableState::from_game(game);
        let card = policy.choose_play(&knowable, rng);
        debug_assert!(knowable.legal_plays().contains(card));
        game.play_card(card);
    }
    game.outcome()
}

/// Plays `game` to its terminal state with one strategy per seat.
pub fn play_game(
    game: &mut GameState,
    strategies: &[&dyn Strategy; 4],
    rng: &mut RandomGenerator,
) -> GameOutcome {
    while !game.is_terminal() {
        let seat = game.current_seat();
        let knowable = KnowableState::from_game(game);
        let card = strategies[seat.index()].choose_play(&knowable, rng);
        game.play_card(card);
    }
    game.outcome()
}
