use crate::analysis::possibility::PossibilityAnalyzer;
use crate::model::card::Card;
use crate::model::cardset::CardSet;
use crate::model::seat::Seat;
use crate::model::voids::VoidTable;
use crate::state::game::GameState;
use crate::state::hearts::HeartsState;

/// What the player about to act actually knows: the public state plus their
/// own hand. Opponents' hands are hidden; the void table and unplayed mask
/// carry everything that can be inferred about them.
#[derive(Debug, Clone, Copy)]
pub struct KnowableState {
    hearts: HeartsState,
    hand: CardSet,
}

impl KnowableState {
    /// Projects the full game down to the current player's knowledge.
    pub fn from_game(game: &GameState) -> Self {
        Self {
            hearts: *game.hearts(),
            hand: game.hand(game.current_seat()),
        }
    }

    /// Rebuilds the knowable state at the application boundary from the
    /// current hand and the full attributed play history.
    pub fn rebuild(
        deal_index: u128,
        opening_leader: Seat,
        history: &[(Seat, Card)],
        hand: CardSet,
    ) -> Self {
        let mut hearts = HeartsState::new(deal_index, opening_leader);
        for &(seat, card) in history {
            debug_assert_eq!(seat, hearts.current_seat(), "history out of play order");
            hearts.record_play(card);
        }
        debug_assert!(hearts.unplayed().contains_all(hand));
        debug_assert_eq!(hand.len() as u8, hearts.remaining_count(hearts.current_seat()));
        Self { hearts, hand }
    }

    pub fn hearts(&self) -> &HeartsState {
        &self.hearts
    }

    pub const fn hand(&self) -> CardSet {
        self.hand
    }

    pub fn current_seat(&self) -> Seat {
        self.hearts.current_seat()
    }

    pub fn legal_plays(&self) -> CardSet {
        self.hearts.legal_plays(self.hand)
    }

    pub fn points_played(&self) -> u8 {
        self.hearts.points_played()
    }

    pub fn voids(&self) -> VoidTable {
        self.hearts.voids()
    }

    /// Unplayed cards not in the current player's hand.
    pub fn unknown_cards(&self) -> CardSet {
        self.hearts.unplayed() - self.hand
    }

    /// The three hidden seats, in seat order after the current player.
    pub fn opponents(&self) -> [Seat; 3] {
        let me = self.current_seat();
        [me.advance(1), me.advance(2), me.advance(3)]
    }

    /// Cards `seat` still holds.
    pub fn remaining_count(&self, seat: Seat) -> u8 {
        self.hearts.remaining_count(seat)
    }

    /// Builds the possibility analyzer for the hidden hands at this decision.
    pub fn analyze(&self) -> PossibilityAnalyzer {
        PossibilityAnalyzer::new(self)
    }

    /// Seeds an actualization with the current player's known hand.
    pub fn prepare_hands(&self) -> [CardSet; 4] {
        let mut hands = [CardSet::NONE; 4];
        hands[self.current_seat().index()] = self.hand;
        hands
    }
}
