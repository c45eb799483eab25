use crate::model::card::Card;
use crate::model::cardset::CardSet;
use crate::model::deal::Deal;
use crate::model::seat::Seat;
use crate::outcome::GameOutcome;
use crate::state::hearts::HeartsState;
use crate::state::knowable::KnowableState;

/// Full game state: the public bookkeeping plus all four hands.
///
/// Copied by value once per legal-play trial, so everything inside is a flat
/// mask or a fixed-size array.
#[derive(Debug, Clone, Copy)]
pub struct GameState {
    hearts: HeartsState,
    hands: [CardSet; 4],
}

impl GameState {
    pub fn new(deal: &Deal) -> Self {
        let state = Self {
            hearts: HeartsState::new(deal.index(), deal.opening_leader()),
            hands: deal.hands(),
        };
        state.verify();
        state
    }

    /// Builds the game for one actualized world: the knowable public state
    /// plus a concrete assignment of all four hands.
    pub fn from_knowable(knowable: &KnowableState, hands: [CardSet; 4]) -> Self {
        debug_assert_eq!(
            hands[knowable.current_seat().index()],
            knowable.hand(),
            "actualized world must keep the current player's hand"
        );
        let state = Self {
            hearts: *knowable.hearts(),
            hands,
        };
        state.verify();
        state
    }

    pub fn hearts(&self) -> &HeartsState {
        &self.hearts
    }

    pub fn hand(&self, seat: Seat) -> CardSet {
        self.hands[seat.index()]
    }

    pub fn current_seat(&self) -> Seat {
        self.hearts.current_seat()
    }

    pub fn is_terminal(&self) -> bool {
        self.hearts.is_terminal()
    }

    pub fn legal_plays(&self) -> CardSet {
        self.hearts.legal_plays(self.hand(self.current_seat()))
    }

    /// Plays `card` for the current seat and advances the trick.
    pub fn play_card(&mut self, card: Card) {
        debug_assert!(self.legal_plays().contains(card));
        self.hands[self.current_seat().index()].remove(card);
        self.hearts.record_play(card);
        self.verify();
    }

    pub fn arm_trick_tracker(&mut self, seat: Seat) {
        self.hearts.arm_trick_tracker(seat);
    }

    pub fn take_trick_win(&mut self) -> bool {
        self.hearts.take_trick_win()
    }

    pub fn outcome(&self) -> GameOutcome {
        self.hearts.outcome()
    }

    /// Debug-build check that the four hands partition the unplayed cards.
    pub fn verify(&self) {
        #[cfg(debug_assertions)]
        {
            self.hearts.verify();
            let mut union = CardSet::NONE;
            for seat in Seat::LOOP {
                let hand = self.hands[seat.index()];
                assert_eq!(hand.len() as u8, self.hearts.remaining_count(seat));
                assert!(!union.intersects(hand), "hands overlap");
                union |= hand;
            }
            assert_eq!(union, self.hearts.unplayed());
        }
    }
}
