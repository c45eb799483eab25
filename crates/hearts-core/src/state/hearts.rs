use crate::model::card::Card;
use crate::model::cardset::CardSet;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::voids::VoidTable;
use crate::outcome::GameOutcome;

/// Public bookkeeping for one deal in progress: everything every player can
/// see. Hands live in [`GameState`](crate::state::game::GameState); this type
/// only tracks the trick on the table, the running scores, the unplayed-card
/// mask and the void table.
#[derive(Debug, Clone, Copy)]
pub struct HeartsState {
    deal_index: u128,
    next_play: u8,
    lead_seat: Seat,
    trick_suit: Option<Suit>,
    plays: [Card; 4],
    score: [u8; 4],
    point_tricks: [u8; 4],
    points_played: u8,
    unplayed: CardSet,
    voids: VoidTable,
    tracker: Option<TrickTracker>,
}

/// Armed on a state before the first card of a trick; flips `won` when the
/// tracked seat wins the trick completing at `at_play`. Read back once with
/// [`HeartsState::take_trick_win`] after the playout, so cloned states carry
/// no shared counters.
#[derive(Debug, Clone, Copy)]
struct TrickTracker {
    seat: Seat,
    at_play: u8,
    won: bool,
}

impl HeartsState {
    pub fn new(deal_index: u128, opening_leader: Seat) -> Self {
        let state = Self {
            deal_index,
            next_play: 0,
            lead_seat: opening_leader,
            trick_suit: None,
            plays: [Card::TWO_OF_CLUBS; 4],
            score: [0; 4],
            point_tricks: [0; 4],
            points_played: 0,
            unplayed: CardSet::ALL,
            voids: VoidTable::new(),
            tracker: None,
        };
        state.verify();
        state
    }

    pub const fn deal_index(&self) -> u128 {
        self.deal_index
    }

    /// Number of cards played so far, 0..=52.
    pub const fn play_number(&self) -> u8 {
        self.next_play
    }

    /// Position within the current trick, 0..=3.
    pub const fn play_in_trick(&self) -> u8 {
        self.next_play % 4
    }

    pub const fn lead_seat(&self) -> Seat {
        self.lead_seat
    }

    pub const fn trick_suit(&self) -> Option<Suit> {
        self.trick_suit
    }

    pub const fn current_seat(&self) -> Seat {
        self.lead_seat.advance(self.play_in_trick() as usize)
    }

    pub const fn is_terminal(&self) -> bool {
        self.next_play == 52
    }

    /// Card played at position `i` of the current trick.
    pub fn trick_play(&self, i: u8) -> Card {
        debug_assert!(i < self.play_in_trick());
        self.plays[i as usize]
    }

    pub fn score(&self, seat: Seat) -> u8 {
        self.score[seat.index()]
    }

    pub fn point_tricks(&self, seat: Seat) -> u8 {
        self.point_tricks[seat.index()]
    }

    pub const fn points_played(&self) -> u8 {
        self.points_played
    }

    pub const fn unplayed(&self) -> CardSet {
        self.unplayed
    }

    pub const fn voids(&self) -> VoidTable {
        self.voids
    }

    pub fn is_void(&self, seat: Seat, suit: Suit) -> bool {
        self.voids.is_void(seat, suit)
    }

    /// How many cards `seat` has played so far this deal.
    pub fn cards_played_by(&self, seat: Seat) -> u8 {
        let completed = self.next_play / 4;
        let in_current = seat.offset_from(self.lead_seat) < self.play_in_trick() as usize;
        completed + u8::from(in_current)
    }

    /// Cards `seat` still holds (13 minus what they have played).
    pub fn remaining_count(&self, seat: Seat) -> u8 {
        13 - self.cards_played_by(seat)
    }

    /// The non-empty set of cards the current player may play from `hand`.
    pub fn legal_plays(&self, hand: CardSet) -> CardSet {
        if self.next_play == 0 {
            debug_assert!(hand.contains(Card::TWO_OF_CLUBS));
            return CardSet::from(Card::TWO_OF_CLUBS);
        }

        let mut choices = match self.trick_suit {
            // Leading: no point cards until points have been played.
            None => {
                if self.points_played == 0 {
                    hand.non_point_cards()
                } else {
                    hand
                }
            }
            // Following: trick suit if we hold any of it.
            Some(suit) => hand.suit_cards(suit),
        };

        // Either path can come up empty (only point cards to lead, or void in
        // the trick suit); then the whole hand is legal.
        if choices.is_empty() {
            choices = hand;
        }

        // Once all 26 points are out, every remaining line scores the same;
        // collapsing to the single lowest card prunes the rollout fan-out.
        if self.points_played == 26 {
            let lowest = choices.first().expect("hand is non-empty");
            choices = CardSet::from(lowest);
        }

        debug_assert!(!choices.is_empty());
        debug_assert!(hand.contains_all(choices));
        choices
    }

    /// Records a play by the current seat: trick-suit bookkeeping, void
    /// marking on off-suit follows, and trick resolution on the fourth card.
    pub fn record_play(&mut self, card: Card) {
        debug_assert!(self.unplayed.contains(card));

        let in_trick = self.play_in_trick() as usize;
        match self.trick_suit {
            None => {
                debug_assert_eq!(in_trick, 0);
                self.trick_suit = Some(card.suit);
            }
            Some(suit) => {
                if card.suit != suit {
                    self.voids.mark(self.current_seat(), suit);
                }
            }
        }

        self.plays[in_trick] = card;
        self.unplayed.remove(card);

        if in_trick == 3 {
            let winner = self.resolve_trick();
            self.next_play += 1;
            self.trick_suit = None;
            self.lead_seat = winner;
        } else {
            self.next_play += 1;
        }

        self.verify();
    }

    fn resolve_trick(&mut self) -> Seat {
        let suit = self.trick_suit.expect("completed trick has a suit");
        debug_assert_eq!(self.plays[0].suit, suit);

        let mut best = 0;
        for i in 1..4 {
            if self.plays[i].suit == suit && self.plays[best].rank < self.plays[i].rank {
                best = i;
            }
        }
        let winner = self.lead_seat.advance(best);

        let trick_points: u8 = self.plays.iter().map(|play| play.point_value()).sum();
        self.points_played += trick_points;
        if trick_points > 0 {
            self.score[winner.index()] += trick_points;
            self.point_tricks[winner.index()] += 1;
        }

        if let Some(tracker) = &mut self.tracker {
            if tracker.at_play == self.next_play && tracker.seat == winner {
                tracker.won = true;
            }
        }

        winner
    }

    /// Arms the trick-win tracker for `seat` on the trick now on the table.
    pub fn arm_trick_tracker(&mut self, seat: Seat) {
        self.tracker = Some(TrickTracker {
            seat,
            at_play: self.next_play | 3,
            won: false,
        });
    }

    /// Disarms the tracker and reports whether the tracked trick was won.
    pub fn take_trick_win(&mut self) -> bool {
        self.tracker.take().map(|t| t.won).unwrap_or(false)
    }

    pub fn outcome(&self) -> GameOutcome {
        debug_assert!(self.is_terminal());
        GameOutcome::from_terminal(self.score, self.point_tricks)
    }

    /// Debug-build consistency checks; a no-op in release builds.
    pub fn verify(&self) {
        #[cfg(debug_assertions)]
        {
            assert!(self.next_play <= 52);
            assert_eq!(self.unplayed.len() as u8 + self.next_play, 52);
            if self.play_in_trick() != 0 {
                assert_eq!(self.trick_suit, Some(self.plays[0].suit));
            } else {
                assert_eq!(self.trick_suit, None);
            }
            let points_left = (self.unplayed & CardSet::POINT_CARDS).point_total();
            assert_eq!(self.points_played, 26 - points_left);
            let banked: u8 = self.score.iter().sum();
            let on_table: u8 = self.plays[..self.play_in_trick() as usize]
                .iter()
                .map(|play| play.point_value())
                .sum();
            assert_eq!(banked + on_table, self.points_played);
        }
    }
}
