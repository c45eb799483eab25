use crate::model::card::Card;
use crate::model::cardset::CardSet;
use crate::model::seat::Seat;
use crate::model::suit::Suit;

/// Known voids, one bit per seat and suit.
///
/// Bits are only ever set during a deal: the instant a player fails to follow
/// the trick suit, that seat/suit pair is marked and stays marked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoidTable {
    bits: u16,
}

impl VoidTable {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn mark(&mut self, seat: Seat, suit: Suit) {
        self.bits |= 1 << (4 * seat.index() + suit.index());
    }

    pub const fn is_void(self, seat: Seat, suit: Suit) -> bool {
        self.bits & (1 << (4 * seat.index() + suit.index())) != 0
    }

    /// How many of `seats` are known void in `suit`.
    pub fn void_count(self, suit: Suit, seats: &[Seat]) -> usize {
        seats
            .iter()
            .filter(|seat| self.is_void(**seat, suit))
            .count()
    }

    /// Orders `remaining` so that cards constrained by the most voids among
    /// `seats` come first, ties broken by ascending card id. The analyzer
    /// walks this ordering to enumerate deals deterministically.
    pub fn priority_list(self, remaining: CardSet, seats: &[Seat]) -> Vec<Card> {
        let mut cards: Vec<Card> = remaining.into_iter().collect();
        cards.sort_by_key(|card| {
            let constrained = self.void_count(card.suit, seats);
            (usize::MAX - constrained, card.id())
        });
        cards
    }

    /// Backstop check that no hand holds a card of a suit its seat is void in.
    pub fn deal_respects_voids(self, hands: &[CardSet; 4]) -> bool {
        for seat in Seat::LOOP {
            for suit in Suit::ALL {
                if self.is_void(seat, suit) && !hands[seat.index()].suit_cards(suit).is_empty() {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::VoidTable;
    use crate::model::card::Card;
    use crate::model::cardset::CardSet;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    #[test]
    fn marks_persist() {
        let mut voids = VoidTable::new();
        assert!(!voids.is_void(Seat::East, Suit::Spades));
        voids.mark(Seat::East, Suit::Spades);
        assert!(voids.is_void(Seat::East, Suit::Spades));
        assert!(!voids.is_void(Seat::East, Suit::Hearts));
        assert!(!voids.is_void(Seat::West, Suit::Spades));
    }

    #[test]
    fn priority_puts_constrained_suits_first() {
        let mut voids = VoidTable::new();
        voids.mark(Seat::East, Suit::Hearts);
        voids.mark(Seat::South, Suit::Hearts);
        voids.mark(Seat::East, Suit::Clubs);

        let remaining: CardSet = [
            Card::new(Rank::Five, Suit::Diamonds),
            Card::new(Rank::Four, Suit::Clubs),
            Card::new(Rank::Nine, Suit::Hearts),
            Card::new(Rank::Two, Suit::Hearts),
        ]
        .into_iter()
        .collect();

        let seats = [Seat::East, Seat::South, Seat::West];
        let ordered = voids.priority_list(remaining, &seats);
        assert_eq!(
            ordered,
            vec![
                Card::new(Rank::Two, Suit::Hearts),
                Card::new(Rank::Nine, Suit::Hearts),
                Card::new(Rank::Four, Suit::Clubs),
                Card::new(Rank::Five, Suit::Diamonds),
            ]
        );
    }

    #[test]
    fn deal_check_flags_violations() {
        let mut voids = VoidTable::new();
        voids.mark(Seat::North, Suit::Hearts);

        let mut hands = [CardSet::NONE; 4];
        hands[Seat::North.index()].insert(Card::new(Rank::Three, Suit::Clubs));
        assert!(voids.deal_respects_voids(&hands));

        hands[Seat::North.index()].insert(Card::new(Rank::Three, Suit::Hearts));
        assert!(!voids.deal_respects_voids(&hands));
    }
}
