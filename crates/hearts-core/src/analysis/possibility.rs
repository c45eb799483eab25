use crate::model::card::Card;
use crate::model::cardset::CardSet;
use crate::model::seat::Seat;
use crate::model::voids::VoidTable;
use crate::state::knowable::KnowableState;

const CAP_DIM: usize = 14;

/// Enumerates every assignment of the hidden cards to the three opponent
/// seats that is consistent with the void table and the per-seat hand sizes.
///
/// The unknown cards are walked in void-aware priority order (most
/// constrained first). A count table over (position, remaining capacities)
/// gives the exact number of consistent completions from any point of the
/// walk, which turns an arbitrary index in `[0, possibilities())` into a
/// concrete deal in one O(52) pass, with no rejection loop. Built once per
/// decision and shared read-only by the rollout workers.
#[derive(Debug, Clone)]
pub struct PossibilityAnalyzer {
    me: Seat,
    known: CardSet,
    seats: [Seat; 3],
    capacity: [u8; 3],
    cards: Vec<Card>,
    allowed: Vec<[bool; 3]>,
    counts: Vec<u128>,
    voids: VoidTable,
}

impl PossibilityAnalyzer {
    pub fn new(knowable: &KnowableState) -> Self {
        let seats = knowable.opponents();
        let capacity = [
            knowable.remaining_count(seats[0]),
            knowable.remaining_count(seats[1]),
            knowable.remaining_count(seats[2]),
        ];
        Self::from_parts(
            knowable.current_seat(),
            knowable.hand(),
            seats,
            capacity,
            knowable.unknown_cards(),
            knowable.voids(),
        )
    }

    fn from_parts(
        me: Seat,
        known: CardSet,
        seats: [Seat; 3],
        capacity: [u8; 3],
        unknown: CardSet,
        voids: VoidTable,
    ) -> Self {
        debug_assert_eq!(
            capacity.iter().map(|&c| c as usize).sum::<usize>(),
            unknown.len(),
            "hidden hand sizes must cover the unknown cards"
        );

        let cards = voids.priority_list(unknown, &seats);
        let allowed: Vec<[bool; 3]> = cards
            .iter()
            .map(|card| {
                [
                    !voids.is_void(seats[0], card.suit),
                    !voids.is_void(seats[1], card.suit),
                    !voids.is_void(seats[2], card.suit),
                ]
            })
            .collect();

        let counts = build_counts(&cards, &allowed, capacity);

        Self {
            me,
            known,
            seats,
            capacity,
            cards,
            allowed,
            counts,
            voids,
        }
    }

    /// Exact number of consistent hidden-hand assignments.
    pub fn possibilities(&self) -> u128 {
        self.counts[table_index(0, self.capacity[0], self.capacity[1])]
    }

    /// Materializes the assignment identified by `index` into four hands; the
    /// current player's hand is copied through unchanged. Callers must draw
    /// `index` uniformly below [`possibilities`](Self::possibilities).
    pub fn actualize(&self, mut index: u128) -> [CardSet; 4] {
        debug_assert!(index < self.possibilities());

        let mut hands = [CardSet::NONE; 4];
        hands[self.me.index()] = self.known;
        let mut caps = self.capacity;

        for (i, &card) in self.cards.iter().enumerate() {
            let mut assigned = false;
            for j in 0..3 {
                if caps[j] == 0 || !self.allowed[i][j] {
                    continue;
                }
                caps[j] -= 1;
                let completions = self.counts[table_index(i + 1, caps[0], caps[1])];
                if index < completions {
                    hands[self.seats[j].index()].insert(card);
                    assigned = true;
                    break;
                }
                index -= completions;
                caps[j] += 1;
            }
            debug_assert!(assigned, "possibility index out of range");
        }

        debug_assert!(self.voids.deal_respects_voids(&hands));
        hands
    }
}

fn table_index(position: usize, cap0: u8, cap1: u8) -> usize {
    (position * CAP_DIM + cap0 as usize) * CAP_DIM + cap1 as usize
}

/// Builds the completion-count table bottom-up. Entry `(i, a, b)` is the
/// number of consistent ways to place `cards[i..]` when the first two seats
/// still need `a` and `b` cards (the third seat's need is implied).
fn build_counts(cards: &[Card], allowed: &[[bool; 3]], capacity: [u8; 3]) -> Vec<u128> {
    let n = cards.len();
    let mut counts = vec![0u128; (n + 1) * CAP_DIM * CAP_DIM];
    counts[table_index(n, 0, 0)] = 1;

    for i in (0..n).rev() {
        let remaining = (n - i) as u8;
        for a in 0..=capacity[0].min(remaining) {
            for b in 0..=capacity[1].min(remaining - a) {
                let c = remaining - a - b;
                if c > capacity[2] {
                    continue;
                }
                let mut total = 0u128;
                if a > 0 && allowed[i][0] {
                    total += counts[table_index(i + 1, a - 1, b)];
                }
                if b > 0 && allowed[i][1] {
                    total += counts[table_index(i + 1, a, b - 1)];
                }
                if c > 0 && allowed[i][2] {
                    total += counts[table_index(i + 1, a, b)];
                }
                counts[table_index(i, a, b)] = total;
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::PossibilityAnalyzer;
    use crate::model::card::Card;
    use crate::model::cardset::CardSet;
    use crate::model::deal::binomial;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use crate::model::voids::VoidTable;

    fn analyzer_for(
        capacity: [u8; 3],
        unknown: CardSet,
        voids: VoidTable,
    ) -> PossibilityAnalyzer {
        PossibilityAnalyzer::from_parts(
            Seat::North,
            CardSet::NONE,
            [Seat::East, Seat::South, Seat::West],
            capacity,
            unknown,
            voids,
        )
    }

    #[test]
    fn unconstrained_count_is_the_multinomial() {
        let unknown = CardSet::ALL - CardSet::CLUBS;
        let analyzer = analyzer_for([13, 13, 13], unknown, VoidTable::new());
        assert_eq!(
            analyzer.possibilities(),
            binomial(39, 13) * binomial(26, 13)
        );
    }

    #[test]
    fn fully_constrained_endgame_has_one_possibility() {
        // One card left per seat, two seats void in the others' suits.
        let unknown: CardSet = [
            Card::new(Rank::Two, Suit::Diamonds),
            Card::new(Rank::Two, Suit::Spades),
            Card::new(Rank::Two, Suit::Hearts),
        ]
        .into_iter()
        .collect();

        let mut voids = VoidTable::new();
        for suit in [Suit::Spades, Suit::Hearts] {
            voids.mark(Seat::East, suit);
        }
        for suit in [Suit::Diamonds, Suit::Hearts] {
            voids.mark(Seat::South, suit);
        }

        let analyzer = analyzer_for([1, 1, 1], unknown, voids);
        assert_eq!(analyzer.possibilities(), 1);

        let hands = analyzer.actualize(0);
        assert!(hands[Seat::East.index()].contains(Card::new(Rank::Two, Suit::Diamonds)));
        assert!(hands[Seat::South.index()].contains(Card::new(Rank::Two, Suit::Spades)));
        assert!(hands[Seat::West.index()].contains(Card::new(Rank::Two, Suit::Hearts)));
    }

    #[test]
    fn every_index_yields_a_distinct_valid_world() {
        let unknown: CardSet = [
            Card::new(Rank::Two, Suit::Diamonds),
            Card::new(Rank::Three, Suit::Diamonds),
            Card::new(Rank::Two, Suit::Hearts),
            Card::new(Rank::Three, Suit::Hearts),
            Card::new(Rank::Four, Suit::Hearts),
            Card::new(Rank::Five, Suit::Hearts),
        ]
        .into_iter()
        .collect();

        let mut voids = VoidTable::new();
        voids.mark(Seat::East, Suit::Hearts);

        let analyzer = analyzer_for([2, 2, 2], unknown, voids);

        // East can only take diamonds: choose 2 of 2, then split the four
        // hearts between South and West.
        assert_eq!(analyzer.possibilities(), binomial(4, 2));

        let mut seen = Vec::new();
        for index in 0..analyzer.possibilities() {
            let hands = analyzer.actualize(index);
            let mut union = CardSet::NONE;
            for seat in [Seat::East, Seat::South, Seat::West] {
                assert_eq!(hands[seat.index()].len(), 2);
                union |= hands[seat.index()];
            }
            assert_eq!(union, unknown);
            assert!(voids.deal_respects_voids(&hands));
            assert!(!seen.contains(&hands), "index {index} repeated a world");
            seen.push(hands);
        }
    }

    #[test]
    fn no_unknown_cards_means_one_world() {
        let analyzer = analyzer_for([0, 0, 0], CardSet::NONE, VoidTable::new());
        assert_eq!(analyzer.possibilities(), 1);
        let hands = analyzer.actualize(0);
        for seat in [Seat::East, Seat::South, Seat::West] {
            assert!(hands[seat.index()].is_empty());
        }
    }
}
