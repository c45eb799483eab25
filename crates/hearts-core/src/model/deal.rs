use crate::model::card::Card;
use crate::model::cardset::CardSet;
use crate::model::seat::Seat;
use crate::random::RandomGenerator;

/// A shuffle, identified by a 128-bit index in `[0, Deal::possible_deals())`.
///
/// Indices are unranked into four 13-card hands by walking the deck in card-id
/// order and, for each card, counting how many complete deals follow from
/// giving it to each seat in turn. The same index always produces the same
/// deal, so a deal log needs only the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deal {
    index: u128,
    hands: [CardSet; 4],
}

impl Deal {
    /// Number of distinct deals: `52! / (13!)^4`, comfortably past 64 bits.
    pub fn possible_deals() -> u128 {
        ways_to_deal(52, [13, 13, 13, 13])
    }

    pub fn from_index(index: u128) -> Self {
        debug_assert!(index < Self::possible_deals());

        let mut remaining = index;
        let mut capacity = [13u8; 4];
        let mut hands = [CardSet::NONE; 4];

        for id in 0..52u8 {
            let card = Card::from_id(id).expect("deck ids are in range");
            let cards_after = (51 - id) as u64;
            for seat in Seat::LOOP {
                if capacity[seat.index()] == 0 {
                    continue;
                }
                capacity[seat.index()] -= 1;
                let ways = ways_to_deal(cards_after, capacity);
                if remaining < ways {
                    hands[seat.index()].insert(card);
                    break;
                }
                remaining -= ways;
                capacity[seat.index()] += 1;
            }
        }

        debug_assert_eq!(capacity, [0; 4]);
        Self { index, hands }
    }

    pub fn random(rng: &mut RandomGenerator) -> Self {
        Self::from_index(rng.range128(Self::possible_deals()))
    }

    pub const fn index(&self) -> u128 {
        self.index
    }

    pub fn hand(&self, seat: Seat) -> CardSet {
        self.hands[seat.index()]
    }

    pub const fn hands(&self) -> [CardSet; 4] {
        self.hands
    }

    /// The seat holding the Two of Clubs opens the deal.
    pub fn opening_leader(&self) -> Seat {
        Seat::LOOP
            .into_iter()
            .find(|seat| self.hands[seat.index()].contains(Card::TWO_OF_CLUBS))
            .expect("two of clubs is always dealt")
    }
}

/// Exact binomial coefficient in 128-bit arithmetic.
///
/// Every intermediate value of the multiply-then-divide loop is itself a
/// binomial coefficient, so the division is always exact and nothing here
/// overflows for the deck sizes this crate deals with.
pub fn binomial(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 1..=k {
        result = result * (n - k + i) as u128 / i as u128;
    }
    result
}

/// Number of ways to distribute `total` distinct cards into hands of the
/// given sizes. The sizes must sum to `total`.
pub(crate) fn ways_to_deal(total: u64, sizes: [u8; 4]) -> u128 {
    debug_assert_eq!(sizes.iter().map(|&s| s as u64).sum::<u64>(), total);
    let mut left = total;
    let mut ways: u128 = 1;
    for size in sizes {
        ways *= binomial(left, size as u64);
        left -= size as u64;
    }
    ways
}
