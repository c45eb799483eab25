use hearts_core::model::card::Card;
use hearts_core::model::deal::Deal;
use hearts_core::model::seat::Seat;
use hearts_core::model::suit::Suit;
use hearts_core::random::RandomGenerator;
use hearts_core::state::game::GameState;

/// Plays random legal cards to the end of the deal, checking the public
/// invariants after every play.
fn play_random_deal(deal: Deal, rng: &mut RandomGenerator) -> GameState {
    let mut game = GameState::new(&deal);
    let mut known_voids = [[false; 4]; 4];

    while !game.is_terminal() {
        let seat = game.current_seat();
        let hand = game.hand(seat);
        let legal = game.legal_plays();

        assert!(!legal.is_empty(), "legal plays must never be empty");
        assert!(hand.contains_all(legal), "legal plays must come from hand");

        if game.hearts().play_number() == 0 {
            assert_eq!(legal.len(), 1);
            assert_eq!(legal.first(), Some(Card::TWO_OF_CLUBS));
        }

        if let Some(suit) = game.hearts().trick_suit() {
            if !hand.suit_cards(suit).is_empty() {
                assert_eq!(legal, legal.suit_cards(suit), "must follow suit");
            }
        }

        let pick = legal
            .nth(rng.range64(legal.len() as u64) as usize)
            .expect("index within the legal set");
        game.play_card(pick);

        assert_eq!(
            game.hearts().unplayed().len() as u8 + game.hearts().play_number(),
            52
        );

        // Voids only ever accumulate.
        for seat in Seat::LOOP {
            for suit in Suit::ALL {
                let now = game.hearts().is_void(seat, suit);
                if known_voids[seat.index()][suit.index()] {
                    assert!(now, "void for {seat}/{suit} was cleared mid-deal");
                }
                known_voids[seat.index()][suit.index()] = now;
            }
        }
    }

    game
}

#[test]
fn random_deals_play_to_a_consistent_terminal_state() {
    let mut rng = RandomGenerator::seeded(0x5eed);
    for _ in 0..25 {
        let deal = Deal::random(&mut rng);
        let game = play_random_deal(deal, &mut rng);

        assert!(game.is_terminal());
        assert!(game.hearts().unplayed().is_empty());

        let outcome = game.outcome();
        let raw: u32 = Seat::LOOP
            .iter()
            .map(|&seat| outcome.points(seat) as u32)
            .sum();
        assert_eq!(raw, 26);

        let boring: f32 = Seat::LOOP
            .iter()
            .map(|&seat| outcome.boring_score(seat))
            .sum();
        let standard: f32 = Seat::LOOP
            .iter()
            .map(|&seat| outcome.standard_score(seat))
            .sum();
        assert!(boring.abs() < 1e-4, "boring scores must sum to zero");
        assert!(standard.abs() < 1e-4, "standard scores must sum to zero");
    }
}

#[test]
fn deal_indices_reproduce_playthroughs() {
    let deal = Deal::from_index(Deal::possible_deals() - 1);
    let mut rng_a = RandomGenerator::seeded(11);
    let mut rng_b = RandomGenerator::seeded(11);
    let game_a = play_random_deal(deal, &mut rng_a);
    let game_b = play_random_deal(deal, &mut rng_b);
    for seat in Seat::LOOP {
        assert_eq!(game_a.hearts().score(seat), game_b.hearts().score(seat));
    }
}
