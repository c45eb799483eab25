use hearts_bot::strategy::Strategy;
use hearts_core::model::card::Card;
use hearts_core::model::seat::Seat;
use hearts_core::random::RandomGenerator;
use hearts_core::state::knowable::KnowableState;
use std::io::{self, BufRead, Write};

/// Reads plays from stdin, two characters at a time (`QS`, `th`, ...).
///
/// Bad input never reaches the engine: parse failures and illegal cards are
/// reported and the prompt repeats.
#[derive(Debug, Default, Clone, Copy)]
pub struct HumanStrategy;

impl HumanStrategy {
    pub const fn new() -> Self {
        Self
    }

    fn show_table(state: &KnowableState) {
        let hearts = state.hearts();
        println!();
        println!(
            "Play {} of 52, you are {}",
            hearts.play_number(),
            state.current_seat()
        );

        if hearts.points_played() > 0 {
            let scores: Vec<String> = Seat::LOOP
                .iter()
                .map(|&seat| format!("{seat} {}", hearts.score(seat)))
                .collect();
            println!("Points taken: {}", scores.join(", "));
        }

        if hearts.play_in_trick() == 0 {
            println!("You lead the trick.");
        } else {
            let on_table: Vec<String> = (0..hearts.play_in_trick())
                .map(|i| hearts.trick_play(i).to_string())
                .collect();
            println!("On the table: {}", on_table.join(" "));
        }

        println!("Your hand: {}", state.hand());
    }
}

impl Strategy for HumanStrategy {
    fn choose_play(&self, state: &KnowableState, _rng: &mut RandomGenerator) -> Card {
        let legal = state.legal_plays();
        Self::show_table(state);

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("Choose a card ({legal}): ");
            let _ = io::stdout().flush();

            let line = match lines.next() {
                Some(Ok(line)) => line,
                // Closed stdin: fall back to the lowest legal card so a piped
                // game still finishes.
                _ => {
                    let fallback = legal.first().expect("legal plays are never empty");
                    println!("(input closed, playing {fallback})");
                    return fallback;
                }
            };

            match line.trim().parse::<Card>() {
                Ok(card) if legal.contains(card) => return card,
                Ok(card) => println!("{card} is not a legal play."),
                Err(err) => println!("{err}"),
            }
        }
    }
}
