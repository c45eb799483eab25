use crate::annotator::{Annotator, DecisionRecord};
use crate::strategy::{Strategy, play_out};
use hearts_core::analysis::possibility::PossibilityAnalyzer;
use hearts_core::model::card::Card;
use hearts_core::model::seat::Seat;
use hearts_core::outcome::GameOutcome;
use hearts_core::random::RandomGenerator;
use hearts_core::state::game::GameState;
use hearts_core::state::knowable::KnowableState;
use parking_lot::Mutex;
use std::ops::AddAssign;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// A hand never offers more than thirteen legal plays.
const MAX_LEGAL_PLAYS: usize = 13;

/// Moon-event buckets tallied per legal play across the rollouts.
const MOON_I_SHOT: usize = 0;
const MOON_OTHER_SHOT: usize = 1;
const MOON_I_STOPPED: usize = 2;
const MOON_OTHER_STOPPED_ME: usize = 3;

/// Sampling budget for one decision.
///
/// The loop always runs `min_alternates`, then keeps going until the wall
/// clock passes `time_budget` or `max_alternates` worlds have been sampled.
#[derive(Debug, Clone, Copy)]
pub struct RolloutConfig {
    pub min_alternates: u32,
    pub max_alternates: u32,
    pub time_budget: Duration,
    pub parallel: bool,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            min_alternates: 5,
            max_alternates: 2_000,
            time_budget: Duration::from_millis(333),
            parallel: false,
        }
    }
}

/// Monte Carlo rollout search over sampled hidden-hand worlds.
///
/// For each legal play the engine averages terminal scores over many
/// actualized worlds, each continued to the end of the deal with the
/// `intuition` policy driving all four seats, and plays the card with the
/// lowest expected score.
pub struct MonteCarlo {
    intuition: Arc<dyn Strategy>,
    config: RolloutConfig,
    annotator: Option<Arc<dyn Annotator>>,
}

impl MonteCarlo {
    pub fn new(
        intuition: Arc<dyn Strategy>,
        config: RolloutConfig,
        annotator: Option<Arc<dyn Annotator>>,
    ) -> Self {
        debug_assert!(config.max_alternates > 0);
        debug_assert!(config.min_alternates <= config.max_alternates);
        Self {
            intuition,
            config,
            annotator,
        }
    }

    /// Legacy entry point that only caps the number of sampled worlds; the
    /// rest of the budget comes from [`RolloutConfig::default`].
    pub fn with_alternates(intuition: Arc<dyn Strategy>, max_alternates: u32) -> Self {
        let config = RolloutConfig {
            max_alternates,
            min_alternates: RolloutConfig::default().min_alternates.min(max_alternates),
            ..RolloutConfig::default()
        };
        Self::new(intuition, config, None)
    }

    pub const fn config(&self) -> &RolloutConfig {
        &self.config
    }

    /// Samples one world and rolls out every legal play in it.
    fn run_alternate(
        &self,
        knowable: &KnowableState,
        analyzer: &PossibilityAnalyzer,
        choices: &[Card],
        rng: &mut RandomGenerator,
        stats: &mut Stats,
    ) {
        let index = rng.range128(analyzer.possibilities());
        let hands = analyzer.actualize(index);
        debug_assert!(knowable.voids().deal_respects_voids(&hands));

        let world = GameState::from_knowable(knowable, hands);
        let me = knowable.current_seat();

        for (i, &card) in choices.iter().enumerate() {
            let mut game = world;
            game.arm_trick_tracker(me);
            game.play_card(card);
            let outcome = play_out(&mut game, self.intuition.as_ref(), rng);
            let won_trick = game.take_trick_win();
            stats.record_outcome(i, &outcome, me, won_trick);
        }
        stats.finish_alternate();
    }

    fn run_sequential(
        &self,
        knowable: &KnowableState,
        analyzer: &PossibilityAnalyzer,
        choices: &[Card],
        rng: &mut RandomGenerator,
    ) -> Stats {
        let mut stats = Stats::new(choices.len());
        let start = Instant::now();
        for _ in 0..self.config.max_alternates {
            self.run_alternate(knowable, analyzer, choices, rng, &mut stats);
            if stats.total_alternates() >= self.config.min_alternates
                && start.elapsed() >= self.config.time_budget
            {
                break;
            }
        }
        stats
    }

    fn run_parallel(
        &self,
        knowable: &KnowableState,
        analyzer: &PossibilityAnalyzer,
        choices: &[Card],
        rng: &mut RandomGenerator,
    ) -> Stats {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let claimed = AtomicU32::new(0);
        let finished = AtomicU32::new(0);
        let stop = AtomicBool::new(false);
        let merged = Mutex::new(Stats::new(choices.len()));
        let start = Instant::now();
        let config = self.config;

        thread::scope(|scope| {
            let claimed = &claimed;
            let finished = &finished;
            let stop = &stop;
            let merged = &merged;
            for _ in 0..workers {
                let mut worker_rng = rng.fork();
                scope.spawn(move || {
                    let mut local = Stats::new(choices.len());
                    while !stop.load(Ordering::Relaxed) {
                        let claim = claimed.fetch_add(1, Ordering::Relaxed);
                        if claim >= config.max_alternates {
                            break;
                        }
                        self.run_alternate(knowable, analyzer, choices, &mut worker_rng, &mut local);
                        let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                        if done >= config.min_alternates && start.elapsed() >= config.time_budget {
                            stop.store(true, Ordering::Relaxed);
                            break;
                        }
                    }
                    *merged.lock() += local;
                });
            }
        });

        merged.into_inner()
    }
}

impl Strategy for MonteCarlo {
    fn choose_play(&self, state: &KnowableState, rng: &mut RandomGenerator) -> Card {
        let legal = state.legal_plays();
        if legal.len() == 1 {
            return legal.first().expect("legal plays are never empty");
        }
        debug_assert!(state.points_played() < 26, "multi-card choices imply live points");

        let choices: Vec<Card> = legal.into_iter().collect();
        let analyzer = state.analyze();

        let stats = if self.config.parallel {
            self.run_parallel(state, &analyzer, &choices, rng)
        } else {
            self.run_sequential(state, &analyzer, &choices, rng)
        };

        let record = stats.target_values(&choices);
        let best = best_choice(&record.expected_score);

        debug!(
            play_number = state.hearts().play_number(),
            choices = choices.len(),
            alternates = record.total_alternates,
            best = %choices[best],
            "rollout decision"
        );

        if let Some(annotator) = self.annotator.as_deref() {
            annotator.on_decision(state, &analyzer, &record);
        }

        choices[best]
    }
}

/// Index of the minimum expected score, ties to the lower legal-play index.
fn best_choice(expected_score: &[f32]) -> usize {
    let mut best = 0;
    for (i, &score) in expected_score.iter().enumerate().skip(1) {
        if score < expected_score[best] {
            best = i;
        }
    }
    best
}

/// Per-decision accumulators, one slot per legal play.
///
/// Everything is an integer total so that worker merges are plain element-wise
/// addition: `(a + b) + c` and `a + (b + c)` land on identical bits. The
/// floating-point target values are derived once at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stats {
    num_choices: usize,
    total_alternates: u32,
    total_points: [u32; MAX_LEGAL_PLAYS],
    total_trick_wins: [u32; MAX_LEGAL_PLAYS],
    total_moon_counts: [[u32; 4]; MAX_LEGAL_PLAYS],
}

impl Stats {
    fn new(num_choices: usize) -> Self {
        debug_assert!(num_choices <= MAX_LEGAL_PLAYS);
        Self {
            num_choices,
            total_alternates: 0,
            total_points: [0; MAX_LEGAL_PLAYS],
            total_trick_wins: [0; MAX_LEGAL_PLAYS],
            total_moon_counts: [[0; 4]; MAX_LEGAL_PLAYS],
        }
    }

    const fn total_alternates(&self) -> u32 {
        self.total_alternates
    }

    fn record_outcome(&mut self, choice: usize, outcome: &GameOutcome, me: Seat, won_trick: bool) {
        debug_assert!(choice < self.num_choices);
        self.total_points[choice] += outcome.points(me) as u32;
        if won_trick {
            self.total_trick_wins[choice] += 1;
        }
        if outcome.shot_the_moon() {
            let bucket = if outcome.shooter() == Some(me) {
                MOON_I_SHOT
            } else {
                MOON_OTHER_SHOT
            };
            self.total_moon_counts[choice][bucket] += 1;
        } else if outcome.stopped_the_moon() {
            // The deciding player's own point-trick count tells the story:
            // one lone point trick means they did the stopping, more than one
            // means their own shoot was broken up.
            match outcome.point_tricks(me) {
                0 => {}
                1 => self.total_moon_counts[choice][MOON_I_STOPPED] += 1,
                _ => self.total_moon_counts[choice][MOON_OTHER_STOPPED_ME] += 1,
            }
        }
    }

    fn finish_alternate(&mut self) {
        self.total_alternates += 1;
    }

    /// Derives the per-play targets from the integer totals.
    ///
    /// The expected standard score is reconstructed exactly: a boring
    /// alternate contributes `raw - 6.5`; an own shoot swaps `26 - 6.5` for
    /// `-19.5` (a -39 shift) and an opponent shoot swaps `-6.5` for `+6.5`
    /// (a +13 shift).
    fn target_values(&self, choices: &[Card]) -> DecisionRecord {
        debug_assert_eq!(choices.len(), self.num_choices);
        debug_assert!(self.total_alternates > 0);
        let scale = 1.0 / self.total_alternates as f32;

        let mut expected_score = Vec::with_capacity(self.num_choices);
        let mut moon_prob = Vec::with_capacity(self.num_choices);
        let mut wins_trick_prob = Vec::with_capacity(self.num_choices);

        for i in 0..self.num_choices {
            let moon = self.total_moon_counts[i];
            let moon_total: u32 = moon.iter().sum();
            debug_assert!(moon_total <= self.total_alternates);
            let not_moon = self.total_alternates - moon_total;
            moon_prob.push([
                moon[MOON_I_SHOT] as f32 * scale,
                moon[MOON_OTHER_SHOT] as f32 * scale,
                moon[MOON_I_STOPPED] as f32 * scale,
                moon[MOON_OTHER_STOPPED_ME] as f32 * scale,
                not_moon as f32 * scale,
            ]);

            let raw_mean = self.total_points[i] as f32 * scale;
            let own_shoot_shift = 39.0 * moon[MOON_I_SHOT] as f32 * scale;
            let other_shoot_shift = 13.0 * moon[MOON_OTHER_SHOT] as f32 * scale;
            expected_score.push(raw_mean - 6.5 - own_shoot_shift + other_shoot_shift);

            wins_trick_prob.push(self.total_trick_wins[i] as f32 * scale);
        }

        DecisionRecord {
            choices: choices.to_vec(),
            total_alternates: self.total_alternates,
            expected_score,
            moon_prob,
            wins_trick_prob,
        }
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Stats) {
        debug_assert_eq!(self.num_choices, rhs.num_choices);
        self.total_alternates += rhs.total_alternates;
        for i in 0..MAX_LEGAL_PLAYS {
            self.total_points[i] += rhs.total_points[i];
            self.total_trick_wins[i] += rhs.total_trick_wins[i];
            for k in 0..4 {
                self.total_moon_counts[i][k] += rhs.total_moon_counts[i][k];
            }
        }
    }
}
