mod dataset;
mod human;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dataset::JsonlAnnotator;
use hearts_bot::annotator::Annotator;
use hearts_bot::strategy::{MonteCarlo, RandomStrategy, RolloutConfig, Strategy, play_game};
use hearts_core::model::deal::Deal;
use hearts_core::model::seat::Seat;
use hearts_core::outcome::GameOutcome;
use hearts_core::random::RandomGenerator;
use hearts_core::state::game::GameState;
use human::HumanStrategy;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "mchearts",
    author,
    version,
    about = "Monte Carlo rollout engine for Hearts"
)]
struct Cli {
    /// Log filter when RUST_LOG is unset, e.g. `info` or `hearts_bot=debug`.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play deals with a configurable seat lineup.
    Play(PlayArgs),
    /// Rotate a rollout searcher through all four seats of one deal,
    /// capturing annotation rows.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Comma-separated strategies for North,East,South,West
    /// (mc, random, or human).
    #[arg(long, value_name = "LIST", default_value = "mc,random,random,random")]
    seats: String,

    /// Number of deals to play.
    #[arg(long, default_value_t = 1)]
    deals: u32,

    /// RNG seed; defaults to entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Play one specific deal, as a 128-bit hex index.
    #[arg(long, value_name = "HEX")]
    deal_index: Option<String>,

    /// Write decision annotations to this JSONL file.
    #[arg(long, value_name = "FILE")]
    annotate: Option<PathBuf>,

    #[command(flatten)]
    budget: BudgetArgs,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Deal to validate, as a 128-bit hex index.
    #[arg(value_name = "HEX_DEAL_INDEX")]
    deal_index: String,

    /// Write decision annotations to this JSONL file.
    #[arg(long, value_name = "FILE", default_value = "annotations.jsonl")]
    annotate: PathBuf,

    /// RNG seed; defaults to entropy.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    budget: BudgetArgs,
}

/// Rollout budget shared by both subcommands.
#[derive(Debug, Args)]
struct BudgetArgs {
    /// Worlds always sampled before the time budget may stop a decision.
    #[arg(long, default_value_t = 5)]
    min_alternates: u32,

    /// Hard cap on sampled worlds per decision.
    #[arg(long, default_value_t = 2_000)]
    max_alternates: u32,

    /// Per-decision wall-clock budget in milliseconds.
    #[arg(long, default_value_t = 333)]
    budget_ms: u64,

    /// Sample with a worker pool sized to the hardware.
    #[arg(long)]
    parallel: bool,
}

impl BudgetArgs {
    fn to_config(&self) -> RolloutConfig {
        RolloutConfig {
            min_alternates: self.min_alternates.min(self.max_alternates),
            max_alternates: self.max_alternates,
            time_budget: Duration::from_millis(self.budget_ms),
            parallel: self.parallel,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("expected four comma-separated seat strategies, got {0}")]
    SeatCount(usize),
    #[error("unknown strategy `{0}` (expected mc, random, or human)")]
    UnknownStrategy(String),
    #[error("`{0}` is not a valid 128-bit hex deal index")]
    DealIndex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeatSpec {
    Random,
    MonteCarlo,
    Human,
}

fn parse_seats(list: &str) -> Result<[SeatSpec; 4], CliError> {
    let specs: Vec<SeatSpec> = list
        .split(',')
        .map(|name| match name.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(SeatSpec::Random),
            "mc" | "montecarlo" => Ok(SeatSpec::MonteCarlo),
            "human" => Ok(SeatSpec::Human),
            other => Err(CliError::UnknownStrategy(other.to_string())),
        })
        .collect::<Result<_, _>>()?;
    specs
        .try_into()
        .map_err(|bad: Vec<SeatSpec>| CliError::SeatCount(bad.len()))
}

fn parse_deal_index(text: &str) -> Result<u128, CliError> {
    let digits = text.trim().trim_start_matches("0x");
    let index =
        u128::from_str_radix(digits, 16).map_err(|_| CliError::DealIndex(text.to_string()))?;
    if index >= Deal::possible_deals() {
        return Err(CliError::DealIndex(text.to_string()));
    }
    Ok(index)
}

fn build_strategy(
    spec: SeatSpec,
    config: RolloutConfig,
    annotator: Option<Arc<dyn Annotator>>,
) -> Box<dyn Strategy> {
    match spec {
        SeatSpec::Random => Box::new(RandomStrategy::new()),
        SeatSpec::Human => Box::new(HumanStrategy::new()),
        SeatSpec::MonteCarlo => Box::new(MonteCarlo::new(
            Arc::new(RandomStrategy::new()),
            config,
            annotator,
        )),
    }
}

fn make_rng(seed: Option<u64>) -> RandomGenerator {
    match seed {
        Some(seed) => RandomGenerator::seeded(seed),
        None => RandomGenerator::from_entropy(),
    }
}

fn open_annotator(path: Option<&PathBuf>) -> Result<Option<Arc<dyn Annotator>>> {
    path.map(|path| {
        JsonlAnnotator::create(path)
            .with_context(|| format!("creating annotation file at {}", path.display()))
            .map(|annotator| Arc::new(annotator) as Arc<dyn Annotator>)
    })
    .transpose()
}

fn print_outcome(outcome: &GameOutcome) {
    for seat in Seat::LOOP {
        println!(
            "  {:<6} {:>2} points  standard {:+5.1}",
            seat.to_string(),
            outcome.points(seat),
            outcome.standard_score(seat)
        );
    }
    if let Some(shooter) = outcome.shooter() {
        println!("  {shooter} shot the moon");
    }
}

fn run_play(args: &PlayArgs) -> Result<()> {
    let specs = parse_seats(&args.seats)?;
    let annotator = open_annotator(args.annotate.as_ref())?;
    let config = args.budget.to_config();
    let mut rng = make_rng(args.seed);

    let strategies: Vec<Box<dyn Strategy>> = specs
        .iter()
        .map(|&spec| build_strategy(spec, config, annotator.clone()))
        .collect();
    let seats: [&dyn Strategy; 4] = [
        strategies[0].as_ref(),
        strategies[1].as_ref(),
        strategies[2].as_ref(),
        strategies[3].as_ref(),
    ];

    let fixed_index = args.deal_index.as_deref().map(parse_deal_index).transpose()?;
    let mut totals = [0.0f32; 4];

    for number in 1..=args.deals {
        let deal = match fixed_index {
            Some(index) => Deal::from_index(index),
            None => Deal::random(&mut rng),
        };
        let mut game = GameState::new(&deal);
        let outcome = play_game(&mut game, &seats, &mut rng);

        println!("Deal {number} (index {:x})", deal.index());
        print_outcome(&outcome);
        for seat in Seat::LOOP {
            totals[seat.index()] += outcome.standard_score(seat);
        }
    }

    if args.deals > 1 {
        println!("Totals over {} deals:", args.deals);
        for seat in Seat::LOOP {
            println!("  {:<6} {:+7.1}", seat.to_string(), totals[seat.index()]);
        }
    }

    Ok(())
}

fn run_validate(args: &ValidateArgs) -> Result<()> {
    let index = parse_deal_index(&args.deal_index)?;
    let annotator = open_annotator(Some(&args.annotate))?;
    let config = args.budget.to_config();
    let mut rng = make_rng(args.seed);

    let opponent = RandomStrategy::new();
    let searcher = MonteCarlo::new(Arc::new(RandomStrategy::new()), config, annotator);

    // One playthrough per seat assignment of the searcher.
    for seat in Seat::LOOP {
        let mut seats: [&dyn Strategy; 4] = [&opponent as &dyn Strategy; 4];
        seats[seat.index()] = &searcher;

        let deal = Deal::from_index(index);
        let mut game = GameState::new(&deal);
        let outcome = play_game(&mut game, &seats, &mut rng);

        println!("Searcher at {seat}:");
        print_outcome(&outcome);
    }

    println!("Annotations written to {}", args.annotate.display());
    Ok(())
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    match &cli.command {
        Command::Play(args) => run_play(args),
        Command::Validate(args) => run_validate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, SeatSpec, parse_deal_index, parse_seats};
    use hearts_core::model::deal::Deal;

    #[test]
    fn seat_lists_parse_case_insensitively() {
        let seats = parse_seats("MC, random,HUMAN,random").unwrap();
        assert_eq!(
            seats,
            [
                SeatSpec::MonteCarlo,
                SeatSpec::Random,
                SeatSpec::Human,
                SeatSpec::Random
            ]
        );
    }

    #[test]
    fn seat_lists_must_have_four_entries() {
        assert!(matches!(
            parse_seats("mc,random"),
            Err(CliError::SeatCount(2))
        ));
        assert!(matches!(
            parse_seats("mc,random,random,bogus"),
            Err(CliError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn deal_indices_parse_hex_with_or_without_prefix() {
        assert_eq!(parse_deal_index("2a").unwrap(), 42);
        assert_eq!(parse_deal_index("0x2A").unwrap(), 42);
        assert!(parse_deal_index("zz").is_err());
        let too_big = format!("{:x}", Deal::possible_deals());
        assert!(parse_deal_index(&too_big).is_err());
    }
}
