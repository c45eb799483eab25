use hearts_core::analysis::possibility::PossibilityAnalyzer;
use hearts_core::model::card::Card;
use hearts_core::state::knowable::KnowableState;

/// Everything the rollout engine learned about one decision.
///
/// All vectors are indexed by legal-play position. Each `moon_prob` row holds
/// the frequencies of the four moon events plus the no-moon remainder, and
/// sums to one.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub choices: Vec<Card>,
    pub total_alternates: u32,
    pub expected_score: Vec<f32>,
    pub moon_prob: Vec<[f32; 5]>,
    pub wins_trick_prob: Vec<f32>,
}

/// Observer invoked once per sampled decision.
///
/// The engine does not care what implementations do: discard, log, or write
/// training rows. A decision answered on the single-legal-play fast path is
/// never reported because nothing was sampled.
pub trait Annotator: Send + Sync {
    fn on_decision(
        &self,
        state: &KnowableState,
        analyzer: &PossibilityAnalyzer,
        record: &DecisionRecord,
    );
}
