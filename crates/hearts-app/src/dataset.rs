use hearts_bot::annotator::{Annotator, DecisionRecord};
use hearts_core::analysis::possibility::PossibilityAnalyzer;
use hearts_core::model::card::Card;
use hearts_core::model::seat::Seat;
use hearts_core::state::knowable::KnowableState;
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// One JSONL row per sampled decision: the searchable context plus the
/// rollout targets (expected score, moon distribution, trick-win odds) for
/// each legal play.
#[derive(Debug, Serialize)]
struct DecisionRow {
    deal_index: String,
    play_number: u8,
    seat: Seat,
    hand: String,
    possibilities: String,
    total_alternates: u32,
    choices: Vec<String>,
    expected_score: Vec<f32>,
    moon_prob: Vec<[f32; 5]>,
    wins_trick_prob: Vec<f32>,
}

/// Streams decision records to a JSON-lines file.
pub struct JsonlAnnotator {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlAnnotator {
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl Annotator for JsonlAnnotator {
    fn on_decision(
        &self,
        state: &KnowableState,
        analyzer: &PossibilityAnalyzer,
        record: &DecisionRecord,
    ) {
        let row = DecisionRow {
            deal_index: format!("{:x}", state.hearts().deal_index()),
            play_number: state.hearts().play_number(),
            seat: state.current_seat(),
            hand: state.hand().to_string(),
            possibilities: analyzer.possibilities().to_string(),
            total_alternates: record.total_alternates,
            choices: record.choices.iter().map(Card::to_string).collect(),
            expected_score: record.expected_score.clone(),
            moon_prob: record.moon_prob.clone(),
            wins_trick_prob: record.wins_trick_prob.clone(),
        };

        // The observer must never disrupt the search; report and move on.
        let result = serde_json::to_string(&row)
            .map_err(io::Error::other)
            .and_then(|json| {
                let mut writer = self.writer.lock();
                writeln!(writer, "{json}")?;
                writer.flush()
            });
        if let Err(err) = result {
            warn!(error = %err, "failed to write annotation row");
        }
    }
}
