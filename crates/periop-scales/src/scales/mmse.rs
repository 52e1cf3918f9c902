//! Mini-Mental State Examination.
//!
//! Thirty pass/fail items grouped into cognitive domains. Recorded once per
//! timepoint, typically at the pre-operative baseline and again on follow-up.

use periop_core::models::status::ScaleKind;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::{ScoreRange, ValidationError};
use crate::{Descriptor, Scale};

pub struct Mmse;

fn count(items: &[bool]) -> u32 {
    items.iter().filter(|&&passed| passed).count() as u32
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Orientation {
    pub date: bool,
    pub month: bool,
    pub year: bool,
    pub weekday: bool,
    pub season: bool,
    pub city: bool,
    pub region: bool,
    pub institution: bool,
    pub floor: bool,
    pub country: bool,
}

impl Orientation {
    pub fn score(&self) -> u32 {
        count(&[
            self.date,
            self.month,
            self.year,
            self.weekday,
            self.season,
            self.city,
            self.region,
            self.institution,
            self.floor,
            self.country,
        ])
    }
}

/// Three words named by the examiner. Used for both registration and recall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ThreeWords {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl ThreeWords {
    pub fn score(&self) -> u32 {
        count(&[self.first, self.second, self.third])
    }
}

/// Serial subtraction of 7 from 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct SerialSevens {
    pub answer_93: bool,
    pub answer_86: bool,
    pub answer_79: bool,
    pub answer_72: bool,
    pub answer_65: bool,
}

impl SerialSevens {
    pub fn score(&self) -> u32 {
        count(&[
            self.answer_93,
            self.answer_86,
            self.answer_79,
            self.answer_72,
            self.answer_65,
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Language {
    pub names_watch: bool,
    pub names_pen: bool,
    pub repeats_phrase: bool,
}

impl Language {
    pub fn score(&self) -> u32 {
        count(&[self.names_watch, self.names_pen, self.repeats_phrase])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ThreeStageCommand {
    pub takes_paper: bool,
    pub folds_paper: bool,
    pub places_paper: bool,
}

impl ThreeStageCommand {
    pub fn score(&self) -> u32 {
        count(&[self.takes_paper, self.folds_paper, self.places_paper])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct MmseInput {
    pub orientation: Orientation,
    pub registration: ThreeWords,
    pub attention: SerialSevens,
    pub recall: ThreeWords,
    pub language: Language,
    pub command: ThreeStageCommand,
    /// Reads and obeys "close your eyes".
    pub reading: bool,
    /// Writes a complete sentence.
    pub writing: bool,
    /// Copies intersecting pentagons.
    pub copying: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MmseDomainScores {
    pub orientation: u32,
    pub registration: u32,
    pub attention: u32,
    pub recall: u32,
    pub language: u32,
    pub command: u32,
    pub reading: u32,
    pub writing: u32,
    pub copying: u32,
}

impl MmseDomainScores {
    pub fn total(&self) -> u32 {
        self.orientation
            + self.registration
            + self.attention
            + self.recall
            + self.language
            + self.command
            + self.reading
            + self.writing
            + self.copying
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MmseResult {
    pub input: MmseInput,
    pub domains: MmseDomainScores,
    pub total_score: u32,
}

impl Descriptor for Mmse {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Mmse
    }

    fn name(&self) -> &str {
        "MMSE"
    }

    fn description(&self) -> &str {
        "Cognitive screening. 24-30 normal, 18-23 mild impairment, <18 severe"
    }

    fn score_range(&self) -> Option<ScoreRange> {
        Some(ScoreRange::stepped(0.0, 30.0, 1.0))
    }
}

impl Scale for Mmse {
    type Input = MmseInput;
    type Output = MmseResult;

    fn validate(&self, _input: &MmseInput) -> Vec<ValidationError> {
        Vec::new()
    }

    fn compute(&self, input: &MmseInput, _prior: Option<&MmseResult>) -> MmseResult {
        let domains = MmseDomainScores {
            orientation: input.orientation.score(),
            registration: input.registration.score(),
            attention: input.attention.score(),
            recall: input.recall.score(),
            language: input.language.score(),
            command: input.command.score(),
            reading: count(&[input.reading]),
            writing: count(&[input.writing]),
            copying: count(&[input.copying]),
        };

        MmseResult {
            input: input.clone(),
            domains,
            total_score: domains.total(),
        }
    }
}
