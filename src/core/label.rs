// ScanLogs - core/label.rs
//
// Label normalisation: maps the heterogeneous status vocabulary of a raw
// row onto the five canonical categories.
//
// Classification is an ordered rule table evaluated top to bottom with
// first-match-wins semantics. Fields are tried in authority order
// (final_status, vt_result, pred_label); within a field the higher
// severity wording is tested first.

use crate::core::model::{Label, RawFields};

/// Which raw field a classification stage reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Final verdict written by the upstream workflow.
    FinalStatus,
    /// VirusTotal result.
    VtResult,
    /// Model prediction (`pred_label`, or a plain `label` column).
    PredLabel,
}

impl Stage {
    /// Stages in priority order.
    pub const ORDER: [Stage; 3] = [Stage::FinalStatus, Stage::VtResult, Stage::PredLabel];

    /// Raw value for this stage, trimmed but not yet case-folded.
    pub fn value<'a>(&self, raw: &'a RawFields) -> &'a str {
        match self {
            Stage::FinalStatus => raw.get("final_status"),
            Stage::VtResult => raw.get("vt_result"),
            Stage::PredLabel => raw.first_non_empty(&["pred_label", "label"]),
        }
    }
}

/// One (category, keyword set) rule, optionally limited to some stages.
#[derive(Debug)]
pub struct KeywordRule {
    pub label: Label,
    pub keywords: &'static [&'static str],
    /// `None` applies the rule in every stage.
    pub only_in: Option<Stage>,
}

impl KeywordRule {
    fn applies_to(&self, stage: Stage) -> bool {
        self.only_in.map_or(true, |only| only == stage)
    }

    /// True if any keyword appears as a whole word in the case-folded text.
    pub fn matches(&self, stage: Stage, folded: &str) -> bool {
        self.applies_to(stage) && words(folded).any(|w| self.keywords.contains(&w))
    }
}

/// Severity-ordered rules. `unknown` counts as suspicious only for the
/// model prediction, where it means the model abstained.
pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        label: Label::Phish,
        keywords: &["phish", "phishing"],
        only_in: None,
    },
    KeywordRule {
        label: Label::Adult,
        keywords: &["adult"],
        only_in: None,
    },
    KeywordRule {
        label: Label::Malware,
        keywords: &["malware", "malicious", "unsafe"],
        only_in: None,
    },
    KeywordRule {
        label: Label::Suspicious,
        keywords: &["suspicious"],
        only_in: None,
    },
    KeywordRule {
        label: Label::Suspicious,
        keywords: &["unknown"],
        only_in: Some(Stage::PredLabel),
    },
    KeywordRule {
        label: Label::Benign,
        keywords: &["safe", "benign", "clean"],
        only_in: None,
    },
];

/// Split into word tokens the way an ASCII regex `\b` boundary sees them:
/// any non-ASCII character separates words.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
}

/// Classify a single field value for one stage. `None` if no rule matches.
pub fn classify_value(stage: Stage, value: &str) -> Option<Label> {
    let folded = value.trim().to_lowercase();
    if folded.is_empty() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| rule.matches(stage, &folded))
        .map(|rule| rule.label)
}

/// Normalise a raw row to one of the five categories.
///
/// A non-empty field that matches nothing falls through to the next
/// stage; if no stage matches the result is `Benign`.
pub fn normalize(raw: &RawFields) -> Label {
    Stage::ORDER
        .iter()
        .find_map(|stage| classify_value(*stage, stage.value(raw)))
        .unwrap_or_default()
}

/// Human-facing label text: the first non-empty status field, else the
/// normalised category, uppercased.
pub fn display_label(raw: &RawFields, normalized: Label) -> String {
    Stage::ORDER
        .iter()
        .map(|stage| stage.value(raw))
        .find(|v| !v.is_empty())
        .unwrap_or(normalized.as_str())
        .to_uppercase()
}
