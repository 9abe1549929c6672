//! Decision domain models.
//!
//! Mirrors the JSON shapes exchanged with the `/decisions/` routes.

use serde::{Deserialize, Serialize};

use crate::error::{DiqError, Result};

/// Server-assigned decision identifier.
pub type DecisionId = String;

/// Lowest accepted stress/happiness score.
pub const SCORE_MIN: u8 = 1;
/// Highest accepted stress/happiness score.
pub const SCORE_MAX: u8 = 10;

/// A persisted decision and its optional outcome.
///
/// Only `outcome` ever changes after creation, and only by wholesale
/// replacement of the record with the server's copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: DecisionId,
    #[serde(default)]
    pub situation: String,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub constraints: String,
    #[serde(default)]
    pub alternatives: String,
    #[serde(default)]
    pub decision: String,
    #[serde(default)]
    pub reasoning: String,
    /// Assigned by the server; older records may not carry one.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

impl DecisionRecord {
    /// Returns true when no outcome has been recorded yet.
    pub fn is_pending_outcome(&self) -> bool {
        self.outcome.is_none()
    }

    /// Returns true when the recorded outcome was a success.
    pub fn is_success(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| o.success)
    }

    /// Case-insensitive match of `needle_lower` against situation or decision.
    ///
    /// The needle must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle_lower: &str) -> bool {
        self.situation.to_lowercase().contains(needle_lower)
            || self.decision.to_lowercase().contains(needle_lower)
    }
}

/// The real-world result of a decision.
///
/// Always replaced as a unit, never merged field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub stress: u8,
    pub happiness: u8,
    #[serde(default)]
    pub notes: String,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            success: true,
            stress: 5,
            happiness: 5,
            notes: String::new(),
        }
    }
}

impl Outcome {
    /// Checks that both scores lie in `SCORE_MIN..=SCORE_MAX`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("stress", self.stress), ("happiness", self.happiness)] {
            if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
                return Err(DiqError::validation(format!(
                    "{} must be between {} and {} (got {})",
                    name, SCORE_MIN, SCORE_MAX, value
                )));
            }
        }
        Ok(())
    }
}

/// A decision under construction, not yet sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDraft {
    pub situation: String,
    pub intent: String,
    pub constraints: String,
    pub alternatives: String,
    pub decision: String,
    pub reasoning: String,
}

impl DecisionDraft {
    /// Ensures `situation` and `decision` are both non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.situation.is_empty() || self.decision.is_empty() {
            return Err(DiqError::validation(
                "Please fill in situation and decision",
            ));
        }
        Ok(())
    }

    /// Discards everything typed so far.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_with_null_outcome_is_pending() {
        let json = r#"{
            "id": "65a1",
            "situation": "Job offer",
            "decision": "Accept",
            "outcome": null,
            "user_id": 3
        }"#;
        let record: DecisionRecord = serde_json::from_str(json).unwrap();

        assert!(record.is_pending_outcome());
        assert!(!record.is_success());
        assert_eq!(record.intent, "");
        assert_eq!(record.date, None);
    }

    #[test]
    fn test_record_with_outcome() {
        let json = r#"{
            "id": "65a2",
            "situation": "Move city",
            "decision": "Stay",
            "date": "2024-03-01",
            "outcome": {"success": true, "stress": 3, "happiness": 8, "notes": "fine"}
        }"#;
        let record: DecisionRecord = serde_json::from_str(json).unwrap();

        assert!(record.is_success());
        assert_eq!(record.outcome.as_ref().unwrap().happiness, 8);
    }

    #[test]
    fn test_draft_requires_situation_and_decision() {
        let mut draft = DecisionDraft {
            situation: "Which laptop".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().unwrap_err().is_validation());

        draft.decision = String::new();
        assert!(draft.validate().is_err());

        // Only the empty string is missing; whitespace is content.
        draft.decision = " ".to_string();
        assert!(draft.validate().is_ok());

        draft.decision = "The cheaper one".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_reset() {
        let mut draft = DecisionDraft {
            situation: "s".to_string(),
            reasoning: "r".to_string(),
            ..Default::default()
        };
        draft.reset();
        assert_eq!(draft, DecisionDraft::default());
    }

    #[test]
    fn test_outcome_score_bounds() {
        assert!(Outcome::default().validate().is_ok());

        let too_low = Outcome {
            stress: 0,
            ..Default::default()
        };
        assert!(too_low.validate().unwrap_err().is_validation());

        let too_high = Outcome {
            happiness: 11,
            ..Default::default()
        };
        assert!(too_high.validate().is_err());
    }
}
