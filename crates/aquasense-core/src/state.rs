//! Submission state tracking for the questionnaire workflow.
//!
//! A workflow starts in `Editing`, passes through `Validating` on every
//! submit, and either falls back to `Editing` (invalid answers) or enters
//! `Submitting`. A submission ends in one of three terminal phases.

use std::fmt;
use std::str::FromStr;

/// Phase of the questionnaire workflow.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Answers are being entered or corrected.
    Editing,

    /// Answers are being checked before submission.
    Validating,

    /// Prediction round trip in flight; re-entry is rejected.
    Submitting,

    /// No stored user; the user was sent to the login view.
    AbortedNoUser,

    /// The prediction round trip failed; the user was sent to the dashboard.
    SubmitError,

    /// The prediction was stored; the user was sent to the dashboard.
    Success,
}

impl SubmissionPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionPhase::Editing => "editing",
            SubmissionPhase::Validating => "validating",
            SubmissionPhase::Submitting => "submitting",
            SubmissionPhase::AbortedNoUser => "aborted-no-user",
            SubmissionPhase::SubmitError => "submit-error",
            SubmissionPhase::Success => "success",
        }
    }

    /// Returns `true` once a submission attempt has left the form.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionPhase::AbortedNoUser | SubmissionPhase::SubmitError | SubmissionPhase::Success
        )
    }

    /// Returns `true` if a new submit may start from this phase.
    pub fn accepts_submit(&self) -> bool {
        !matches!(self, SubmissionPhase::Validating | SubmissionPhase::Submitting)
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editing" => Ok(SubmissionPhase::Editing),
            "validating" => Ok(SubmissionPhase::Validating),
            "submitting" => Ok(SubmissionPhase::Submitting),
            "aborted-no-user" => Ok(SubmissionPhase::AbortedNoUser),
            "submit-error" => Ok(SubmissionPhase::SubmitError),
            "success" => Ok(SubmissionPhase::Success),
            _ => Err(format!("invalid phase: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SubmissionPhase; 6] = [
        SubmissionPhase::Editing,
        SubmissionPhase::Validating,
        SubmissionPhase::Submitting,
        SubmissionPhase::AbortedNoUser,
        SubmissionPhase::SubmitError,
        SubmissionPhase::Success,
    ];

    #[test]
    fn test_should_parse_what_it_prints() {
        for phase in ALL {
            assert_eq!(phase.to_string().parse::<SubmissionPhase>(), Ok(phase));
        }
        assert!("done".parse::<SubmissionPhase>().is_err());
    }

    #[test]
    fn test_should_reject_submit_while_in_flight() {
        assert!(SubmissionPhase::Editing.accepts_submit());
        assert!(SubmissionPhase::SubmitError.accepts_submit());
        assert!(!SubmissionPhase::Validating.accepts_submit());
        assert!(!SubmissionPhase::Submitting.accepts_submit());
    }

    #[test]
    fn test_should_mark_only_outcomes_terminal() {
        let terminal: Vec<_> = ALL.into_iter().filter(|p| p.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![
                SubmissionPhase::AbortedNoUser,
                SubmissionPhase::SubmitError,
                SubmissionPhase::Success
            ]
        );
    }
}
