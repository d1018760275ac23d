//! Response processing synthesis and evaluation.
//!
//! Every item is graded all-or-nothing by the same three rule conditions:
//!
//! 1. grade the submission (empty / exact match / anything else),
//! 2. show the success feedback when the status is `correct`,
//! 3. show the error feedback when the status is `incorrect`.
//!
//! An empty submission sets the status to `empty` and selects no feedback.
//! The tree is data; the renderer turns it into XML and [`ResponseProcessing::evaluate`]
//! interprets it the way a player would.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::ids::{IdGenerator, TokenSource, FEEDBACK_PREFIX};

/// Response variable holding the learner's selection.
pub const RESPONSE: &str = "RESPONSE";
/// Running score.
pub const SCORE: &str = "SCORE";
/// Score awarded for a correct submission.
pub const MAXSCORE: &str = "MAXSCORE";
/// Lowest score.
pub const MINSCORE: &str = "MINSCORE";
/// Internal grading status.
pub const FEEDBACKBASIC: &str = "FEEDBACKBASIC";
/// Visible feedback selector.
pub const FEEDBACKMODAL: &str = "FEEDBACKMODAL";

pub const DEFAULT_SCORE: f64 = 0.0;
pub const DEFAULT_MAX_SCORE: f64 = 1.0;
pub const DEFAULT_MIN_SCORE: f64 = 0.0;

/// Grading status stored in [`FEEDBACKBASIC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Empty,
    Correct,
    Incorrect,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Empty => "empty",
            Status::Correct => "correct",
            Status::Incorrect => "incorrect",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers of the two modal feedback blocks of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackIds {
    /// Shown when the status is `correct`.
    pub correct: String,
    /// Shown when the status is `incorrect`.
    pub incorrect: String,
}

impl FeedbackIds {
    /// Draw two fresh feedback identifiers.
    pub fn generate<S: TokenSource>(ids: &mut IdGenerator<S>) -> Result<Self> {
        Ok(Self {
            correct: ids.fresh(FEEDBACK_PREFIX)?,
            incorrect: ids.fresh(FEEDBACK_PREFIX)?,
        })
    }
}

/// A test inside a rule branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Condition {
    /// The response is null or has no members.
    IsNull,
    /// The response equals the declared correct response as a multiset.
    MatchCorrect,
    /// The grading status equals the given value.
    StatusIs(Status),
}

/// An outcome assignment inside a rule branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Action {
    /// `FEEDBACKBASIC := status`
    SetStatus(Status),
    /// `SCORE := SCORE + MAXSCORE`
    AddMaxScore,
    /// `SCORE := 0`
    ResetScore,
    /// `FEEDBACKMODAL := FEEDBACKMODAL + [id]`
    ShowFeedback(String),
}

/// One guarded list of actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub condition: Condition,
    pub actions: Vec<Action>,
}

/// An if / else-if / else chain. At most one branch runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleCondition {
    pub when: Branch,
    pub else_when: Vec<Branch>,
    pub otherwise: Option<Vec<Action>>,
}

/// The complete grading tree of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseProcessing {
    /// Declared correct response, in choice order.
    pub correct_response: Vec<String>,
    /// Conditions evaluated in order.
    pub rules: Vec<RuleCondition>,
}

/// Result of running the tree against a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
    pub score: f64,
    pub status: Status,
    pub feedback: Vec<String>,
}

/// Build the grading tree for an item.
pub fn synthesize(correct_ids: &[String], feedback: &FeedbackIds) -> ResponseProcessing {
    let grading = RuleCondition {
        when: Branch {
            condition: Condition::IsNull,
            actions: vec![Action::SetStatus(Status::Empty)],
        },
        else_when: vec![Branch {
            condition: Condition::MatchCorrect,
            actions: vec![Action::AddMaxScore, Action::SetStatus(Status::Correct)],
        }],
        otherwise: Some(vec![
            Action::ResetScore,
            Action::SetStatus(Status::Incorrect),
        ]),
    };

    ResponseProcessing {
        correct_response: correct_ids.to_vec(),
        rules: vec![
            grading,
            show_when(Status::Correct, &feedback.correct),
            show_when(Status::Incorrect, &feedback.incorrect),
        ],
    }
}

fn show_when(status: Status, feedback_id: &str) -> RuleCondition {
    RuleCondition {
        when: Branch {
            condition: Condition::StatusIs(status),
            actions: vec![Action::ShowFeedback(feedback_id.to_string())],
        },
        else_when: Vec::new(),
        otherwise: None,
    }
}

/// Mutable outcome state during evaluation.
struct State<'a> {
    submission: Option<&'a [&'a str]>,
    correct: &'a [String],
    max_score: f64,
    score: f64,
    status: Status,
    feedback: Vec<String>,
}

impl State<'_> {
    fn holds(&self, condition: &Condition) -> bool {
        match condition {
            Condition::IsNull => self.submission.map_or(true, |s| s.is_empty()),
            Condition::MatchCorrect => self
                .submission
                .is_some_and(|s| same_members(s, self.correct)),
            Condition::StatusIs(status) => self.status == *status,
        }
    }

    fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::SetStatus(status) => self.status = *status,
                Action::AddMaxScore => self.score += self.max_score,
                Action::ResetScore => self.score = DEFAULT_SCORE,
                Action::ShowFeedback(id) => self.feedback.push(id.clone()),
            }
        }
    }
}

/// Multiset equality: order is ignored, multiplicity is not.
fn same_members(submitted: &[&str], correct: &[String]) -> bool {
    if submitted.len() != correct.len() {
        return false;
    }
    let mut a: Vec<&str> = submitted.to_vec();
    let mut b: Vec<&str> = correct.iter().map(String::as_str).collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

impl ResponseProcessing {
    /// Grade a submission. `None` models a null response. `max_score` is the
    /// value of the `MAXSCORE` outcome, [`DEFAULT_MAX_SCORE`] in rendered items.
    pub fn evaluate(&self, submission: Option<&[&str]>, max_score: f64) -> GradeOutcome {
        let mut state = State {
            submission,
            correct: &self.correct_response,
            max_score,
            score: DEFAULT_SCORE,
            status: Status::Empty,
            feedback: Vec::new(),
        };

        for rule in &self.rules {
            if state.holds(&rule.when.condition) {
                state.apply(&rule.when.actions);
            } else if let Some(branch) = rule.else_when.iter().find(|b| state.holds(&b.condition)) {
                state.apply(&branch.actions);
            } else if let Some(actions) = &rule.otherwise {
                state.apply(actions);
            }
        }

        GradeOutcome {
            score: state.score,
            status: state.status,
            feedback: state.feedback,
        }
    }

    /// Every feedback identifier the tree can select, in rule order.
    pub fn feedback_ids(&self) -> Vec<&str> {
        let mut found = Vec::new();
        for rule in &self.rules {
            let branches = std::iter::once(&rule.when.actions)
                .chain(rule.else_when.iter().map(|b| &b.actions))
                .chain(rule.otherwise.iter());
            for actions in branches {
                for action in actions {
                    if let Action::ShowFeedback(id) = action {
                        found.push(id.as_str());
                    }
                }
            }
        }
        found
    }
}
