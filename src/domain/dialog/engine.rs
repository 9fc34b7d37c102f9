//! The conversation engine: one instance per active conversation.
//!
//! The engine is a pure state machine over the scripted steps. It holds
//! the cursor, the captured answers, and the terminal status, and turns
//! each inbound reply into a [`Turn`] of outbound messages. It performs
//! no I/O; the application layer owns delivery.

use chrono::Utc;
use thiserror::Error;

use crate::domain::foundation::{ConversationId, StateMachine, ValidationError};

use super::answers::{AnswerStore, FieldKey};
use super::artifact::{self, Artifact};
use super::script::{
    confirm_prompt, intake_script, proposal_prompt, DialogPolicy, DialogStep, PromptSpec,
    CANCELLED_NOTICE, CHOICE_REJECTION_NOTICE, COMPLETED_ACK, CONFIRM_VALUE, OPENING_LINE,
    RETRY_VALUE,
};
use super::status::ConversationStatus;

/// One outbound message produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Plain text, no reply expected.
    Say(String),
    /// A prompt awaiting the user's next reply.
    Ask(PromptSpec),
}

/// Everything the engine produced for one inbound reply, in send order,
/// plus the status the conversation settled into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub outputs: Vec<Outbound>,
    pub status: ConversationStatus,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("dialog script must contain at least one step")]
    EmptyScript,

    #[error("conversation has already finished")]
    AlreadyFinished,

    #[error("no captured answer for field '{0}'")]
    MissingAnswer(FieldKey),

    #[error(transparent)]
    Transition(#[from] ValidationError),
}

/// Where the engine is waiting for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Waiting on the reply to the step at this index.
    Step(usize),
    /// Waiting on the confirm/retry reply to the rendered proposal.
    Confirm,
}

/// Drives one conversation through the script, the proposal, and the
/// confirm exchange.
///
/// Each engine owns its own [`AnswerStore`], so concurrent conversations
/// never observe each other's answers. A finished engine (completed or
/// cancelled) rejects further replies.
#[derive(Debug, Clone)]
pub struct ConversationEngine {
    id: ConversationId,
    steps: Vec<DialogStep>,
    policy: DialogPolicy,
    position: Position,
    status: ConversationStatus,
    answers: AnswerStore,
    artifact: Option<Artifact>,
}

impl ConversationEngine {
    /// Creates an engine over an arbitrary script.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EmptyScript` when the script has no steps.
    pub fn new(steps: Vec<DialogStep>, policy: DialogPolicy) -> Result<Self, EngineError> {
        if steps.is_empty() {
            return Err(EngineError::EmptyScript);
        }
        Ok(Self {
            id: ConversationId::new(),
            steps,
            policy,
            position: Position::Step(0),
            status: ConversationStatus::Running,
            answers: AnswerStore::new(),
            artifact: None,
        })
    }

    /// Creates an engine over the fixed intake script.
    pub fn intake(policy: DialogPolicy) -> Self {
        Self {
            id: ConversationId::new(),
            steps: intake_script(),
            policy,
            position: Position::Step(0),
            status: ConversationStatus::Running,
            answers: AnswerStore::new(),
            artifact: None,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    /// The rendered proposal, once all steps have been answered.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// The greeting and first prompt, sent once when the conversation
    /// starts. No reply has been consumed yet, so `&self` suffices.
    pub fn opening(&self) -> Turn {
        // Scripts are non-empty by construction.
        let first = self.steps[0].present();
        Turn {
            outputs: vec![
                Outbound::Say(OPENING_LINE.to_string()),
                Outbound::Ask(first),
            ],
            status: self.status,
        }
    }

    /// Consumes one inbound reply and produces the next turn.
    ///
    /// A reply that fails step validation does not move the cursor; the
    /// turn carries an apology and the re-presented prompt instead.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::AlreadyFinished` when the conversation has
    /// reached a terminal status.
    pub fn advance(&mut self, reply: &str) -> Result<Turn, EngineError> {
        if !self.status.is_running() {
            return Err(EngineError::AlreadyFinished);
        }
        match self.position {
            Position::Step(index) => self.advance_step(index, reply),
            Position::Confirm => self.advance_confirm(reply),
        }
    }

    /// Cancels a conversation that ended without reaching a terminal
    /// status, returning the notice to deliver. Finished conversations
    /// yield nothing, so the caller can invoke this unconditionally on
    /// teardown without double-sending.
    pub fn finalize_cancelled(&mut self) -> Option<Outbound> {
        if !self.status.is_running() {
            return None;
        }
        match self.status.transition_to(ConversationStatus::Cancelled) {
            Ok(next) => {
                self.status = next;
                Some(Outbound::Say(CANCELLED_NOTICE.to_string()))
            }
            Err(_) => None,
        }
    }

    fn advance_step(&mut self, index: usize, reply: &str) -> Result<Turn, EngineError> {
        let step = &self.steps[index];
        if step.on_reply(reply, &mut self.answers, &self.policy).is_err() {
            let outputs = vec![
                Outbound::Say(step.rejection_notice().to_string()),
                Outbound::Ask(step.present()),
            ];
            return Ok(self.running_turn(outputs));
        }

        let next = index + 1;
        if next < self.steps.len() {
            self.position = Position::Step(next);
            let prompt = self.steps[next].present();
            return Ok(self.running_turn(vec![Outbound::Ask(prompt)]));
        }
        self.present_proposal()
    }

    /// All steps are answered: render the name once and ask for
    /// confirmation in the same message.
    fn present_proposal(&mut self) -> Result<Turn, EngineError> {
        let kind = self
            .answers
            .get(FieldKey::Kind)
            .ok_or(EngineError::MissingAnswer(FieldKey::Kind))?;
        let group = self
            .answers
            .get(FieldKey::Group)
            .ok_or(EngineError::MissingAnswer(FieldKey::Group))?;
        let filename = self
            .answers
            .get(FieldKey::Filename)
            .ok_or(EngineError::MissingAnswer(FieldKey::Filename))?;

        let artifact = artifact::render(kind, group, filename, Utc::now().date_naive());
        let prompt = proposal_prompt(artifact.as_str());
        self.artifact = Some(artifact);
        self.position = Position::Confirm;
        Ok(self.running_turn(vec![Outbound::Ask(prompt)]))
    }

    fn advance_confirm(&mut self, reply: &str) -> Result<Turn, EngineError> {
        let reply = reply.trim();
        if reply.eq_ignore_ascii_case(CONFIRM_VALUE) {
            self.status = self.status.transition_to(ConversationStatus::Completed)?;
            return Ok(Turn {
                outputs: vec![Outbound::Say(COMPLETED_ACK.to_string())],
                status: self.status,
            });
        }
        if reply.eq_ignore_ascii_case(RETRY_VALUE) {
            self.status = self.status.transition_to(ConversationStatus::Cancelled)?;
            return Ok(Turn {
                outputs: vec![Outbound::Say(CANCELLED_NOTICE.to_string())],
                status: self.status,
            });
        }
        // Unrecognized reply: re-ask without repeating the proposal, so
        // the rendered name is delivered exactly once.
        Ok(self.running_turn(vec![
            Outbound::Say(CHOICE_REJECTION_NOTICE.to_string()),
            Outbound::Ask(confirm_prompt()),
        ]))
    }

    fn running_turn(&self, outputs: Vec<Outbound>) -> Turn {
        Turn {
            outputs,
            status: self.status,
        }
    }
}
