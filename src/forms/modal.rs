//! Lifecycle of a create/update modal.
//!
//! ```text
//! Closed -> Open -> Submitting -> SuccessPendingAck -> Closed
//!                        |   \-> ErrorDisplayed -> Submitting ...
//!                        \-> Open (blocked by validation)
//! ```
//!
//! An authentication failure closes the modal from any phase.

use serde::Serialize;
use serde_json::Value;
use std::future::Future;

use super::draft::FormDraft;
use super::schema::{FieldErrors, Schema};
use crate::resources::{Resource, SubmitTarget};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModalMode {
    Closed,
    Creating,
    Editing { id: String, prefill: Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Closed,
    Open,
    Submitting,
    SuccessPendingAck { message: String },
    ErrorDisplayed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    #[error("form is already being submitted")]
    AlreadySubmitting,
    #[error("form is not open")]
    NotOpen,
    #[error("no saved change is waiting for acknowledgment")]
    NothingToAcknowledge,
}

#[derive(Debug, Clone, Serialize)]
pub struct Modal {
    #[serde(skip)]
    schema: Schema,
    #[serde(flatten)]
    mode: ModalMode,
    #[serde(flatten)]
    phase: Phase,
    draft: FormDraft,
    /// Page-level error shown above the form
    banner: Option<String>,
}

impl Modal {
    pub fn new(schema: Schema) -> Self {
        let draft = FormDraft::defaults(&schema);
        Self {
            schema,
            mode: ModalMode::Closed,
            phase: Phase::Closed,
            draft,
            banner: None,
        }
    }

    pub fn open_create(&mut self) {
        self.mode = ModalMode::Creating;
        self.phase = Phase::Open;
        self.draft = FormDraft::defaults(&self.schema);
        self.banner = None;
    }

    pub fn open_edit(&mut self, id: impl Into<String>, prefill: Value) {
        self.draft = FormDraft::prefilled(&self.schema, &prefill);
        self.mode = ModalMode::Editing {
            id: id.into(),
            prefill,
        };
        self.phase = Phase::Open;
        self.banner = None;
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn mode(&self) -> &ModalMode {
        &self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        &mut self.draft
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.phase, Phase::Closed)
    }

    /// Endpoint selection follows the mode: create, or update of the edited record.
    pub fn target(&self, resource: Resource) -> Option<SubmitTarget> {
        match &self.mode {
            ModalMode::Closed => None,
            ModalMode::Creating => Some(SubmitTarget::create(resource)),
            ModalMode::Editing { id, .. } => Some(SubmitTarget::update(resource, id.clone())),
        }
    }

    /// Enter `Submitting`. A second submit while one is in flight is refused.
    pub fn begin_submit(&mut self) -> Result<(), ModalError> {
        match self.phase {
            Phase::Open | Phase::ErrorDisplayed => {
                self.phase = Phase::Submitting;
                self.banner = None;
                Ok(())
            }
            Phase::Submitting => Err(ModalError::AlreadySubmitting),
            Phase::Closed | Phase::SuccessPendingAck { .. } => Err(ModalError::NotOpen),
        }
    }

    /// Validation blocked the submission; nothing was sent.
    pub fn settle_invalid(&mut self, errors: FieldErrors) {
        self.draft.apply_client_errors(errors);
        self.phase = Phase::Open;
    }

    pub fn settle_success(&mut self, message: impl Into<String>) {
        self.phase = Phase::SuccessPendingAck {
            message: message.into(),
        };
    }

    /// The request failed; the modal stays open and editable.
    pub fn settle_error(&mut self, banner: Option<String>) {
        self.banner = banner;
        self.phase = Phase::ErrorDisplayed;
    }

    pub fn dismiss_error(&mut self) {
        if self.phase == Phase::ErrorDisplayed {
            self.banner = None;
            self.phase = Phase::Open;
        }
    }

    /// Acknowledge the success notice: close, then run the caller's refetch.
    pub async fn acknowledge<F, Fut, T>(&mut self, refetch: F) -> Result<T, ModalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if !matches!(self.phase, Phase::SuccessPendingAck { .. }) {
            return Err(ModalError::NothingToAcknowledge);
        }
        self.close();
        Ok(refetch().await)
    }

    /// Close and reset the draft. Reopening starts from defaults or the prefill again.
    pub fn close(&mut self) {
        self.mode = ModalMode::Closed;
        self.phase = Phase::Closed;
        self.draft = FormDraft::defaults(&self.schema);
        self.banner = None;
    }
}
