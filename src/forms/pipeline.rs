//! The one submission routine every entity form goes through.
//!
//! validate -> authenticated request -> reconcile the response into the modal.
//! Nothing is retried; a failed submission leaves the modal open for the user
//! to fix and resend, except an authentication failure, which ends the session.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::draft::FormDraft;
use super::modal::{Modal, ModalError};
use crate::remote::{Envelope, RemoteApi, RemoteError};
use crate::resources::SubmitTarget;
use crate::session::Session;

const DEFAULT_SUCCESS: &str = "Saved successfully";

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Blocked by client-side validation; no request was made
    Invalid,
    Saved { message: String },
    /// Server or transport failure; details are on the modal
    Rejected { status: Option<u16> },
    /// The store API no longer accepts the token
    SignedOut,
}

/// What a failed call means for the form that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub banner: Option<String>,
    pub signed_out: bool,
    pub status: Option<u16>,
}

/// Map a failed call onto a draft.
///
/// * a `message` becomes the banner;
/// * each `errors` entry puts its first message on the matching field;
/// * a 401 marks the failure as signed out, whatever else the body said;
/// * with no response at all, the transport error text is the banner.
pub fn apply_failure(draft: &mut FormDraft, error: &RemoteError) -> Failure {
    match error {
        RemoteError::Status { status, envelope } => {
            if let Some(errors) = &envelope.errors {
                draft.apply_server_errors(errors);
            }
            Failure {
                banner: envelope.message.clone(),
                signed_out: error.is_unauthorized(),
                status: Some(status.as_u16()),
            }
        }
        RemoteError::Transport(_) | RemoteError::Decode(_) => Failure {
            banner: Some(error.to_string()),
            signed_out: false,
            status: None,
        },
    }
}

/// Validate the modal's draft and, when it passes, send it to `target`.
pub async fn submit(
    modal: &mut Modal,
    target: &SubmitTarget,
    remote: &RemoteApi,
    session: &Session,
) -> Result<Outcome, ModalError> {
    modal.begin_submit()?;

    if let Err(errors) = modal.schema().validate(modal.draft()) {
        debug!(resource = %target.resource, fields = errors.len(), "Form blocked by validation");
        modal.settle_invalid(errors);
        return Ok(Outcome::Invalid);
    }

    let fields = target.resource.wire_fields(modal.draft());
    let result = remote
        .submit(target.method(), &target.path(), &fields, session)
        .await;

    Ok(reconcile(modal, target, result))
}

/// Fold the result of a submission into the modal.
pub fn reconcile(
    modal: &mut Modal,
    target: &SubmitTarget,
    result: Result<Envelope, RemoteError>,
) -> Outcome {
    match result {
        Ok(envelope) => {
            let message = envelope.message.unwrap_or_else(|| DEFAULT_SUCCESS.to_string());
            info!(resource = %target.resource, path = %target.path(), "Form saved");
            modal.settle_success(message.clone());
            Outcome::Saved { message }
        }
        Err(error) => {
            let failure = apply_failure(modal.draft_mut(), &error);
            if failure.signed_out {
                warn!(resource = %target.resource, "Session rejected while saving, signing out");
                modal.close();
                return Outcome::SignedOut;
            }
            warn!(resource = %target.resource, error = %error, "Form submission failed");
            modal.settle_error(failure.banner);
            Outcome::Rejected {
                status: failure.status,
            }
        }
    }
}
