//! Form state, client-side validation and the shared submission routine.

mod draft;
mod modal;
pub mod pipeline;
mod schema;
mod value;

pub use draft::{ErrorSource, FieldError, FormDraft};
pub use modal::{Modal, ModalError, ModalMode, Phase};
pub use pipeline::{apply_failure, Failure, Outcome};
pub use schema::{FieldErrors, FieldKind, FieldRule, Rule, Schema, ALPHANUMERIC, EMAIL, NUMERIC};
pub use value::{FieldValue, Upload};
