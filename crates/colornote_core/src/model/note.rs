//! Note record and partial update request.
//!
//! # Invariants
//! - `id` is generated once at creation and never changes afterwards.
//! - `color` is stored verbatim; catalog membership is checked only when the
//!   tag is resolved for display.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one note.
pub type NoteId = Uuid;

/// Validation failure for note construction from external identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// The nil UUID cannot identify a note.
    NilId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "note id must not be the nil uuid"),
        }
    }
}

impl Error for NoteValidationError {}

/// A user-created note with a title, body text and color tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Free-form, may be empty.
    pub title: String,
    /// Free-form, may be empty.
    pub body: String,
    /// Color tag name, expected to be one of `ColorTag::ALL`.
    pub color: String,
}

impl Note {
    /// Creates a note with a freshly generated id.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            color: color.into(),
        }
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Used by snapshot import where identity already exists.
    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, NoteValidationError> {
        if id.is_nil() {
            return Err(NoteValidationError::NilId);
        }
        Ok(Self {
            id,
            title: title.into(),
            body: body.into(),
            color: color.into(),
        })
    }

    /// Checks invariants that hold for every persisted note.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_nil() {
            return Err(NoteValidationError::NilId);
        }
        Ok(())
    }

    /// Applies the supplied fields of `update` in place. `id` is untouched.
    pub fn apply(&mut self, update: &NoteUpdate) {
        if let Some(title) = update.title.as_ref() {
            self.title.clone_from(title);
        }
        if let Some(body) = update.body.as_ref() {
            self.body.clone_from(body);
        }
        if let Some(color) = update.color.as_ref() {
            self.color.clone_from(color);
        }
    }
}

/// Partial update for one note. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NoteUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.color.is_none()
    }
}
