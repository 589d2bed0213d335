//! Shared types for the notes client and the remote note store it talks to.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// A note as held in the local list or returned by the remote store.
///
/// `id` is assigned by the store; a note appended optimistically from the form
/// has no `id` until the list is re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub blood_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Note {
    /// A local, unconfirmed note built from user input.
    pub fn draft(name: impl Into<String>, description: impl Into<String>, blood_level: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            blood_level: blood_level.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach a store-assigned id (builder pattern)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_confirmed(&self) -> bool {
        self.id.is_some()
    }
}

// =====================================================
// Mutation Inputs
// =====================================================

/// Input of the `createNote` mutation. Only the user-supplied fields are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteInput {
    pub name: String,
    pub description: String,
    pub blood_level: String,
}

impl From<&Note> for CreateNoteInput {
    fn from(note: &Note) -> Self {
        Self {
            name: note.name.clone(),
            description: note.description.clone(),
            blood_level: note.blood_level.clone(),
        }
    }
}

/// Input of the `deleteNote` mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteNoteInput {
    pub id: String,
}

// =====================================================
// Side Call
// =====================================================

/// Fixed body posted to the external function endpoint at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideCallPayload {
    pub key1: String,
    pub key2: String,
    pub key3: String,
}

impl Default for SideCallPayload {
    fn default() -> Self {
        Self {
            key1: "value1".to_string(),
            key2: "value2".to_string(),
            key3: "value3".to_string(),
        }
    }
}
