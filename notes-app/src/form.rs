//! Form input buffer for a note that has not been submitted yet.

use notes_types::Note;
use strum::{Display, EnumString};

/// One input of the note form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Field {
    #[strum(to_string = "name")]
    Name,
    #[strum(to_string = "description", serialize = "desc")]
    Description,
    #[strum(to_string = "blood", serialize = "bloodLevel", serialize = "blood_level")]
    BloodLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    pub description: String,
    pub blood_level: String,
}

impl FormDraft {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Description => self.description = value,
            Field::BloodLevel => self.blood_level = value,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::BloodLevel => &self.blood_level,
        }
    }

    /// All three fields are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty() && !self.blood_level.is_empty()
    }

    /// First empty field, if any.
    pub fn missing_field(&self) -> Option<Field> {
        [Field::Name, Field::Description, Field::BloodLevel]
            .into_iter()
            .find(|f| self.get(*f).is_empty())
    }

    /// The unconfirmed note this draft describes, or `None` while incomplete.
    pub fn to_note(&self) -> Option<Note> {
        self.is_complete()
            .then(|| Note::draft(&self.name, &self.description, &self.blood_level))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
