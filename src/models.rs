use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::NoteIdError;
use crate::icons::IconName;

/// Numeric note identifier, unique within a [`NotesStore`](crate::store::NotesStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(u64);

impl NoteId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = NoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(NoteIdError::Empty);
        }
        match trimmed.parse::<u64>() {
            Ok(0) => Err(NoteIdError::Zero),
            Ok(raw) => Ok(Self(raw)),
            Err(_) => Err(NoteIdError::Invalid(trimmed.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteType {
    #[default]
    Default,
    Image,
    Checkbox,
}

impl NoteType {
    pub const ALL: [Self; 3] = [Self::Default, Self::Image, Self::Checkbox];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Text",
            Self::Image => "Image",
            Self::Checkbox => "Checklist",
        }
    }

    pub const fn icon(self) -> IconName {
        match self {
            Self::Default => IconName::Note,
            Self::Image => IconName::Eye,
            Self::Checkbox => IconName::Check,
        }
    }

    /// Stable numeric code, used as the dropdown option value.
    pub const fn code(self) -> i64 {
        match self {
            Self::Default => 0,
            Self::Image => 1,
            Self::Checkbox => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxItem {
    pub id: String,
    pub label: String,
}

impl CheckboxItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub description: Option<String>,
    pub note_type: NoteType,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub checkbox_items: Vec<CheckboxItem>,
    pub selected_items: BTreeSet<String>,
}

impl Note {
    pub fn from_new(id: NoteId, new: NewNote) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            note_type: new.note_type,
            image_url: new.image_url,
            image_alt: new.image_alt,
            checkbox_items: new.checkbox_items,
            selected_items: new.selected_items,
        }
    }

    pub fn is_item_selected(&self, item_id: &str) -> bool {
        self.selected_items.contains(item_id)
    }

    /// Number of checked items over the total, only meaningful for checklists.
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self
            .checkbox_items
            .iter()
            .filter(|item| self.is_item_selected(&item.id))
            .count();
        (done, self.checkbox_items.len())
    }
}

/// A note that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNote {
    pub title: String,
    pub description: Option<String>,
    pub note_type: NoteType,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub checkbox_items: Vec<CheckboxItem>,
    pub selected_items: BTreeSet<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, note_type: NoteType) -> Self {
        Self {
            title: title.into(),
            note_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn image(mut self, url: impl Into<String>, alt: Option<&str>) -> Self {
        self.image_url = Some(url.into());
        self.image_alt = alt.map(str::to_string);
        self
    }

    #[must_use]
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.checkbox_items = items
            .into_iter()
            .map(|(id, label)| CheckboxItem::new(id, label))
            .collect();
        self
    }

    #[must_use]
    pub fn selected<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_items = ids.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_numeric_ids_with_whitespace() {
        assert_eq!(" 42 ".parse::<NoteId>(), Ok(NoteId::new(42)));
    }

    #[test]
    fn rejects_empty_zero_and_garbage_ids() {
        assert_eq!("".parse::<NoteId>(), Err(NoteIdError::Empty));
        assert_eq!("0".parse::<NoteId>(), Err(NoteIdError::Zero));
        assert_eq!(
            "4x".parse::<NoteId>(),
            Err(NoteIdError::Invalid("4x".to_string()))
        );
    }

    #[test]
    fn note_type_codes_round_trip() {
        for note_type in NoteType::ALL {
            assert_eq!(NoteType::from_code(note_type.code()), Some(note_type));
        }
        assert_eq!(NoteType::from_code(7), None);
    }

    #[test]
    fn checklist_progress_counts_only_known_items() {
        let new = NewNote::new("Groceries", NoteType::Checkbox)
            .items([("milk", "Milk"), ("bread", "Bread")])
            .selected(["bread", "ghost"]);
        let note = Note::from_new(NoteId::new(1), new);

        assert_eq!(note.checklist_progress(), (1, 2));
    }
}
