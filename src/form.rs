use std::collections::BTreeSet;

use crossterm::event::{Event, KeyEvent};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::dropdown::{DropdownOption, KeyOutcome, Scalar, Value};
use crate::listeners::{ListenerId, Listeners};
use crate::models::{CheckboxItem, NewNote, Note, NoteId, NoteType};
use crate::select::Select;
use crate::store::NotesStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Type,
    ImageUrl,
    Items,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Type => "Type",
            Self::ImageUrl => "Image URL",
            Self::Items => "Checklist items (comma separated)",
        }
    }
}

/// Editor state for creating a note or changing an existing one.
#[derive(Debug)]
pub struct NoteForm {
    editing: Option<Note>,
    pub title: Input,
    pub description: Input,
    pub image_url: Input,
    pub items: Input,
    pub type_select: Select,
    focused: FormField,
}

impl NoteForm {
    pub fn blank() -> Self {
        Self {
            editing: None,
            title: Input::default(),
            description: Input::default(),
            image_url: Input::default(),
            items: Input::default(),
            type_select: type_select(NoteType::Default),
            focused: FormField::Title,
        }
    }

    pub fn for_note(note: &Note) -> Self {
        let items = note
            .checkbox_items
            .iter()
            .map(|item| escape_label(&item.label))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            editing: Some(note.clone()),
            title: Input::new(note.title.clone()),
            description: Input::new(note.description.clone().unwrap_or_default()),
            image_url: Input::new(note.image_url.clone().unwrap_or_default()),
            items: Input::new(items),
            type_select: type_select(note.note_type),
            focused: FormField::Title,
        }
    }

    pub fn editing_id(&self) -> Option<NoteId> {
        self.editing.as_ref().map(|note| note.id)
    }

    pub const fn focused(&self) -> FormField {
        self.focused
    }

    pub fn note_type(&self) -> NoteType {
        match self.type_select.host.value {
            Value::Single(Scalar::Number(code)) => NoteType::from_code(code).unwrap_or_default(),
            _ => NoteType::default(),
        }
    }

    /// Fields shown for the currently chosen note type, in tab order.
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::Title, FormField::Description, FormField::Type];
        match self.note_type() {
            NoteType::Default => {}
            NoteType::Image => fields.push(FormField::ImageUrl),
            NoteType::Checkbox => fields.push(FormField::Items),
        }
        fields
    }

    pub fn mount(&mut self, listeners: &mut Listeners) {
        self.type_select.mount(listeners);
    }

    pub fn unmount(&mut self, listeners: &mut Listeners) {
        self.type_select.unmount(listeners);
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.focused).unwrap_or(0);
        self.set_focus(fields[(index + 1) % fields.len()]);
    }

    pub fn set_focus(&mut self, field: FormField) {
        if self.focused == field {
            return;
        }
        if self.focused == FormField::Type {
            self.type_select.blur();
        }
        self.focused = field;
        if field == FormField::Type {
            self.type_select.focus();
        }
    }

    /// Feeds a key to the focused field.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let input = match self.focused {
            FormField::Type => return self.type_select.handle_key(key).0,
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::ImageUrl => &mut self.image_url,
            FormField::Items => &mut self.items,
        };
        match input.handle_event(&Event::Key(key)) {
            Some(_) => KeyOutcome::Handled,
            None => KeyOutcome::Ignored,
        }
    }

    pub fn to_new_note(&self) -> NewNote {
        let note_type = self.note_type();
        let mut note = NewNote::new(self.title.value().trim(), note_type);
        note.description = non_empty(self.description.value());

        match note_type {
            NoteType::Default => {}
            NoteType::Image => {
                note.image_url = non_empty(self.image_url.value());
                note.image_alt = self.editing.as_ref().and_then(|n| n.image_alt.clone());
            }
            NoteType::Checkbox => {
                let existing = self.editing.as_ref().map_or(&[][..], |n| &n.checkbox_items[..]);
                note.checkbox_items = parse_items(self.items.value(), existing);
                let kept: BTreeSet<String> = note.checkbox_items.iter().map(|i| i.id.clone()).collect();
                note.selected_items = self
                    .editing
                    .as_ref()
                    .map(|n| n.selected_items.intersection(&kept).cloned().collect())
                    .unwrap_or_default();
            }
        }
        note
    }

    /// Writes the form into the store and returns the id of the saved note.
    pub fn save(&self, store: &mut NotesStore) -> NoteId {
        let new = self.to_new_note();
        match self.editing_id() {
            Some(id) if store.update_note(Note::from_new(id, new.clone())) => id,
            _ => store.add_note(new),
        }
    }
}

fn type_select(note_type: NoteType) -> Select {
    let options = NoteType::ALL
        .into_iter()
        .map(|t| DropdownOption::new(Scalar::Number(t.code()), t.label()))
        .collect();
    Select::new(ListenerId::TypeDropdown, options, false)
        .close_on_select()
        .placeholder("Note type")
        .with_value(Value::Single(Scalar::Number(note_type.code())))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Escapes backslashes and commas so a label survives `split_labels`.
fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace(',', "\\,")
}

fn split_labels(raw: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.extend(chars.next()),
            ',' => labels.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    labels.push(current);
    labels
}

/// Splits comma separated labels into checklist items. A label that matches
/// an existing item keeps that item's id; new labels get a slug id.
fn parse_items(raw: &str, existing: &[CheckboxItem]) -> Vec<CheckboxItem> {
    let mut seen = BTreeSet::new();
    split_labels(raw)
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .filter_map(|label| {
            let id = existing
                .iter()
                .find(|item| item.label == label)
                .map_or_else(|| slug(label), |item| item.id.clone());
            seen.insert(id.clone())
                .then(|| CheckboxItem::new(id, label))
        })
        .collect()
}

fn slug(label: &str) -> String {
    label
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
