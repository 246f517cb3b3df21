use tracing::debug;

use crate::models::{NewNote, Note, NoteId, NoteType};

/// In-memory note collection plus the set of note types used to filter it.
#[derive(Debug, Default)]
pub struct NotesStore {
    notes: Vec<Note>,
    selected_filters: Vec<NoteType>,
}

impl NotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with the sample board.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        for note in seed_notes() {
            store.add_note(note);
        }
        store
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn find_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Looks a note up by its textual id, as typed by a user or read from a route.
    pub fn find_note_str(&self, raw: &str) -> Option<&Note> {
        let id = raw.parse::<NoteId>().ok()?;
        self.find_note(id)
    }

    pub fn add_note(&mut self, note: NewNote) -> NoteId {
        let id = self
            .notes
            .iter()
            .map(|n| n.id)
            .max()
            .unwrap_or(NoteId::new(0))
            .next();
        debug!(%id, title = %note.title, "adding note");
        self.notes.push(Note::from_new(id, note));
        id
    }

    /// Replaces the note with the same id. Returns `false` when no such note exists.
    pub fn update_note(&mut self, note: Note) -> bool {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(slot) => {
                debug!(id = %note.id, "updating note");
                *slot = note;
                true
            }
            None => false,
        }
    }

    pub fn delete_note(&mut self, id: NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        debug!(%id, "deleting note");
        Some(self.notes.remove(index))
    }

    /// Flips the checked state of a checklist item. Returns the new state.
    pub fn toggle_checkbox_item(&mut self, id: NoteId, item_id: &str) -> Option<bool> {
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        if !note.checkbox_items.iter().any(|item| item.id == item_id) {
            return None;
        }
        let checked = if note.selected_items.remove(item_id) {
            false
        } else {
            note.selected_items.insert(item_id.to_string());
            true
        };
        debug!(%id, item_id, checked, "toggled checklist item");
        Some(checked)
    }

    pub fn selected_filters(&self) -> &[NoteType] {
        &self.selected_filters
    }

    pub fn set_filters(&mut self, filters: impl IntoIterator<Item = NoteType>) {
        self.selected_filters.clear();
        for filter in filters {
            self.add_filter(filter);
        }
        debug!(filters = ?self.selected_filters, "filters replaced");
    }

    pub fn add_filter(&mut self, filter: NoteType) {
        if !self.selected_filters.contains(&filter) {
            self.selected_filters.push(filter);
        }
    }

    pub fn remove_filter(&mut self, filter: NoteType) {
        self.selected_filters.retain(|f| *f != filter);
    }

    /// Notes whose type is in the filter set, or every note when the set is empty.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        if self.selected_filters.is_empty() {
            return self.notes.iter().collect();
        }
        self.notes
            .iter()
            .filter(|note| self.selected_filters.contains(&note.note_type))
            .collect()
    }
}

fn seed_notes() -> Vec<NewNote> {
    vec![
        NewNote::new("High-Five Moment", NoteType::Image)
            .image(
                "https://images.unsplash.com/photo-1522202176988-66273c2fd55f?q=80&w=2071&auto=format&fit=crop",
                None,
            )
            .description(
                "A successful meeting concluding with a high-five. Represents teamwork and achievement.",
            ),
        NewNote::new("Weekly Shopping List", NoteType::Checkbox)
            .description("Essential items to buy for the upcoming week. Check them off as you go.")
            .items([("milk", "Milk"), ("bread", "Bread"), ("cheese", "Cheese")])
            .selected(["bread"]),
        NewNote::new("Project Brainstorm", NoteType::Default).description(
            "Initial ideas and concepts for the new project launch. Includes key performance \
             indicators, target audience analysis, and marketing strategies to explore. More \
             detailed planning to follow in subsequent meetings.",
        ),
        NewNote::new("Team Presentation", NoteType::Image)
            .image(
                "https://images.unsplash.com/photo-1556761175-b413da4baf72?q=80&w=1974&auto=format&fit=crop",
                None,
            )
            .description(
                "A snapshot from the last quarterly presentation. The team is discussing future goals and growth opportunities.",
            ),
        NewNote::new("Cityscape View", NoteType::Image)
            .image(
                "https://images.unsplash.com/photo-1449824913935-59a10b8d2000?q=80&w=2070&auto=format&fit=crop",
                None,
            )
            .description(
                "An inspiring view of the city at sunset. A reminder of the scale and beauty of urban environments.",
            ),
        NewNote::new("Stock Market Analysis", NoteType::Image)
            .image(
                "https://images.unsplash.com/photo-1611974789855-9c2a0a7236a3?q=80&w=2070&auto=format&fit=crop",
                None,
            )
            .description(
                "Tracking financial performance and market trends to make informed investment decisions.",
            ),
        NewNote::new("Meeting Agenda", NoteType::Default).description(
            "Key discussion points for tomorrow's quarterly review meeting. Topics include budget \
             allocation, team performance metrics, upcoming project deadlines, and resource \
             planning for Q2.",
        ),
        NewNote::new("Daily Tasks", NoteType::Checkbox)
            .description("Today's priority tasks and activities to complete.")
            .items([
                ("email", "Check and respond to emails"),
                ("report", "Finish quarterly report"),
                ("meeting", "Prepare presentation slides"),
                ("review", "Review team proposals"),
            ])
            .selected(["email"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(notes: &[&Note]) -> Vec<u64> {
        notes.iter().map(|n| n.id.get()).collect()
    }

    #[test]
    fn seeded_store_has_sequential_ids() {
        let store = NotesStore::seeded();
        let all: Vec<&Note> = store.notes().iter().collect();
        assert_eq!(ids(&all), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn add_uses_max_id_plus_one() {
        let mut store = NotesStore::new();
        assert_eq!(store.add_note(NewNote::new("first", NoteType::Default)).get(), 1);
        store.add_note(NewNote::new("second", NoteType::Default));
        store.add_note(NewNote::new("third", NoteType::Default));
        store.delete_note(NoteId::new(2));

        let id = store.add_note(NewNote::new("x", NoteType::Default));
        assert_eq!(id, NoteId::new(4));
    }

    #[test]
    fn add_then_find_then_delete() {
        let mut store = NotesStore::seeded();
        let new = NewNote::new("Fresh", NoteType::Default).description("body");
        let id = store.add_note(new.clone());

        let found = store.find_note(id).cloned();
        assert_eq!(found, Some(Note::from_new(id, new)));

        assert!(store.delete_note(id).is_some());
        assert_eq!(store.find_note(id), None);
        assert_eq!(store.delete_note(id), None);
    }

    #[test]
    fn finds_by_numeric_string() {
        let store = NotesStore::seeded();
        assert_eq!(store.find_note_str("3").map(|n| n.title.as_str()), Some("Project Brainstorm"));
        assert_eq!(store.find_note_str("three"), None);
        assert_eq!(store.find_note_str("99"), None);
    }

    #[test]
    fn update_replaces_in_place_and_ignores_unknown_ids() {
        let mut store = NotesStore::seeded();
        let mut note = store.find_note(NoteId::new(3)).cloned().unwrap();
        note.title = "Renamed".to_string();

        assert!(store.update_note(note));
        assert_eq!(store.notes()[2].title, "Renamed");

        let mut ghost = store.notes()[0].clone();
        ghost.id = NoteId::new(100);
        assert!(!store.update_note(ghost));
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn filtered_notes_keeps_order() {
        let mut store = NotesStore::seeded();
        assert_eq!(store.filtered_notes().len(), 8);

        store.set_filters([NoteType::Checkbox]);
        assert_eq!(ids(&store.filtered_notes()), vec![2, 8]);
        assert!(store
            .filtered_notes()
            .iter()
            .all(|n| n.note_type == NoteType::Checkbox));

        store.add_filter(NoteType::Default);
        store.add_filter(NoteType::Default);
        assert_eq!(store.selected_filters(), &[NoteType::Checkbox, NoteType::Default]);
        assert_eq!(ids(&store.filtered_notes()), vec![2, 3, 7, 8]);

        store.remove_filter(NoteType::Checkbox);
        assert_eq!(ids(&store.filtered_notes()), vec![3, 7]);
    }

    #[test]
    fn toggles_known_checklist_items_only() {
        let mut store = NotesStore::seeded();
        let id = NoteId::new(2);

        assert_eq!(store.toggle_checkbox_item(id, "milk"), Some(true));
        assert_eq!(store.toggle_checkbox_item(id, "bread"), Some(false));
        assert_eq!(store.toggle_checkbox_item(id, "caviar"), None);

        let note = store.find_note(id).unwrap();
        assert!(note.is_item_selected("milk"));
        assert!(!note.is_item_selected("bread"));
    }
}
