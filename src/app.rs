use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{DefaultTerminal, layout::Position};
use tracing::{debug, info};

use crate::dropdown::{DropdownEvent, DropdownOption, KeyOutcome, Scalar, Value};
use crate::form::{FormField, NoteForm};
use crate::listeners::{ListenerId, ListenerKind, Listeners};
use crate::models::{Note, NoteId, NoteType};
use crate::select::Select;
use crate::store::NotesStore;
use crate::ui;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Grid,
    Filter,
}

pub struct App {
    pub(crate) store: NotesStore,
    pub(crate) viewport: Viewport,
    pub(crate) listeners: Listeners,
    pub(crate) focus: Focus,
    pub(crate) list_index: usize,
    pub(crate) filter: Select,
    pub(crate) form: Option<NoteForm>,
    pub(crate) status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(store: NotesStore, viewport: Viewport) -> Self {
        let options = NoteType::ALL
            .into_iter()
            .map(|t| DropdownOption::new(Scalar::Number(t.code()), t.label()))
            .collect();
        let selected = store
            .selected_filters()
            .iter()
            .map(|t| Scalar::Number(t.code()))
            .collect();
        let filter = Select::new(ListenerId::FilterDropdown, options, true)
            .searchable()
            .placeholder("All notes")
            .with_value(Value::Multi(selected));

        Self {
            store,
            viewport,
            listeners: Listeners::new(),
            focus: Focus::Grid,
            list_index: 0,
            filter,
            form: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> std::io::Result<()> {
        let size = terminal.size()?;
        self.mount(size.width);

        while !self.should_quit {
            terminal.draw(|f| ui::draw(self, f))?;
            // Deferred work runs after the frame showing the last event.
            if self.run_pending() {
                continue;
            }
            let event = crossterm::event::read()?;
            self.handle_event(&event);
        }

        self.unmount();
        Ok(())
    }

    pub fn mount(&mut self, columns: u16) {
        self.viewport.mount(&mut self.listeners, columns);
        self.filter.mount(&mut self.listeners);
        info!(notes = self.store.len(), "board mounted");
    }

    pub fn unmount(&mut self) {
        self.close_form();
        self.filter.unmount(&mut self.listeners);
        self.viewport.unmount(&mut self.listeners);
    }

    pub fn screen(&self) -> Screen {
        if self.form.is_some() {
            Screen::Form
        } else {
            Screen::List
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.store.filtered_notes()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.visible_notes().get(self.list_index).copied()
    }

    pub fn run_pending(&mut self) -> bool {
        let mut ran = false;
        if self.filter.has_pending() {
            let events = self.filter.run_pending();
            self.on_filter_events(events);
            ran = true;
        }
        if let Some(form) = self.form.as_mut().filter(|f| f.type_select.has_pending()) {
            form.type_select.run_pending();
            ran = true;
        }
        ran
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match self.screen() {
                Screen::List => self.handle_list_key(*key),
                Screen::Form => self.handle_form_key(*key),
            },
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            Event::Resize(columns, _) => {
                if self
                    .listeners
                    .is_registered(ListenerKind::Resize, ListenerId::Viewport)
                {
                    self.viewport.update(*columns);
                }
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        if self.focus == Focus::Filter {
            let was_open = self.filter.controller.is_open();
            match key.code {
                KeyCode::Tab => self.set_focus(Focus::Grid),
                KeyCode::Esc | KeyCode::Char('f') if !was_open => self.set_focus(Focus::Grid),
                _ => {
                    let (outcome, events) = self.filter.handle_key(key);
                    if outcome == KeyOutcome::Ignored {
                        debug!(code = ?key.code, "key ignored by filter");
                    }
                    self.on_filter_events(events);
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(note) = self.selected_note() {
                    let form = NoteForm::for_note(note);
                    self.open_form(form);
                }
            }
            KeyCode::Char('a') => self.open_form(NoteForm::blank()),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('f') | KeyCode::Tab => self.set_focus(Focus::Filter),
            KeyCode::Char(c @ '1'..='9') => {
                let position = c as usize - '1' as usize;
                self.toggle_checklist_item(position);
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let type_open = form.focused() == FormField::Type && form.type_select.controller.is_open();

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.save_form(),
            (_, KeyCode::Tab) => form.focus_next(),
            (_, KeyCode::Esc) if !type_open => {
                self.close_form();
                self.status = Some("Edit cancelled".to_string());
            }
            _ => {
                form.handle_key(key);
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Capture phase: every live dropdown sees the click first.
                for id in self.listeners.subscribers(ListenerKind::OutsideClick) {
                    match id {
                        ListenerId::FilterDropdown => {
                            let events = self.filter.capture_click(position);
                            self.on_filter_events(events);
                        }
                        ListenerId::TypeDropdown => {
                            if let Some(form) = self.form.as_mut() {
                                form.type_select.capture_click(position);
                            }
                        }
                        ListenerId::Viewport => {}
                    }
                }
                self.click(position);
            }
            MouseEventKind::Moved => match self.form.as_mut() {
                Some(form) => form.type_select.hover(position),
                None => self.filter.hover(position),
            },
            _ => {}
        }
    }

    fn click(&mut self, position: Position) {
        if let Some(form) = self.form.as_mut() {
            if form.type_select.contains(position) {
                form.set_focus(FormField::Type);
                form.type_select.click(position);
            }
            return;
        }
        if self.filter.contains(position) {
            self.set_focus(Focus::Filter);
            let events = self.filter.click(position);
            self.on_filter_events(events);
        } else if self.focus == Focus::Filter {
            self.set_focus(Focus::Grid);
        }
    }

    fn on_filter_events(&mut self, events: Vec<DropdownEvent>) {
        for event in events {
            if let DropdownEvent::UpdateValue(Value::Multi(values)) = event {
                let filters = values.iter().filter_map(|value| match value {
                    Scalar::Number(code) => NoteType::from_code(*code),
                    _ => None,
                });
                self.store.set_filters(filters);
                self.clamp_selection();
            }
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus == focus {
            return;
        }
        match focus {
            Focus::Filter => self.filter.focus(),
            Focus::Grid => {
                self.filter.blur();
            }
        }
        self.focus = focus;
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.visible_notes().len();
        if count == 0 {
            return;
        }
        self.list_index = if delta > 0 {
            if self.list_index + 1 >= count { 0 } else { self.list_index + 1 }
        } else if self.list_index == 0 {
            count - 1
        } else {
            self.list_index - 1
        };
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_notes().len();
        self.list_index = self.list_index.min(count.saturating_sub(1));
    }

    fn select_note(&mut self, id: NoteId) {
        if let Some(index) = self.visible_notes().iter().position(|n| n.id == id) {
            self.list_index = index;
        }
    }

    fn open_form(&mut self, mut form: NoteForm) {
        self.close_form();
        self.set_focus(Focus::Grid);
        form.mount(&mut self.listeners);
        debug!(editing = ?form.editing_id(), "opening note form");
        self.form = Some(form);
    }

    fn close_form(&mut self) {
        if let Some(mut form) = self.form.take() {
            form.unmount(&mut self.listeners);
        }
    }

    fn save_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        if form.title.value().trim().is_empty() {
            self.status = Some("A note needs a title".to_string());
            return;
        }
        let id = form.save(&mut self.store);
        self.close_form();
        self.select_note(id);
        self.status = Some(format!("Saved note #{id}"));
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_note().map(|n| n.id) else {
            return;
        };
        if let Some(note) = self.store.delete_note(id) {
            self.status = Some(format!("Deleted \"{}\"", note.title));
        }
        if self.list_index != 0 {
            self.list_index -= 1;
        }
        self.clamp_selection();
    }

    fn toggle_checklist_item(&mut self, position: usize) {
        let Some((id, item_id)) = self.selected_note().and_then(|note| {
            let item = note.checkbox_items.get(position)?;
            Some((note.id, item.id.clone()))
        }) else {
            return;
        };
        self.store.toggle_checkbox_item(id, &item_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn app() -> App {
        let mut app = App::new(NotesStore::seeded(), Viewport::new(8));
        app.mount(120);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn left_click(app: &mut App, column: u16, row: u16) {
        app.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn render(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui::draw(app, f)).unwrap();
    }

    fn visible_ids(app: &App) -> Vec<u64> {
        app.visible_notes().iter().map(|n| n.id.get()).collect()
    }

    #[test]
    fn mount_registers_global_listeners_and_unmount_releases_them() {
        let mut app = app();
        assert_eq!(app.listeners.len(), 2);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.listeners.len(), 3);

        app.unmount();
        assert!(app.listeners.is_empty());
    }

    #[test]
    fn filter_dropdown_restricts_the_grid() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.selected_filters(), &[NoteType::Checkbox]);
        assert_eq!(visible_ids(&app), vec![2, 8]);
        assert!(app.filter.controller.is_open());

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::Grid);
        assert!(!app.should_quit());
    }

    #[test]
    fn filter_search_narrows_options() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Down);
        for c in "ima".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.selected_filters(), &[NoteType::Image]);
        assert_eq!(visible_ids(&app), vec![1, 4, 5, 6]);
    }

    #[test]
    fn outside_click_closes_filter() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Enter);
        render(&mut app);

        left_click(&mut app, 119, 39);
        assert!(!app.filter.controller.is_open());
        assert_eq!(app.focus, Focus::Grid);
    }

    #[test]
    fn clicking_the_filter_trigger_opens_it() {
        let mut app = app();
        render(&mut app);

        left_click(&mut app, 2, 1);
        assert_eq!(app.focus, Focus::Filter);
        assert!(app.filter.controller.is_open());
    }

    #[test]
    fn adds_a_note_through_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.screen(), Screen::Form);
        for c in "Ideas".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL,
        )));

        assert_eq!(app.screen(), Screen::List);
        assert_eq!(app.selected_note().map(|n| n.title.as_str()), Some("Ideas"));
        assert_eq!(app.status.as_deref(), Some("Saved note #9"));
    }

    #[test]
    fn refuses_to_save_untitled_notes() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        app.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL,
        )));

        assert_eq!(app.screen(), Screen::Form);
        assert_eq!(app.store.len(), 8);
    }

    #[test]
    fn type_dropdown_closes_after_pending_tasks() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.note_type(), NoteType::Image);
        assert!(form.type_select.controller.is_open());

        assert!(app.run_pending());
        assert!(!app.form.as_ref().unwrap().type_select.controller.is_open());
        assert!(!app.run_pending());
    }

    #[test]
    fn escape_closes_type_dropdown_before_cancelling_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Form);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::List);
    }

    #[test]
    fn deletes_and_wraps_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_note().map(|n| n.id.get()), Some(8));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store.len(), 7);
        assert_eq!(app.selected_note().map(|n| n.id.get()), Some(7));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_index, 0);
    }

    #[test]
    fn number_keys_toggle_checklist_items() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('9'));

        let note = app.store.find_note(NoteId::new(2)).unwrap();
        assert!(note.is_item_selected("milk"));
        assert!(note.is_item_selected("bread"));
    }

    #[test]
    fn resize_updates_viewport_while_mounted() {
        let mut app = app();
        app.handle_event(&Event::Resize(50, 20));
        assert!(app.viewport.is_small_screen_size());

        app.unmount();
        app.handle_event(&Event::Resize(200, 20));
        assert!(app.viewport.is_small_screen_size());
    }

    #[test]
    fn quits_from_the_grid() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
