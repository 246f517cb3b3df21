//! Host side of a dropdown: owns the bound value, the options and the
//! search input, and applies the controller's notifications to them.

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::layout::{Position, Rect};
use tracing::{debug, trace};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::dropdown::{
    DropdownController, DropdownEvent, DropdownOption, DropdownProps, FocusSource, KeyOutcome,
    Value,
};
use crate::listeners::{ListenerId, Listeners};

#[derive(Debug)]
pub struct SelectHost {
    pub options: Vec<DropdownOption>,
    pub value: Value,
    pub multiple: bool,
    pub close_on_select: bool,
    pub searchable: bool,
    pub placeholder: &'static str,
    search_input: Input,
    search_text: String,
    trigger_area: Option<Rect>,
}

impl SelectHost {
    pub fn props(&self) -> DropdownProps<'_> {
        let props = DropdownProps::new(&self.options, &self.value)
            .multiple(self.multiple)
            .close_on_select(self.close_on_select);
        if self.searchable {
            props.searchable(&self.search_text)
        } else {
            props
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_input(&self) -> &Input {
        &self.search_input
    }

    /// Labels of the options currently bound, in option order.
    pub fn selected_labels(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|option| self.value.contains(&option.value))
            .map(|option| option.label.as_str())
            .collect()
    }
}

#[derive(Debug)]
pub struct Select {
    pub controller: DropdownController,
    pub host: SelectHost,
}

impl Select {
    pub fn new(id: ListenerId, options: Vec<DropdownOption>, multiple: bool) -> Self {
        Self {
            controller: DropdownController::new(id),
            host: SelectHost {
                options,
                value: Value::empty(multiple),
                multiple,
                close_on_select: false,
                searchable: false,
                placeholder: "Select…",
                search_input: Input::default(),
                search_text: String::new(),
                trigger_area: None,
            },
        }
    }

    #[must_use]
    pub fn close_on_select(mut self) -> Self {
        self.host.close_on_select = true;
        self
    }

    #[must_use]
    pub fn searchable(mut self) -> Self {
        self.host.searchable = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.host.placeholder = placeholder;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.host.value = value;
        self
    }

    pub fn mount(&mut self, listeners: &mut Listeners) {
        self.controller.mount(listeners);
    }

    pub fn unmount(&mut self, listeners: &mut Listeners) {
        let props = self.host.props();
        self.controller.close_dropdown(&props);
        self.controller.unmount(listeners);
        self.apply_events();
    }

    pub fn set_layout(&mut self, trigger: Rect, options_area: Option<Rect>, offset: usize) {
        let container = options_area.map_or(trigger, |area| trigger.union(area));
        self.host.trigger_area = Some(trigger);
        self.controller.set_layout(container, options_area, offset);
    }

    pub fn focus(&mut self) {
        self.controller.on_focus(FocusSource::Container);
        self.apply_events();
    }

    pub fn blur(&mut self) {
        let props = self.host.props();
        self.controller.close_dropdown(&props);
        self.controller.on_blur(FocusSource::Container);
        self.apply_events();
    }

    /// Routes a key press through the controller, then into the search box.
    pub fn handle_key(&mut self, key: KeyEvent) -> (KeyOutcome, Vec<DropdownEvent>) {
        let props = self.host.props();
        let mut outcome = self.controller.handle_keydown(&props, key.code);

        if outcome == KeyOutcome::Ignored && self.host.searchable && self.controller.is_open() {
            let edits_search = matches!(
                key.code,
                KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete | KeyCode::Left | KeyCode::Right
            );
            if edits_search {
                self.host.search_input.handle_event(&Event::Key(key));
                self.controller.handle_search_input(self.host.search_input.value());
                outcome = KeyOutcome::Handled;
            }
        }
        (outcome, self.apply_events())
    }

    /// Capture-phase click delivered to every subscribed dropdown.
    pub fn capture_click(&mut self, position: Position) -> Vec<DropdownEvent> {
        let props = self.host.props();
        self.controller.handle_click_outside(&props, position);
        self.apply_events()
    }

    /// Target-phase click: picks an option row or toggles from the trigger.
    pub fn click(&mut self, position: Position) -> Vec<DropdownEvent> {
        let props = self.host.props();
        if let Some(index) = self.controller.option_index_at(&props, position) {
            let options = props.filtered_options();
            if let Some(option) = options.get(index) {
                self.controller.handle_option_click(&props, option);
            }
        } else if self.host.trigger_area.is_some_and(|area| area.contains(position)) {
            self.controller.toggle_dropdown(&props);
        }
        self.apply_events()
    }

    pub fn hover(&mut self, position: Position) {
        let props = self.host.props();
        if let Some(index) = self.controller.option_index_at(&props, position) {
            self.controller.set_highlighted_index(Some(index));
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.controller.contains(position)
    }

    pub fn has_pending(&self) -> bool {
        self.controller.has_pending()
    }

    pub fn run_pending(&mut self) -> Vec<DropdownEvent> {
        let props = self.host.props();
        self.controller.run_pending(&props);
        self.apply_events()
    }

    /// Applies queued notifications to the host state and hands them to the caller.
    fn apply_events(&mut self) -> Vec<DropdownEvent> {
        let mut applied = Vec::new();
        let mut batch = self.controller.take_events();
        while !batch.is_empty() {
            for event in batch {
                match &event {
                    DropdownEvent::UpdateValue(value) => {
                        debug!(?value, "dropdown value updated");
                        self.host.value = value.clone();
                    }
                    DropdownEvent::UpdateSearchText(text) => {
                        self.host.search_text.clone_from(text);
                    }
                    DropdownEvent::StateChange { is_open } if self.host.searchable => {
                        if *is_open {
                            self.controller.on_focus(FocusSource::Input);
                        } else {
                            self.controller.on_blur(FocusSource::Input);
                            self.host.search_input.reset();
                            self.controller.handle_search_input("");
                        }
                    }
                    DropdownEvent::Focus { source } | DropdownEvent::Blur { source } => {
                        trace!(?source, ?event, "dropdown focus");
                    }
                    _ => {}
                }
                applied.push(event);
            }
            batch = self.controller.take_events();
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dropdown::Scalar;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn colours(multiple: bool) -> Select {
        let options = ["Red", "Green", "Blue"]
            .into_iter()
            .enumerate()
            .map(|(i, label)| DropdownOption::new(Scalar::Number(i as i64), label))
            .collect();
        Select::new(ListenerId::FilterDropdown, options, multiple)
    }

    #[test]
    fn typing_while_open_updates_search_text() {
        let mut select = colours(true).searchable();
        select.handle_key(key(KeyCode::Down));
        select.handle_key(key(KeyCode::Char('r')));
        select.handle_key(key(KeyCode::Char('E')));

        assert_eq!(select.host.search_text(), "rE");
        let labels: Vec<&str> = select
            .host
            .props()
            .filtered_options()
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Red", "Green"]);
    }

    #[test]
    fn closing_clears_search() {
        let mut select = colours(true).searchable();
        select.handle_key(key(KeyCode::Down));
        select.handle_key(key(KeyCode::Char('b')));
        select.handle_key(key(KeyCode::Esc));

        assert_eq!(select.host.search_text(), "");
        assert_eq!(select.host.search_input().value(), "");
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let mut select = colours(true).searchable();
        let (outcome, events) = select.handle_key(key(KeyCode::Char('r')));

        assert_eq!(outcome, KeyOutcome::Ignored);
        assert_eq!(events, vec![]);
    }

    #[test]
    fn selections_update_the_bound_value() {
        let mut select = colours(true);
        select.handle_key(key(KeyCode::Enter));
        select.handle_key(key(KeyCode::Down));
        select.handle_key(key(KeyCode::Enter));
        select.handle_key(key(KeyCode::Down));
        select.handle_key(key(KeyCode::Down));
        select.handle_key(key(KeyCode::Enter));

        assert_eq!(
            select.host.value,
            Value::Multi(vec![Scalar::Number(0), Scalar::Number(2)])
        );
        assert_eq!(select.host.selected_labels(), vec!["Red", "Blue"]);
    }

    #[test]
    fn single_select_closes_after_pending_tasks() {
        let mut select = colours(false).close_on_select();
        select.handle_key(key(KeyCode::Enter));
        select.handle_key(key(KeyCode::Up));
        select.handle_key(key(KeyCode::Enter));

        assert!(select.controller.is_open());
        assert_eq!(select.host.value, Value::Single(Scalar::Number(2)));

        let events = select.run_pending();
        assert_eq!(events, vec![DropdownEvent::StateChange { is_open: false }]);
        assert!(!select.controller.is_open());
    }

    #[test]
    fn mouse_clicks_toggle_and_pick() {
        let mut select = colours(false);
        select.set_layout(Rect::new(0, 0, 20, 3), Some(Rect::new(1, 3, 18, 3)), 0);

        select.click(Position::new(2, 1));
        assert!(select.controller.is_open());

        select.hover(Position::new(2, 4));
        assert_eq!(select.controller.highlighted_index(), Some(1));

        select.click(Position::new(2, 4));
        assert_eq!(select.host.value, Value::Single(Scalar::Number(1)));

        select.capture_click(Position::new(50, 20));
        assert!(!select.controller.is_open());
    }
}
