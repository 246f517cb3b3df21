//! Headless select/multi-select behaviour.
//!
//! [`DropdownController`] owns only transient UI state: whether the list is
//! open, whether it has focus and which option is highlighted. The bound
//! value, the options and the search text belong to the host, which passes
//! them in through [`DropdownProps`] on every call and learns about changes
//! by draining [`DropdownEvent`]s.

use std::collections::VecDeque;

use crossterm::event::KeyCode;
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::listeners::{ListenerId, ListenerKind, Listeners};

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
}

/// The value bound to a dropdown, shaped by its `multiple` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Single(Scalar),
    Multi(Vec<Scalar>),
}

impl Value {
    pub const fn empty(multiple: bool) -> Self {
        if multiple {
            Self::Multi(Vec::new())
        } else {
            Self::Single(Scalar::Null)
        }
    }

    pub fn contains(&self, scalar: &Scalar) -> bool {
        match self {
            Self::Single(value) => value == scalar,
            Self::Multi(values) => values.contains(scalar),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: Scalar,
    pub label: String,
    pub disabled: bool,
}

impl DropdownOption {
    pub fn new(value: Scalar, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
        }
    }

    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Host-owned configuration, borrowed for the duration of one controller call.
#[derive(Debug, Clone, Copy)]
pub struct DropdownProps<'a> {
    pub options: &'a [DropdownOption],
    pub value: &'a Value,
    pub multiple: bool,
    pub close_on_select: bool,
    pub searchable: bool,
    pub search_text: &'a str,
    pub disabled: bool,
}

impl<'a> DropdownProps<'a> {
    pub const fn new(options: &'a [DropdownOption], value: &'a Value) -> Self {
        Self {
            options,
            value,
            multiple: false,
            close_on_select: false,
            searchable: false,
            search_text: "",
            disabled: false,
        }
    }

    #[must_use]
    pub const fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    #[must_use]
    pub const fn close_on_select(mut self, close: bool) -> Self {
        self.close_on_select = close;
        self
    }

    #[must_use]
    pub const fn searchable(mut self, search_text: &'a str) -> Self {
        self.searchable = true;
        self.search_text = search_text;
        self
    }

    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn has_value(&self) -> bool {
        match self.value {
            Value::Multi(values) => !values.is_empty(),
            Value::Single(Scalar::Text(text)) => !text.is_empty(),
            Value::Single(scalar) => *scalar != Scalar::Null,
        }
    }

    /// Options matching the search text, case-insensitively, in their original order.
    pub fn filtered_options(&self) -> Vec<&'a DropdownOption> {
        if self.searchable && !self.search_text.is_empty() {
            let term = self.search_text.to_lowercase();
            self.options
                .iter()
                .filter(|option| option.label.to_lowercase().contains(&term))
                .collect()
        } else {
            self.options.iter().collect()
        }
    }
}

/// Where a focus change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSource {
    Container,
    Input,
}

/// Notifications for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEvent {
    StateChange { is_open: bool },
    OptionClick(DropdownOption),
    UpdateValue(Value),
    UpdateSearchText(String),
    Focus { source: FocusSource },
    Blur { source: FocusSource },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was consumed and its default behaviour should be suppressed.
    Handled,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Close,
}

#[derive(Debug)]
pub struct DropdownController {
    id: ListenerId,
    is_open: bool,
    is_focused: bool,
    highlighted_index: Option<usize>,
    container: Option<Rect>,
    options_area: Option<Rect>,
    options_offset: usize,
    events: Vec<DropdownEvent>,
    pending: VecDeque<Deferred>,
}

impl DropdownController {
    pub fn new(id: ListenerId) -> Self {
        Self {
            id,
            is_open: false,
            is_focused: false,
            highlighted_index: None,
            container: None,
            options_area: None,
            options_offset: 0,
            events: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub const fn highlighted_index(&self) -> Option<usize> {
        self.highlighted_index
    }

    pub fn set_highlighted_index(&mut self, index: Option<usize>) {
        self.highlighted_index = index;
    }

    /// Subscribes to captured clicks so presses outside the container close the list.
    pub fn mount(&mut self, listeners: &mut Listeners) {
        listeners.register(ListenerKind::OutsideClick, self.id);
    }

    pub fn unmount(&mut self, listeners: &mut Listeners) {
        listeners.unregister(ListenerKind::OutsideClick, self.id);
        self.container = None;
        self.options_area = None;
    }

    /// Records where the dropdown was last drawn.
    pub fn set_layout(&mut self, container: Rect, options_area: Option<Rect>, offset: usize) {
        self.container = Some(container);
        self.options_area = options_area;
        self.options_offset = offset;
    }

    pub fn take_events(&mut self) -> Vec<DropdownEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn toggle_dropdown(&mut self, props: &DropdownProps<'_>) {
        if self.is_open {
            self.close_dropdown(props);
        } else {
            self.open_dropdown(props);
        }
    }

    pub fn open_dropdown(&mut self, props: &DropdownProps<'_>) {
        if self.is_open || props.disabled {
            return;
        }
        self.is_open = true;
        self.on_open_changed(props);
    }

    pub fn close_dropdown(&mut self, props: &DropdownProps<'_>) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        self.on_open_changed(props);
    }

    fn on_open_changed(&mut self, props: &DropdownProps<'_>) {
        debug!(id = ?self.id, is_open = self.is_open, "dropdown state changed");
        self.events.push(DropdownEvent::StateChange {
            is_open: self.is_open,
        });
        self.highlighted_index = None;

        if self.is_open && !props.multiple && props.has_value() {
            self.highlighted_index = props
                .filtered_options()
                .iter()
                .position(|option| props.value.contains(&option.value));
        }
    }

    pub fn on_focus(&mut self, source: FocusSource) {
        self.is_focused = true;
        self.events.push(DropdownEvent::Focus { source });
    }

    pub fn on_blur(&mut self, source: FocusSource) {
        self.is_focused = false;
        self.events.push(DropdownEvent::Blur { source });
    }

    pub fn handle_option_click(&mut self, props: &DropdownProps<'_>, option: &DropdownOption) {
        if option.disabled {
            return;
        }
        self.events.push(DropdownEvent::OptionClick(option.clone()));

        let new_value = match props.value {
            Value::Multi(current) if props.multiple => {
                let mut values = current.clone();
                match values.iter().position(|v| *v == option.value) {
                    Some(index) => {
                        values.remove(index);
                    }
                    None => values.push(option.value.clone()),
                }
                Value::Multi(values)
            }
            _ => Value::Single(option.value.clone()),
        };
        self.events.push(DropdownEvent::UpdateValue(new_value));

        if props.close_on_select && !props.multiple {
            self.pending.push_back(Deferred::Close);
        }
    }

    pub fn handle_keydown(&mut self, props: &DropdownProps<'_>, key: KeyCode) -> KeyOutcome {
        if props.disabled {
            return KeyOutcome::Ignored;
        }
        let options = props.filtered_options();
        let count = options.len();

        match key {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if !self.is_open {
                    self.open_dropdown(props);
                } else if let Some(option) = self.highlighted_index.and_then(|i| options.get(i)) {
                    self.handle_option_click(props, option);
                }
            }
            KeyCode::Esc => self.close_dropdown(props),
            KeyCode::Down => {
                if !self.is_open {
                    self.open_dropdown(props);
                } else if count > 0 {
                    self.highlighted_index = match self.highlighted_index {
                        Some(i) if i + 1 < count => Some(i + 1),
                        _ => Some(0),
                    };
                }
            }
            KeyCode::Up => {
                if !self.is_open {
                    self.open_dropdown(props);
                } else if count > 0 {
                    self.highlighted_index = match self.highlighted_index {
                        Some(i) if i > 0 => Some(i - 1),
                        _ => Some(count - 1),
                    };
                }
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    /// Closes the list when a captured click lands outside the registered container.
    pub fn handle_click_outside(&mut self, props: &DropdownProps<'_>, position: Position) {
        let Some(container) = self.container else {
            return;
        };
        if !container.contains(position) && self.is_open {
            self.close_dropdown(props);
        }
    }

    pub fn handle_search_input(&mut self, text: &str) {
        self.events
            .push(DropdownEvent::UpdateSearchText(text.to_string()));
    }

    pub fn contains(&self, position: Position) -> bool {
        self.container.is_some_and(|area| area.contains(position))
    }

    /// Filtered option index under the given position, if the list is open there.
    pub fn option_index_at(&self, props: &DropdownProps<'_>, position: Position) -> Option<usize> {
        if !self.is_open {
            return None;
        }
        let area = self.options_area?;
        if !area.contains(position) {
            return None;
        }
        let index = usize::from(position.y - area.y) + self.options_offset;
        (index < props.filtered_options().len()).then_some(index)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Runs the tasks scheduled during the last handled event.
    pub fn run_pending(&mut self, props: &DropdownProps<'_>) {
        while let Some(task) = self.pending.pop_front() {
            match task {
                Deferred::Close => self.close_dropdown(props),
            }
        }
    }
}
