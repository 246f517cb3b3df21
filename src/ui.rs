use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span, ToSpan},
    widgets::{Block, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use tui_input::Input;

use crate::app::{App, Focus, Screen};
use crate::form::{FormField, NoteForm};
use crate::icons::{self, IconName};
use crate::models::{Note, NoteType};
use crate::select::Select;

const CARD_HEIGHT: u16 = 5;

pub fn draw(app: &mut App, frame: &mut Frame) {
    match app.screen() {
        Screen::List => render_list(app, frame),
        Screen::Form => render_form(app, frame),
    }
}

fn render_list(app: &mut App, frame: &mut Frame) {
    let [top, body, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [filter_area, status_area] =
        Layout::horizontal([Constraint::Max(40), Constraint::Min(0)]).areas(top);

    let status = app.status.clone().unwrap_or_else(|| {
        let shown = app.visible_notes().len();
        format!("{shown} of {} notes", app.store.len())
    });
    frame.render_widget(
        Paragraph::new(status)
            .right_aligned()
            .block(Block::new().padding(Padding::top(1))),
        status_area,
    );

    if app.viewport.is_small_screen_size() {
        render_grid(app, frame, body);
    } else {
        let [grid_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Min(1)]).areas(body);
        render_grid(app, frame, grid_area);
        render_detail(app.selected_note(), frame, detail_area);
    }

    let help_message = Line::from_iter([
        "Esc/q".bold().yellow(),
        " exit, ".to_span(),
        "f".bold().yellow(),
        " filter, ".to_span(),
        "e".bold().yellow(),
        " edit, ".to_span(),
        "a".bold().yellow(),
        " add, ".to_span(),
        "1-9".bold().yellow(),
        " check item, ".to_span(),
        "d".bold().red(),
        " delete".to_span(),
    ])
    .centered();
    frame.render_widget(help_message, help);

    // Drawn last so the open list overlays the grid.
    let focused = app.focus == Focus::Filter;
    render_select(frame, &mut app.filter, filter_area, focused, IconName::FilterBars, "Filter");
}

fn render_grid(app: &App, frame: &mut Frame, area: Rect) {
    let notes = app.visible_notes();
    let block = Block::bordered()
        .title("My Notes")
        .border_set(border::THICK);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if notes.is_empty() {
        frame.render_widget(
            Paragraph::new("No notes match the current filter").centered().italic(),
            inner,
        );
        return;
    }

    let columns = app.viewport.columns_for_grid();
    let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));
    let selected_row = app.list_index / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for row in 0..visible_rows {
        let y = inner.y + CARD_HEIGHT * row as u16;
        if y + CARD_HEIGHT > inner.bottom() && row > 0 {
            break;
        }
        let row_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT.min(inner.bottom() - y));
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns]).split(row_area);

        for (column, cell) in cells.iter().enumerate() {
            let index = (first_row + row) * columns + column;
            if let Some(note) = notes.get(index) {
                render_card(frame, note, *cell, index == app.list_index);
            }
        }
    }
}

fn render_card(frame: &mut Frame, note: &Note, area: Rect, selected: bool) {
    let title = Line::from(vec![
        Span::raw(icons::glyph(note.note_type.icon())),
        " ".to_span(),
        note.title.as_str().bold(),
    ]);
    let mut block = Block::bordered().title(title);
    if selected {
        block = block.border_style(Style::new().yellow());
    }

    let body = match note.note_type {
        NoteType::Default => note.description.clone().unwrap_or_default(),
        NoteType::Image => format!(
            "{} {}",
            icons::glyph(IconName::Eye),
            note.image_alt
                .as_deref()
                .or(note.description.as_deref())
                .unwrap_or("No description")
        ),
        NoteType::Checkbox => {
            let (done, total) = note.checklist_progress();
            format!("{} {done}/{total} done", icons::glyph(IconName::Check))
        }
    };

    frame.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn render_detail(note: Option<&Note>, frame: &mut Frame, area: Rect) {
    let block = Block::bordered().title("Details");
    let Some(note) = note else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::from(note.title.as_str().bold()),
        Line::from(format!(
            "{} {} · #{}",
            icons::glyph(note.note_type.icon()),
            note.note_type.label(),
            note.id
        ))
        .dark_gray(),
        Line::default(),
    ];
    if let Some(description) = &note.description {
        lines.push(Line::from(description.as_str()));
        lines.push(Line::default());
    }
    match note.note_type {
        NoteType::Default => {}
        NoteType::Image => {
            let url = note.image_url.as_deref().unwrap_or("no image");
            lines.push(Line::from(format!("{} {url}", icons::glyph(IconName::Eye))).blue());
            if let Some(alt) = &note.image_alt {
                lines.push(Line::from(format!("alt: {alt}")).italic());
            }
        }
        NoteType::Checkbox => {
            for (position, item) in note.checkbox_items.iter().enumerate() {
                let mark = if note.is_item_selected(&item.id) {
                    icons::glyph(IconName::Check)
                } else {
                    " "
                };
                lines.push(Line::from(format!("{}. [{mark}] {}", position + 1, item.label)));
            }
        }
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_form(app: &mut App, frame: &mut Frame) {
    let Some(form) = app.form.as_mut() else {
        return;
    };
    let fields = form.fields();

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.extend([Constraint::Min(0), Constraint::Length(1)]);
    let layout = Layout::vertical(constraints).split(frame.area());

    let header = match form.editing_id() {
        Some(id) => format!("{} Edit note #{id}", icons::glyph(IconName::Edit)),
        None => format!("{} New note", icons::glyph(IconName::Plus)),
    };
    frame.render_widget(Line::from(header).bold(), layout[0]);

    let mut type_area = None;
    for (field, area) in fields.iter().zip(layout.iter().skip(1)) {
        match field_input(form, *field) {
            Some(input) => {
                render_input(frame, input, field.label(), *area, form.focused() == *field);
            }
            None => type_area = Some(*area),
        }
    }

    let help_message = Line::from_iter([
        "Esc".bold().yellow(),
        " cancel, ".to_span(),
        "Ctrl+S".bold().yellow(),
        " save, ".to_span(),
        "Tab".bold().yellow(),
        " switch input focus.".to_span(),
    ])
    .centered();
    frame.render_widget(help_message, layout[layout.len() - 1]);

    if let Some(area) = type_area {
        let focused = form.focused() == FormField::Type;
        render_select(frame, &mut form.type_select, area, focused, IconName::Note, "Type");
    }
}

fn field_input(form: &NoteForm, field: FormField) -> Option<&Input> {
    match field {
        FormField::Title => Some(&form.title),
        FormField::Description => Some(&form.description),
        FormField::ImageUrl => Some(&form.image_url),
        FormField::Items => Some(&form.items),
        FormField::Type => None,
    }
}

fn render_input(frame: &mut Frame, input: &Input, label: &str, area: Rect, focused: bool) {
    let mut block = Block::bordered().title(label);
    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);
    let paragraph = Paragraph::new(input.value()).scroll((0, scroll as u16));

    if focused {
        block = block.border_style(Style::new().yellow());
        let x = input.visual_cursor().max(scroll) - scroll + 1;
        frame.set_cursor_position((area.x + x as u16, area.y + 1));
    }
    frame.render_widget(paragraph.block(block), area);
}

fn render_select(
    frame: &mut Frame,
    select: &mut Select,
    trigger: Rect,
    focused: bool,
    icon: IconName,
    title: &str,
) {
    let open = select.controller.is_open();
    let chevron = icons::glyph(if open {
        IconName::ChevronUp
    } else {
        IconName::ChevronDown
    });

    let labels = select.host.selected_labels();
    let summary = if labels.is_empty() {
        Line::from(select.host.placeholder).dark_gray()
    } else {
        Line::from(labels.join(", "))
    };
    let mut block = Block::bordered()
        .title(format!("{} {title}", icons::glyph(icon)))
        .title(Line::from(chevron).right_aligned());
    if focused {
        block = block.border_style(Style::new().yellow());
    }
    frame.render_widget(Paragraph::new(summary).block(block), trigger);

    if !open {
        select.set_layout(trigger, None, 0);
        return;
    }

    let props = select.host.props();
    let searchable = props.searchable;
    let check = icons::glyph(IconName::Check);
    let items: Vec<ListItem> = props
        .filtered_options()
        .into_iter()
        .map(|option| {
            let chosen = props.value.contains(&option.value);
            let marker = match (props.multiple, chosen) {
                (true, true) => format!("[{check}] "),
                (true, false) => "[ ] ".to_string(),
                (false, true) => format!("{check} "),
                (false, false) => "  ".to_string(),
            };
            let item = ListItem::new(format!("{marker}{}", option.label));
            if option.disabled { item.dark_gray() } else { item }
        })
        .collect();

    let search_rows = u16::from(searchable);
    let wanted = items.len().max(1) as u16 + search_rows + 2;
    let available = frame.area().bottom().saturating_sub(trigger.bottom());
    let height = wanted.min(available);
    if height < 3 {
        select.set_layout(trigger, None, 0);
        return;
    }

    let overlay = Rect::new(trigger.x, trigger.bottom(), trigger.width, height);
    let block = Block::bordered().border_style(Style::new().yellow());
    let inner = block.inner(overlay);
    frame.render_widget(Clear, overlay);
    frame.render_widget(block, overlay);

    let [search_area, list_area] =
        Layout::vertical([Constraint::Length(search_rows), Constraint::Min(0)]).areas(inner);

    if searchable {
        let input = select.host.search_input();
        let [prompt_area, text_area] =
            Layout::horizontal([Constraint::Length(2), Constraint::Min(0)]).areas(search_area);
        frame.render_widget(Line::from("/ "), prompt_area);
        let width = search_area.width.max(3) - 3;
        let scroll = input.visual_scroll(width as usize);
        if input.value().is_empty() {
            frame.render_widget(Line::from("type to search").dark_gray(), text_area);
        } else {
            frame.render_widget(Paragraph::new(input.value()).scroll((0, scroll as u16)), text_area);
        }
        let x = input.visual_cursor().max(scroll) - scroll;
        frame.set_cursor_position((text_area.x + x as u16, text_area.y));
    }

    if items.is_empty() {
        frame.render_widget(Line::from("No matches").italic(), list_area);
        select.set_layout(trigger, Some(list_area), 0);
        return;
    }

    let mut state = ListState::default().with_selected(select.controller.highlighted_index());
    frame.render_stateful_widget(
        List::new(items).highlight_style(Style::new().black().on_white()),
        list_area,
        &mut state,
    );
    select.set_layout(trigger, Some(list_area), state.offset());
}
