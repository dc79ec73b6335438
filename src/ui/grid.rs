//! Card grid rendering.
//!
//! Draws the active tab's toolbar (sort button, search button and input),
//! its visible cards in display order, and the sort dropdown when open.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::regions::Target;
use crate::app::App;
use crate::data::SortMode;

/// Width of one card including its border.
const CARD_WIDTH: u16 = 24;
/// Height of one card including its border.
const CARD_HEIGHT: u16 = 4;
/// Width of the expanded search input.
const SEARCH_INPUT_WIDTH: u16 = 26;
/// Width of the sort dropdown.
const DROPDOWN_WIDTH: u16 = 18;

/// Render the active tab's grid.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Toolbar
        Constraint::Min(CARD_HEIGHT),
    ])
    .split(area);

    let sort_button = render_toolbar(frame, app, chunks[0]);
    render_cards(frame, app, chunks[1]);

    if app.is_dropdown_open(app.current_tab) {
        render_dropdown(frame, app, sort_button, area);
    }
}

/// Draw the toolbar and register its buttons. Returns the sort button area.
fn render_toolbar(frame: &mut Frame, app: &mut App, area: Rect) -> Rect {
    let tab = app.current_tab;
    let grid = app.grid(tab);

    let sort_label = format!(" Sort: {} ▾ ", grid.sort_mode().label());
    let search_label = " / Search ".to_string();
    let sort_width = sort_label.chars().count() as u16;
    let search_width = search_label.chars().count() as u16;

    let sort_area = clip(Rect::new(area.x, area.y, sort_width, 1), area);
    let search_area = clip(
        Rect::new(area.x + sort_width + 1, area.y, search_width, 1),
        area,
    );

    let dropdown_open = app.is_dropdown_open(tab);
    let search_expanded = app.is_search_expanded(tab);
    let term = grid.search_term().to_string();

    frame.render_widget(
        Paragraph::new(sort_label).style(app.theme.control_style(dropdown_open)),
        sort_area,
    );
    frame.render_widget(
        Paragraph::new(search_label).style(app.theme.control_style(search_expanded)),
        search_area,
    );
    app.regions.push(sort_area, Target::SortButton(tab));
    app.regions.push(search_area, Target::SearchButton(tab));

    let after_search = search_area.right() + 1;
    if search_expanded {
        let input_area = clip(
            Rect::new(after_search, area.y, SEARCH_INPUT_WIDTH, 1),
            area,
        );
        let focused = app.focused_search() == Some(tab);
        let cursor = if focused { "_" } else { "" };
        let line = Line::from(vec![
            Span::styled("[", Style::default().fg(app.theme.border)),
            Span::styled(format!("{}{}", term, cursor), app.theme.input),
            Span::styled("]", Style::default().fg(app.theme.border)),
        ]);
        frame.render_widget(Paragraph::new(line), input_area);
        app.regions.push(input_area, Target::SearchInput(tab));
    } else if !term.is_empty() {
        let hint_area = clip(Rect::new(after_search, area.y, area.width, 1), area);
        let hint = Paragraph::new(format!("filter: {}", term))
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(hint, hint_area);
    }

    sort_area
}

fn render_cards(frame: &mut Frame, app: &mut App, area: Rect) {
    let tab = app.current_tab;
    let grid = app.grid(tab);
    let cards: Vec<(String, String)> = grid
        .visible_cards()
        .map(|c| (c.name.clone(), c.popularity_label()))
        .collect();

    let title = format!(" {} ({}/{}) ", tab.label(), cards.len(), grid.len());
    let block = Block::default()
        .title(Span::styled(title, app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if cards.is_empty() {
        let message = if grid.is_empty() { "No cards" } else { "No matches" };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().add_modifier(Modifier::DIM)),
            inner,
        );
        return;
    }

    let columns = (inner.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let total_rows = cards.len().div_ceil(columns);

    let panel = app.panel_mut(tab);
    panel.scroll = panel.scroll.min(total_rows.saturating_sub(visible_rows));
    let scroll = panel.scroll;

    let card_width = CARD_WIDTH.min(inner.width);
    for (i, (name, popularity)) in cards
        .iter()
        .enumerate()
        .skip(scroll * columns)
        .take(visible_rows * columns)
    {
        let row = (i / columns - scroll) as u16;
        let col = (i % columns) as u16;
        let card_area = clip(
            Rect::new(
                inner.x + col * CARD_WIDTH,
                inner.y + row * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT,
            ),
            inner,
        );

        let lines = vec![
            Line::from(Span::styled(
                name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("★ {}", popularity),
                Style::default().fg(app.theme.popularity),
            )),
        ];
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
        frame.render_widget(card, card_area);
    }
}

/// Draw the sort dropdown under its button and register each option.
fn render_dropdown(frame: &mut Frame, app: &mut App, button: Rect, bounds: Rect) {
    let tab = app.current_tab;
    let active = app.grid(tab).sort_mode();

    let height = SortMode::ALL.len() as u16 + 2;
    let menu_area = clip(
        Rect::new(button.x, button.y + 1, DROPDOWN_WIDTH, height),
        bounds,
    );

    let lines: Vec<Line> = SortMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let marker = if *mode == active { "●" } else { "○" };
            let text = format!(" {} {}", marker, mode.label());
            if i == app.dropdown_cursor {
                Line::from(Span::styled(text, app.theme.selected))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    let inner = block.inner(menu_area);

    frame.render_widget(Clear, menu_area);
    frame.render_widget(Paragraph::new(lines).block(block), menu_area);

    app.regions.push(menu_area, Target::SortMenu(tab));
    for (i, mode) in SortMode::ALL.iter().enumerate() {
        let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        app.regions
            .push(clip(row, inner), Target::SortOption(tab, *mode));
    }
}

/// Restrict `area` to lie within `bounds`.
fn clip(area: Rect, bounds: Rect) -> Rect {
    area.intersection(bounds)
}
