//! Common UI components shared across tabs.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::regions::Target;
use crate::app::{App, ControlKind, Tab};

/// Render the header bar with card counts and API key status.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " CINEGRID ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
    ];

    for tab in Tab::ALL {
        let grid = app.grid(tab);
        spans.push(Span::styled(
            format!("{}", grid.visible_count()),
            Style::default().fg(app.theme.highlight),
        ));
        spans.push(Span::raw(format!("/{} {} │ ", grid.len(), tab.id())));
    }

    spans.push(match app.api_key_origin {
        Some(origin) => Span::raw(format!("API key: {}", origin)),
        None => Span::styled(
            "API key: not configured",
            Style::default().add_modifier(Modifier::DIM),
        ),
    });

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar and register each tab as a click target.
///
/// Highlights the currently active tab.
pub fn render_tabs(frame: &mut Frame, app: &mut App, area: Rect) {
    let labels: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{}:{}", i + 1, tab.label()))
        .collect();

    // Tabs pads each title with one space on both sides and separates
    // titles with a one-cell divider.
    let mut x = area.x;
    for (tab, label) in Tab::ALL.iter().zip(&labels) {
        let width = label.chars().count() as u16 + 2;
        let clipped = width.min(area.right().saturating_sub(x));
        app.regions.push(Rect::new(x, area.y, clipped, 1), Target::Tab(*tab));
        x = x.saturating_add(width + 1);
    }

    let tabs = Tabs::new(labels)
        .select(app.current_tab.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows context-sensitive controls, or a temporary status message.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.open_control().map(|c| c.kind) {
        Some(ControlKind::SortMenu) => "↑↓:choose Enter:apply s:close Esc:dismiss",
        Some(ControlKind::SearchBox) if app.focused_search().is_some() => {
            "Type to search | Enter:done Esc:dismiss /:close"
        }
        Some(ControlKind::SearchBox) => "/:close Esc:dismiss",
        None => "Tab:switch s:sort /:search ↑↓:scroll e:export ?:help q:quit",
    };

    let grid = app.grid(app.current_tab);
    let status = format!(
        " {} | sort: {} | {}",
        app.current_tab.label(),
        grid.sort_mode().label(),
        controls
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current tab.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab ←/→     Switch tabs"),
        Line::from("  1/2         Directors / Actors"),
        Line::from("  ↑/↓ j/k     Scroll cards"),
        Line::from("  Esc         Close open controls"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Sort & Search",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s         Open/close sort menu"),
        Line::from("  a r p     A-Z, Z-A, Popular"),
        Line::from("  /         Open/close search"),
        Line::from("  Enter     Apply / finish typing"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 23u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
