//! Input adapter: turns terminal events into [`Command`]s.
//!
//! Nothing here changes state directly. Each handler picks commands from
//! the current control state and passes them to [`App::dispatch`].

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::app::{App, Command, ControlKind, Tab};
use crate::data::SortMode;
use crate::ui::Target;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.dispatch(Command::ToggleHelp);
        return;
    }

    for command in key_commands(app, key) {
        app.dispatch(command);
    }
}

/// Commands for a key press given the current control state.
fn key_commands(app: &App, key: KeyEvent) -> Vec<Command> {
    let tab = app.current_tab;

    // A focused search box captures text input
    if let Some(focused) = app.focused_search() {
        return match key.code {
            KeyCode::Enter => vec![Command::BlurSearch],
            KeyCode::Esc => vec![Command::Dismiss],
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                vec![Command::ToggleSearch(focused)]
            }
            KeyCode::Backspace => vec![Command::SearchBackspace],
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                vec![Command::SearchInput(c)]
            }
            _ => Vec::new(),
        };
    }

    if app.open_control().map(|c| c.kind) == Some(ControlKind::SortMenu) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => return vec![Command::MoveDropdownCursor(-1)],
            KeyCode::Down | KeyCode::Char('j') => return vec![Command::MoveDropdownCursor(1)],
            KeyCode::Enter => return vec![Command::ChooseHighlighted],
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') => vec![Command::Quit],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![Command::Quit]
        }

        // Tab switching acts like a tab click: open controls close first
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            vec![Command::Dismiss, Command::NextTab]
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            vec![Command::Dismiss, Command::PrevTab]
        }
        KeyCode::Char('1') => vec![Command::Dismiss, Command::ActivateTab(Tab::Directors)],
        KeyCode::Char('2') => vec![Command::Dismiss, Command::ActivateTab(Tab::Actors)],

        // Sort
        KeyCode::Char('s') => vec![Command::ToggleDropdown(tab)],
        KeyCode::Char('a') => vec![Command::ChooseSort(tab, SortMode::Alphabetical)],
        KeyCode::Char('r') => vec![Command::ChooseSort(tab, SortMode::Reverse)],
        KeyCode::Char('p') => vec![Command::ChooseSort(tab, SortMode::PopularShuffle)],

        // Search: reopen focus on an expanded box, otherwise toggle it
        KeyCode::Char('/') => vec![Command::ToggleSearch(tab)],
        KeyCode::Char('i') | KeyCode::Enter if app.is_search_expanded(tab) => {
            vec![Command::FocusSearch(tab)]
        }

        // Scrolling
        KeyCode::Up | KeyCode::Char('k') => vec![Command::ScrollUp],
        KeyCode::Down | KeyCode::Char('j') => vec![Command::ScrollDown],

        KeyCode::Esc => vec![Command::Dismiss],
        KeyCode::Char('?') => vec![Command::ToggleHelp],
        KeyCode::Char('e') => vec![Command::Export],

        _ => Vec::new(),
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    for command in mouse_commands(app, mouse) {
        app.dispatch(command);
    }
}

/// Commands for a mouse event, resolved against the last render's regions.
fn mouse_commands(app: &App, mouse: MouseEvent) -> Vec<Command> {
    match mouse.kind {
        MouseEventKind::ScrollUp => vec![Command::ScrollUp],
        MouseEventKind::ScrollDown => vec![Command::ScrollDown],

        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                return vec![Command::ToggleHelp];
            }
            let target = app.regions.hit(mouse.column, mouse.row);

            // Anything outside a control counts as an outside click
            let mut commands = Vec::new();
            if !target.is_some_and(|t| t.is_control()) {
                commands.push(Command::Dismiss);
            }
            match target {
                Some(Target::SortButton(tab)) => commands.push(Command::ToggleDropdown(tab)),
                Some(Target::SortOption(tab, mode)) => {
                    commands.push(Command::ChooseSort(tab, mode))
                }
                Some(Target::SortMenu(_)) => {}
                Some(Target::SearchButton(tab)) => commands.push(Command::ToggleSearch(tab)),
                Some(Target::SearchInput(tab)) => commands.push(Command::FocusSearch(tab)),
                Some(Target::Tab(tab)) => commands.push(Command::ActivateTab(tab)),
                None => {}
            }
            commands
        }

        _ => Vec::new(),
    }
}
