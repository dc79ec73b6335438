//! Terminal UI rendering using ratatui.
//!
//! The render step reads [`App`](crate::app::App) state and draws it. It
//! never changes grid order or visibility; the only state it writes is the
//! [`HitMap`] of clickable regions and the clamped scroll offset.
//!
//! ## Submodules
//!
//! - [`grid`]: Toolbar, card grid and sort dropdown for the active tab
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`regions`]: Click targets recorded while drawing
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │ Toolbar  [Sort ▾] [/ Search] [____]  │
//! │ Cards    ┌────┐ ┌────┐ ┌────┐        │
//! │ (grid::render)                       │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - sort dropdown (grid::render)
//!    - common::render_help
//! ```

pub mod common;
pub mod grid;
pub mod regions;
pub mod theme;

pub use regions::{HitMap, Target};
pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 50;
pub const MIN_HEIGHT: u16 = 10;

/// Draw one frame and rebuild the click map.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.regions.clear();

    // Check for minimum terminal size
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
            .intersection(area);
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(5),    // Toolbar + cards
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);
    grid::render(frame, app, chunks[2]);
    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Command, Tab};
    use crate::data::{Roster, SortMode};
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_app() -> App {
        let roster = Roster::parse(
            r#"{
                "directors": [
                    { "name": "Bong", "popularity": 80 },
                    { "name": "Anderson", "popularity": 95 }
                ],
                "actors": [{ "name": "Swinton", "popularity": 70 }]
            }"#,
        )
        .unwrap();
        App::new(&roster)
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draw_shows_active_grid() {
        let mut app = sample_app();
        let screen = render(&mut app);
        assert!(screen.contains("Anderson"));
        assert!(screen.contains("Bong"));
        assert!(!screen.contains("Swinton"));
    }

    #[test]
    fn test_draw_registers_controls() {
        let mut app = sample_app();
        render(&mut app);
        let targets: Vec<Target> = (0..80)
            .flat_map(|x| (0..24).map(move |y| (x, y)))
            .filter_map(|(x, y)| app.regions.hit(x, y))
            .collect();
        assert!(targets.contains(&Target::Tab(Tab::Actors)));
        assert!(targets.contains(&Target::SortButton(Tab::Directors)));
        assert!(targets.contains(&Target::SearchButton(Tab::Directors)));
        assert!(!targets.contains(&Target::SearchInput(Tab::Directors)));
    }

    #[test]
    fn test_open_dropdown_registers_options() {
        let mut app = sample_app();
        app.dispatch(Command::ToggleDropdown(Tab::Directors));
        let screen = render(&mut app);
        assert!(screen.contains("Popular"));

        let reverse = Target::SortOption(Tab::Directors, SortMode::Reverse);
        let found = (0..80)
            .flat_map(|x| (0..24).map(move |y| (x, y)))
            .any(|(x, y)| app.regions.hit(x, y) == Some(reverse));
        assert!(found);
    }

    #[test]
    fn test_small_terminal_clears_regions() {
        let mut app = sample_app();
        render(&mut app);
        assert!(!app.regions.is_empty());

        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        assert!(app.regions.is_empty());
    }
}
