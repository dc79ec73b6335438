//! Application state and the command handlers that drive it.
//!
//! The input adapter in [`crate::events`] turns key and mouse events into
//! [`Command`]s; [`App::dispatch`] is the only place state changes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::DEFAULT_FOCUS_DELAY_MS;
use crate::data::{Grid, Roster, SortMode};
use crate::error::Error;
use crate::ui::{HitMap, Theme};

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// A tab, and the grid shown under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Directors,
    Actors,
}

impl Tab {
    /// All tabs in tab-bar order.
    pub const ALL: [Tab; 2] = [Tab::Directors, Tab::Actors];

    /// Cycle to the next tab.
    pub fn next(self) -> Self {
        match self {
            Tab::Directors => Tab::Actors,
            Tab::Actors => Tab::Directors,
        }
    }

    /// Cycle to the previous tab.
    pub fn prev(self) -> Self {
        // Two tabs: previous and next coincide.
        self.next()
    }

    /// Identifier used in config and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Directors => "directors",
            Tab::Actors => "actors",
        }
    }

    /// Returns the display label for this tab.
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Directors => "Directors",
            Tab::Actors => "Actors",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Directors => 0,
            Tab::Actors => 1,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| Error::UnknownTab(s.to_string()))
    }
}

/// The kind of popup control a grid owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// The sort-mode dropdown.
    SortMenu,
    /// The search box.
    SearchBox,
}

/// One open control. Only one exists page-wide at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub tab: Tab,
    pub kind: ControlKind,
}

impl Control {
    pub fn sort_menu(tab: Tab) -> Self {
        Self {
            tab,
            kind: ControlKind::SortMenu,
        }
    }

    pub fn search_box(tab: Tab) -> Self {
        Self {
            tab,
            kind: ControlKind::SearchBox,
        }
    }
}

/// A user intent, produced by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ActivateTab(Tab),
    NextTab,
    PrevTab,
    ToggleDropdown(Tab),
    /// Move the dropdown cursor by one option (negative is up).
    MoveDropdownCursor(i8),
    /// Apply the option under the dropdown cursor.
    ChooseHighlighted,
    ChooseSort(Tab, SortMode),
    ToggleSearch(Tab),
    FocusSearch(Tab),
    BlurSearch,
    SearchInput(char),
    SearchBackspace,
    /// A click (or Esc) outside every control.
    Dismiss,
    ScrollUp,
    ScrollDown,
    ToggleHelp,
    Export,
    Quit,
}

/// Per-grid state: the grid itself plus its scroll position.
#[derive(Debug, Clone)]
pub struct GridPanel {
    pub grid: Grid,
    /// First card row shown. Clamped by the renderer.
    pub scroll: usize,
}

impl GridPanel {
    fn new(grid: Grid) -> Self {
        Self { grid, scroll: 0 }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_tab: Tab,
    pub show_help: bool,

    panels: [GridPanel; 2],

    // Control state
    open: Option<Control>,
    pub dropdown_cursor: usize,
    focus: Option<Tab>,
    pending_focus: Option<(Tab, Instant)>,
    focus_delay: Duration,

    rng: StdRng,

    // UI
    pub theme: Theme,
    /// Clickable regions recorded by the last render.
    pub regions: HitMap,
    pub api_key_origin: Option<&'static str>,
    pub export_path: std::path::PathBuf,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app from a roster. Both grids start alphabetical.
    pub fn new(roster: &Roster) -> Self {
        Self {
            running: true,
            current_tab: Tab::Directors,
            show_help: false,
            panels: [
                GridPanel::new(Grid::new(Roster::cards(&roster.directors))),
                GridPanel::new(Grid::new(Roster::cards(&roster.actors))),
            ],
            open: None,
            dropdown_cursor: SortMode::Alphabetical.index(),
            focus: None,
            pending_focus: None,
            focus_delay: Duration::from_millis(DEFAULT_FOCUS_DELAY_MS),
            rng: StdRng::from_entropy(),
            theme: Theme::dark(),
            regions: HitMap::default(),
            api_key_origin: None,
            export_path: std::path::PathBuf::from("cinegrid_export.json"),
            status_message: None,
        }
    }

    /// Use a fixed seed for `popular-shuffle` tie breaking.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_focus_delay(mut self, delay: Duration) -> Self {
        self.focus_delay = delay;
        self
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.current_tab = tab;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn grid(&self, tab: Tab) -> &Grid {
        &self.panels[tab.index()].grid
    }

    pub fn panel(&self, tab: Tab) -> &GridPanel {
        &self.panels[tab.index()]
    }

    pub fn panel_mut(&mut self, tab: Tab) -> &mut GridPanel {
        &mut self.panels[tab.index()]
    }

    /// The control currently open, if any.
    pub fn open_control(&self) -> Option<Control> {
        self.open
    }

    pub fn is_dropdown_open(&self, tab: Tab) -> bool {
        self.open == Some(Control::sort_menu(tab))
    }

    pub fn is_search_expanded(&self, tab: Tab) -> bool {
        self.open == Some(Control::search_box(tab))
    }

    /// The search box receiving typed characters, if any.
    pub fn focused_search(&self) -> Option<Tab> {
        self.focus
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Handle one command.
    pub fn dispatch(&mut self, command: Command) {
        debug!(?command, "dispatch");
        match command {
            Command::ActivateTab(tab) => self.activate_tab(tab),
            Command::NextTab => self.activate_tab(self.current_tab.next()),
            Command::PrevTab => self.activate_tab(self.current_tab.prev()),
            Command::ToggleDropdown(tab) => self.toggle_dropdown(tab),
            Command::MoveDropdownCursor(delta) => self.move_dropdown_cursor(delta),
            Command::ChooseHighlighted => {
                if let Some(Control {
                    tab,
                    kind: ControlKind::SortMenu,
                }) = self.open
                {
                    self.choose_sort(tab, SortMode::ALL[self.dropdown_cursor]);
                }
            }
            Command::ChooseSort(tab, mode) => self.choose_sort(tab, mode),
            Command::ToggleSearch(tab) => self.toggle_search(tab),
            Command::FocusSearch(tab) => {
                if self.is_search_expanded(tab) {
                    self.focus = Some(tab);
                }
            }
            Command::BlurSearch => self.focus = None,
            Command::SearchInput(c) => self.edit_search(|term| term.push(c)),
            Command::SearchBackspace => self.edit_search(|term| {
                term.pop();
            }),
            Command::Dismiss => self.dismiss(),
            Command::ScrollUp => {
                let panel = self.panel_mut(self.current_tab);
                panel.scroll = panel.scroll.saturating_sub(1);
            }
            Command::ScrollDown => {
                let panel = self.panel_mut(self.current_tab);
                panel.scroll += 1;
            }
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::Export => {
                let path = self.export_path.clone();
                match self.export_state(&path) {
                    Ok(()) => self.set_status_message(format!("Exported to {}", path.display())),
                    Err(e) => self.set_status_message(format!("Export failed: {}", e)),
                }
            }
            Command::Quit => self.running = false,
        }
    }

    /// Show `tab`'s grid and hide the other.
    pub fn activate_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        if self.focus.is_some_and(|f| f != tab) {
            self.focus = None;
        }
    }

    /// Open `tab`'s sort dropdown, or close it if it is already open.
    pub fn toggle_dropdown(&mut self, tab: Tab) {
        if self.is_dropdown_open(tab) {
            self.open = None;
            return;
        }
        self.close_all_controls();
        self.open = Some(Control::sort_menu(tab));
        self.dropdown_cursor = self.grid(tab).sort_mode().index();
    }

    fn move_dropdown_cursor(&mut self, delta: i8) {
        let len = SortMode::ALL.len() as isize;
        let next = (self.dropdown_cursor as isize + delta as isize).rem_euclid(len);
        self.dropdown_cursor = next as usize;
    }

    /// Apply `mode` to `tab`'s grid and close its dropdown.
    pub fn choose_sort(&mut self, tab: Tab, mode: SortMode) {
        let panel = &mut self.panels[tab.index()];
        panel.grid.sort(mode, &mut self.rng);
        panel.scroll = 0;
        if self.is_dropdown_open(tab) {
            self.open = None;
        }
        debug!(tab = tab.id(), mode = mode.id(), "grid sorted");
    }

    /// Expand `tab`'s search box, or collapse it and clear its filter.
    ///
    /// Expanding schedules a focus request after the focus delay; see
    /// [`App::tick`].
    pub fn toggle_search(&mut self, tab: Tab) {
        if self.is_search_expanded(tab) {
            self.open = None;
            self.focus = None;
            let panel = self.panel_mut(tab);
            panel.grid.clear_filter();
            panel.scroll = 0;
            return;
        }
        self.close_all_controls();
        self.open = Some(Control::search_box(tab));
        self.pending_focus = Some((tab, Instant::now() + self.focus_delay));
    }

    /// Close every control. Search boxes that are empty get their filter
    /// reset; a non-empty one keeps its text and filter.
    pub fn dismiss(&mut self) {
        for panel in &mut self.panels {
            if panel.grid.search_term().is_empty() {
                panel.grid.clear_filter();
            }
        }
        self.close_all_controls();
    }

    /// Fire a due focus request. Called by the event loop every iteration.
    pub fn tick(&mut self, now: Instant) {
        let Some((tab, due)) = self.pending_focus else {
            return;
        };
        if now < due {
            return;
        }
        self.pending_focus = None;
        if self.is_search_expanded(tab) {
            self.focus = Some(tab);
        }
    }

    fn close_all_controls(&mut self) {
        self.open = None;
        self.focus = None;
    }

    fn edit_search(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(tab) = self.focus else {
            return;
        };
        let panel = self.panel_mut(tab);
        let mut term = panel.grid.search_term().to_string();
        edit(&mut term);
        panel.grid.filter(&term);
        panel.scroll = 0;
    }

    /// Current state of both grids as JSON: sort mode, search term and
    /// visible cards in displayed order.
    pub fn snapshot(&self) -> serde_json::Value {
        let mut export = serde_json::Map::new();
        for tab in Tab::ALL {
            let grid = self.grid(tab);
            let cards: Vec<serde_json::Value> = grid
                .visible_cards()
                .map(|c| {
                    serde_json::json!({
                        "name": c.name,
                        "popularity": c.popularity,
                    })
                })
                .collect();
            export.insert(
                tab.id().to_string(),
                serde_json::json!({
                    "sort": grid.sort_mode(),
                    "search": grid.search_term(),
                    "total": grid.len(),
                    "cards": cards,
                }),
            );
        }
        serde_json::Value::Object(export)
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> anyhow::Result<()> {
        use std::io::Write;

        let json = serde_json::to_string_pretty(&self.snapshot())?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
