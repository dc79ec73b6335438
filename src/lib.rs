// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # cinegrid
//!
//! A terminal browser for two card grids, directors and actors, with tab
//! switching, sorting, and text-filter search.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │ events  │───▶│   app    │───▶│   ui    │───▶│ Terminal│ │
//! │  │(adapter)│    │(commands)│    │(render) │    │         │ │
//! │  └─────────┘    └────┬─────┘    └─────────┘    └─────────┘ │
//! │       ▲              │                │                     │
//! │       │              ▼                │                     │
//! │       │         ┌─────────┐           │                     │
//! │       │         │  data   │           │                     │
//! │       │         │ (grids) │           │                     │
//! │       │         └─────────┘           │                     │
//! │       └────────── HitMap ◀────────────┘                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: the controller. One [`Grid`] per tab, the page-wide open
//!   control, search focus, and [`App::dispatch`] handling every [`Command`]
//! - **[`events`]**: translates key and mouse events into commands
//! - **[`data`]**: cards, the roster file, sort modes and the search filter
//! - **[`ui`]**: ratatui rendering; records click targets for the adapter
//! - **[`config`]**: layered [`Settings`] and the API key cascade
//!
//! ## Usage
//!
//! ```bash
//! # Browse a roster file
//! cinegrid --roster roster.json
//!
//! # Start on the actors tab and write the sorted grids to JSON
//! cinegrid --roster roster.json --tab actors --export grids.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use cinegrid::{App, Command, Roster, SortMode, Tab};
//!
//! let roster = Roster::parse(r#"{
//!     "directors": [
//!         { "name": "Bong", "popularity": 80 },
//!         { "name": "Anderson", "popularity": 95 }
//!     ]
//! }"#).unwrap();
//!
//! let mut app = App::new(&roster);
//! app.dispatch(Command::ChooseSort(Tab::Directors, SortMode::PopularShuffle));
//!
//! let first = app.grid(Tab::Directors).visible_cards().next().unwrap();
//! assert_eq!(first.name, "Anderson");
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Command, Control, ControlKind, Tab};
pub use crate::config::{ApiKey, ApiKeyResolver, KeyOrigin, Overrides, Settings};
pub use data::{Card, Grid, Roster, SortMode};
pub use error::{Error, Result};
