//! Data models for card grids.
//!
//! ## Submodules
//!
//! - [`card`]: [`Card`] and the [`Roster`] file cards are loaded from
//! - [`grid`]: [`Grid`] ordering and visibility, [`SortMode`], name collation
//!
//! ## Data Flow
//!
//! ```text
//! roster.json
//!        │
//!        ▼
//! Roster::load()
//!        │
//!        ▼
//! Roster::cards() ──▶ Grid::new() (alphabetical, all visible)
//!                        │
//!                        ├──▶ Grid::sort()   (reorder)
//!                        └──▶ Grid::filter() (visibility)
//! ```

pub mod card;
pub mod grid;

pub use card::{Card, CardRecord, Roster};
pub use grid::{collate, matches_term, Grid, Slot, SortMode};
