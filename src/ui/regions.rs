//! Clickable regions recorded during rendering.
//!
//! The renderer registers every interactive area it draws; the mouse
//! handler asks [`HitMap::hit`] what lies under a click.

use ratatui::layout::{Position, Rect};

use crate::app::Tab;
use crate::data::SortMode;

/// Something the user can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A tab in the tab bar.
    Tab(Tab),
    /// The button that opens a grid's sort dropdown.
    SortButton(Tab),
    /// One option inside an open dropdown.
    SortOption(Tab, SortMode),
    /// The open dropdown's frame, outside any option.
    SortMenu(Tab),
    /// The button that expands a grid's search box.
    SearchButton(Tab),
    /// An expanded search box's input field.
    SearchInput(Tab),
}

impl Target {
    /// Whether the target belongs to a sort or search control. Clicks on
    /// anything else dismiss open controls.
    pub fn is_control(&self) -> bool {
        !matches!(self, Target::Tab(_))
    }
}

/// Regions registered by the last render, topmost last.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, target: Target) {
        self.regions.push((area, target));
    }

    /// The topmost target containing the cell, if any.
    pub fn hit(&self, column: u16, row: u16) -> Option<Target> {
        let position = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| *target)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_finds_region() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 0, 10, 1), Target::Tab(Tab::Directors));
        map.push(Rect::new(10, 0, 10, 1), Target::Tab(Tab::Actors));

        assert_eq!(map.hit(3, 0), Some(Target::Tab(Tab::Directors)));
        assert_eq!(map.hit(12, 0), Some(Target::Tab(Tab::Actors)));
        assert_eq!(map.hit(25, 0), None);
        assert_eq!(map.hit(3, 1), None);
    }

    #[test]
    fn test_topmost_region_wins() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 0, 20, 10), Target::SortMenu(Tab::Actors));
        map.push(
            Rect::new(1, 1, 18, 1),
            Target::SortOption(Tab::Actors, SortMode::Reverse),
        );

        assert_eq!(
            map.hit(5, 1),
            Some(Target::SortOption(Tab::Actors, SortMode::Reverse))
        );
        assert_eq!(map.hit(5, 5), Some(Target::SortMenu(Tab::Actors)));
    }

    #[test]
    fn test_tabs_are_not_controls() {
        assert!(!Target::Tab(Tab::Actors).is_control());
        assert!(Target::SearchInput(Tab::Actors).is_control());
        assert!(Target::SortButton(Tab::Directors).is_control());
    }
}
