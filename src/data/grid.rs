//! Grid model: ordered cards, sort modes, and the search filter.
//!
//! A [`Grid`] is the source of truth for display order and visibility.
//! The UI only reads it; nothing here knows about the terminal.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::card::Card;
use crate::error::Error;

/// Ordering rule applied to a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// A to Z by name.
    #[default]
    Alphabetical,
    /// Z to A by name.
    Reverse,
    /// Most popular first, equal popularity in random order.
    PopularShuffle,
}

impl SortMode {
    /// All modes in dropdown order.
    pub const ALL: [SortMode; 3] = [
        SortMode::Alphabetical,
        SortMode::Reverse,
        SortMode::PopularShuffle,
    ];

    /// Identifier used in config, export files and the CLI.
    pub fn id(&self) -> &'static str {
        match self {
            SortMode::Alphabetical => "alphabetical",
            SortMode::Reverse => "reverse",
            SortMode::PopularShuffle => "popular-shuffle",
        }
    }

    /// Returns the display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Alphabetical => "A-Z",
            SortMode::Reverse => "Z-A",
            SortMode::PopularShuffle => "Popular",
        }
    }

    /// Position of this mode in [`SortMode::ALL`].
    pub fn index(&self) -> usize {
        match self {
            SortMode::Alphabetical => 0,
            SortMode::Reverse => 1,
            SortMode::PopularShuffle => 2,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| Error::UnknownSortMode(s.to_string()))
    }
}

/// Locale-style name comparison.
///
/// Base letters decide first, ignoring accents and case, so `Éric` sorts
/// with the `e`s. Accents break ties, then case.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Canonical decomposition with combining marks dropped, lowercased.
fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case-insensitive substring match. An empty term matches everything.
pub fn matches_term(name: &str, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Descending popularity; unknown popularity sorts last.
fn by_popularity_desc(a: &Card, b: &Card) -> Ordering {
    match (a.popularity, b.popularity) {
        (Some(pa), Some(pb)) => pb.total_cmp(&pa),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A card together with its current visibility.
#[derive(Debug, Clone)]
pub struct Slot {
    pub card: Card,
    pub visible: bool,
}

/// An ordered collection of cards for one category.
///
/// Membership is fixed at construction; sorting reorders and filtering
/// toggles visibility, nothing else.
#[derive(Debug, Clone)]
pub struct Grid {
    slots: Vec<Slot>,
    sort_mode: SortMode,
    search_term: String,
}

impl Grid {
    /// Create a grid sorted alphabetically with every card visible.
    pub fn new(cards: Vec<Card>) -> Self {
        let mut grid = Self {
            slots: cards
                .into_iter()
                .map(|card| Slot {
                    card,
                    visible: true,
                })
                .collect(),
            sort_mode: SortMode::Alphabetical,
            search_term: String::new(),
        };
        grid.sort_by_name(false);
        grid
    }

    /// The active sort mode.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// The current search text.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Total number of cards, visible or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All cards in display order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Visible cards in display order.
    pub fn visible_cards(&self) -> impl Iterator<Item = &Card> {
        self.slots.iter().filter(|s| s.visible).map(|s| &s.card)
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|s| s.visible).count()
    }

    /// Reorder the grid by `mode` and remember it as the active mode.
    ///
    /// `PopularShuffle` draws a fresh tie order from `rng` on every call.
    pub fn sort<R: Rng + ?Sized>(&mut self, mode: SortMode, rng: &mut R) {
        match mode {
            SortMode::Alphabetical => self.sort_by_name(false),
            SortMode::Reverse => self.sort_by_name(true),
            SortMode::PopularShuffle => {
                self.slots.shuffle(rng);
                self.slots.sort_by(|a, b| by_popularity_desc(&a.card, &b.card));
            }
        }
        self.sort_mode = mode;
    }

    fn sort_by_name(&mut self, descending: bool) {
        if descending {
            self.slots.sort_by(|a, b| collate(&b.card.name, &a.card.name));
        } else {
            self.slots.sort_by(|a, b| collate(&a.card.name, &b.card.name));
        }
    }

    /// Set the search text and recompute visibility. Order is untouched.
    pub fn filter(&mut self, term: &str) {
        self.search_term = term.to_string();
        for slot in &mut self.slots {
            slot.visible = matches_term(&slot.card.name, term);
        }
    }

    /// Clear the search text and show every card.
    pub fn clear_filter(&mut self) {
        self.filter("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_grid() -> Grid {
        Grid::new(vec![
            Card::new(0, "Bong", Some(80.0)),
            Card::new(1, "Anderson", Some(95.0)),
            Card::new(2, "Chazelle", Some(80.0)),
        ])
    }

    fn names(grid: &Grid) -> Vec<&str> {
        grid.slots().iter().map(|s| s.card.name.as_str()).collect()
    }

    fn visible_names(grid: &Grid) -> Vec<&str> {
        grid.visible_cards().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_new_grid_is_alphabetical() {
        let grid = sample_grid();
        assert_eq!(grid.sort_mode(), SortMode::Alphabetical);
        assert_eq!(names(&grid), ["Anderson", "Bong", "Chazelle"]);
    }

    #[test]
    fn test_sort_reverse() {
        let mut grid = sample_grid();
        let mut rng = StdRng::seed_from_u64(7);
        grid.sort(SortMode::Reverse, &mut rng);
        assert_eq!(names(&grid), ["Chazelle", "Bong", "Anderson"]);
        assert_eq!(grid.sort_mode(), SortMode::Reverse);
    }

    #[test]
    fn test_reverse_is_mirror_of_alphabetical() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = Grid::new(vec![
            Card::new(0, "Villeneuve", Some(1.0)),
            Card::new(1, "kurosawa", Some(2.0)),
            Card::new(2, "Agnès Varda", Some(3.0)),
            Card::new(3, "Lynch", Some(4.0)),
        ]);
        let mut alphabetical: Vec<String> = names(&grid).iter().map(|s| s.to_string()).collect();
        grid.sort(SortMode::Reverse, &mut rng);
        alphabetical.reverse();
        assert_eq!(names(&grid), alphabetical);
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        let grid = Grid::new(vec![
            Card::new(0, "lynch", None),
            Card::new(1, "Kubrick", None),
            Card::new(2, "anderson", None),
        ]);
        assert_eq!(names(&grid), ["anderson", "Kubrick", "lynch"]);
    }

    #[test]
    fn test_alphabetical_places_accented_initials_by_base_letter() {
        let grid = Grid::new(vec![
            Card::new(0, "Zhang Yimou", None),
            Card::new(1, "Éric Rohmer", None),
            Card::new(2, "Bong", None),
        ]);
        assert_eq!(names(&grid), ["Bong", "Éric Rohmer", "Zhang Yimou"]);

        let mut grid = grid;
        let mut rng = StdRng::seed_from_u64(5);
        grid.sort(SortMode::Reverse, &mut rng);
        assert_eq!(names(&grid), ["Zhang Yimou", "Éric Rohmer", "Bong"]);
    }

    #[test]
    fn test_collate_accent_only_breaks_ties() {
        assert_eq!(collate("Eric", "Éric"), Ordering::Less);
        assert_eq!(collate("Élodie", "Eric"), Ordering::Less);
        assert_eq!(collate("agnès", "Agnès"), Ordering::Greater);
    }

    #[test]
    fn test_popular_shuffle_orders_by_popularity() {
        let mut grid = sample_grid();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            grid.sort(SortMode::PopularShuffle, &mut rng);
            let order = names(&grid);
            assert_eq!(order[0], "Anderson");
            assert!(order[1..].contains(&"Bong"));
            assert!(order[1..].contains(&"Chazelle"));
        }
    }

    #[test]
    fn test_popular_shuffle_varies_tie_order() {
        let cards: Vec<Card> = (0..8)
            .map(|i| Card::new(i, format!("Tied {}", i), Some(50.0)))
            .collect();
        let mut grid = Grid::new(cards);
        let mut rng = StdRng::seed_from_u64(42);

        let mut orders = std::collections::HashSet::new();
        for _ in 0..10 {
            grid.sort(SortMode::PopularShuffle, &mut rng);
            let ids: Vec<usize> = grid.slots().iter().map(|s| s.card.id).collect();
            orders.insert(ids);
        }
        assert!(orders.len() > 1);
    }

    #[test]
    fn test_popular_shuffle_puts_unknown_last() {
        let mut grid = Grid::new(vec![
            Card::new(0, "Unknown", None),
            Card::new(1, "Low", Some(1.0)),
            Card::new(2, "High", Some(99.0)),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        grid.sort(SortMode::PopularShuffle, &mut rng);
        assert_eq!(names(&grid), ["High", "Low", "Unknown"]);
    }

    #[test]
    fn test_sort_preserves_membership() {
        let mut grid = sample_grid();
        let mut rng = StdRng::seed_from_u64(9);
        for mode in SortMode::ALL {
            grid.sort(mode, &mut rng);
            let mut ids: Vec<usize> = grid.slots().iter().map(|s| s.card.id).collect();
            ids.sort_unstable();
            assert_eq!(ids, [0, 1, 2]);
        }
    }

    #[test]
    fn test_filter_substring_case_insensitive() {
        let mut grid = sample_grid();
        grid.filter("and");
        assert_eq!(visible_names(&grid), ["Anderson"]);

        grid.filter("ON");
        assert_eq!(visible_names(&grid), ["Anderson", "Bong"]);
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let mut grid = sample_grid();
        grid.filter("zzz");
        assert_eq!(grid.visible_count(), 0);

        grid.filter("");
        assert_eq!(grid.visible_count(), 3);
    }

    #[test]
    fn test_filter_keeps_order_and_survives_sort() {
        let mut grid = sample_grid();
        let mut rng = StdRng::seed_from_u64(0);
        grid.filter("n");
        grid.sort(SortMode::Reverse, &mut rng);
        assert_eq!(visible_names(&grid), ["Bong", "Anderson"]);
        assert_eq!(names(&grid), ["Chazelle", "Bong", "Anderson"]);
    }

    #[test]
    fn test_sort_mode_ids_round_trip() {
        for mode in SortMode::ALL {
            assert_eq!(mode.id().parse::<SortMode>().unwrap(), mode);
        }
        assert!("shuffle".parse::<SortMode>().is_err());
    }
}
