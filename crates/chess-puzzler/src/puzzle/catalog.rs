/// Puzzle catalog: loading, lookup and filtering

use std::path::Path;

use tracing::info;

use super::{Difficulty, Puzzle};
use crate::error::PuzzleError;

const BUILTIN_PUZZLES: &str = include_str!("../../data/puzzles.json");

/// Filter criteria; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    /// Matches when the puzzle carries any of these themes
    pub themes: Vec<String>,
    /// Inclusive rating range
    pub rating_range: Option<(u32, u32)>,
}

impl PuzzleFilter {
    pub fn matches(&self, puzzle: &Puzzle) -> bool {
        if let Some(d) = self.difficulty {
            if puzzle.difficulty != d {
                return false;
            }
        }
        if let Some(c) = &self.category {
            if !puzzle.category.eq_ignore_ascii_case(c) {
                return false;
            }
        }
        if !self.themes.is_empty() && !self.themes.iter().any(|t| puzzle.has_theme(t)) {
            return false;
        }
        if let Some((min, max)) = self.rating_range {
            if puzzle.rating < min || puzzle.rating > max {
                return false;
            }
        }
        true
    }
}

/// A validated, read-only set of puzzles
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    puzzles: Vec<Puzzle>,
}

impl Catalog {
    /// Build a catalog, replaying every solution. Fails on the first bad record.
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, PuzzleError> {
        for puzzle in &puzzles {
            puzzle.validate()?;
        }
        Ok(Self { puzzles })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PuzzleError> {
        let puzzles: Vec<Puzzle> = serde_json::from_str(json)?;
        Self::new(puzzles)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} puzzles from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// The puzzle set shipped with the crate
    pub fn builtin() -> Result<Self, PuzzleError> {
        Self::from_json_str(BUILTIN_PUZZLES)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| p.id == id)
    }

    pub fn filter(&self, filter: &PuzzleFilter) -> Vec<&Puzzle> {
        self.puzzles.iter().filter(|p| filter.matches(p)).collect()
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&Puzzle> {
        self.filter(&PuzzleFilter {
            difficulty: Some(difficulty),
            ..Default::default()
        })
    }

    pub fn by_category(&self, category: &str) -> Vec<&Puzzle> {
        self.filter(&PuzzleFilter {
            category: Some(category.to_string()),
            ..Default::default()
        })
    }

    pub fn by_theme(&self, theme: &str) -> Vec<&Puzzle> {
        self.filter(&PuzzleFilter {
            themes: vec![theme.to_string()],
            ..Default::default()
        })
    }

    pub fn by_rating_range(&self, min: u32, max: u32) -> Vec<&Puzzle> {
        self.filter(&PuzzleFilter {
            rating_range: Some((min, max)),
            ..Default::default()
        })
    }
}
