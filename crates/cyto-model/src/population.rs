//! Immune cell populations measured per sample.
//!
//! The five populations have a fixed order that every summary follows:
//! b_cell, cd8_t_cell, cd4_t_cell, nk_cell, monocyte. The same names are
//! used as CSV headers, store columns and report labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A measured immune cell population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    BCell,
    Cd8TCell,
    Cd4TCell,
    NkCell,
    Monocyte,
}

impl Population {
    /// All populations in reporting order.
    pub const ALL: [Population; 5] = [
        Population::BCell,
        Population::Cd8TCell,
        Population::Cd4TCell,
        Population::NkCell,
        Population::Monocyte,
    ];

    /// Column name used in the source file and the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Population::BCell => "b_cell",
            Population::Cd8TCell => "cd8_t_cell",
            Population::Cd4TCell => "cd4_t_cell",
            Population::NkCell => "nk_cell",
            Population::Monocyte => "monocyte",
        }
    }

    /// Position in [`Population::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Population::BCell => 0,
            Population::Cd8TCell => 1,
            Population::Cd4TCell => 2,
            Population::NkCell => 3,
            Population::Monocyte => 4,
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw counts for the five populations of one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub b_cell: u32,
    pub cd8_t_cell: u32,
    pub cd4_t_cell: u32,
    pub nk_cell: u32,
    pub monocyte: u32,
}

impl PopulationCounts {
    pub fn new(b_cell: u32, cd8_t_cell: u32, cd4_t_cell: u32, nk_cell: u32, monocyte: u32) -> Self {
        Self {
            b_cell,
            cd8_t_cell,
            cd4_t_cell,
            nk_cell,
            monocyte,
        }
    }

    pub fn get(&self, population: Population) -> u32 {
        match population {
            Population::BCell => self.b_cell,
            Population::Cd8TCell => self.cd8_t_cell,
            Population::Cd4TCell => self.cd4_t_cell,
            Population::NkCell => self.nk_cell,
            Population::Monocyte => self.monocyte,
        }
    }

    pub fn set(&mut self, population: Population, count: u32) {
        match population {
            Population::BCell => self.b_cell = count,
            Population::Cd8TCell => self.cd8_t_cell = count,
            Population::Cd4TCell => self.cd4_t_cell = count,
            Population::NkCell => self.nk_cell = count,
            Population::Monocyte => self.monocyte = count,
        }
    }

    /// Sum of all five counts. Widened so large counts cannot overflow.
    pub fn total(&self) -> u64 {
        Population::ALL
            .iter()
            .map(|population| u64::from(self.get(*population)))
            .sum()
    }

    /// Iterate `(population, count)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Population, u32)> + '_ {
        Population::ALL
            .into_iter()
            .map(move |population| (population, self.get(population)))
    }
}
