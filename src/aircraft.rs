use crate::order::Seat;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type AircraftId = Arc<str>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AircraftSize {
    Small,
    Large,
}

impl AircraftSize {
    /// Minimum cockpit complement for this size class.
    pub fn required_pilots(self) -> usize {
        match self {
            AircraftSize::Small => 2,
            AircraftSize::Large => 3,
        }
    }

    /// Minimum cabin complement for this size class.
    pub fn required_attendants(self) -> usize {
        match self {
            AircraftSize::Small => 3,
            AircraftSize::Large => 6,
        }
    }
}

impl fmt::Display for AircraftSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftSize::Small => write!(f, "Small"),
            AircraftSize::Large => write!(f, "Large"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CabinClass {
    Economy,
    Business,
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CabinClass::Economy => write!(f, "Economy"),
            CabinClass::Business => write!(f, "Business"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CabinLayout {
    pub class: CabinClass,
    pub rows: u32,
    pub cols: u32,
}

impl CabinLayout {
    pub fn seats(&self) -> u32 {
        self.rows * self.cols
    }

    /// Seats are numbered from 1 in both dimensions.
    pub fn contains(&self, seat: Seat) -> bool {
        (1..=self.rows).contains(&seat.row) && (1..=self.cols).contains(&seat.col)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: AircraftId,
    pub manufacturer: String,
    pub purchase_date: NaiveDate,
    pub size: AircraftSize,
    pub layouts: Vec<CabinLayout>,
}

impl Aircraft {
    pub fn capacity(&self) -> u32 {
        self.layouts.iter().map(CabinLayout::seats).sum()
    }

    pub fn layout(&self, class: CabinClass) -> Option<&CabinLayout> {
        self.layouts.iter().find(|l| l.class == class)
    }
}
