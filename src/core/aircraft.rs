//! Aircraft records and priority categories.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::TowerError;

/// Aircraft identifier.
pub type AircraftId = u64;

/// Landing priority class. Ordered so that `A < B < C`; lower lands first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// More than 100 passengers.
    A,
    /// Between 50 and 100 passengers, inclusive.
    B,
    /// Fewer than 50 passengers.
    C,
}

impl Category {
    /// All categories in priority order.
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// Derive the category from a passenger count.
    #[must_use]
    pub const fn from_passengers(passengers: u32) -> Self {
        if passengers > 100 {
            Self::A
        } else if passengers >= 50 {
            Self::B
        } else {
            Self::C
        }
    }

    /// Representative passenger count used when generating aircraft of a fixed category.
    #[must_use]
    pub const fn typical_passengers(self) -> u32 {
        match self {
            Self::A => 120,
            Self::B => 80,
            Self::C => 40,
        }
    }

    /// Single-letter label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            other => Err(TowerError::InvalidCategory(other.to_string())),
        }
    }
}

/// An aircraft that has connected to the tower.
///
/// Immutable once created; ownership moves from the holding queues into the
/// stage processors.
#[derive(Debug, Clone)]
pub struct Aircraft {
    id: AircraftId,
    passengers: u32,
    category: Category,
    connected_at: Instant,
}

impl Aircraft {
    /// Create an aircraft connecting now, deriving its category from `passengers`.
    #[must_use]
    pub fn connect(id: AircraftId, passengers: u32) -> Self {
        Self {
            id,
            passengers,
            category: Category::from_passengers(passengers),
            connected_at: Instant::now(),
        }
    }

    /// Create an aircraft connecting now with the typical load for `category`.
    #[must_use]
    pub fn with_category(id: AircraftId, category: Category) -> Self {
        Self::connect(id, category.typical_passengers())
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> AircraftId {
        self.id
    }

    /// Passenger count.
    #[must_use]
    pub const fn passengers(&self) -> u32 {
        self.passengers
    }

    /// Priority category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Moment the aircraft connected to the tower.
    #[must_use]
    pub const fn connected_at(&self) -> Instant {
        self.connected_at
    }
}
