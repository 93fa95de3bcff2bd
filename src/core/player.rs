//! Player identification, factions and per-player data storage.
//!
//! ## PlayerId
//!
//! The game is strictly two-seat: `P1` and `P2`. `opponent()` is the only
//! way the engine finds "the other side".
//!
//! ## PlayerPair
//!
//! Fixed two-slot storage indexed by `PlayerId`. Used for pressure entries
//! and player state so lookups never fail.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    /// Both seats in turn order.
    pub const ALL: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// Slot index (0 for P1, 1 for P2).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::P1 => 0,
            PlayerId::P2 => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayerId::P1 => "P1",
            PlayerId::P2 => "P2",
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the conspiracy a player (or card) is on.
///
/// Determines the sign of MEDIA truth shifts and which truth extreme wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Truth,
    Government,
}

impl Faction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Faction::Truth => "truth",
            Faction::Government => "government",
        }
    }

    /// Parse a faction name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "truth" => Some(Faction::Truth),
            "government" => Some(Faction::Government),
            _ => None,
        }
    }

    /// The opposing faction.
    #[must_use]
    pub const fn rival(self) -> Self {
        match self {
            Faction::Truth => Faction::Government,
            Faction::Government => Faction::Truth,
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-player storage with one slot per seat.
///
/// ## Example
///
/// ```
/// use shadow_rules::core::{PlayerId, PlayerPair};
///
/// let mut pressure: PlayerPair<u32> = PlayerPair::default();
/// pressure[PlayerId::P2] += 3;
///
/// assert_eq!(pressure[PlayerId::P1], 0);
/// assert_eq!(pressure[PlayerId::P2], 3);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    #[serde(rename = "P1")]
    p1: T,
    #[serde(rename = "P2")]
    p2: T,
}

impl<T> PlayerPair<T> {
    /// Create a pair from explicit values.
    pub const fn new(p1: T, p2: T) -> Self {
        Self { p1, p2 }
    }

    /// Create a pair from a factory function.
    pub fn from_fn(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            p1: factory(PlayerId::P1),
            p2: factory(PlayerId::P2),
        }
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        [(PlayerId::P1, &self.p1), (PlayerId::P2, &self.p2)].into_iter()
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        match player {
            PlayerId::P1 => &self.p1,
            PlayerId::P2 => &self.p2,
        }
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        match player {
            PlayerId::P1 => &mut self.p1,
            PlayerId::P2 => &mut self.p2,
        }
    }
}
