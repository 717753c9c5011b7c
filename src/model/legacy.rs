//! Marker types from the files written before activities and locations
//! were split out (generations 1 and 2).

use std::fmt;

use serde::Serialize;

use super::ant::AntIdentity;

/// Marker type tag stored in version 2 lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LegacyMarkerType {
    Returning,
    LeavingTunnel,
    LeavingNest,
    Carrying,
    Standing,
    Unknown,
    Tunnel,
    Window,
    /// Clicks from version 1 files, which had no marker type
    Tracking,
    // First-generation tags, superseded before version 2 was finalised
    Unsure,
    Returner,
    Nest,
    Leaving,
}

impl LegacyMarkerType {
    pub const ALL: [Self; 13] = [
        Self::Returning,
        Self::LeavingTunnel,
        Self::LeavingNest,
        Self::Carrying,
        Self::Standing,
        Self::Unknown,
        Self::Tunnel,
        Self::Window,
        Self::Tracking,
        Self::Unsure,
        Self::Returner,
        Self::Nest,
        Self::Leaving,
    ];

    /// Type applied to version 1 lines
    pub const DEFAULT: Self = Self::Tracking;

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Returning => "Returning",
            Self::LeavingTunnel => "LeavingTunnel",
            Self::LeavingNest => "LeavingNest",
            Self::Carrying => "Carrying",
            Self::Standing => "Standing",
            Self::Unknown => "Unknown",
            Self::Tunnel => "Tunnel",
            Self::Window => "Window",
            Self::Tracking => "Tracking",
            Self::Unsure => "Unsure",
            Self::Returner => "Returner",
            Self::Nest => "Nest",
            Self::Leaving => "Leaving",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for LegacyMarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record as stored by generations 1 and 2, before migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegacyRecord {
    pub ant: AntIdentity,
    pub marker_type: LegacyMarkerType,
    pub x: i32,
    pub y: i32,
    pub frame: u32,
}
