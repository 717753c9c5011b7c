//! Marker records: what an annotator recorded about one ant on one frame

use std::fmt;

use serde::{Deserialize, Serialize};

/// Activity that an ant can be performing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Activity {
    StandingStill,
    Walking,
    CarryingUnknown,
    CarryingFood,
    CarryingDirt,
    #[default]
    Unknown,
}

impl Activity {
    pub const ALL: [Self; 6] = [
        Self::StandingStill,
        Self::Walking,
        Self::CarryingUnknown,
        Self::CarryingFood,
        Self::CarryingDirt,
        Self::Unknown,
    ];

    /// Canonical identifier, as written to files
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::StandingStill => "StandingStill",
            Self::Walking => "Walking",
            Self::CarryingUnknown => "CarryingUnknown",
            Self::CarryingFood => "CarryingFood",
            Self::CarryingDirt => "CarryingDirt",
            Self::Unknown => "Unknown",
        }
    }

    /// Look up an activity by file token.
    ///
    /// Older version 3 files spell `CarryingUnknown` as `CarryingUnkown`; that
    /// spelling is still accepted but never written.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|activity| activity.name() == name)
            .or(match name {
                "CarryingUnkown" => Some(Self::CarryingUnknown),
                _ => None,
            })
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an ant was seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    EntranceChamber,
    Edge,
    LeavingNest,
    ReturningToNest,
    Ascending,
    Descending,
    AtTunnel,
    AtExit,
    Outside,
    #[default]
    Unknown,
}

impl Location {
    pub const ALL: [Self; 10] = [
        Self::EntranceChamber,
        Self::Edge,
        Self::LeavingNest,
        Self::ReturningToNest,
        Self::Ascending,
        Self::Descending,
        Self::AtTunnel,
        Self::AtExit,
        Self::Outside,
        Self::Unknown,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::EntranceChamber => "EntranceChamber",
            Self::Edge => "Edge",
            Self::LeavingNest => "LeavingNest",
            Self::ReturningToNest => "ReturningToNest",
            Self::Ascending => "Ascending",
            Self::Descending => "Descending",
            Self::AtTunnel => "AtTunnel",
            Self::AtExit => "AtExit",
            Self::Outside => "Outside",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|location| location.name() == name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which ant took part in an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Focal ant started the interaction, met ant did not participate
    Performed,
    /// Met ant started the interaction, focal ant did not participate
    Received,
    /// Both ants participated
    TwoWay,
    #[default]
    Unknown,
}

impl InteractionKind {
    pub const ALL: [Self; 4] = [Self::Performed, Self::Received, Self::TwoWay, Self::Unknown];

    /// File token. Always the identifier, never the display label.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Performed => "Performed",
            Self::Received => "Received",
            Self::TwoWay => "TwoWay",
            Self::Unknown => "Unknown",
        }
    }

    /// Short label shown to annotators
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TwoWay => "2-Way",
            other => other.name(),
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Details carried only by interaction markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub met_activity: Activity,
    pub met_location: Location,
    /// Id of the ant that was met. Files that predate this column load as 0.
    pub met_id: u32,
}

impl Interaction {
    #[must_use]
    pub fn new(kind: InteractionKind, met_activity: Activity, met_location: Location) -> Self {
        Self {
            kind,
            met_activity,
            met_location,
            met_id: 0,
        }
    }

    #[must_use]
    pub fn with_met_id(mut self, met_id: u32) -> Self {
        self.met_id = met_id;
        self
    }
}

/// Simple or interaction marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Simple,
    Interaction,
}

/// One annotation placed on a frame.
///
/// `frame` always mirrors the frame list that owns the record; the store
/// re-stamps it on every insertion, so values set by callers are not trusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub frame: u32,
    /// Image-pixel coordinates
    pub x: i32,
    pub y: i32,
    /// Id of the focal ant
    pub subject_id: u32,
    pub subject_activity: Activity,
    pub subject_location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
}

impl MarkerRecord {
    /// Create a simple marker at a position
    #[must_use]
    pub fn simple(x: i32, y: i32, activity: Activity, location: Location) -> Self {
        Self {
            frame: 0,
            x,
            y,
            subject_id: 0,
            subject_activity: activity,
            subject_location: location,
            interaction: None,
        }
    }

    /// Create an interaction marker at a position
    #[must_use]
    pub fn interaction(
        x: i32,
        y: i32,
        activity: Activity,
        location: Location,
        interaction: Interaction,
    ) -> Self {
        Self {
            interaction: Some(interaction),
            ..Self::simple(x, y, activity, location)
        }
    }

    /// Set the focal ant id
    #[must_use]
    pub fn with_subject(mut self, subject_id: u32) -> Self {
        self.subject_id = subject_id;
        self
    }

    /// Set the owning frame
    #[must_use]
    pub fn at_frame(mut self, frame: u32) -> Self {
        self.frame = frame;
        self
    }

    #[must_use]
    pub fn kind(&self) -> MarkerKind {
        if self.interaction.is_some() {
            MarkerKind::Interaction
        } else {
            MarkerKind::Simple
        }
    }

    #[must_use]
    pub fn is_interaction(&self) -> bool {
        self.interaction.is_some()
    }

    /// Move the marker to a new position
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}
