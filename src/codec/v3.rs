//! Version 3 line grammar
//!
//! ```text
//! Ant,Frame,X,Y,Focus Ant Activity,Focus Ant Location,Interaction Type,Ant Met Activity,Ant Met Location,Ant Met ID
//! 4,120,311,87,Walking,Edge,,,,
//! 4,121,315,90,Walking,Edge,TwoWay,CarryingFood,Outside,9
//! ```
//!
//! The four interaction columns are all-or-nothing. Early version 3 files
//! lack the `Ant Met ID` column; their interactions load with met id 0.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ParseCause;
use crate::model::{Activity, Interaction, InteractionKind, Location, MarkerRecord};

pub const VERSION: u32 = 3;

pub const VERSION_LINE: &str = "File version,3";

pub const COLUMN_HEADER: &str = "Ant,Frame,X,Y,Focus Ant Activity,Focus Ant Location,Interaction Type,Ant Met Activity,Ant Met Location,Ant Met ID";

/// Enumeration token as written by any generation
pub(crate) const IDENT: &str = r"[A-Za-z_$][A-Za-z0-9_$]*";

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<ant>\d+),(?P<frame>\d+),(?P<x>-?\d+),(?P<y>-?\d+),(?P<activity>{IDENT}),(?P<location>{IDENT}),(?P<kind>{IDENT})?,(?P<met_activity>{IDENT})?,(?P<met_location>{IDENT})?,(?P<met_id>\d+)?$"
    ))
    .expect("version 3 line pattern is valid")
});

static LINE_WITHOUT_MET_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<ant>\d+),(?P<frame>\d+),(?P<x>-?\d+),(?P<y>-?\d+),(?P<activity>{IDENT}),(?P<location>{IDENT}),(?P<kind>{IDENT})?,(?P<met_activity>{IDENT})?,(?P<met_location>{IDENT})?$"
    ))
    .expect("early version 3 line pattern is valid")
});

static VERSION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^File version,\s*(?P<version>\d+)[,\s]*$").expect("version header pattern is valid")
});

/// Read the version number from a `File version,<N>` line.
///
/// `None` means the line is not a version header at all.
pub(crate) fn parse_version(line: &str) -> Option<Result<u32, ParseCause>> {
    let caps = VERSION_HEADER.captures(line)?;
    Some(caps["version"].parse().map_err(ParseCause::from))
}

/// True for the column header line that follows the version line
pub(crate) fn is_column_header(line: &str) -> bool {
    line.starts_with("Ant,Frame,")
}

/// Parse one data line
pub(crate) fn parse_line(line: &str) -> Result<MarkerRecord, ParseCause> {
    if let Some(caps) = LINE.captures(line) {
        return decode(&caps, true);
    }
    if let Some(caps) = LINE_WITHOUT_MET_ID.captures(line) {
        return decode(&caps, false);
    }
    Err(ParseCause::Unrecognized)
}

fn token<T>(
    caps: &Captures<'_>,
    group: &'static str,
    field: &'static str,
    lookup: fn(&str) -> Option<T>,
) -> Result<Option<T>, ParseCause> {
    caps.name(group)
        .map(|m| {
            lookup(m.as_str()).ok_or_else(|| ParseCause::UnknownToken {
                field,
                token: m.as_str().to_string(),
            })
        })
        .transpose()
}

fn decode(caps: &Captures<'_>, has_met_id: bool) -> Result<MarkerRecord, ParseCause> {
    let subject_id: u32 = caps["ant"].parse()?;
    let frame: u32 = caps["frame"].parse()?;
    let x: i32 = caps["x"].parse()?;
    let y: i32 = caps["y"].parse()?;

    let activity = token(caps, "activity", "activity", Activity::from_name)?.unwrap_or_default();
    let location = token(caps, "location", "location", Location::from_name)?.unwrap_or_default();

    let kind = token(caps, "kind", "interaction type", InteractionKind::from_name)?;
    let met_activity = token(caps, "met_activity", "met ant activity", Activity::from_name)?;
    let met_location = token(caps, "met_location", "met ant location", Location::from_name)?;
    let met_id = caps
        .name("met_id")
        .map(|m| m.as_str().parse::<u32>())
        .transpose()?;

    let interaction = match (kind, met_activity, met_location, met_id) {
        (None, None, None, None) => None,
        (Some(kind), Some(met_activity), Some(met_location), Some(met_id)) => {
            Some(Interaction::new(kind, met_activity, met_location).with_met_id(met_id))
        }
        (Some(kind), Some(met_activity), Some(met_location), None) if !has_met_id => {
            Some(Interaction::new(kind, met_activity, met_location))
        }
        _ => return Err(ParseCause::PartialInteraction),
    };

    let marker = MarkerRecord::simple(x, y, activity, location)
        .with_subject(subject_id)
        .at_frame(frame);
    Ok(MarkerRecord {
        interaction,
        ..marker
    })
}

/// Format one record as a data line
pub(crate) fn format_line(record: &MarkerRecord) -> String {
    let common = format!(
        "{},{},{},{},{},{}",
        record.subject_id,
        record.frame,
        record.x,
        record.y,
        record.subject_activity.name(),
        record.subject_location.name(),
    );
    match record.interaction {
        Some(interaction) => format!(
            "{common},{},{},{},{}",
            interaction.kind.name(),
            interaction.met_activity.name(),
            interaction.met_location.name(),
            interaction.met_id,
        ),
        None => format!("{common},,,,"),
    }
}
