//! Legacy-to-current marker migration

use crate::error::{Error, Result};
use crate::model::{
    Activity, Interaction, InteractionKind, LegacyMarkerType, LegacyRecord, Location, MarkerRecord,
};

/// Convert a version 1/2 record to its version 3 equivalent.
///
/// Position, frame and ant id carry over unchanged. Movement tags become
/// interactions of unknown kind with met id 0; the rest become simple
/// markers. First-generation tags have no equivalent and are rejected.
pub fn migrate(record: &LegacyRecord) -> Result<MarkerRecord> {
    use LegacyMarkerType as T;

    let met = |met_activity, met_location| {
        Some(Interaction::new(InteractionKind::Unknown, met_activity, met_location))
    };

    let (subject_location, interaction) = match record.marker_type {
        T::Returning | T::Standing => (Location::Unknown, met(Activity::Unknown, Location::ReturningToNest)),
        T::LeavingTunnel => (Location::Unknown, met(Activity::Unknown, Location::Ascending)),
        T::LeavingNest => (Location::Unknown, met(Activity::Unknown, Location::LeavingNest)),
        T::Carrying => (Location::Unknown, met(Activity::CarryingUnknown, Location::Unknown)),
        T::Unknown | T::Tracking => (Location::Unknown, None),
        T::Tunnel => (Location::AtTunnel, None),
        T::Window => (Location::AtExit, None),
        tag @ (T::Unsure | T::Returner | T::Nest | T::Leaving) => {
            return Err(Error::UnmappableLegacyType { tag });
        }
    };

    let marker = MarkerRecord::simple(record.x, record.y, Activity::Unknown, subject_location)
        .with_subject(record.ant.id)
        .at_frame(record.frame);
    Ok(MarkerRecord {
        interaction,
        ..marker
    })
}
