//! Line grammars of the files written before version headers existed.
//!
//! Version 2 lines carry `ant,antType,markerType,x,y,frame`. Version 1 lines
//! are bare clicks, `frame,x,y`, with no ant or marker type. Both kinds may
//! appear in the same file; each line is tried as version 2 first.

use std::sync::LazyLock;

use regex::Regex;

use super::v3::IDENT;
use crate::error::ParseCause;
use crate::model::{AntIdentity, AntKind, LegacyMarkerType, LegacyRecord};

static V2_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<ant>\d+),(?P<kind>{IDENT}),(?P<tag>{IDENT}),(?P<x>\d+),(?P<y>\d+),(?P<frame>\d+)$"
    ))
    .expect("version 2 line pattern is valid")
});

static V1_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<frame>\d+),(?P<x>\d+),(?P<y>\d+)$").expect("version 1 line pattern is valid")
});

/// Parse a single data line from a version 1 or version 2 file.
///
/// Ant kinds resolve through their legacy aliases, so `Forager` and
/// `Control` are accepted alongside the current names.
pub fn parse_legacy_line(line: &str) -> Result<LegacyRecord, ParseCause> {
    if let Some(caps) = V2_LINE.captures(line) {
        let kind = AntKind::resolve(&caps["kind"])?;
        let tag = &caps["tag"];
        let marker_type =
            LegacyMarkerType::from_name(tag).ok_or_else(|| ParseCause::UnknownToken {
                field: "marker type",
                token: tag.to_string(),
            })?;
        return Ok(LegacyRecord {
            ant: AntIdentity::new(caps["ant"].parse()?, kind),
            marker_type,
            x: caps["x"].parse()?,
            y: caps["y"].parse()?,
            frame: caps["frame"].parse()?,
        });
    }

    if let Some(caps) = V1_LINE.captures(line) {
        return Ok(LegacyRecord {
            ant: AntIdentity::default(),
            marker_type: LegacyMarkerType::DEFAULT,
            x: caps["x"].parse()?,
            y: caps["y"].parse()?,
            frame: caps["frame"].parse()?,
        });
    }

    Err(ParseCause::Unrecognized)
}
