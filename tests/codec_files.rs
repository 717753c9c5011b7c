//! End-to-end marker file behavior through the public API.

use std::fs;

use antmark::codec::{self, parse_legacy_line};
use antmark::{
    Activity, AnnotationDocument, AntKind, Error, FrameRecordStore, Interaction, InteractionKind, Location,
    MarkerKind, MarkerRecord, ParseCause,
};

const HEADER: &str = "File version,3\n\
    Ant,Frame,X,Y,Focus Ant Activity,Focus Ant Location,Interaction Type,Ant Met Activity,Ant Met Location,Ant Met ID\n";

fn sample_store() -> FrameRecordStore {
    let mut store = FrameRecordStore::new();
    store.push(
        5,
        MarkerRecord::interaction(
            -4,
            9,
            Activity::StandingStill,
            Location::EntranceChamber,
            Interaction::new(InteractionKind::Received, Activity::CarryingFood, Location::AtTunnel)
                .with_met_id(12),
        )
        .with_subject(2),
    );
    store.push(
        5,
        MarkerRecord::simple(10, 20, Activity::CarryingDirt, Location::Descending).with_subject(7),
    );
    store.push(
        2,
        MarkerRecord::simple(1, 1, Activity::Walking, Location::Outside).with_subject(7),
    );
    store
}

#[test]
fn written_file_reads_back_equal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markers.csv");
    let store = sample_store();

    codec::write_file(&path, &store).unwrap();
    let loaded = codec::read_file(&path).unwrap();

    assert_eq!(loaded, store);
    assert_eq!(loaded.records_for(5).len(), 2);
}

#[test]
fn output_is_ordered_by_ant_then_frame() {
    let text = codec::to_string(&sample_store());
    let keys: Vec<(u32, u32)> = text
        .lines()
        .skip(2)
        .map(|line| {
            let mut fields = line.split(',');
            let ant = fields.next().unwrap().parse().unwrap();
            let frame = fields.next().unwrap().parse().unwrap();
            (ant, frame)
        })
        .collect();
    assert_eq!(keys, vec![(2, 5), (7, 2), (7, 5)]);
}

#[test]
fn v1_line_becomes_simple_marker() {
    let store = codec::read_str("Frame,X,Y\n7,10,20\n", None).unwrap();
    let marker = &store.records_for(7)[0];

    assert_eq!(marker.kind(), MarkerKind::Simple);
    assert_eq!((marker.frame, marker.x, marker.y), (7, 10, 20));
    assert_eq!(marker.subject_id, 0);
    assert_eq!(marker.subject_activity, Activity::Unknown);
    assert_eq!(marker.subject_location, Location::Unknown);
}

#[test]
fn v2_line_uses_legacy_kind_alias() {
    let legacy = parse_legacy_line("3,Control,Tracking,5,6,2").unwrap();
    assert_eq!(legacy.ant.id, 3);
    assert_eq!(legacy.ant.kind, AntKind::Inbound);

    let store = codec::read_str("Ant,AntType,MarkerType,X,Y,Frame\n3,Control,Tracking,5,6,2\n", None).unwrap();
    let marker = &store.records_for(2)[0];
    assert_eq!(marker.subject_id, 3);
    assert_eq!((marker.frame, marker.x, marker.y), (2, 5, 6));
    assert_eq!(marker.kind(), MarkerKind::Simple);
}

#[test]
fn unknown_token_fails_whole_read() {
    let text = format!("{HEADER}1,1,1,1,Walking,Edge,,,,\n2,2,2,2,Swimming,Edge,,,,\n");
    let err = codec::read_str(&text, None).unwrap_err();

    match err {
        Error::Parse {
            line_number, cause, ..
        } => {
            assert_eq!(line_number, 4);
            assert!(matches!(cause, ParseCause::UnknownToken { ref token, .. } if token == "Swimming"));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn empty_met_id_is_rejected_but_missing_column_is_not() {
    let empty = format!("{HEADER}1,1,1,1,Walking,Edge,TwoWay,Walking,Edge,\n");
    assert!(matches!(
        codec::read_str(&empty, None),
        Err(Error::Parse {
            cause: ParseCause::PartialInteraction,
            ..
        })
    ));

    let early = format!("{HEADER}1,1,1,1,Walking,Edge,TwoWay,Walking,Edge\n");
    let store = codec::read_str(&early, None).unwrap();
    assert_eq!(store.records_for(1)[0].interaction.unwrap().met_id, 0);
}

#[test]
fn legacy_document_is_upgraded_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markers.csv");
    fs::write(&path, "Ant,AntType,MarkerType,X,Y,Frame\n4,Forager,Tunnel,8,9,30\n").unwrap();

    let mut doc = AnnotationDocument::open(&path).unwrap();
    assert!(!doc.has_unsaved_changes());
    assert_eq!(doc.store().records_for(30)[0].subject_location, Location::AtTunnel);

    doc.store_mut().records_for_mut(30)[0].subject_activity = Activity::Walking;
    assert!(doc.has_unsaved_changes());
    assert!(doc.save().unwrap());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("File version,3\n"));
    assert!(text.contains("4,30,8,9,Walking,AtTunnel,,,,"));
}
