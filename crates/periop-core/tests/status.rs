use periop_core::error::CoreError;
use periop_core::keys;
use periop_core::models::status::{ScaleKey, ScaleKind, ScaleStatus, SliceStatus};
use periop_core::models::timepoint::Timepoint;
use uuid::Uuid;

#[test]
fn scale_kind_round_trips_through_its_id() {
    for kind in ScaleKind::ALL {
        assert_eq!(kind.id().parse::<ScaleKind>().unwrap(), kind);
    }
    assert_eq!("STOP-BANG".parse::<ScaleKind>().unwrap(), ScaleKind::StopBang);
    assert!(matches!(
        "apgar".parse::<ScaleKind>(),
        Err(CoreError::UnknownScale(_))
    ));
}

#[test]
fn only_mmse_is_keyed_by_timepoint() {
    assert!(ScaleKey::single(ScaleKind::Caprini).is_ok());
    assert!(matches!(
        ScaleKey::single(ScaleKind::Mmse),
        Err(CoreError::TimepointRequired(ScaleKind::Mmse))
    ));
    assert!(matches!(
        ScaleKey::new(ScaleKind::Ariscat, Some(Timepoint::BASELINE)),
        Err(CoreError::UnexpectedTimepoint(ScaleKind::Ariscat))
    ));
}

#[test]
fn slugs_name_timepoints() {
    let key = ScaleKey::new(ScaleKind::Mmse, Some(Timepoint::COGNITIVE_FOLLOW_UP)).unwrap();
    assert_eq!(key.slug(), "mmse_t10");
    assert_eq!(ScaleKey::single(ScaleKind::StopBang).unwrap().slug(), "stop_bang");
}

#[test]
fn timepoints_are_bounded_and_parse_from_labels() {
    assert!(Timepoint::new(12).is_ok());
    assert!(matches!(Timepoint::new(13), Err(CoreError::InvalidTimepoint(13))));
    assert_eq!("T7".parse::<Timepoint>().unwrap().index(), 7);
    assert_eq!("t0".parse::<Timepoint>().unwrap(), Timepoint::BASELINE);
    assert!("T99".parse::<Timepoint>().is_err());
    assert!("later".parse::<Timepoint>().is_err());
    assert_eq!(Timepoint::all().count(), 13);
}

#[test]
fn timepoint_deserialization_rejects_out_of_range() {
    let ok: Timepoint = serde_json::from_str("4").unwrap();
    assert_eq!(ok.index(), 4);
    assert!(serde_json::from_str::<Timepoint>("13").is_err());
}

#[test]
fn status_flags_toggle() {
    let mut status = ScaleStatus::new(Uuid::new_v4(), jiff::Timestamp::UNIX_EPOCH);
    let key = ScaleKey::single(ScaleKind::LeeRcri).unwrap();
    assert!(!status.is_filled(&key));
    assert!(status.set_filled(key, true));
    assert!(!status.set_filled(key, true));
    assert!(status.is_filled(&key));
    assert!(status.set_filled(key, false));
    assert!(!status.set_filled(key, false));
}

#[test]
fn mmse_timepoints_are_tracked_separately() {
    let mut status = ScaleStatus::new(Uuid::new_v4(), jiff::Timestamp::UNIX_EPOCH);
    status.set_filled(ScaleKey::new(ScaleKind::Mmse, Some(Timepoint::BASELINE)).unwrap(), true);
    status.set_filled(
        ScaleKey::new(ScaleKind::Mmse, Some(Timepoint::COGNITIVE_FOLLOW_UP)).unwrap(),
        true,
    );
    assert_eq!(
        status.filled_timepoints(ScaleKind::Mmse),
        vec![Timepoint::BASELINE, Timepoint::COGNITIVE_FOLLOW_UP]
    );
}

#[test]
fn slice_status_tracks_timepoints() {
    let mut status = SliceStatus::new(Uuid::new_v4(), jiff::Timestamp::UNIX_EPOCH);
    let t3 = Timepoint::new(3).unwrap();
    assert!(status.set_filled(t3, true));
    assert!(status.is_filled(t3));
    assert!(!status.is_filled(Timepoint::BASELINE));
}

#[test]
fn keys_follow_layout() {
    let id = Uuid::nil();
    assert_eq!(
        keys::scale_status(id),
        "records/00000000-0000-0000-0000-000000000000/scales/_status.json"
    );
    assert_eq!(
        keys::slice(id, Timepoint::new(12).unwrap()),
        "records/00000000-0000-0000-0000-000000000000/slices/t12.json"
    );
    assert!(keys::scale_result(id, &ScaleKey::single(ScaleKind::Soba).unwrap())
        .starts_with(&keys::patient_records_prefix(id)));
}

#[test]
fn timepoints_describe_their_clinical_moment() {
    assert_eq!(Timepoint::BASELINE.description(), "on admission");
    assert_eq!(
        Timepoint::new(3).unwrap().description(),
        "after induction and intubation"
    );
    assert_eq!(
        Timepoint::COGNITIVE_FOLLOW_UP.description(),
        "end of postoperative day 1"
    );
    assert_eq!(
        Timepoint::new(Timepoint::LAST).unwrap().description(),
        "end of postoperative day 5"
    );
    let distinct: std::collections::BTreeSet<_> =
        Timepoint::all().map(Timepoint::description).collect();
    assert_eq!(distinct.len(), 13);
}
