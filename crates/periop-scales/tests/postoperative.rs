use periop_scales::Scale;
use periop_scales::scales::aldrete::{
    Activity, Aldrete, AldreteInput, Circulation, Consciousness, Oxygenation, Respiration,
};
use periop_scales::scales::mmse::{Mmse, MmseInput, Orientation, ThreeWords};
use periop_scales::scales::qor15::{Qor15, Qor15Input};
use periop_scales::scales::soba::{Soba, SobaInput, SobaRedFlag};
use periop_scales::scales::stop_bang::StopBangSnapshot;
use periop_scales::scoring::RiskTier;

#[test]
fn aldrete_sums_five_criteria() {
    let full = AldreteInput {
        activity: Activity::MovesFourLimbs,
        respiration: Respiration::BreathesDeeplyAndCoughs,
        circulation: Circulation::Within20Percent,
        consciousness: Consciousness::FullyAwake,
        oxygenation: Oxygenation::Above92RoomAir,
    };
    assert_eq!(Aldrete.evaluate(&full, None).unwrap().total_score, 10);

    let drowsy = AldreteInput {
        consciousness: Consciousness::ArousableOnCalling,
        oxygenation: Oxygenation::Above90WithOxygen,
        circulation: Circulation::Beyond50Percent,
        ..full
    };
    assert_eq!(Aldrete.compute(&drowsy, None).total_score, 6);
}

#[test]
fn aldrete_options_use_descriptive_names() {
    let json = serde_json::json!({
        "activity": "moves_two_limbs",
        "respiration": "apneic",
        "circulation": "within_20_50_percent",
        "consciousness": "unresponsive",
        "oxygenation": "lt_90_with_oxygen",
    });
    let input: AldreteInput = serde_json::from_value(json).unwrap();
    assert_eq!(Aldrete.compute(&input, None).total_score, 2);
}

#[test]
fn qor15_is_a_plain_sum() {
    let mut items = [10u8; 15];
    items[0] = 0;
    items[14] = 5;
    let result = Qor15.evaluate(&Qor15Input { items }, None).unwrap();
    assert_eq!(result.total_score, 135);
}

#[test]
fn qor15_rejects_items_above_ten() {
    let mut items = [7u8; 15];
    items[3] = 11;
    let errors = Qor15.validate(&Qor15Input { items });
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "q4");
}

#[test]
fn mmse_counts_items_per_domain() {
    let input = MmseInput {
        orientation: Orientation {
            date: true,
            month: true,
            year: true,
            city: true,
            ..Orientation::default()
        },
        registration: ThreeWords {
            first: true,
            second: true,
            third: true,
        },
        recall: ThreeWords {
            first: true,
            ..ThreeWords::default()
        },
        writing: true,
        ..MmseInput::default()
    };
    let result = Mmse.evaluate(&input, None).unwrap();
    assert_eq!(result.domains.orientation, 4);
    assert_eq!(result.domains.registration, 3);
    assert_eq!(result.domains.recall, 1);
    assert_eq!(result.domains.writing, 1);
    assert_eq!(result.domains.attention, 0);
    assert_eq!(result.total_score, 9);
}

#[test]
fn mmse_accepts_partial_payloads() {
    let input: MmseInput = serde_json::from_value(serde_json::json!({
        "attention": { "answer_93": true, "answer_86": true },
        "copying": true,
    }))
    .unwrap();
    let result = Mmse.compute(&input, None);
    assert_eq!(result.domains.attention, 2);
    assert_eq!(result.total_score, 3);
}

#[test]
fn soba_lists_raised_flags_without_a_total() {
    let input = SobaInput {
        ecg_changes: true,
        vte_history: true,
        ..SobaInput::default()
    };
    let result = Soba.evaluate(&input, None).unwrap();
    assert_eq!(
        result.red_flags,
        vec![SobaRedFlag::EcgChanges, SobaRedFlag::VteHistory]
    );
    assert_eq!(result.stopbang, None);
}

#[test]
fn soba_keeps_prior_stopbang_snapshot() {
    let snapshot = StopBangSnapshot {
        total_score: 5,
        risk: RiskTier::High,
    };
    let first = Soba.compute(
        &SobaInput {
            stopbang: Some(snapshot),
            ..SobaInput::default()
        },
        None,
    );
    assert_eq!(first.stopbang, Some(snapshot));

    let second = Soba.compute(&SobaInput::default(), Some(&first));
    assert_eq!(second.stopbang, Some(snapshot));
    assert_eq!(second.input.stopbang, Some(snapshot));

    let refreshed = StopBangSnapshot {
        total_score: 2,
        risk: RiskTier::Low,
    };
    let third = Soba.compute(
        &SobaInput {
            stopbang: Some(refreshed),
            ..SobaInput::default()
        },
        Some(&second),
    );
    assert_eq!(third.stopbang, Some(refreshed));
}
