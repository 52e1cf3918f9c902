use std::collections::BTreeSet;

use periop_core::models::anesthesia::AnesthesiaType;
use periop_scales::Scale;
use periop_scales::scales::ariscat::{
    Ariscat, AriscatAge, AriscatDuration, AriscatInput, AriscatSpo2, Incision,
};
use periop_scales::scales::caprini::{Caprini, CapriniAge, CapriniFactor, CapriniInput, CapriniRisk};
use periop_scales::scales::el_ganzouri::{
    AirwayPlan, ElGanzouri, ElGanzouriInput, IntubationHistory, MallampatiClass,
    ThyromentalDistance,
};
use periop_scales::scales::las_vegas::{LasVegas, LasVegasFactor, LasVegasInput};
use periop_scales::scales::lee_rcri::{CreatinineSource, LeeRcri, LeeRcriInput};
use periop_scales::scales::stop_bang::{StopBang, StopBangInput};
use periop_scales::scoring::RiskTier;

fn ariscat_input() -> AriscatInput {
    AriscatInput {
        age_years: 45,
        spo2_percent: 98,
        respiratory_infection: false,
        anemia: false,
        incision: Incision::Peripheral,
        duration_minutes: 60,
        emergency: false,
    }
}

#[test]
fn ariscat_baseline_scores_zero() {
    let result = Ariscat.compute(&ariscat_input(), None);
    assert_eq!(result.total_score, 0);
    assert_eq!(result.age_band, AriscatAge::UpTo50);
    assert_eq!(result.spo2_band, AriscatSpo2::AtLeast96);
    assert_eq!(result.duration_band, AriscatDuration::Under2h);
}

#[test]
fn ariscat_two_hour_edge_adds_sixteen() {
    let short = AriscatInput {
        duration_minutes: 119,
        ..ariscat_input()
    };
    let long = AriscatInput {
        duration_minutes: 120,
        ..ariscat_input()
    };
    let before = Ariscat.compute(&short, None);
    let after = Ariscat.compute(&long, None);
    assert_eq!(after.duration_band, AriscatDuration::From2To3h);
    assert_eq!(after.total_score - before.total_score, 16);
}

#[test]
fn ariscat_sums_all_seven_predictors() {
    let input = AriscatInput {
        age_years: 81,
        spo2_percent: 90,
        respiratory_infection: true,
        anemia: true,
        incision: Incision::Intrathoracic,
        duration_minutes: 181,
        emergency: true,
    };
    let result = Ariscat.compute(&input, None);
    assert_eq!(result.age_band, AriscatAge::Over80);
    assert_eq!(result.spo2_band, AriscatSpo2::AtMost90);
    assert_eq!(result.duration_band, AriscatDuration::Over3h);
    assert_eq!(result.total_score, 16 + 24 + 17 + 11 + 24 + 23 + 8);

    let middle = AriscatInput {
        age_years: 80,
        spo2_percent: 95,
        incision: Incision::UpperAbdominal,
        duration_minutes: 180,
        ..ariscat_input()
    };
    assert_eq!(Ariscat.compute(&middle, None).total_score, 3 + 8 + 15 + 16);
}

#[test]
fn ariscat_rejects_implausible_spo2() {
    let input = AriscatInput {
        spo2_percent: 12,
        ..ariscat_input()
    };
    let errors = Ariscat.validate(&input);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "spo2_percent");
    assert!(Ariscat.evaluate(&input, None).is_err());
}

fn stop_bang_input() -> StopBangInput {
    StopBangInput {
        snoring: true,
        tired: true,
        observed_apnea: false,
        hypertension: true,
        bmi: 36.0,
        age_years: 55,
        neck_circumference_cm: 42.0,
        male: true,
    }
}

#[test]
fn stop_bang_worked_example() {
    let result = StopBang.evaluate(&stop_bang_input(), None).unwrap();
    assert!(result.bmi_ge_35);
    assert!(result.age_gt_50);
    assert!(result.neck_gt_40);
    // Seven of the eight flags are set.
    assert_eq!(result.total_score, 7);
    assert_eq!(result.risk, RiskTier::High);
    assert_eq!(result.risk.level(), 2);
}

#[test]
fn stop_bang_thresholds_are_strict_where_stated() {
    let input = StopBangInput {
        snoring: false,
        tired: false,
        observed_apnea: false,
        hypertension: false,
        bmi: 35.0,
        age_years: 50,
        neck_circumference_cm: 40.0,
        male: false,
    };
    let result = StopBang.compute(&input, None);
    assert!(result.bmi_ge_35);
    assert!(!result.age_gt_50);
    assert!(!result.neck_gt_40);
    assert_eq!(result.total_score, 1);
    assert_eq!(result.risk, RiskTier::Low);
}

#[test]
fn stop_bang_risk_tiers() {
    let mut input = stop_bang_input();
    input.snoring = false;
    input.tired = false;
    input.hypertension = false;
    input.bmi = 30.0;
    // age, neck and sex remain
    assert_eq!(StopBang.compute(&input, None).risk, RiskTier::Moderate);
    input.male = false;
    input.neck_circumference_cm = 38.0;
    assert_eq!(StopBang.compute(&input, None).risk, RiskTier::Low);
}

#[test]
fn caprini_worked_example() {
    let input = CapriniInput {
        age_years: Some(65),
        bmi_gt_25: Some(true),
        factors: BTreeSet::from([
            CapriniFactor::VaricoseVeins,
            CapriniFactor::Copd,
            CapriniFactor::Malignancy,
        ]),
        ..CapriniInput::default()
    };
    let result = Caprini.evaluate(&input, None).unwrap();
    assert_eq!(result.age_band, CapriniAge::From61To74);
    assert_eq!(result.total_score, 7);
    assert_eq!(result.risk, CapriniRisk::High);
    assert_eq!(result.risk.level(), 3);
}

#[test]
fn caprini_derives_bmi_from_height_and_weight() {
    let input = CapriniInput {
        height_cm: Some(170.0),
        weight_kg: Some(80.0),
        ..CapriniInput::default()
    };
    let result = Caprini.compute(&input, None);
    assert_eq!(result.bmi, Some(27.7));
    assert!(result.bmi_gt_25);
    assert_eq!(result.total_score, 1);

    let partial = CapriniInput {
        height_cm: Some(170.0),
        ..CapriniInput::default()
    };
    let result = Caprini.compute(&partial, None);
    assert_eq!(result.bmi, None);
    assert!(!result.bmi_gt_25);
}

#[test]
fn caprini_explicit_flags_override_derived_values() {
    let input = CapriniInput {
        age_band: Some(CapriniAge::From75),
        height_cm: Some(170.0),
        weight_kg: Some(100.0),
        bmi_gt_25: Some(false),
        ..CapriniInput::default()
    };
    let result = Caprini.compute(&input, None);
    assert_eq!(result.age_band, CapriniAge::From75);
    assert!(!result.bmi_gt_25);
    assert_eq!(result.total_score, 3);

    let with_age = CapriniInput {
        age_years: Some(30),
        ..input
    };
    assert_eq!(Caprini.compute(&with_age, None).age_band, CapriniAge::UpTo40);
}

#[test]
fn caprini_risk_is_monotonic_in_total() {
    let mut previous = 0;
    for factor_count in 0..CapriniFactor::ALL.len() {
        let input = CapriniInput {
            factors: CapriniFactor::ALL[..factor_count].iter().copied().collect(),
            ..CapriniInput::default()
        };
        let result = Caprini.compute(&input, None);
        assert!(result.risk.level() >= previous);
        previous = result.risk.level();
    }

    let tier_for = |factors: &[CapriniFactor]| {
        Caprini
            .compute(
                &CapriniInput {
                    factors: factors.iter().copied().collect(),
                    ..CapriniInput::default()
                },
                None,
            )
            .risk
    };
    assert_eq!(tier_for(&[CapriniFactor::LegSwelling]), CapriniRisk::VeryLow);
    assert_eq!(tier_for(&[CapriniFactor::Malignancy]), CapriniRisk::Low);
    assert_eq!(tier_for(&[CapriniFactor::FactorVLeiden]), CapriniRisk::Moderate);
    assert_eq!(tier_for(&[CapriniFactor::MultipleTrauma]), CapriniRisk::High);
}

fn lee_input() -> LeeRcriInput {
    LeeRcriInput {
        high_risk_surgery: true,
        ischemic_heart_disease: false,
        heart_failure: false,
        cerebrovascular_disease: false,
        insulin_therapy: false,
        creatinine_umol_l: None,
        creatinine_gt_180: None,
    }
}

#[test]
fn lee_two_predictors_give_seven_percent() {
    let input = LeeRcriInput {
        insulin_therapy: true,
        ..lee_input()
    };
    let result = LeeRcri.evaluate(&input, None).unwrap();
    assert_eq!(result.total_score, 2);
    assert_eq!(result.risk_percent, 7.0);
    assert_eq!(result.risk_label(), "≈7%");
    assert_eq!(result.creatinine_source, CreatinineSource::Absent);
}

#[test]
fn lee_raw_creatinine_wins_over_flag() {
    let input = LeeRcriInput {
        creatinine_umol_l: Some(150.0),
        creatinine_gt_180: Some(true),
        ..lee_input()
    };
    let result = LeeRcri.compute(&input, None);
    assert!(!result.creatinine_gt_180);
    assert_eq!(result.creatinine_source, CreatinineSource::Measured);
    assert_eq!(result.total_score, 1);
    assert_eq!(result.risk_percent, 0.9);
}

#[test]
fn lee_carries_creatinine_forward_when_omitted() {
    let first = LeeRcri.compute(
        &LeeRcriInput {
            creatinine_umol_l: Some(200.0),
            ..lee_input()
        },
        None,
    );
    assert!(first.creatinine_gt_180);

    let second = LeeRcri.compute(&lee_input(), Some(&first));
    assert!(second.creatinine_gt_180);
    assert_eq!(second.creatinine_source, CreatinineSource::Carried);
    assert_eq!(second.total_score, 2);

    let reported = LeeRcri.compute(
        &LeeRcriInput {
            creatinine_gt_180: Some(false),
            ..lee_input()
        },
        Some(&first),
    );
    assert!(!reported.creatinine_gt_180);
    assert_eq!(reported.creatinine_source, CreatinineSource::Reported);
}

#[test]
fn lee_risk_caps_at_eleven_percent() {
    let input = LeeRcriInput {
        high_risk_surgery: true,
        ischemic_heart_disease: true,
        heart_failure: true,
        cerebrovascular_disease: true,
        insulin_therapy: true,
        creatinine_umol_l: Some(181.0),
        creatinine_gt_180: None,
    };
    let result = LeeRcri.compute(&input, None);
    assert_eq!(result.total_score, 6);
    assert_eq!(result.risk_percent, 11.0);
    let none = LeeRcriInput {
        high_risk_surgery: false,
        ..lee_input()
    };
    assert_eq!(LeeRcri.compute(&none, None).risk_percent, 0.4);
}

fn airway_input() -> ElGanzouriInput {
    ElGanzouriInput {
        interincisor_gap_cm: 4.5,
        thyromental_distance_cm: 7.0,
        mallampati_class: 1,
        neck_extension_deg: 95.0,
        can_protrude_mandible: true,
        weight_kg: 70.0,
        difficult_intubation_history: IntubationHistory::None,
    }
}

#[test]
fn el_ganzouri_easy_airway() {
    let result = ElGanzouri.evaluate(&airway_input(), None).unwrap();
    assert_eq!(result.total_score, 0);
    assert_eq!(result.plan, AirwayPlan::DirectLaryngoscopy);
}

#[test]
fn el_ganzouri_band_edges() {
    let input = ElGanzouriInput {
        interincisor_gap_cm: 4.0,
        thyromental_distance_cm: 6.0,
        mallampati_class: 4,
        neck_extension_deg: 80.0,
        can_protrude_mandible: false,
        weight_kg: 110.0,
        difficult_intubation_history: IntubationHistory::Uncertain,
    };
    let result = ElGanzouri.compute(&input, None);
    assert_eq!(result.thyromental, ThyromentalDistance::From6To6_5Cm);
    assert_eq!(result.mallampati, MallampatiClass::III);
    // 0 + 1 + 2 + 1 + 1 + 1 + 1
    assert_eq!(result.total_score, 7);
    assert_eq!(result.plan, AirwayPlan::VideoLaryngoscopy);
}

#[test]
fn el_ganzouri_worst_case_needs_awake_intubation() {
    let input = ElGanzouriInput {
        interincisor_gap_cm: 2.5,
        thyromental_distance_cm: 5.0,
        mallampati_class: 3,
        neck_extension_deg: 60.0,
        can_protrude_mandible: false,
        weight_kg: 130.0,
        difficult_intubation_history: IntubationHistory::Definite,
    };
    let result = ElGanzouri.compute(&input, None);
    assert_eq!(result.total_score, 12);
    assert_eq!(result.plan, AirwayPlan::AwakeFibreoptic);
}

#[test]
fn el_ganzouri_rejects_unknown_mallampati_class() {
    let input = ElGanzouriInput {
        mallampati_class: 0,
        ..airway_input()
    };
    let errors = ElGanzouri.validate(&input);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "mallampati_class");
}

fn las_vegas_input() -> LasVegasInput {
    LasVegasInput {
        age_years: 40,
        asa_class: 1,
        preop_spo2: 98,
        cancer: false,
        obstructive_sleep_apnea: false,
        elective: true,
        duration_minutes: 90,
        supraglottic_device: false,
        anesthesia_type: AnesthesiaType::Balanced,
        intraop_desaturation: false,
        vasoactive_drugs: false,
        peep_cm_h2o: 5.0,
    }
}

#[test]
fn las_vegas_low_risk_patient() {
    let result = LasVegas.evaluate(&las_vegas_input(), None).unwrap();
    assert!(result.factors.is_empty());
    assert_eq!(result.total_score, 0);
    assert_eq!(result.risk, RiskTier::Low);
}

#[test]
fn las_vegas_lists_triggered_factors() {
    let input = LasVegasInput {
        age_years: 70,
        elective: false,
        duration_minutes: 135,
        anesthesia_type: AnesthesiaType::TotalIntravenous,
        peep_cm_h2o: 4.0,
        ..las_vegas_input()
    };
    let result = LasVegas.compute(&input, None);
    assert_eq!(
        result.factors,
        vec![
            LasVegasFactor::Age67Plus,
            LasVegasFactor::NonElective,
            LasVegasFactor::LongDuration,
            LasVegasFactor::NonBalancedAnesthesia,
            LasVegasFactor::LowPeep,
        ]
    );
    assert_eq!(result.total_score, 6);
    assert_eq!(result.risk, RiskTier::High);
}

#[test]
fn las_vegas_age_bands() {
    let at = |age_years| {
        LasVegas
            .compute(
                &LasVegasInput {
                    age_years,
                    ..las_vegas_input()
                },
                None,
            )
            .total_score
    };
    assert_eq!(at(46), 0);
    assert_eq!(at(47), 1);
    assert_eq!(at(66), 1);
    assert_eq!(at(67), 2);
}

#[test]
fn las_vegas_moderate_band() {
    let input = LasVegasInput {
        asa_class: 3,
        preop_spo2: 95,
        cancer: true,
        ..las_vegas_input()
    };
    let result = LasVegas.compute(&input, None);
    assert_eq!(result.total_score, 3);
    assert_eq!(result.risk, RiskTier::Moderate);
}
