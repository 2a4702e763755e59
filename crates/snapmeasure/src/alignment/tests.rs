use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

const G: f64 = 9.81;

fn level(beta: f64, gamma: f64) -> OrientationSample {
    OrientationSample::new(beta, gamma, [0.0, 0.0, G])
}

fn status_changes(events: &[AlignmentEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, AlignmentEvent::StatusChanged { .. }))
        .count()
}

fn guidance_changes(events: &[AlignmentEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, AlignmentEvent::GuidanceChanged { .. }))
        .count()
}

#[test]
fn identical_flat_samples_become_stable_on_third() {
    let mut clf = AlignmentClassifier::default();
    for i in 1..=10 {
        let r = clf.ingest(&level(0.0, 0.0));
        assert_eq!(r.status, AlignmentStatus::Good, "sample {}", i);
        assert_eq!(r.is_stable, i >= 3, "sample {}", i);
        assert_eq!(r.orientation, DeviceOrientation::Horizontal);
        assert_abs_diff_eq!(r.tilt_angle, 0.0);
    }
    assert!(clf.last_result().unwrap().auto_capture_ready());
}

#[test]
fn steady_good_stream_fires_one_transition_and_one_burst() {
    let mut clf = AlignmentClassifier::default();
    for _ in 0..20 {
        clf.ingest(&level(0.2, -0.1));
    }
    let events = clf.take_events();
    assert_eq!(
        events,
        vec![AlignmentEvent::StatusChanged {
            from: None,
            to: AlignmentStatus::Good
        }]
    );
    assert_eq!(clf.haptics().bursts_scheduled(), 1);
}

#[test]
fn every_distinct_transition_schedules_exactly_one_burst() {
    let mut clf = AlignmentClassifier::default();
    let mut t = 0;
    let mut feed = |clf: &mut AlignmentClassifier, beta: f64, n: usize| {
        for _ in 0..n {
            clf.ingest(&level(beta, 0.0).at(t));
            t += 20;
        }
    };
    feed(&mut clf, 0.0, 10);
    feed(&mut clf, 30.0, 10);
    feed(&mut clf, 0.0, 15);

    let events = clf.take_events();
    let transitions = status_changes(&events);
    assert!(transitions >= 3, "events: {:?}", events);
    assert_eq!(clf.haptics().bursts_scheduled(), transitions as u64);

    for pair in events
        .iter()
        .filter_map(|e| match e {
            AlignmentEvent::StatusChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .windows(2)
    {
        assert_ne!(pair[0].1, pair[1].1, "duplicate status report");
    }

    feed(&mut clf, 0.0, 30);
    assert_eq!(status_changes(&clf.take_events()), 0);
    assert_eq!(clf.haptics().bursts_scheduled(), transitions as u64);
}

#[test]
fn repeated_guidance_is_reported_once() {
    let mut clf = AlignmentClassifier::default();
    for _ in 0..100 {
        let r = clf.ingest(&level(3.5, 0.0));
        assert_eq!(r.guidance, Some(GuidanceMessage::AlmostThere));
    }
    let events = clf.take_events();
    assert_eq!(guidance_changes(&events), 1);
    assert!(events.contains(&AlignmentEvent::GuidanceChanged {
        from: None,
        to: Some(GuidanceMessage::AlmostThere)
    }));
}

#[test]
fn stable_tilt_while_moving_is_not_stable() {
    let mut clf = AlignmentClassifier::default();
    let mut last = None;
    for i in 0..10 {
        let z = if i % 2 == 0 { G } else { G + 0.5 };
        last = Some(clf.ingest(&OrientationSample::new(0.0, 0.0, [0.0, 0.0, z])));
    }
    let r = last.unwrap();
    assert_eq!(r.status, AlignmentStatus::Good);
    assert!(!r.is_stable);
    assert_eq!(r.guidance, Some(GuidanceMessage::HoldThat));
    assert!(!r.auto_capture_ready());
}

#[test]
fn shaking_device_is_told_to_hold_still() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut clf = AlignmentClassifier::default();
    let mut hold_still = 0;
    for i in 0..50 {
        let sample = OrientationSample::new(
            rng.gen_range(-0.3..0.3),
            rng.gen_range(-0.3..0.3),
            [
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                G + rng.gen_range(-1.0..1.0),
            ],
        );
        let r = clf.ingest(&sample);
        if i >= 10 {
            assert!(!r.is_stable, "sample {}", i);
        }
        if r.guidance == Some(GuidanceMessage::HoldStill) {
            hold_still += 1;
        }
    }
    assert!(hold_still > 0);
}

#[test]
fn status_thresholds_follow_bubble_and_tilt() {
    let cases = [
        (0.0, 1.0, AlignmentStatus::Good),
        (1.4, 0.0, AlignmentStatus::Good),
        (2.0, 0.0, AlignmentStatus::Warning),
        (2.9, 0.0, AlignmentStatus::Warning),
        (4.9, 0.0, AlignmentStatus::Warning),
        (5.5, 0.0, AlignmentStatus::Bad),
        (20.0, 0.0, AlignmentStatus::Bad),
    ];
    for (beta, gamma, expected) in cases {
        let mut clf = AlignmentClassifier::default();
        let r = clf.ingest(&level(beta, gamma));
        assert_eq!(r.status, expected, "beta={} gamma={}", beta, gamma);
    }
}

#[test]
fn steady_four_degree_tilt_is_warning_and_almost_there() {
    let mut clf = AlignmentClassifier::default();
    let mut r = None;
    for _ in 0..10 {
        r = Some(clf.ingest(&level(4.0, 0.0)));
    }
    let r = r.unwrap();
    assert_abs_diff_eq!(r.tilt_angle, 4.0);
    assert!(r.bubble_offset.distance() <= clf.config().warning.max_offset_px);
    assert_eq!(r.status, AlignmentStatus::Warning);
    assert_eq!(r.guidance, Some(GuidanceMessage::AlmostThere));
}

#[test]
fn warning_gate_bubble_matches_warning_tilt() {
    let cfg = AlignmentConfig::default();
    let at_warning_tilt = cfg.warning.max_tilt_deg * cfg.bubble_px_per_deg();
    assert!(at_warning_tilt <= cfg.warning.max_offset_px + 1e-9);
}

#[test]
fn bubble_is_clamped_to_disk() {
    let mut clf = AlignmentClassifier::default();
    let r = clf.ingest(&level(30.0, 0.0));
    assert_abs_diff_eq!(r.bubble_offset.x, 0.0);
    assert_abs_diff_eq!(r.bubble_offset.y, 48.0, epsilon = 1e-12);

    let mut clf = AlignmentClassifier::default();
    let r = clf.ingest(&level(30.0, -30.0));
    assert_abs_diff_eq!(r.bubble_offset.distance(), 48.0, epsilon = 1e-9);
    assert!(r.bubble_offset.x < 0.0 && r.bubble_offset.y > 0.0);
}

#[test]
fn smoothing_halves_toward_new_reading() {
    let mut clf = AlignmentClassifier::default();
    clf.ingest(&level(0.0, 0.0));
    let r = clf.ingest(&level(10.0, 0.0));
    assert_abs_diff_eq!(r.tilt_angle, 5.0, epsilon = 1e-12);
    let r = clf.ingest(&level(10.0, 0.0));
    assert_abs_diff_eq!(r.tilt_angle, 7.5, epsilon = 1e-12);
}

#[test]
fn upright_phone_ignores_gamma_and_needs_a_tap() {
    let mut clf = AlignmentClassifier::default();
    let mut r = None;
    for _ in 0..5 {
        r = Some(clf.ingest(&level(90.0, 30.0)));
    }
    let r = r.unwrap();
    assert_eq!(r.orientation, DeviceOrientation::Vertical);
    assert_abs_diff_eq!(r.tilt_angle, 0.0);
    assert_eq!(r.status, AlignmentStatus::Good);
    assert!(r.is_stable);
    assert!(!r.auto_capture_ready());
}

#[test]
fn upright_phone_leaning_back_gets_vertical_wording() {
    let mut clf = AlignmentClassifier::default();
    let r = clf.ingest(&level(70.0, 0.0));
    assert_eq!(r.orientation, DeviceOrientation::Vertical);
    assert_abs_diff_eq!(r.tilt_angle, 20.0);
    assert_eq!(
        r.guidance,
        Some(GuidanceMessage::Tilt(TiltCorrection::TopTowardYou))
    );
}

#[test]
fn behaviour_is_independent_of_sample_rate() {
    let betas = [0.0, 4.0, 8.0, 2.0, 0.5, 0.1, 0.0, 0.0, 12.0, 0.0, 0.0, 0.0];
    let run = |period_ms: u64| {
        let mut clf = AlignmentClassifier::default();
        betas
            .iter()
            .enumerate()
            .map(|(i, &b)| clf.ingest(&level(b, 0.0).at(i as u64 * period_ms)))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(16), run(50));
}

#[test]
fn new_transition_cancels_previous_burst() {
    let mut clf = AlignmentClassifier::default();
    clf.ingest(&level(0.0, 0.0).at(0));
    assert_eq!(clf.due_haptics(50), vec![PulseKind::Light, PulseKind::Light]);

    let r = clf.ingest(&level(40.0, 0.0).at(100));
    assert_eq!(r.status, AlignmentStatus::Bad);
    assert_eq!(clf.haptics().pulses_cancelled(), 5);
    assert_eq!(clf.due_haptics(10_000), vec![PulseKind::Light]);
}

#[test]
fn disabled_haptics_schedule_nothing() {
    let mut config = AlignmentConfig::default();
    config.haptics.enabled = false;
    let mut clf = AlignmentClassifier::new(config);
    clf.ingest(&level(0.0, 0.0));
    clf.ingest(&level(40.0, 0.0));
    assert_eq!(status_changes(&clf.take_events()), 2);
    assert_eq!(clf.haptics().bursts_scheduled(), 0);
}

#[test]
fn reset_clears_all_history() {
    let mut clf = AlignmentClassifier::default();
    for _ in 0..5 {
        clf.ingest(&level(0.0, 0.0));
    }
    clf.reset();
    assert!(clf.last_result().is_none());
    assert!(clf.take_events().is_empty());
    assert!(clf.haptics().pending().is_empty());
    assert_eq!(clf.samples_ingested(), 0);

    let r = clf.ingest(&level(0.0, 0.0));
    assert!(!r.is_stable);
    assert_eq!(
        clf.take_events(),
        vec![AlignmentEvent::StatusChanged {
            from: None,
            to: AlignmentStatus::Good
        }]
    );
}

#[test]
fn non_finite_sample_is_dropped() {
    let mut clf = AlignmentClassifier::default();
    let before = clf.ingest(&level(1.0, 0.0));
    let after = clf.ingest(&OrientationSample::new(f64::NAN, 0.0, [0.0, 0.0, G]));
    assert_eq!(before, after);
    assert_eq!(clf.samples_ingested(), 1);

    let mut fresh = AlignmentClassifier::default();
    let r = fresh.ingest(&OrientationSample::new(0.0, 0.0, [f64::INFINITY, 0.0, 0.0]));
    assert_eq!(r.status, AlignmentStatus::Bad);
    assert!(fresh.last_result().is_none());
}

#[test]
fn samples_parse_from_sensor_json() {
    let json = r#"[
        {"beta": 0.4, "gamma": -0.2, "alpha": 180.0, "acceleration": [0.01, 0.02, 9.8], "timestamp_ms": 16},
        {"beta": 0.3, "gamma": -0.1, "acceleration": [0.0, 0.0, 9.81]}
    ]"#;
    let samples: Vec<OrientationSample> = serde_json::from_str(json).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1].timestamp_ms, 0);
    let mut clf = AlignmentClassifier::default();
    for s in &samples {
        clf.ingest(s);
    }
    assert_eq!(clf.samples_ingested(), 2);
}

#[test]
fn undrained_event_queue_stays_bounded() {
    let config = AlignmentConfig {
        smoothing_alpha: 1.0,
        ..AlignmentConfig::default()
    };
    let mut clf = AlignmentClassifier::new(config);
    for i in 0..10_000 {
        let beta = if i % 2 == 0 { 0.0 } else { 40.0 };
        clf.ingest(&level(beta, 0.0));
        assert!(clf.pending_events() <= MAX_PENDING_EVENTS);
    }
    assert_eq!(clf.pending_events(), MAX_PENDING_EVENTS);
    assert!(clf.events_dropped() > 0);

    let last_status = clf.last_result().unwrap().status;
    let events = clf.take_events();
    let newest_status = events.iter().rev().find_map(|e| match e {
        AlignmentEvent::StatusChanged { to, .. } => Some(*to),
        _ => None,
    });
    assert_eq!(newest_status, Some(last_status));
    assert_eq!(clf.pending_events(), 0);
}

#[test]
fn try_new_rejects_window_shorter_than_stability_run() {
    let config = AlignmentConfig {
        window_len: 2,
        min_stability_samples: 3,
        ..AlignmentConfig::default()
    };
    let err = AlignmentClassifier::try_new(config).unwrap_err();
    assert!(err.contains("min_stability_samples"));
    assert!(AlignmentClassifier::try_new(AlignmentConfig::default()).is_ok());
}
