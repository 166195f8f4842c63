use refurboard_calib::{
    finalize_calibration, CalibrationProfile, CalibrationSession, CameraOrientation, CornerName,
    CornerObservation, DwellCollector, DwellParams, HomographyMapping, LearnedThresholds,
    MappingError, RefurboardConfig,
};
use refurboard_core::{NormalizedCoordinate, PixelCoordinate, ScreenBounds, SurfaceSize};
use refurboard_detect::IrBlob;

const CAMERA: SurfaceSize = SurfaceSize::new(1000.0, 800.0);

fn square_profile(bounds: ScreenBounds) -> CalibrationProfile {
    let mut session = CalibrationSession::new();
    for (x, y) in [(0.0, 0.0), (1000.0, 0.0), (1000.0, 800.0), (0.0, 800.0)] {
        session.record_point(PixelCoordinate::new(x, y), CAMERA);
    }
    session
        .to_outcome(SurfaceSize::from(bounds))
        .unwrap()
        .into_profile(1_700_000_000.0, "usb-cam")
}

#[test]
fn frame_centre_projects_to_screen_centre() {
    let profile = square_profile(ScreenBounds::new(1920, 1080));
    let mapping = HomographyMapping::try_from_profile(&profile).unwrap();

    let p = mapping.try_project(PixelCoordinate::new(500.0, 400.0)).unwrap();
    assert!((p.x - 960.0).abs() < 2.0, "{p:?}");
    assert!((p.y - 540.0).abs() < 2.0, "{p:?}");

    let n = mapping
        .try_project_normalized(PixelCoordinate::new(500.0, 400.0))
        .unwrap();
    assert!((n.x - 0.5).abs() < 1e-3 && (n.y - 0.5).abs() < 1e-3);
}

#[test]
fn projection_is_bit_identical_across_calls() {
    let mapping =
        HomographyMapping::try_from_profile(&square_profile(ScreenBounds::new(1280, 720))).unwrap();
    let q = PixelCoordinate::new(123.456, 654.321);
    let a = mapping.try_project(q).unwrap();
    let b = mapping.try_project(q).unwrap();
    assert_eq!(a.x.to_bits(), b.x.to_bits());
    assert_eq!(a.y.to_bits(), b.y.to_bits());
}

#[test]
fn three_corners_report_missing_observations() {
    let mut profile = square_profile(ScreenBounds::new(1920, 1080));
    profile.corners.truncate(3);
    let err = HomographyMapping::try_from_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("missing four corner observations"));
}

#[test]
fn zero_bounds_report_invalid_dimensions() {
    let profile = square_profile(ScreenBounds::new(0, 1080));
    let err = HomographyMapping::try_from_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("invalid screen dimensions"));
}

#[test]
fn full_capture_round_trips_through_finalize() {
    let mut session = CalibrationSession::new();
    let keystone = [(210.0, 95.0), (1060.0, 130.0), (1180.0, 640.0), (120.0, 610.0)];
    let camera = SurfaceSize::new(1280.0, 720.0);
    for (x, y) in keystone {
        session.record_point(PixelCoordinate::new(x, y), camera);
    }
    assert!(session.is_complete());

    let outcome = session.to_outcome(SurfaceSize::new(1600.0, 900.0)).unwrap();
    let (profile, mapping) = finalize_calibration(outcome, 10.0, "cam").unwrap();
    assert!(profile.is_usable());
    assert!(profile.reprojection_error.unwrap() < 1e-4);

    for (name, (x, y)) in CornerName::CLOCKWISE.iter().zip(keystone) {
        let expected = name.canonical_target().to_pixel(mapping.screen_bounds());
        let got = mapping.try_project(PixelCoordinate::new(x, y)).unwrap();
        assert!((got.x - expected.x).abs() < 1e-4, "{name}");
        assert!((got.y - expected.y).abs() < 1e-4, "{name}");
    }
}

#[test]
fn config_round_trip_keeps_the_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("refurboard.json");

    let mut cfg = RefurboardConfig::load_or_default(&path).unwrap();
    assert!(path.exists());
    assert_eq!(cfg, RefurboardConfig::default());

    cfg.replace_calibration(square_profile(ScreenBounds::new(1920, 1080)))
        .unwrap();
    cfg.write_json(&path).unwrap();

    let back = RefurboardConfig::load_json(&path).unwrap();
    assert_eq!(back, cfg);
    let stored = back.calibration.as_ref().unwrap();
    assert_eq!(stored.screen_bounds, ScreenBounds::new(1920, 1080));
    assert_eq!(stored.camera_orientation, Some(CameraOrientation::Upright));
    assert!(stored.reprojection_error.is_some());
    assert!(back.build_mapping().is_ok());
}

#[test]
fn invalid_profile_never_replaces_the_current_one() {
    let mut cfg = RefurboardConfig::default();
    let good = square_profile(ScreenBounds::new(1920, 1080));
    cfg.replace_calibration(good).unwrap();
    let before = cfg.calibration.clone();

    let mut bad = square_profile(ScreenBounds::new(1920, 1080));
    bad.corners[1] = CornerObservation {
        name: CornerName::TopLeft,
        pixel: PixelCoordinate::new(3.0, 3.0),
        normalized: NormalizedCoordinate::default(),
    };
    assert_eq!(
        cfg.replace_calibration(bad).unwrap_err(),
        MappingError::MissingCorner(CornerName::TopRight)
    );
    assert_eq!(cfg.calibration, before);
}

#[test]
fn dwell_points_feed_learned_detector_thresholds() {
    let mut collector = DwellCollector::new(DwellParams {
        dwell_frames: 3,
        ..DwellParams::default()
    });
    let mut points = Vec::new();
    for (x, y, intensity) in [(50.0, 50.0, 0.7), (900.0, 60.0, 0.8), (880.0, 700.0, 0.9)] {
        let blob = IrBlob {
            pixel: PixelCoordinate::new(x, y),
            area: 16.0,
            intensity,
            confidence: 0.8,
        };
        let mut locked = None;
        for _ in 0..3 {
            locked = collector.feed(std::slice::from_ref(&blob));
        }
        points.push(locked.expect("locked after three frames"));
    }

    let learned = LearnedThresholds::from_points(&points).unwrap();
    let mut cfg = RefurboardConfig::default();
    let mut profile = square_profile(ScreenBounds::new(1920, 1080));
    profile.learned = Some(learned);
    cfg.replace_calibration(profile).unwrap();

    let params = cfg.build_detector_params();
    assert!((params.threshold.intensity - learned.intensity_min).abs() < 1e-12);
    assert!(cfg.build_detector().is_ok());

    cfg.detection.prefer_learned = false;
    assert_eq!(cfg.effective_threshold(), cfg.detection.threshold);
}
