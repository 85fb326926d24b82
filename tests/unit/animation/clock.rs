use super::*;

#[test]
fn counter_finishes_after_end_steps() {
    let mut c = Clock::counter(3);
    assert_eq!(c.frame_count(), 3);
    for expected in 0..3 {
        assert!(!c.is_finished());
        assert_eq!(c.value(), f64::from(expected));
        c.advance();
    }
    assert!(c.is_finished());
    assert_eq!(c.value(), 3.0);

    c.advance();
    assert_eq!(c.steps_taken(), 3, "advance stops at the bound");
}

#[test]
fn fractional_step_has_exact_frame_count() {
    let mut c = Clock::new(-15.0, 0.2, 15.0).unwrap();
    assert_eq!(c.frame_count(), 150);
    for _ in 0..149 {
        c.advance();
    }
    assert!(!c.is_finished());
    c.advance();
    assert!(c.is_finished());
    assert!((c.value() - 15.0).abs() < 1e-9);
}

#[test]
fn uneven_span_rounds_up() {
    let c = Clock::new(0.0, 0.3, 1.0).unwrap();
    assert_eq!(c.frame_count(), 4);
}

#[test]
fn seek_clamps_and_reset_rewinds() {
    let mut c = Clock::counter(10);
    c.seek(4);
    assert_eq!(c.value(), 4.0);
    c.seek(99);
    assert_eq!(c.steps_taken(), 10);
    assert!(c.is_finished());
    c.reset();
    assert_eq!(c.value(), 0.0);
    assert!(!c.is_finished());
}

#[test]
fn invalid_bounds_are_rejected() {
    assert!(Clock::new(0.0, 0.0, 1.0).is_err());
    assert!(Clock::new(0.0, -1.0, 1.0).is_err());
    assert!(Clock::new(2.0, 1.0, 1.0).is_err());
    assert!(Clock::new(0.0, 1.0, f64::NAN).is_err());
}

#[test]
fn empty_span_is_finished_immediately() {
    let c = Clock::new(1.0, 1.0, 1.0).unwrap();
    assert_eq!(c.frame_count(), 0);
    assert!(c.is_finished());
}
