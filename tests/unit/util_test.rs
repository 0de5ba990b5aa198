//! Tests for utility functions

use std::time::Duration;

use control_tower::core::{mean, Category};
use control_tower::util::{now_ms, variation_bounds_ms, RunClock};

#[test]
fn test_now_ms_is_recent() {
    // 2020-01-01 in milliseconds.
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_run_clock_advances() {
    let clock = RunClock::start();
    std::thread::sleep(Duration::from_millis(10));
    assert!(clock.elapsed_secs() >= 0.01);
}

#[test]
fn test_variation_bounds_match_defaults() {
    assert_eq!(variation_bounds_ms(2500, 15), (2125, 2875));
    assert_eq!(variation_bounds_ms(5000, 15), (4250, 5750));
}

#[test]
fn test_mean() {
    assert!((mean(&[1.0, 2.0, 3.0, 6.0]) - 3.0).abs() < 1e-9);
}

#[test]
fn test_category_display() {
    let labels: Vec<String> = Category::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
}
