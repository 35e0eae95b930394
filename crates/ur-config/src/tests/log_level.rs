use crate::LogLevel;

use std::str::FromStr;

use googletest::assert_that;
use googletest::prelude::eq;
use log::LevelFilter;

#[test]
fn given_known_levels_when_parsed_then_maps_to_level_filter() {
    assert_that!(LogLevel::from_str("off").unwrap().0, eq(LevelFilter::Off));
    assert_that!(LogLevel::from_str("error").unwrap().0, eq(LevelFilter::Error));
    assert_that!(LogLevel::from_str("warn").unwrap().0, eq(LevelFilter::Warn));
    assert_that!(LogLevel::from_str("info").unwrap().0, eq(LevelFilter::Info));
    assert_that!(LogLevel::from_str("debug").unwrap().0, eq(LevelFilter::Debug));
    assert_that!(LogLevel::from_str("trace").unwrap().0, eq(LevelFilter::Trace));
}

#[test]
fn given_mixed_case_when_parsed_then_still_recognized() {
    assert_that!(LogLevel::from_str("DEBUG").unwrap().0, eq(LevelFilter::Debug));
}

#[test]
fn given_unknown_level_when_parsed_then_defaults_to_info() {
    assert_that!(LogLevel::from_str("noisy").unwrap().0, eq(LevelFilter::Info));
}
