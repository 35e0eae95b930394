#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use ur_core::User;

/// Creates an unsaved test user
pub fn create_test_user(name: &str) -> User {
    User::new(name.to_string())
}

/// Creates an unsaved test user with fixed timestamps
pub fn create_dated_test_user(name: &str) -> User {
    let stamp = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
    User {
        id: None,
        name: name.to_string(),
        created_at: stamp,
        updated_at: stamp,
        deleted_at: None,
    }
}
