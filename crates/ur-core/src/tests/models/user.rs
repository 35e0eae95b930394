use crate::User;

use chrono::Utc;

#[test]
fn test_user_new() {
    let user = User::new("Taro".to_string());

    assert_eq!(user.id, None);
    assert_eq!(user.name, "Taro");
    assert_eq!(user.created_at, user.updated_at);
    assert_eq!(user.deleted_at, None);
    assert!(!user.is_deleted());
    assert!(!user.is_persisted());
}

#[test]
fn test_user_is_deleted() {
    let mut user = User::new("Taro".to_string());

    assert!(!user.is_deleted());

    user.deleted_at = Some(Utc::now());
    assert!(user.is_deleted());
}

#[test]
fn test_user_is_persisted() {
    let mut user = User::new("Taro".to_string());

    assert!(!user.is_persisted());

    user.id = Some(1);
    assert!(user.is_persisted());
}
