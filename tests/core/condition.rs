//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Qi.
//! The Qi project belongs to the Dunimd Team.

use qix::{QiApplyCondition, QiConditionArg};

#[test]
fn test_no_condition_normalizes_to_defaults() {
    let condition = QiConditionArg::from(()).normalize();

    assert!(condition.only.is_empty());
    assert!(condition.except.is_empty());
    assert_eq!(condition.times, None);
    assert_eq!(condition.last_status, None);
}

#[test]
fn test_bare_name_becomes_only_list() {
    let condition = QiConditionArg::from("color.text").normalize();

    assert_eq!(condition.only, vec!["color.text"]);
    assert!(condition.except.is_empty());
    assert_eq!(condition.times, None);
    assert_eq!(condition.last_status, None);
}

#[test]
fn test_name_list_becomes_only_list() {
    let condition = QiConditionArg::from(vec!["a", "b"]).normalize();

    assert_eq!(condition.only, vec!["a", "b"]);
    assert!(condition.except.is_empty());
}

#[test]
fn test_partial_condition_keeps_defaults_for_rest() {
    let partial = QiApplyCondition {
        times: Some(2),
        ..QiApplyCondition::default()
    };
    let condition = QiConditionArg::from(partial).normalize();

    assert!(condition.only.is_empty());
    assert!(condition.except.is_empty());
    assert_eq!(condition.times, Some(2));
    assert_eq!(condition.last_status, None);
}

#[test]
fn test_condition_round_trips_through_serde() {
    let condition = QiApplyCondition {
        only: vec!["a".into()],
        except: vec!["b".into()],
        times: Some(3),
        last_status: Some(false),
    };

    let encoded = serde_json::to_string(&condition).unwrap();
    let decoded: QiApplyCondition = serde_json::from_str(&encoded).unwrap();
    assert_eq!(condition, decoded);

    // Omitted fields deserialize to the documented defaults.
    let sparse: QiApplyCondition = serde_json::from_str(r#"{"times": 1}"#).unwrap();
    assert!(sparse.only.is_empty());
    assert_eq!(sparse.times, Some(1));
    assert_eq!(sparse.last_status, None);
}
