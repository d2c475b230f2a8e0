//! Tests for registry update plan derivation and persistence

use widget_forge::generation::registry::{
    RegistryPlanner, LIBRARY_PLAN_KEY_PREFIX, TYPES_PLAN_KEY_PREFIX, WIDGET_PLAN_KEY_PREFIX,
};
use widget_forge::generation::{RegistryUpdatePlan, UpdateChange};
use widget_forge::store::KeyValueStore;

use super::common::memory_store;

#[test]
fn test_plan_registration_persists_three_records() {
    let store = memory_store();
    let planner = RegistryPlanner::new(store.clone());

    planner
        .plan_registration("moving-average-chart", "Moving Average Chart")
        .unwrap();

    for prefix in [
        WIDGET_PLAN_KEY_PREFIX,
        TYPES_PLAN_KEY_PREFIX,
        LIBRARY_PLAN_KEY_PREFIX,
    ] {
        let key = format!("{}moving-average-chart", prefix);
        let json = store.get(&key).unwrap();
        assert!(json.is_some(), "missing update plan key {}", key);

        // Stored records parse back into plan shapes
        let plan: RegistryUpdatePlan = serde_json::from_str(&json.unwrap()).unwrap();
        assert!(!plan.changes.is_empty());
        assert!(!plan.file.is_empty());
    }
}

#[test]
fn test_plans_are_derived_from_inputs_only() {
    let planner_a = RegistryPlanner::new(memory_store());
    let planner_b = RegistryPlanner::new(memory_store());

    let plans_a = planner_a
        .plan_registration("rsi-gauge", "RSI Gauge")
        .unwrap();
    let plans_b = planner_b
        .plan_registration("rsi-gauge", "RSI Gauge")
        .unwrap();

    assert_eq!(plans_a, plans_b);
}

#[test]
fn test_type_union_plan_names_the_literal() {
    let planner = RegistryPlanner::new(memory_store());
    let plans = planner
        .plan_registration("alert-feed", "Alert Feed")
        .unwrap();

    assert_eq!(plans.types.changes.len(), 1);
    match &plans.types.changes[0] {
        UpdateChange::AddUnionMember { literal } => assert_eq!(literal, "alert-feed"),
        other => panic!("expected union member change, got {:?}", other),
    }
}

#[test]
fn test_plans_serialize_with_change_type_tags() {
    let planner = RegistryPlanner::new(memory_store());
    let plans = planner
        .plan_registration("alert-feed", "Alert Feed")
        .unwrap();

    let json = serde_json::to_string(&plans.widget).unwrap();
    assert!(json.contains(r#""type":"add_import""#));
    assert!(json.contains(r#""type":"add_dispatch_case""#));
}
