use serde_json::{from_value as from_json_value, json, to_value as to_json_value};

use super::{AreaId, AreaUpdate};

// -----------------------------------------------------------------------------
// AreaId Tests
// -----------------------------------------------------------------------------

#[test]
fn test_area_id_orders_integers_before_strings() {
    assert!(AreaId::from(99) < AreaId::from("a"));
    assert!(AreaId::from(1) < AreaId::from(2));
    assert!(AreaId::from("bank0") < AreaId::from("bank1"));
}

#[test]
fn test_area_id_display() {
    assert_eq!(AreaId::from(7).to_string(), "7");
    assert_eq!(AreaId::from("rom").to_string(), "rom");
}

#[test]
fn test_area_id_deserializes_both_wire_shapes() {
    assert_eq!(from_json_value::<AreaId>(json!(7)).unwrap(), AreaId::from(7));
    assert_eq!(
        from_json_value::<AreaId>(json!("rom")).unwrap(),
        AreaId::from("rom")
    );
}

#[test]
fn test_area_id_rejects_negative_and_fractional() {
    assert!(from_json_value::<AreaId>(json!(-1)).is_err());
    assert!(from_json_value::<AreaId>(json!(1.5)).is_err());
}

#[test]
fn test_area_id_serde_roundtrip() {
    assert_eq!(to_json_value(AreaId::from(7)).unwrap(), json!(7));
    assert_eq!(to_json_value(AreaId::from("rom")).unwrap(), json!("rom"));
}

// -----------------------------------------------------------------------------
// AreaUpdate Tests
// -----------------------------------------------------------------------------

#[test]
fn test_area_update_decodes_leaf() {
    let update = from_json_value::<AreaUpdate>(json!(["rom", "ROM"])).unwrap();
    assert_eq!(update, AreaUpdate::leaf("rom", "ROM"));
    assert!(!update.is_delete());
}

#[test]
fn test_area_update_decodes_delete() {
    let update = from_json_value::<AreaUpdate>(json!([3, null])).unwrap();
    assert_eq!(update, AreaUpdate::delete(3));
    assert!(update.is_delete());
}

#[test]
fn test_area_update_decodes_nested_children() {
    let update = from_json_value::<AreaUpdate>(json!([1, "Code", [[2, "boot"], [5, null]]]))
        .unwrap();

    assert_eq!(
        update,
        AreaUpdate::internal(
            1,
            "Code",
            vec![AreaUpdate::leaf(2, "boot"), AreaUpdate::delete(5)],
        ),
    );
}

#[test]
fn test_area_update_rejects_wrong_arity() {
    assert!(from_json_value::<AreaUpdate>(json!([1])).is_err());
    assert!(from_json_value::<AreaUpdate>(json!([1, "a", [], "extra"])).is_err());
}

#[test]
fn test_area_update_rejects_null_children() {
    assert!(from_json_value::<AreaUpdate>(json!([1, "a", null])).is_err());
}

#[test]
fn test_area_update_rejects_non_array() {
    assert!(from_json_value::<AreaUpdate>(json!({"id": 1, "label": "a"})).is_err());
}

#[test]
fn test_area_update_serializes_positionally() {
    assert_eq!(
        to_json_value(AreaUpdate::leaf("rom", "ROM")).unwrap(),
        json!(["rom", "ROM"]),
    );
    assert_eq!(to_json_value(AreaUpdate::delete(3)).unwrap(), json!([3, null]));
    assert_eq!(
        to_json_value(AreaUpdate::internal(1, "Code", vec![AreaUpdate::leaf(2, "boot")]))
            .unwrap(),
        json!([1, "Code", [[2, "boot"]]]),
    );
}
