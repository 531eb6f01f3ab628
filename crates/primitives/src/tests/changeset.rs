use serde_json::to_string as to_json_string;

use super::{Changeset, MalformedChangeset, Revision};
use crate::addr::{Addr, AddressRange};
use crate::area::AreaUpdate;
use crate::line::Line;

fn line(min: u64, max: u64, text: &str) -> Line {
    Line::new(AddressRange::new(Addr::new(min), Addr::new(max)), "db", text)
}

// -----------------------------------------------------------------------------
// Revision Tests
// -----------------------------------------------------------------------------

#[test]
fn test_revision_starts_at_zero() {
    assert_eq!(Revision::default(), Revision::ZERO);
    assert_eq!(Revision::ZERO.value(), 0);
}

#[test]
fn test_revision_next_is_successor() {
    assert_eq!(Revision::ZERO.next(), Revision::new(1));
    assert_eq!(Revision::new(41).next(), Revision::new(42));
}

#[test]
fn test_revision_display() {
    assert_eq!(Revision::new(7).to_string(), "7");
}

// -----------------------------------------------------------------------------
// Changeset Decode Tests
// -----------------------------------------------------------------------------

#[test]
fn test_changeset_decodes_snapshot_example() {
    let changeset =
        Changeset::decode(r#"{"rev":1,"lines":[[0,3,"db","NOP"],[4,7,"db","RET"]]}"#).unwrap();

    assert_eq!(changeset.rev, Revision::new(1));
    assert_eq!(changeset.areas, None);
    assert_eq!(changeset.lines, Some(vec![line(0, 3, "NOP"), line(4, 7, "RET")]));
}

#[test]
fn test_changeset_decodes_delta_example() {
    let changeset = Changeset::decode(r#"{"rev":2,"lines":[[2,5,"db","JMP"]]}"#).unwrap();

    assert_eq!(changeset.rev, Revision::new(2));
    assert_eq!(changeset.lines, Some(vec![line(2, 5, "JMP")]));
}

#[test]
fn test_changeset_decodes_nested_areas() {
    let changeset =
        Changeset::decode(r#"{"rev":4,"areas":[[1,"Code",[[2,"boot"]]],["rom","ROM"]]}"#).unwrap();

    assert_eq!(
        changeset.areas,
        Some(vec![
            AreaUpdate::internal(1, "Code", vec![AreaUpdate::leaf(2, "boot")]),
            AreaUpdate::leaf("rom", "ROM"),
        ]),
    );
}

#[test]
fn test_changeset_decodes_bare_revision() {
    let changeset = Changeset::decode(r#"{"rev":9}"#).unwrap();

    assert_eq!(changeset.rev, Revision::new(9));
    assert_eq!(changeset.areas, None);
    assert_eq!(changeset.lines, None);
}

#[test]
fn test_changeset_decodes_empty_sections() {
    let changeset = Changeset::decode(r#"{"rev":9,"areas":[],"lines":[]}"#).unwrap();

    assert_eq!(changeset.areas, Some(vec![]));
    assert_eq!(changeset.lines, Some(vec![]));
}

#[test]
fn test_changeset_requires_rev() {
    let result = Changeset::decode(r#"{"lines":[]}"#);
    assert!(matches!(result, Err(MalformedChangeset::Json(_))));
}

#[test]
fn test_changeset_rejects_unknown_fields() {
    let result = Changeset::decode(r#"{"rev":1,"extra":true}"#);
    assert!(matches!(result, Err(MalformedChangeset::Json(_))));
}

#[test]
fn test_changeset_rejects_wrong_line_arity() {
    let result = Changeset::decode(r#"{"rev":1,"lines":[[0,3,"db"]]}"#);
    assert!(matches!(result, Err(MalformedChangeset::Json(_))));
}

// -----------------------------------------------------------------------------
// Changeset Validation Tests
// -----------------------------------------------------------------------------

#[test]
fn test_changeset_rejects_inverted_range() {
    let result = Changeset::decode(r#"{"rev":1,"lines":[[5,2,"db","NOP"]]}"#);
    assert!(matches!(
        result,
        Err(MalformedChangeset::InvertedRange { .. })
    ));
}

#[test]
fn test_changeset_rejects_overlapping_lines() {
    let result = Changeset::decode(r#"{"rev":1,"lines":[[0,10,"db","a"],[5,20,"db","b"]]}"#);
    assert!(matches!(
        result,
        Err(MalformedChangeset::UnorderedLines { .. })
    ));
}

#[test]
fn test_changeset_rejects_touching_lines() {
    // Closed intervals sharing an address overlap at that address.
    let result = Changeset::decode(r#"{"rev":1,"lines":[[0,5,"db","a"],[5,9,"db","b"]]}"#);
    assert!(matches!(
        result,
        Err(MalformedChangeset::UnorderedLines { .. })
    ));
}

#[test]
fn test_changeset_rejects_descending_lines() {
    let result = Changeset::decode(r#"{"rev":1,"lines":[[8,9,"db","a"],[0,1,"db","b"]]}"#);
    assert!(matches!(
        result,
        Err(MalformedChangeset::UnorderedLines { .. })
    ));
}

#[test]
fn test_changeset_rejects_descending_area_ids() {
    let result = Changeset::decode(r#"{"rev":1,"areas":[[2,"b"],[1,"a"]]}"#);
    assert!(matches!(
        result,
        Err(MalformedChangeset::UnorderedAreas { .. })
    ));
}

#[test]
fn test_changeset_rejects_duplicate_area_id_across_levels() {
    let result = Changeset::decode(r#"{"rev":1,"areas":[[1,"a",[[2,"x"]]],[2,"b"]]}"#);
    assert!(matches!(
        result,
        Err(MalformedChangeset::DuplicateArea { .. })
    ));
}

#[test]
fn test_changeset_rejects_delete_with_children() {
    let result = Changeset::decode(r#"{"rev":1,"areas":[[1,null,[[2,"x"]]]]}"#);
    assert!(matches!(
        result,
        Err(MalformedChangeset::DeleteWithChildren { .. })
    ));
}

// -----------------------------------------------------------------------------
// Changeset Encode Tests
// -----------------------------------------------------------------------------

#[test]
fn test_changeset_serializes_without_absent_sections() {
    let changeset = Changeset {
        rev: Revision::new(3),
        areas: None,
        lines: None,
    };

    assert_eq!(to_json_string(&changeset).unwrap(), r#"{"rev":3}"#);
}

#[test]
fn test_changeset_serde_roundtrip() {
    let changeset = Changeset {
        rev: Revision::new(5),
        areas: Some(vec![AreaUpdate::delete(4)]),
        lines: Some(vec![line(0, 3, "NOP")]),
    };

    let encoded = to_json_string(&changeset).unwrap();
    assert_eq!(Changeset::decode(&encoded).unwrap(), changeset);
}
