// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use residency_allocator::*;


// Service surface: persistence and command line
mod cli_argument_parsing_tests;

#[test]
fn test_core_id_types() {
    let student_id = StudentId::new();
    let house_id = HouseId::new();
    let room_id = RoomId::new();
    let event_id = EventId::new();

    // Test that IDs are unique
    assert_ne!(student_id, StudentId::new());
    assert_ne!(house_id, HouseId::new());
    assert_ne!(room_id, RoomId::new());
    assert_ne!(event_id, EventId::new());

    // Test string formatting
    assert!(student_id.to_string().starts_with("STU_"));
    assert!(house_id.to_string().starts_with("HSE_"));
    assert!(room_id.to_string().starts_with("ROOM_"));
    assert!(event_id.to_string().starts_with("EVT_"));
}

#[test]
fn test_ids_parse_back() {
    let student_id = StudentId::new();
    let parsed: StudentId = student_id.to_string().parse().unwrap();
    assert_eq!(parsed, student_id);
}

#[test]
fn test_default_complex_shape() {
    let complex = default_complex().unwrap();

    assert_eq!(complex.house_count(), 4);
    assert_eq!(complex.total_capacity(), 2 + 158 + 171 + 430);
    assert_eq!(complex.roster().len(), 9);
    assert!(complex.validate().is_ok());

    let summary = complex.summary();
    assert_eq!(summary.name, "Maison internationale de la CIUP");
    assert_eq!(summary.residents + summary.waitlisted, 9);
}
