//! Integration tests for move list decoding

use millview_core::{Move, MoveError, MoveList};
use proptest::prelude::*;

#[test]
fn test_simulator_output_round_trip() {
    // Output shape of the path simulator: origin entry first, then flagged moves
    let json = r#"[[0, 0, 0], [0, 0, 5, true], [20, 10, 5, true], [20, 10, -1, false], [40, 10, -1, false]]"#;
    let list = MoveList::from_json_str(json).unwrap();

    assert_eq!(list.len(), 5);
    assert_eq!(list.segment_count(), 4);
    assert_eq!(list.rapid_count(), 2);
    assert!(list.iter().all(Move::is_finite));
    assert_eq!(list.last().map(|m| m.position()), Some((40.0, 10.0, -1.0)));
}

#[test]
fn test_error_reports_first_bad_index() {
    let json = r#"[[0,0,0,false],[1,1,1,false],[2,null,2,false],[3,3]]"#;
    match MoveList::from_json_str(json) {
        Err(MoveError::InvalidMove { index, reason }) => {
            assert_eq!(index, 2);
            assert!(reason.contains("y must be a number"), "{}", reason);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_out_of_range_coordinate_rejected() {
    let json = "[[0,0,0,false],[1e39,0,0,false]]";
    match MoveList::from_json_str(json) {
        Err(MoveError::InvalidMove { index, reason }) => {
            assert_eq!(index, 1);
            assert!(reason.contains("x is out of range"), "{}", reason);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let json = "[[0,-1e300,0]]";
    assert!(matches!(
        MoveList::from_json_str(json),
        Err(MoveError::InvalidMove { index: 0, .. })
    ));

    // Largest f32 values still decode
    assert!(MoveList::from_json_str("[[3.0e38,0,0,true]]").is_ok());
}

proptest! {
    #[test]
    fn prop_segment_count_is_len_minus_one(len in 0usize..64) {
        let list: MoveList = (0..len)
            .map(|i| Move::new(i as f32, 0.0, 0.0, i % 3 == 0))
            .collect();
        prop_assert_eq!(list.segment_count(), len.saturating_sub(1));
        prop_assert!(list.rapid_count() <= list.segment_count());
    }
}
