//! Tool moves
//!
//! A [`Move`] is one waypoint of the planned tool path. The path is the ordered
//! sequence of waypoints; every consecutive pair is one tool move, classified by
//! the destination's `is_rapid` flag.
//!
//! The wire format produced by the path simulator is a JSON array of
//! `[x, y, z, is_rapid]` tuples, optionally wrapped as `{"moves": [...]}`.
//! The simulator's initial entry has no flag (`[0, 0, 0]`); such entries
//! are read as milling moves.

use crate::error::MoveError;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::ops::Deref;
use tracing::debug;

/// One waypoint of the tool path, in machine millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Move {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Non-cutting repositioning travel
    pub is_rapid: bool,
}

impl Move {
    pub fn new(x: f32, y: f32, z: f32, is_rapid: bool) -> Self {
        Self { x, y, z, is_rapid }
    }

    pub fn milling(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, false)
    }

    pub fn rapid(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, true)
    }

    pub fn position(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn from_value(index: usize, value: &Value) -> Result<Self, MoveError> {
        let invalid = |reason: String| MoveError::InvalidMove { index, reason };

        let items = value
            .as_array()
            .ok_or_else(|| invalid(format!("expected an array, found {}", kind_of(value))))?;

        if items.len() != 3 && items.len() != 4 {
            return Err(invalid(format!(
                "expected 3 or 4 elements, found {}",
                items.len()
            )));
        }

        let mut coords = [0.0f32; 3];
        for (axis, (slot, item)) in ["x", "y", "z"].iter().zip(coords.iter_mut().zip(items)) {
            let value = item.as_f64().ok_or_else(|| {
                invalid(format!("{} must be a number, found {}", axis, kind_of(item)))
            })? as f32;
            // Numbers beyond f32 range saturate to infinity
            if !value.is_finite() {
                return Err(invalid(format!("{} is out of range", axis)));
            }
            *slot = value;
        }

        let is_rapid = match items.get(3) {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(invalid(format!(
                    "rapid flag must be a boolean, found {}",
                    kind_of(other)
                )))
            }
        };

        Ok(Self::new(coords[0], coords[1], coords[2], is_rapid))
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.x)?;
        tuple.serialize_element(&self.y)?;
        tuple.serialize_element(&self.z)?;
        tuple.serialize_element(&self.is_rapid)?;
        tuple.end()
    }
}

impl From<(f32, f32, f32, bool)> for Move {
    fn from((x, y, z, is_rapid): (f32, f32, f32, bool)) -> Self {
        Self::new(x, y, z, is_rapid)
    }
}

/// Ordered, immutable sequence of tool path waypoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MoveList(Vec<Move>);

impl MoveList {
    pub fn new(moves: Vec<Move>) -> Self {
        Self(moves)
    }

    /// Decode the simulator's JSON output.
    pub fn from_json_str(json: &str) -> Result<Self, MoveError> {
        let value: Value = serde_json::from_str(json).map_err(|e| MoveError::Malformed {
            reason: e.to_string(),
        })?;
        Self::from_json_value(&value)
    }

    /// Decode an already parsed JSON document (bare array or `{"moves": [...]}`).
    pub fn from_json_value(value: &Value) -> Result<Self, MoveError> {
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(map) => match map.get("moves") {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(MoveError::Malformed {
                        reason: format!("\"moves\" must be an array, found {}", kind_of(other)),
                    })
                }
                None => {
                    return Err(MoveError::Malformed {
                        reason: "object has no \"moves\" field".to_string(),
                    })
                }
            },
            other => {
                return Err(MoveError::Malformed {
                    reason: format!("expected an array or object, found {}", kind_of(other)),
                })
            }
        };

        let moves = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Move::from_value(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = moves.len(), "decoded move list");
        Ok(Self(moves))
    }

    pub fn to_json_string(&self) -> String {
        // Serializing f32/bool tuples cannot fail.
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// Number of tool moves (consecutive waypoint pairs) in the path.
    pub fn segment_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn rapid_count(&self) -> usize {
        self.0.iter().skip(1).filter(|m| m.is_rapid).count()
    }

    pub fn into_inner(self) -> Vec<Move> {
        self.0
    }
}

impl Deref for MoveList {
    type Target = [Move];

    fn deref(&self) -> &[Move] {
        &self.0
    }
}

impl From<Vec<Move>> for MoveList {
    fn from(moves: Vec<Move>) -> Self {
        Self(moves)
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let list = MoveList::from_json_str("[[0,0,0,false],[10,0,0,false],[10,0,5,true]]")
            .unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[1], Move::milling(10.0, 0.0, 0.0));
        assert_eq!(list[2], Move::rapid(10.0, 0.0, 5.0));
        assert_eq!(list.segment_count(), 2);
        assert_eq!(list.rapid_count(), 1);
    }

    #[test]
    fn test_parse_envelope_and_origin_entry() {
        let list = MoveList::from_json_str(r#"{"moves": [[0, 0, 0], [1.5, -2, 3, true]]}"#)
            .unwrap();
        assert_eq!(list[0], Move::milling(0.0, 0.0, 0.0));
        assert_eq!(list[1], Move::rapid(1.5, -2.0, 3.0));
    }

    #[test]
    fn test_rejects_bad_entries() {
        let err = MoveList::from_json_str("[[0,0,0,false],[1,2]]").unwrap_err();
        assert_eq!(
            err,
            MoveError::InvalidMove {
                index: 1,
                reason: "expected 3 or 4 elements, found 2".to_string()
            }
        );

        let err = MoveList::from_json_str(r#"[["a",0,0,false]]"#).unwrap_err();
        assert!(matches!(err, MoveError::InvalidMove { index: 0, .. }));

        let err = MoveList::from_json_str("[[0,0,0,1]]").unwrap_err();
        assert!(err.to_string().contains("rapid flag must be a boolean"));
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            MoveList::from_json_str("not json"),
            Err(MoveError::Malformed { .. })
        ));
        assert!(matches!(
            MoveList::from_json_str(r#"{"path": []}"#),
            Err(MoveError::Malformed { .. })
        ));
        assert!(matches!(
            MoveList::from_json_str("42"),
            Err(MoveError::Malformed { .. })
        ));
    }

    #[test]
    fn test_empty_and_single() {
        let empty = MoveList::from_json_str("[]").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.segment_count(), 0);

        let single = MoveList::from_json_str("[[1,2,3,true]]").unwrap();
        assert_eq!(single.segment_count(), 0);
        assert_eq!(single.rapid_count(), 0);
    }

    #[test]
    fn test_serializes_as_tuples() {
        let list = MoveList::new(vec![Move::milling(0.0, 0.0, 0.0), Move::rapid(1.0, 2.0, 3.0)]);
        let json = list.to_json_string();
        assert_eq!(json, "[[0.0,0.0,0.0,false],[1.0,2.0,3.0,true]]");
        assert_eq!(MoveList::from_json_str(&json).unwrap(), list);
    }
}
