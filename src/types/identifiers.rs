//! Unique identifier types for the residency allocator
//!
//! Every entity in the housing graph lives in an arena and is addressed by one
//! of these UUID-based identifiers instead of a direct reference. Each type
//! displays and serializes with a short prefix so that snapshots and logs stay
//! readable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Parse an identifier string, accepting both the prefixed and the raw UUID form
fn parse_prefixed(value: &str, prefix: &str) -> Result<Uuid, uuid::Error> {
    match value.strip_prefix(prefix) {
        Some(uuid_str) => Uuid::parse_str(uuid_str),
        // Fallback: raw UUID for snapshots written by hand
        None => Uuid::parse_str(value),
    }
}

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub Uuid);

        impl $name {
            #[doc = concat!("Create a new random ", $what, " ID")]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0.simple())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_prefixed(s.trim(), $prefix).map($name)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                parse_prefixed(&s, $prefix).map($name).map_err(serde::de::Error::custom)
            }
        }
    };
}

prefixed_id!(
    /// Unique identifier for a student
    StudentId,
    "STU_",
    "student"
);

prefixed_id!(
    /// Unique identifier for a residential house
    HouseId,
    "HSE_",
    "house"
);

prefixed_id!(
    /// Unique identifier for a room within a house
    RoomId,
    "ROOM_",
    "room"
);

prefixed_id!(
    /// Unique identifier for an event on a house agenda
    EventId,
    "EVT_",
    "event"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id_creation() {
        let id1 = StudentId::new();
        let id2 = StudentId::new();

        // IDs should be unique
        assert_ne!(id1, id2);

        // Default should create a new ID
        let id3 = StudentId::default();
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_id_display_prefixes() {
        let student = StudentId::new().to_string();
        assert!(student.starts_with("STU_"));
        // STU_ + 32 hex chars
        assert_eq!(student.len(), 36);

        assert!(HouseId::new().to_string().starts_with("HSE_"));
        assert!(RoomId::new().to_string().starts_with("ROOM_"));
        assert!(EventId::new().to_string().starts_with("EVT_"));
    }

    #[test]
    fn test_id_from_str() {
        let house_id = HouseId::new();
        let parsed: HouseId = house_id.to_string().parse().unwrap();
        assert_eq!(parsed, house_id);

        // Surrounding whitespace from CLI input is tolerated
        let padded = format!("  {}  ", house_id);
        assert_eq!(padded.parse::<HouseId>().unwrap(), house_id);

        assert!("STU_not-a-uuid".parse::<StudentId>().is_err());
    }

    #[test]
    fn test_id_serialization() {
        let student_id = StudentId::new();
        let room_id = RoomId::new();

        let student_json = serde_json::to_string(&student_id).unwrap();
        assert!(student_json.contains("STU_"));
        let deserialized: StudentId = serde_json::from_str(&student_json).unwrap();
        assert_eq!(student_id, deserialized);

        let room_json = serde_json::to_string(&room_id).unwrap();
        assert!(room_json.contains("ROOM_"));
        let deserialized: RoomId = serde_json::from_str(&room_json).unwrap();
        assert_eq!(room_id, deserialized);
    }

    #[test]
    fn test_id_deserialization_from_raw_uuid() {
        let raw_uuid = Uuid::new_v4();
        let raw_uuid_str = format!("\"{}\"", raw_uuid);

        let house_id: HouseId = serde_json::from_str(&raw_uuid_str).unwrap();
        assert_eq!(house_id.0, raw_uuid);

        let event_id: EventId = serde_json::from_str(&raw_uuid_str).unwrap();
        assert_eq!(event_id.0, raw_uuid);
    }

    #[test]
    fn test_id_as_map_key() {
        use std::collections::HashMap;

        let id = StudentId::new();
        let mut map = HashMap::new();
        map.insert(id, "Douglas");

        let json = serde_json::to_string(&map).unwrap();
        let back: HashMap<StudentId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&id).map(String::as_str), Some("Douglas"));
    }
}
