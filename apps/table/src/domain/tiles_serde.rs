//! Serialization and deserialization for tile types

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::tiles_types::{Tile, Wind};

// Tile serde (compact 2-character symbol like "5m", "7z")
impl Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid tile: {s}")))
    }
}

// Wind serde
impl Serialize for Wind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            Wind::East => "EAST",
            Wind::South => "SOUTH",
            Wind::West => "WEST",
            Wind::North => "NORTH",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for Wind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "EAST" => Ok(Wind::East),
            "SOUTH" => Ok(Wind::South),
            "WEST" => Ok(Wind::West),
            "NORTH" => Ok(Wind::North),
            _ => Err(serde::de::Error::custom(format!("Invalid wind: {s}"))),
        }
    }
}
