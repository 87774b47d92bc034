// Zone registry domain model
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_ZONE_COLOR: &str = "#06b6d4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_zone_color")]
    pub color: String,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_zone_color() -> String {
    DEFAULT_ZONE_COLOR.to_string()
}

impl Zone {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: default_zone_color(),
            sort_order: 0,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Lookup of zone id to registry entry, used to resolve display names and
/// colors for chart lines.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: HashMap<i64, Zone>,
}

impl ZoneRegistry {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self {
            zones: zones.into_iter().map(|z| (z.id, z)).collect(),
        }
    }

    /// Display name for a zone; unregistered zones are labelled "Zone {id}".
    pub fn display_name(&self, id: i64) -> String {
        match self.zones.get(&id) {
            Some(zone) => zone.name.clone(),
            None => format!("Zone {}", id),
        }
    }

    pub fn color(&self, id: i64) -> Option<&str> {
        self.zones.get(&id).map(|z| z.color.as_str())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl FromIterator<Zone> for ZoneRegistry {
    fn from_iter<I: IntoIterator<Item = Zone>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
