use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::RangeValue;

/// Per-zone scores computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone_score: f64,
    /// Levelized cost of energy in USD/MWh
    pub lcoe: f64,
    /// Output in GWh
    pub zone_output: f64,
    /// Output density in MWh/km²
    pub zone_output_density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProperties {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    pub summary: ZoneSummary,
}

/// A scored candidate zone, as a GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub geometry: Option<Value>,
    pub properties: ZoneProperties,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ZonesPayload {
    Features(Vec<Zone>),
    Collection { features: Vec<Zone> },
}

impl Zone {
    pub fn summary(&self) -> &ZoneSummary {
        &self.properties.summary
    }

    /// Zone id rendered as text, empty when the feature has none.
    pub fn id_label(&self) -> String {
        match &self.properties.id {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Parse a zones response, either a `FeatureCollection` or a bare array.
pub fn parse_zones_json(json: &str) -> crate::Result<Vec<Zone>> {
    let payload: ZonesPayload = serde_json::from_str(json)?;
    Ok(match payload {
        ZonesPayload::Collection { features } => features,
        ZonesPayload::Features(features) => features,
    })
}

/// `{min, max}` of LCOE across `zones`, `None` when there are none.
pub fn lcoe_range(zones: &[Zone]) -> Option<RangeValue> {
    zones
        .iter()
        .map(|z| z.summary().lcoe)
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<RangeValue>, v| match acc {
            Some(r) => Some(RangeValue::new(r.min.min(v), r.max.max(v))),
            None => Some(RangeValue::new(v, v)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zone_with_lcoe(id: u32, lcoe: f64) -> Zone {
        Zone {
            geometry: None,
            properties: ZoneProperties {
                id: Some(json!(id)),
                name: None,
                summary: ZoneSummary {
                    zone_score: 0.5,
                    lcoe,
                    zone_output: 100.0,
                    zone_output_density: 2.0,
                },
            },
        }
    }

    #[test]
    fn test_lcoe_range() {
        let zones: Vec<Zone> = [10.0, 25.0, 7.0]
            .iter()
            .enumerate()
            .map(|(i, l)| zone_with_lcoe(i as u32, *l))
            .collect();
        assert_eq!(lcoe_range(&zones), Some(RangeValue::new(7.0, 25.0)));
        assert_eq!(lcoe_range(&[]), None);
    }

    #[test]
    fn test_parse_feature_collection() {
        let json = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                "properties": {"id": "z-1", "name": "North", "summary": {
                    "zone_score": 0.9, "lcoe": 42.5, "zone_output": 12.0, "zone_output_density": 3.5
                }}
            }]
        })
        .to_string();
        let zones = parse_zones_json(&json).unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id_label(), "z-1");
        assert_eq!(zones[0].properties.name.as_deref(), Some("North"));
        assert_eq!(zones[0].summary().lcoe, 42.5);
    }

    #[test]
    fn test_parse_bare_array() {
        let json = json!([{"properties": {"id": 7, "summary": {
            "zone_score": 0.1, "lcoe": 80.0, "zone_output": 1.0, "zone_output_density": 0.5
        }}}])
        .to_string();
        let zones = parse_zones_json(&json).unwrap();
        assert_eq!(zones[0].id_label(), "7");
        assert!(zones[0].properties.name.is_none());
    }
}
