//! Selectable areas (countries and regions) and their resource availability.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::resource::{Resource, RESOURCE_LIST};

/// `[min_lon, min_lat, max_lon, max_lat]`
pub type Bounds = [f64; 4];

/// Property on EEZ features naming the territory they belong to.
pub const EEZ_TERRITORY_KEY: &str = "ISO_TER1";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Country,
    Region,
}

/// A country or region the user can explore.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub area_type: AreaType,
    pub bounds: Option<Bounds>,
    pub available_resources: Vec<Resource>,
    /// Maritime boundary features. `None` until attached; an attached but
    /// empty dataset still counts as having an EEZ.
    pub eez: Option<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBounds {
    Text(String),
    Array(Vec<f64>),
}

#[derive(Deserialize)]
struct RawArea {
    id: Option<Value>,
    gid: Option<String>,
    name: String,
    #[serde(rename = "type")]
    area_type: AreaType,
    bounds: Option<RawBounds>,
    #[serde(default)]
    available_resources: Vec<String>,
}

fn parse_bounds(raw: RawBounds) -> Option<Bounds> {
    let values = match raw {
        RawBounds::Text(s) => s
            .split(',')
            .map(|x| x.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .ok()?,
        RawBounds::Array(v) => v,
    };
    <Bounds>::try_from(values.as_slice()).ok()
}

fn value_to_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Area {
    pub fn is_country(&self) -> bool {
        self.area_type == AreaType::Country
    }

    pub fn has_eez(&self) -> bool {
        self.eez.is_some()
    }

    /// Resources offered for this area. Offshore additionally requires an
    /// attached EEZ dataset.
    pub fn resources(&self) -> Vec<Resource> {
        RESOURCE_LIST
            .iter()
            .copied()
            .filter(|r| self.available_resources.contains(r))
            .filter(|r| !r.is_offshore() || self.has_eez())
            .collect()
    }

    /// Area bounds widened to cover the EEZ features, used when exploring
    /// offshore resources.
    pub fn bounds_with_eez(&self) -> Option<Bounds> {
        let mut acc = self.bounds;
        for feature in self.eez.iter().flatten() {
            if let Some(geometry) = feature.get("geometry") {
                extend_bounds(geometry, &mut acc);
            }
        }
        acc
    }
}

/// Resources offered when `area` is selected. With no area every resource
/// is listed.
pub fn available_resources(area: Option<&Area>) -> Vec<Resource> {
    match area {
        Some(a) => a.resources(),
        None => RESOURCE_LIST.to_vec(),
    }
}

/// Parse the area list, resolving country ids and sorting by name.
pub fn parse_areas_json(json: &str) -> crate::Result<Vec<Area>> {
    let raw: Vec<RawArea> = serde_json::from_str(json)?;
    let mut areas = raw
        .into_iter()
        .filter_map(|a| {
            let id = match a.area_type {
                AreaType::Country => a.gid.clone().or_else(|| a.id.as_ref().and_then(value_to_id)),
                AreaType::Region => a.id.as_ref().and_then(value_to_id).or_else(|| a.gid.clone()),
            };
            let Some(id) = id else {
                warn!("Skipping area '{}' without an id", a.name);
                return None;
            };
            let available_resources = a
                .available_resources
                .iter()
                .filter_map(|name| {
                    let r = Resource::from_display_name(name);
                    if r.is_none() {
                        warn!("Area {}: unknown resource '{}'", id, name);
                    }
                    r
                })
                .collect();
            Some(Area {
                id,
                name: a.name,
                area_type: a.area_type,
                bounds: a.bounds.and_then(parse_bounds),
                available_resources,
                eez: None,
            })
        })
        .collect::<Vec<Area>>();
    areas.sort_by_key(|a| a.name.to_uppercase());
    Ok(areas)
}

/// Group EEZ features by the territory code in their properties.
pub fn group_eez_by_territory(features: &[Value]) -> HashMap<String, Vec<Value>> {
    let mut grouped: HashMap<String, Vec<Value>> = HashMap::new();
    for feature in features {
        let territory = feature
            .get("properties")
            .and_then(|p| p.get(EEZ_TERRITORY_KEY))
            .and_then(value_to_id);
        if let Some(id) = territory {
            grouped.entry(id).or_default().push(feature.clone());
        }
    }
    grouped
}

/// Attach EEZ datasets to areas. Countries receive their features from
/// `by_country` (none if absent). Regions receive the dataset loaded for
/// them in `by_region`, which may be empty.
pub fn attach_eez(
    areas: &mut [Area],
    by_country: &HashMap<String, Vec<Value>>,
    by_region: &HashMap<String, Vec<Value>>,
) {
    for area in areas.iter_mut() {
        area.eez = match area.area_type {
            AreaType::Country => by_country.get(&area.id).cloned(),
            AreaType::Region => by_region.get(&area.id).cloned(),
        };
    }
}

fn extend_bounds(geometry: &Value, acc: &mut Option<Bounds>) {
    match geometry {
        Value::Object(map) => {
            if let Some(coords) = map.get("coordinates") {
                extend_bounds(coords, acc);
            } else if let Some(Value::Array(geometries)) = map.get("geometries") {
                for g in geometries {
                    extend_bounds(g, acc);
                }
            }
        }
        Value::Array(items) => {
            let point = match items.as_slice() {
                [Value::Number(x), Value::Number(y), ..] => x.as_f64().zip(y.as_f64()),
                _ => None,
            };
            match point {
                Some((x, y)) => {
                    *acc = Some(match *acc {
                        Some([min_x, min_y, max_x, max_y]) => {
                            [min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)]
                        }
                        None => [x, y, x, y],
                    });
                }
                None => {
                    for item in items {
                        extend_bounds(item, acc);
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const AREAS: &str = r#"[
        {"gid": "ZMB", "name": "zambia", "type": "country", "bounds": "21.9,-18.1,33.7,-8.2", "available_resources": ["Solar PV", "Wind"]},
        {"id": "east-africa", "name": "East Africa", "type": "region", "bounds": [21.0, -12.0, 52.0, 18.0], "available_resources": ["Solar PV", "Wind", "Off-Shore Wind"]},
        {"gid": "KEN", "name": "Kenya", "type": "country", "available_resources": ["Solar PV", "Wind", "Off-Shore Wind", "Geothermal"]}
    ]"#;

    #[test]
    fn test_parse_areas_sorted_and_resolved() {
        let areas = parse_areas_json(AREAS).unwrap();
        let names: Vec<&str> = areas.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["East Africa", "Kenya", "zambia"]);
        assert_eq!(areas[1].id, "KEN");
        assert_eq!(areas[2].bounds, Some([21.9, -18.1, 33.7, -8.2]));
        assert_eq!(areas[0].bounds, Some([21.0, -12.0, 52.0, 18.0]));
        // unknown resource names are dropped
        assert_eq!(areas[1].available_resources.len(), 3);
    }

    #[test]
    fn test_offshore_requires_eez() {
        let mut areas = parse_areas_json(AREAS).unwrap();
        let kenya = areas.iter().find(|a| a.id == "KEN").unwrap();
        assert_eq!(kenya.resources(), vec![Resource::Solar, Resource::Wind]);

        let features = vec![json!({"properties": {"ISO_TER1": "KEN"}, "geometry": {"type": "Point", "coordinates": [45.0, -3.0]}})];
        let by_country = group_eez_by_territory(&features);
        let mut by_region = HashMap::new();
        by_region.insert("east-africa".to_string(), Vec::new());
        attach_eez(&mut areas, &by_country, &by_region);

        let kenya = areas.iter().find(|a| a.id == "KEN").unwrap();
        assert_eq!(kenya.resources(), RESOURCE_LIST.to_vec());
        let region = areas.iter().find(|a| a.id == "east-africa").unwrap();
        assert!(region.has_eez());
        let zambia = areas.iter().find(|a| a.id == "ZMB").unwrap();
        assert!(!zambia.has_eez());
    }

    #[test]
    fn test_no_area_lists_everything() {
        assert_eq!(available_resources(None), RESOURCE_LIST.to_vec());
    }

    #[test]
    fn test_bounds_with_eez() {
        let mut areas = parse_areas_json(AREAS).unwrap();
        let zambia = areas.iter_mut().find(|a| a.id == "ZMB").unwrap();
        zambia.eez = Some(vec![json!({
            "geometry": {"type": "Polygon", "coordinates": [[[30.0, -20.0], [35.0, -20.0], [35.0, -15.0], [30.0, -20.0]]]}
        })]);
        assert_eq!(zambia.bounds_with_eez(), Some([21.9, -20.0, 35.0, -8.2]));
    }
}
