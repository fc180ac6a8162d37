//! Loading explorer inputs from files and the shareable query string.

use anyhow::Context;
use log::info;
use rez_core::area::{group_eez_by_territory, parse_areas_json, Area};
use rez_core::catalog::{default_lcoe, LCOE_PARAMETERS, WEIGHTS};
use rez_core::filter::{parse_filters_json, Filter};
use rez_explore::ExploreConfig;
use rez_qs::schema::{filter_field, lcoe_field, weight_field};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub fn load_config(path: Option<&str>, endpoint: Option<&str>) -> anyhow::Result<ExploreConfig> {
    let config = ExploreConfig::load(path.map(Path::new))?;
    let config = match endpoint {
        Some(e) => config.with_endpoint(e),
        None => config,
    };
    info!("Using backend {}", config.api_endpoint);
    Ok(config)
}

pub fn load_areas(path: &str) -> anyhow::Result<Vec<Area>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let areas = parse_areas_json(&json)?;
    info!("Loaded {} areas from {}", areas.len(), path);
    Ok(areas)
}

/// Filter definitions with any values carried by `query` applied.
pub fn load_filters(path: &str, query: &str) -> anyhow::Result<Vec<Filter>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let filters = parse_filters_json(&json)?
        .into_iter()
        .map(|f| filter_field(f).read_from(query))
        .collect();
    Ok(filters)
}

/// EEZ features grouped by territory code.
pub fn load_eez(path: &str) -> anyhow::Result<HashMap<String, Vec<Value>>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let collection: Value = serde_json::from_str(&json)?;
    let features = match collection.get("features") {
        Some(Value::Array(features)) => features.as_slice(),
        _ => anyhow::bail!("{path} is not a FeatureCollection"),
    };
    Ok(group_eez_by_territory(features))
}

/// Scoring weights from `query`, defaults otherwise.
pub fn weights_from_query(query: &str) -> BTreeMap<String, f64> {
    WEIGHTS
        .iter()
        .map(|w| (w.id.to_string(), weight_field(w).read_from(query)))
        .collect()
}

/// LCOE parameters from `query` on top of the default preset. Parameters
/// with neither are left out.
pub fn lcoe_from_query(query: &str) -> BTreeMap<String, f64> {
    let preset = default_lcoe();
    LCOE_PARAMETERS
        .iter()
        .filter_map(|p| {
            let value = lcoe_field(p, preset.get(p.id).copied()).read_from(query)?;
            Some((p.id.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rez_core::encoder::encode;
    use rez_core::resource::Resource;
    use rez_core::units::UnitTable;

    const FILTERS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/filters.json");
    const AREAS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/areas.json");

    #[test]
    fn test_fixture_filters_encode() {
        let filters = load_filters(FILTERS, "").unwrap();
        assert_eq!(
            encode(&filters, Resource::Solar, &UnitTable::default()),
            "f_roads=0,25000&f_pp_whs=false&f_landcover=grassland,shrubland"
        );
        assert_eq!(
            encode(&filters, Resource::Wind, &UnitTable::default()),
            "f_roads=0,25000&f_pp_whs=false"
        );
    }

    #[test]
    fn test_query_overrides_filter_values() {
        let filters = load_filters(FILTERS, "f_roads=5,10&f_slope=0,500").unwrap();
        let encoded = encode(&filters, Resource::Wind, &UnitTable::default());
        assert_eq!(encoded, "f_roads=5000,10000&f_pp_whs=false");
    }

    #[test]
    fn test_fixture_areas() {
        let areas = load_areas(AREAS).unwrap();
        let names: Vec<&str> = areas.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Kenya", "Rift Valley", "Tanzania", "Zambia"]);
        assert_eq!(areas[1].id, "130");
    }

    #[test]
    fn test_weights_from_query() {
        let weights = weights_from_query("slope=0.25&pop_density=7");
        assert_eq!(weights.len(), WEIGHTS.len());
        assert_eq!(weights["slope"], 0.25);
        assert_eq!(weights["pop_density"], 1.0);
    }

    #[test]
    fn test_lcoe_from_query() {
        let lcoe = lcoe_from_query("n=30&landuse=0.5");
        assert_eq!(lcoe["n"], 30.0);
        assert_eq!(lcoe["cg"], 2000.0);
        assert_eq!(lcoe["landuse"], 0.5);
        assert!(!lcoe.contains_key("uf"));
    }
}
