//! Tile URL templates handed to the map.

use rez_core::resource::Resource;
use std::collections::BTreeMap;

const TILE_PATH: &str = "{z}/{x}/{y}.png";

fn offshore_flag(resource: Resource) -> &'static str {
    if resource.is_offshore() {
        "&offshore=true"
    } else {
        ""
    }
}

/// Tiles masking out everything the filters exclude.
pub fn filtered_layer_url(
    endpoint: &str,
    area_id: &str,
    resource: Resource,
    filter_string: &str,
    color: &str,
) -> String {
    format!(
        "{endpoint}/filter/{area_id}/{TILE_PATH}?{filter_string}{}&color={color}",
        offshore_flag(resource)
    )
}

/// LCOE output tiles. Relative to the map's tile source.
pub fn output_layer_url(
    area_id: &str,
    resource: Resource,
    filter_string: &str,
    lcoe: &BTreeMap<String, f64>,
    colormap: &str,
) -> String {
    let lcoe_params: String = lcoe.iter().map(|(k, v)| format!("&{k}={v}")).collect();
    format!(
        "{area_id}/{}/{TILE_PATH}?{filter_string}{lcoe_params}{}&colormap={colormap}",
        resource.api_name(),
        offshore_flag(resource)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_layer_url() {
        assert_eq!(
            filtered_layer_url("http://api", "KEN", Resource::Solar, "f_roads=0,5000", "255,0,160,100"),
            "http://api/filter/KEN/{z}/{x}/{y}.png?f_roads=0,5000&color=255,0,160,100"
        );
        assert_eq!(
            filtered_layer_url("http://api", "KEN", Resource::Offshore, "", "1,2,3,4"),
            "http://api/filter/KEN/{z}/{x}/{y}.png?&offshore=true&color=1,2,3,4"
        );
    }

    #[test]
    fn test_output_layer_url() {
        let lcoe = BTreeMap::from([("cg".to_string(), 2000.0), ("crf".to_string(), 1.0)]);
        assert_eq!(
            output_layer_url("KEN", Resource::Wind, "a=1", &lcoe, "viridis"),
            "KEN/wind/{z}/{x}/{y}.png?a=1&cg=2000&crf=1&colormap=viridis"
        );
        assert_eq!(
            output_layer_url("KEN", Resource::Solar, "a=1", &BTreeMap::new(), "viridis"),
            "KEN/solar/{z}/{x}/{y}.png?a=1&colormap=viridis"
        );
    }
}
