//! Generate zones for one area the way the explore page does.

use chrono::Local;
use log::info;
use rez_core::resource::Resource;
use rez_core::zone_type::ZoneType;
use rez_db::{KeyValueStore, MemoryStore};
use rez_explore::coordinator::generate_zones;
use rez_explore::export::{write_zones_csv, zones_csv_filename};
use rez_explore::{ApiClient, ExploreCoordinator, FetchState};
use rez_qs::SharedQuery;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;

use crate::inputs::{
    lcoe_from_query, load_areas, load_config, load_eez, load_filters, weights_from_query,
};

pub struct ZonesArgs {
    pub areas_json: String,
    pub filters_json: Option<String>,
    pub eez_json: Option<String>,
    pub query: Option<String>,
    pub area: Option<String>,
    pub resource: Option<String>,
    pub zone_type: Option<String>,
    pub csv: Option<String>,
    pub config: Option<String>,
    pub endpoint: Option<String>,
}

/// Select the area, resource and zone type, request zones and report them.
///
/// The resulting shareable query string is printed last, so it can be fed
/// back with `--query`.
pub async fn run_zones(args: ZonesArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.endpoint.as_deref())?;
    let areas = load_areas(&args.areas_json)?;
    let eez = match &args.eez_json {
        Some(path) => load_eez(path)?,
        None => HashMap::new(),
    };

    let url = SharedQuery::new(args.query.as_deref().unwrap_or_default());
    let state: Box<dyn KeyValueStore> = Box::new(MemoryStore::default());
    let mut coordinator = ExploreCoordinator::new(config.clone(), areas, url.clone(), state)?;
    coordinator.initialize_areas(&eez, &HashMap::new());

    if let Some(area) = &args.area {
        coordinator.select_area(Some(area.as_str()))?;
    }
    if let Some(resource) = &args.resource {
        coordinator.select_resource(Some(resource.parse::<Resource>()?))?;
    }
    if let Some(zone_type) = &args.zone_type {
        coordinator.select_zone_type(Some(zone_type.parse::<ZoneType>()?));
    }

    let query = url.get();
    let filters = match &args.filters_json {
        Some(path) => load_filters(path, &query)?,
        None => Vec::new(),
    };
    let weights = weights_from_query(&query);
    let lcoe = lcoe_from_query(&query);

    let client = ApiClient::new(&config)?;
    let coordinator = RefCell::new(coordinator);
    generate_zones(&coordinator, &client, &filters, &weights, &lcoe).await?;

    let coordinator = coordinator.borrow();
    if let Some(layer) = coordinator.filtered_layer_url() {
        info!("Filtered layer: {layer}");
    }
    if let Some(layer) = coordinator.output_layer_url() {
        info!("Output layer: {layer}");
    }

    let zones = match coordinator.zones().state() {
        FetchState::Ready(_, zones) => zones,
        FetchState::Failed(_, e) => match e.status {
            Some(status) => anyhow::bail!("Zones request failed ({status}): {}", e.message),
            None => anyhow::bail!("Zones request failed: {}", e.message),
        },
        other => anyhow::bail!("Zones request did not complete ({})", other.name()),
    };

    let lcoe_bound = coordinator.max_lcoe();
    match lcoe_bound.range_value().filter(|_| lcoe_bound.active) {
        Some(range) => println!("{} zones, LCOE {} - {} USD/MWh", zones.len(), range.min, range.max),
        None => println!("{} zones", zones.len()),
    }

    if let Some(csv) = &args.csv {
        let path = if csv == "-" {
            let area_id = coordinator.selected_area_id().unwrap_or_default();
            zones_csv_filename(&area_id, Local::now())
        } else {
            csv.clone()
        };
        write_zones_csv(File::create(&path)?, zones)?;
        println!("Wrote {path}");
    }

    println!("?{}", url.get());
    Ok(())
}
