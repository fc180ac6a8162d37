use log::info;
use rez_core::encoder::encode;
use rez_core::resource::Resource;

use crate::inputs::{load_config, load_filters};

/// Print the filter fragment the tile and zone endpoints would receive.
pub fn run_encode(
    filters_json: &str,
    resource: &str,
    query: Option<&str>,
    config: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_config(config, None)?;
    let resource: Resource = resource.parse()?;
    let filters = load_filters(filters_json, query.unwrap_or_default())?;
    info!("Encoding {} filters for {}", filters.len(), resource);
    println!("{}", encode(&filters, resource, &config.units));
    Ok(())
}
