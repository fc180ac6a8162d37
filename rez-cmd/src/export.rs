use log::info;
use rez_db::Database;
use rez_explore::export::ExportOperation;
use rez_explore::{ApiClient, ExploreConfig};

use crate::inputs::load_areas;

/// Start a raw export for `area_id` and remember it in `db` until it is
/// collected.
pub async fn run_export(
    config: &ExploreConfig,
    areas_json: &str,
    area_id: &str,
    operation: &str,
    db: &str,
) -> anyhow::Result<()> {
    let operation: ExportOperation = operation.parse()?;
    let areas = load_areas(areas_json)?;
    let area = areas.iter().find(|a| a.id == area_id);
    if area.is_none() {
        anyhow::bail!("Unknown area '{area_id}'");
    }

    let client = ApiClient::new(config)?;
    let download = client.export_raw_data(area, operation).await?;

    let db = Database::open(db)?;
    db.record_download(&download.to_record())?;
    info!(
        "{} export for {} started at {}",
        download.pretty_operation, download.area_name, download.started_at
    );
    println!("{}", download.id);
    Ok(())
}

pub fn run_downloads(db: &str, remove: Option<&str>) -> anyhow::Result<()> {
    let db = Database::open(db)?;
    if let Some(id) = remove {
        if !db.remove_download(id)? {
            anyhow::bail!("No pending download '{id}'");
        }
        info!("Removed download {id}");
    }
    for d in db.pending_downloads()? {
        println!("{}\t{}\t{}\t{}", d.id, d.area_id, d.operation, d.started_at);
    }
    Ok(())
}
