//! Raw-data exports started on the backend, and zones CSV written locally.

use chrono::{DateTime, Local, Utc};
use rez_core::area::Area;
use rez_core::zone::Zone;
use rez_core::RezError;
use rez_db::downloads::DownloadRecord;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub const RAW_EXPORT_COUNTRY_ONLY: &str = "Raw data exports are restricted to countries at the moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOperation {
    Lcoe,
    Score,
}

impl ExportOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportOperation::Lcoe => "lcoe",
            ExportOperation::Score => "score",
        }
    }

    /// `LCOE`, otherwise the operation in title case.
    pub fn pretty_name(&self) -> &'static str {
        match self {
            ExportOperation::Lcoe => "LCOE",
            ExportOperation::Score => "Score",
        }
    }
}

impl fmt::Display for ExportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportOperation {
    type Err = RezError;

    fn from_str(s: &str) -> rez_core::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lcoe" => Ok(ExportOperation::Lcoe),
            "score" => Ok(ExportOperation::Score),
            _ => Err(RezError::validation("operation", format!("unknown export '{s}'"))),
        }
    }
}

/// The area a raw export may be started for.
pub fn ensure_exportable(area: Option<&Area>) -> rez_core::Result<&Area> {
    match area {
        None => Err(RezError::Precondition("Select an area before exporting.".to_string())),
        Some(a) if !a.is_country() => Err(RezError::Precondition(RAW_EXPORT_COUNTRY_ONLY.to_string())),
        Some(a) => Ok(a),
    }
}

pub fn raw_export_url(
    endpoint: &str,
    area_id: &str,
    operation: ExportOperation,
    capacity_factor: f64,
) -> String {
    format!("{endpoint}/export/{operation}/{area_id}?capacity_factor={capacity_factor}")
}

/// A raw export the backend is preparing.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub id: String,
    pub area_id: String,
    pub area_name: String,
    pub operation: ExportOperation,
    pub pretty_operation: String,
    pub started_at: DateTime<Utc>,
}

impl Download {
    pub fn new(id: String, area: &Area, operation: ExportOperation, started_at: DateTime<Utc>) -> Self {
        Download {
            id,
            area_id: area.id.clone(),
            area_name: area.name.clone(),
            operation,
            pretty_operation: operation.pretty_name().to_string(),
            started_at,
        }
    }

    pub fn to_record(&self) -> DownloadRecord {
        DownloadRecord {
            id: self.id.clone(),
            area_id: self.area_id.clone(),
            operation: self.operation.as_str().to_string(),
            started_at: self.started_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct ZoneRow<'a> {
    id: String,
    name: &'a str,
    zone_score: f64,
    lcoe_usd_mwh: f64,
    zone_output_gwh: f64,
    zone_output_density_mwh_km2: f64,
}

/// `rezoning-<areaId>-zones-<yyyyMMdd-HHmmss>.csv`
pub fn zones_csv_filename(area_id: &str, at: DateTime<Local>) -> String {
    format!("rezoning-{area_id}-zones-{}.csv", at.format("%Y%m%d-%H%M%S"))
}

/// Write one row per zone, with a header.
pub fn write_zones_csv<W: Write>(writer: W, zones: &[Zone]) -> rez_core::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for zone in zones {
        let summary = zone.summary();
        wtr.serialize(ZoneRow {
            id: zone.id_label(),
            name: zone.properties.name.as_deref().unwrap_or(""),
            zone_score: summary.zone_score,
            lcoe_usd_mwh: summary.lcoe,
            zone_output_gwh: summary.zone_output,
            zone_output_density_mwh_km2: summary.zone_output_density,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
