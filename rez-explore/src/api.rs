//! HTTP client for the zoning backend.

use chrono::Utc;
use log::{info, warn};
use reqwest::{Client, Response};
use rez_core::area::Area;
use rez_core::zone::{parse_zones_json, Zone};
use rez_core::RezError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::ExploreConfig;
use crate::export::{ensure_exportable, raw_export_url, Download, ExportOperation};
use crate::fetch::{FetchRequest, ZoneSource};

#[derive(Serialize)]
struct ZonesBody<'a> {
    weights: &'a BTreeMap<String, f64>,
    lcoe: &'a BTreeMap<String, f64>,
}

fn transport_err(e: reqwest::Error) -> RezError {
    RezError::network(e.status().map(|s| s.as_u16()), e.to_string())
}

async fn checked(response: Response) -> rez_core::Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(RezError::network(
            Some(status.as_u16()),
            format!("Unexpected response ({status})"),
        ));
    }
    response.text().await.map_err(transport_err)
}

pub struct ApiClient {
    client: Client,
    endpoint: String,
    capacity_factor: f64,
}

impl ApiClient {
    pub fn new(config: &ExploreConfig) -> rez_core::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(transport_err)?;
        Ok(ApiClient {
            client,
            endpoint: config.api_endpoint.clone(),
            capacity_factor: config.capacity_factor,
        })
    }

    /// `<endpoint>/zones/<area>/<resource>/<zone type>?<filters>[&offshore=true]`
    pub fn zones_url(&self, request: &FetchRequest) -> String {
        zones_url(&self.endpoint, request)
    }

    /// Ask the backend to prepare a raw export of `area`. Only countries
    /// can be exported; anything else fails before a request is made.
    pub async fn export_raw_data(
        &self,
        area: Option<&Area>,
        operation: ExportOperation,
    ) -> rez_core::Result<Download> {
        let area = ensure_exportable(area)?;
        let url = raw_export_url(&self.endpoint, &area.id, operation, self.capacity_factor);
        info!("Requesting {} export for {}", operation.pretty_name(), area.name);
        let response = self.client.post(&url).send().await.map_err(transport_err)?;
        let body = checked(response).await?;
        let parsed: Value = serde_json::from_str(&body)?;
        let id = match parsed.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                warn!("Export response without an id: {body}");
                return Err(RezError::network(None, "Export response carried no id"));
            }
        };
        Ok(Download::new(id, area, operation, Utc::now()))
    }
}

pub fn zones_url(endpoint: &str, request: &FetchRequest) -> String {
    let mut params: Vec<&str> = Vec::new();
    if !request.filter_string.is_empty() {
        params.push(&request.filter_string);
    }
    if request.resource.is_offshore() {
        params.push("offshore=true");
    }
    let base = format!(
        "{endpoint}/zones/{}/{}/{}",
        request.area_id,
        request.resource.api_name(),
        request.zone_type.api_path()
    );
    if params.is_empty() {
        base
    } else {
        format!("{base}?{}", params.join("&"))
    }
}

impl ZoneSource for ApiClient {
    async fn fetch_zones(&self, request: &FetchRequest) -> rez_core::Result<Vec<Zone>> {
        let url = self.zones_url(request);
        let body = ZonesBody {
            weights: &request.weights,
            lcoe: &request.lcoe,
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;
        let text = checked(response).await?;
        parse_zones_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rez_core::resource::Resource;
    use rez_core::zone_type::ZoneType;

    #[test]
    fn test_zones_url() {
        let mut request = crate::fetch::tests::request("KEN");
        assert_eq!(zones_url("http://api", &request), "http://api/zones/KEN/solar/admin");

        request.resource = Resource::Offshore;
        request.zone_type = ZoneType::Grid(25);
        request.filter_string = "f_roads=0,5000".to_string();
        assert_eq!(
            zones_url("http://api", &request),
            "http://api/zones/KEN/offshore/grid/25?f_roads=0,5000&offshore=true"
        );
    }

    #[tokio::test]
    async fn test_region_export_fails_before_request() {
        let client = ApiClient::new(&ExploreConfig::default()).unwrap();
        let region = Area {
            id: "7".to_string(),
            name: "Coast".to_string(),
            area_type: rez_core::area::AreaType::Region,
            bounds: None,
            available_resources: Vec::new(),
            eez: None,
        };
        let err = client
            .export_raw_data(Some(&region), ExportOperation::Lcoe)
            .await
            .unwrap_err();
        assert!(matches!(err, RezError::Precondition(_)));
    }
}
