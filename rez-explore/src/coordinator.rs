//! Explore page state: the selection held in the URL, the derived layer
//! URLs and the zones request.

use log::{debug, info};
use rez_core::area::{attach_eez, available_resources, Area, Bounds};
use rez_core::encoder::encode;
use rez_core::filter::{Filter, FilterKind, FilterValue, RangeValue};
use rez_core::resource::Resource;
use rez_core::zone::{lcoe_range, Zone};
use rez_core::zone_type::ZoneType;
use rez_core::RezError;
use rez_db::kv::KeyValueStore;
use rez_db::tour::TourProgress;
use rez_qs::schema::{
    area_id_field, lcoe_filter, max_lcoe_field, max_zone_score_field, resource_field,
    zone_type_field, AREA_KEY,
};
use rez_qs::{QsKey, QueryHost, QueryStateStore};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::config::ExploreConfig;
use crate::fetch::{FetchRequest, Ticket, ZoneFetchMachine, ZoneSource};
use crate::layers::{filtered_layer_url, output_layer_url};

pub struct ExploreCoordinator {
    config: ExploreConfig,
    areas: Vec<Area>,
    areas_initialized: bool,
    available: Rc<RefCell<Vec<Resource>>>,
    zone_types: Vec<ZoneType>,
    store: QueryStateStore,
    max_zone_score: QsKey<Filter>,
    max_lcoe: QsKey<Filter>,
    area_id: QsKey<Option<String>>,
    resource: QsKey<Option<Resource>>,
    zone_type: QsKey<Option<ZoneType>>,
    machine: ZoneFetchMachine,
    filter_string: String,
    filtered_layer_url: Option<String>,
    output_layer_url: Option<String>,
    tour: TourProgress,
}

impl ExploreCoordinator {
    /// Bind the explorer to `host`'s query string. Resource availability is
    /// not enforced until [`initialize_areas`](Self::initialize_areas) has
    /// run.
    pub fn new(
        config: ExploreConfig,
        areas: Vec<Area>,
        host: impl QueryHost + 'static,
        kv: Box<dyn KeyValueStore>,
    ) -> rez_core::Result<Self> {
        let available = Rc::new(RefCell::new(available_resources(None)));
        let zone_types = ZoneType::all();
        let mut store = QueryStateStore::new(host);

        let max_zone_score = store.register(max_zone_score_field())?;
        let max_lcoe = store.register(max_lcoe_field())?;
        let area_id = store.register(area_id_field(areas.iter().map(|a| a.id.clone()).collect()))?;
        let in_list = Rc::clone(&available);
        let resource = store.register(resource_field(move |r| in_list.borrow().contains(&r)))?;
        let zone_type = store.register(zone_type_field(zone_types.clone()))?;

        Ok(ExploreCoordinator {
            config,
            areas,
            areas_initialized: false,
            available,
            zone_types,
            store,
            max_zone_score,
            max_lcoe,
            area_id,
            resource,
            zone_type,
            machine: ZoneFetchMachine::new(),
            filter_string: String::new(),
            filtered_layer_url: None,
            output_layer_url: None,
            tour: TourProgress::load(kv),
        })
    }

    /// Attach EEZ datasets and start enforcing resource availability.
    pub fn initialize_areas(
        &mut self,
        eez_by_country: &HashMap<String, Vec<Value>>,
        eez_by_region: &HashMap<String, Vec<Value>>,
    ) {
        attach_eez(&mut self.areas, eez_by_country, eez_by_region);
        self.areas_initialized = true;
        info!("Initialized {} areas", self.areas.len());
        self.update_available_resources();
    }

    pub fn config(&self) -> &ExploreConfig {
        &self.config
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn zone_types(&self) -> &[ZoneType] {
        &self.zone_types
    }

    pub fn available_resources(&self) -> Vec<Resource> {
        self.available.borrow().clone()
    }

    /// The current query string, as published to the host.
    pub fn query(&self) -> String {
        self.store.query()
    }

    pub fn selected_area_id(&self) -> Option<String> {
        self.store.get(&self.area_id)
    }

    pub fn selected_area(&self) -> Option<&Area> {
        let id = self.selected_area_id()?;
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn selected_resource(&self) -> Option<Resource> {
        self.store.get(&self.resource)
    }

    pub fn selected_zone_type(&self) -> Option<ZoneType> {
        self.store.get(&self.zone_type)
    }

    pub fn select_area(&mut self, id: Option<&str>) -> rez_core::Result<()> {
        if let Some(id) = id {
            if !self.areas.iter().any(|a| a.id == id) {
                return Err(RezError::validation(AREA_KEY, format!("unknown area '{id}'")));
            }
        }
        self.store.set(&self.area_id, id.map(str::to_string));
        self.area_changed();
        Ok(())
    }

    pub fn select_resource(&mut self, resource: Option<Resource>) -> rez_core::Result<()> {
        if let Some(r) = resource {
            if !self.available.borrow().contains(&r) {
                return Err(RezError::validation(
                    self.resource.name(),
                    format!("{r} is not available here"),
                ));
            }
        }
        self.store.set(&self.resource, resource);
        Ok(())
    }

    pub fn select_zone_type(&mut self, zone_type: Option<ZoneType>) {
        self.store.set(&self.zone_type, zone_type);
    }

    /// Pick up an external change to the query string.
    pub fn navigate(&mut self) {
        let changed = self.store.sync();
        if changed.is_empty() {
            return;
        }
        debug!("Navigation changed {}", changed.join(", "));
        if changed.iter().any(|k| k == AREA_KEY) {
            // resourceId was validated against the previous area's resources
            self.refresh_available();
            self.store.rehydrate(&self.resource);
            self.area_changed();
        } else {
            self.update_available_resources();
        }
    }

    fn area_changed(&mut self) {
        self.machine.invalidate();
        self.sync_lcoe_bound();
        self.update_available_resources();
    }

    fn refresh_available(&mut self) {
        if self.areas_initialized {
            let resources = available_resources(self.selected_area());
            *self.available.borrow_mut() = resources;
        }
    }

    fn update_available_resources(&mut self) {
        if !self.areas_initialized {
            return;
        }
        self.refresh_available();
        if let Some(r) = self.selected_resource() {
            if !self.available.borrow().contains(&r) {
                info!("{r} is not available for this area, clearing selection");
                self.store.set(&self.resource, None);
            }
        }
    }

    /// Bounding box to fit the map to. Offshore exploration also covers the
    /// area's EEZ.
    pub fn selected_area_bounds(&self) -> Option<Bounds> {
        let area = self.selected_area()?;
        match self.selected_resource() {
            Some(r) if r.is_offshore() => area.bounds_with_eez(),
            _ => area.bounds,
        }
    }

    pub fn max_zone_score(&self) -> Filter {
        self.store.get(&self.max_zone_score)
    }

    pub fn set_max_zone_score(&mut self, filter: Filter) {
        self.store.set(&self.max_zone_score, filter);
    }

    pub fn max_lcoe(&self) -> Filter {
        self.store.get(&self.max_lcoe)
    }

    pub fn set_max_lcoe(&mut self, filter: Filter) {
        self.store.set(&self.max_lcoe, filter);
    }

    pub fn filter_string(&self) -> &str {
        &self.filter_string
    }

    pub fn filtered_layer_url(&self) -> Option<&str> {
        self.filtered_layer_url.as_deref()
    }

    pub fn output_layer_url(&self) -> Option<&str> {
        self.output_layer_url.as_deref()
    }

    pub fn zones(&self) -> &ZoneFetchMachine {
        &self.machine
    }

    /// Ready zones that pass the active output filters.
    pub fn visible_zones(&self) -> Vec<&Zone> {
        let active_range = |f: Filter| f.range_value().filter(|_| f.active);
        let score = active_range(self.max_zone_score());
        let lcoe = active_range(self.max_lcoe());
        let within = |range: Option<RangeValue>, v: f64| range.is_none_or(|r| r.min <= v && v <= r.max);
        self.machine
            .data()
            .unwrap_or_default()
            .iter()
            .filter(|z| within(score, z.summary().zone_score) && within(lcoe, z.summary().lcoe))
            .collect()
    }

    /// Encode `filters`, rebuild both layer URLs and submit a zones request.
    pub fn update_filtered_layer(
        &mut self,
        filters: &[Filter],
        weights: &BTreeMap<String, f64>,
        lcoe: &BTreeMap<String, f64>,
    ) -> rez_core::Result<Ticket> {
        let (Some(area_id), Some(resource)) = (self.selected_area_id(), self.selected_resource())
        else {
            return Err(RezError::Precondition(
                "Select an area and a resource before generating zones.".to_string(),
            ));
        };
        let Some(zone_type) = self.selected_zone_type() else {
            return Err(RezError::Precondition(
                "Select a zone type before generating zones.".to_string(),
            ));
        };

        self.filter_string = encode(filters, resource, &self.config.units);
        self.filtered_layer_url = Some(filtered_layer_url(
            &self.config.api_endpoint,
            &area_id,
            resource,
            &self.filter_string,
            &self.config.filter_color,
        ));
        self.output_layer_url = Some(output_layer_url(
            &area_id,
            resource,
            &self.filter_string,
            lcoe,
            &self.config.colormap,
        ));

        let ticket = self.machine.submit(FetchRequest {
            area_id,
            resource,
            zone_type,
            filter_string: self.filter_string.clone(),
            weights: weights.clone(),
            lcoe: lcoe.clone(),
        });
        self.sync_lcoe_bound();
        Ok(ticket)
    }

    /// Feed a zones response back. Returns whether it was current.
    pub fn resolve_zones(&mut self, ticket: &Ticket, result: rez_core::Result<Vec<Zone>>) -> bool {
        let applied = self.machine.resolve(ticket, result);
        if applied {
            self.sync_lcoe_bound();
        }
        applied
    }

    /// `maxLCOE` spans the LCOE of the ready zones, and is inactive (out of
    /// the URL) in every other state.
    fn sync_lcoe_bound(&mut self) {
        let mut filter = lcoe_filter();
        if let Some(range) = self.machine.data().and_then(lcoe_range) {
            filter.active = true;
            filter.value = FilterValue::Range(range);
            if let FilterKind::Slider { range: bounds, .. } = &mut filter.kind {
                *bounds = [range.min, range.max];
            }
        }
        if self.max_lcoe() != filter {
            self.store.set(&self.max_lcoe, filter);
        }
    }

    pub fn tour_step(&self) -> i64 {
        self.tour.step()
    }

    pub fn set_tour_step(&mut self, step: i64) -> rez_core::Result<()> {
        self.tour.set_step(step)
    }

    pub fn advance_tour(&mut self) -> rez_core::Result<()> {
        self.tour.advance()
    }
}

/// Submit a zones request through `coordinator`, await `source` and feed
/// the response back. The coordinator is not borrowed while the request is
/// pending. Returns whether the response was current.
pub async fn generate_zones<S: ZoneSource>(
    coordinator: &RefCell<ExploreCoordinator>,
    source: &S,
    filters: &[Filter],
    weights: &BTreeMap<String, f64>,
    lcoe: &BTreeMap<String, f64>,
) -> rez_core::Result<bool> {
    let ticket = coordinator
        .borrow_mut()
        .update_filtered_layer(filters, weights, lcoe)?;
    let result = source.fetch_zones(ticket.request()).await;
    Ok(coordinator.borrow_mut().resolve_zones(&ticket, result))
}
