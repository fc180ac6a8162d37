//! Translate filter state into the query fragment the tile and zone
//! endpoints accept.
//!
//! Filters are visited in input order and each contributes at most one
//! `id=value` fragment:
//!
//! - an *active* boolean filter is a mask the UI applies itself and is never
//!   sent; an inactive one is sent as `id=true|false`
//! - any other filter is skipped when inactive or not applicable to the
//!   selected resource
//! - range filters left at their full declared bounds restrict nothing and
//!   are skipped
//! - sliders are scaled by their unit multiplier (km in the UI, metres in
//!   the API)

use log::{error, warn};

use crate::error::RezError;
use crate::filter::{Filter, FilterKind, FilterValue};
use crate::resource::Resource;
use crate::units::UnitTable;

/// Encode a single filter, or `None` when it contributes nothing.
///
/// Filters the API cannot express are logged and skipped.
pub fn encode_filter(filter: &Filter, resource: Resource, units: &UnitTable) -> Option<String> {
    match try_encode_filter(filter, resource, units) {
        Ok(fragment) => fragment,
        Err(e @ RezError::UnsupportedFilterKind { .. }) => {
            error!("{e}, discarding");
            None
        }
        Err(e) => {
            warn!("{e}, discarding");
            None
        }
    }
}

/// Encode every filter and join the fragments with `&`.
pub fn encode(filters: &[Filter], resource: Resource, units: &UnitTable) -> String {
    filters
        .iter()
        .filter_map(|f| encode_filter(f, resource, units))
        .collect::<Vec<String>>()
        .join("&")
}

/// Like [`encode_filter`] but reports why a filter could not be encoded.
pub fn try_encode_filter(
    filter: &Filter,
    resource: Resource,
    units: &UnitTable,
) -> crate::Result<Option<String>> {
    let is_mask = matches!(filter.kind, FilterKind::Boolean);
    if is_mask && filter.active {
        return Ok(None);
    }
    if !is_mask && (!filter.active || !filter.applies_to(resource)) {
        return Ok(None);
    }
    if filter.is_range {
        if let (Some(bounds), Some(value)) = (filter.range_bounds(), filter.range_value()) {
            if value.is_full(bounds) {
                return Ok(None);
            }
            if !value.is_within(bounds) {
                return Err(RezError::validation(
                    &filter.id,
                    format!("range {value} outside [{}, {}]", bounds[0], bounds[1]),
                ));
            }
        }
    }

    let id = &filter.id;
    match (&filter.kind, &filter.value) {
        (FilterKind::Slider { .. }, FilterValue::Range(r)) => {
            let multiplier = units.multiplier(filter.unit());
            Ok(Some(format!("{id}={},{}", r.min * multiplier, r.max * multiplier)))
        }
        (FilterKind::Boolean, FilterValue::Bool(b)) => Ok(Some(format!("{id}={b}"))),
        (FilterKind::MultiSelect { options }, FilterValue::Set(selected)) => {
            let everything = selected.len() == options.len()
                && options.iter().all(|o| selected.contains(o));
            if everything {
                Ok(None)
            } else {
                Ok(Some(format!("{id}={}", selected.join(","))))
            }
        }
        (FilterKind::Dropdown { .. }, FilterValue::Set(values)) => {
            Ok(Some(format!("{id}={}", values.join(","))))
        }
        (FilterKind::Dropdown { .. }, FilterValue::Text(value)) => Ok(Some(format!("{id}={value}"))),
        (FilterKind::Text, _) => Err(RezError::UnsupportedFilterKind {
            id: id.clone(),
            kind: filter.kind.name().to_string(),
        }),
        (kind, value) => Err(RezError::validation(
            id,
            format!("value {value:?} does not fit a {} filter", kind.name()),
        )),
    }
}
