//! Query-state fields for the explorer's shareable URL.

use rez_core::catalog::{LcoeParameter, Weight};
use rez_core::filter::{Filter, FilterKind, FilterValue, RangeValue, DEFAULT_RANGE};
use rez_core::resource::Resource;
use rez_core::zone_type::ZoneType;

use crate::codec::{parsed, QsField, Validator};

pub const MAX_ZONE_SCORE_KEY: &str = "maxZoneScore";
pub const MAX_LCOE_KEY: &str = "maxLCOE";
pub const AREA_KEY: &str = "areaId";
pub const RESOURCE_KEY: &str = "resourceId";
pub const ZONE_TYPE_KEY: &str = "zoneId";

/// Output filter on the normalized zone score, always active.
pub fn zone_score_filter() -> Filter {
    Filter {
        id: "zone-score-range".to_string(),
        name: "Zone Score Range".to_string(),
        kind: FilterKind::Slider {
            range: [0.0, 1.0],
            unit: None,
        },
        active: true,
        is_range: true,
        value: FilterValue::Range(RangeValue::new(0.0, 1.0)),
        energy_type: Vec::new(),
    }
}

/// Output filter on LCOE. Inactive until zones have been fetched and its
/// bounds are known.
pub fn lcoe_filter() -> Filter {
    Filter {
        id: "lcoe-range".to_string(),
        name: "LCOE Range".to_string(),
        kind: FilterKind::Slider {
            range: DEFAULT_RANGE,
            unit: Some("USD/MWh".to_string()),
        },
        active: false,
        is_range: true,
        value: FilterValue::Range(RangeValue::from_bounds(DEFAULT_RANGE)),
        energy_type: Vec::new(),
    }
}

fn dehydrate_active_range(f: &Filter) -> Option<String> {
    if !f.active {
        return None;
    }
    f.range_value().map(|r| r.to_string())
}

/// `maxZoneScore=min,max`. Present means the given range; absent means the
/// full `[0, 1]` range, as does a range outside it. The filter stays active
/// either way.
pub fn max_zone_score_field() -> QsField<Filter> {
    QsField::new(
        MAX_ZONE_SCORE_KEY,
        zone_score_filter(),
        |raw| {
            let mut filter = zone_score_filter();
            if let Some(s) = raw {
                filter.value = FilterValue::Range(RangeValue::parse(s)?);
            }
            Some(filter)
        },
        dehydrate_active_range,
    )
    .with_validator(Validator::predicate(|f: &Filter| {
        f.range_value().is_some_and(|r| r.is_within([0.0, 1.0]))
    }))
}

/// `maxLCOE=min,max`. The parameter's presence is the filter's active flag,
/// and the range it carries also becomes the slider bounds.
pub fn max_lcoe_field() -> QsField<Filter> {
    QsField::new(
        MAX_LCOE_KEY,
        lcoe_filter(),
        |raw| {
            let mut filter = lcoe_filter();
            if let Some(s) = raw {
                let range = RangeValue::parse(s)?;
                filter.active = true;
                filter.value = FilterValue::Range(range);
                if let FilterKind::Slider { range: bounds, .. } = &mut filter.kind {
                    *bounds = [range.min, range.max];
                }
            }
            Some(filter)
        },
        dehydrate_active_range,
    )
    .with_validator(Validator::predicate(|f: &Filter| {
        f.range_value().is_some_and(|r| r.min <= r.max)
    }))
}

/// `areaId`, restricted to known area ids.
pub fn area_id_field(area_ids: Vec<String>) -> QsField<Option<String>> {
    QsField::string(AREA_KEY).with_validator(Validator::OneOf(
        area_ids.into_iter().map(Some).collect(),
    ))
}

/// `resourceId` by display name. `is_available` is consulted on every
/// hydration, so it can follow the selected area.
pub fn resource_field(is_available: impl Fn(Resource) -> bool + 'static) -> QsField<Option<Resource>> {
    parsed::<Resource>(RESOURCE_KEY).with_validator(Validator::predicate(
        move |r: &Option<Resource>| r.is_some_and(&is_available),
    ))
}

/// `zoneId`, restricted to `zone_types`.
pub fn zone_type_field(zone_types: Vec<ZoneType>) -> QsField<Option<ZoneType>> {
    parsed::<ZoneType>(ZONE_TYPE_KEY).with_validator(Validator::OneOf(
        zone_types.into_iter().map(Some).collect(),
    ))
}

/// A scoring weight keyed by its id, omitted while at its default.
pub fn weight_field(weight: &Weight) -> QsField<f64> {
    let range = weight.range;
    QsField::number(weight.id, weight.default)
        .with_validator(Validator::predicate(move |v: &f64| *v >= range[0] && *v <= range[1]))
}

/// An LCOE parameter keyed by its id, omitted while at `default`.
pub fn lcoe_field(param: &LcoeParameter, default: Option<f64>) -> QsField<Option<f64>> {
    let p = *param;
    QsField::new(
        param.id,
        default,
        move |raw| match raw {
            None => Some(default),
            Some(s) => s.parse::<f64>().ok().map(Some),
        },
        move |v: &Option<f64>| v.filter(|x| Some(*x) != default).map(|x| x.to_string()),
    )
    .with_validator(Validator::predicate(move |v: &Option<f64>| {
        v.is_some_and(|x| p.accepts(x))
    }))
}

fn parse_filter_value(template: &Filter, raw: &str) -> Option<FilterValue> {
    let split = || -> Vec<String> {
        raw.split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    match &template.kind {
        FilterKind::Slider { .. } => match template.value {
            FilterValue::Number(_) => raw.parse::<f64>().ok().map(FilterValue::Number),
            _ => RangeValue::parse(raw).map(FilterValue::Range),
        },
        FilterKind::Boolean => raw.parse::<bool>().ok().map(FilterValue::Bool),
        FilterKind::MultiSelect { options } | FilterKind::Dropdown { options } => {
            let values = split();
            values
                .iter()
                .all(|v| options.contains(v))
                .then_some(FilterValue::Set(values))
        }
        FilterKind::Text => Some(FilterValue::Text(raw.to_string())),
    }
}

fn dehydrate_filter_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Range(r) => r.to_string(),
        FilterValue::Set(values) => values.join(","),
        FilterValue::Text(s) => s.clone(),
    }
}

/// Any query-form filter, keyed by its id.
///
/// An active filter writes its value; an inactive one is left out of the
/// URL, and reading it back yields `template` unchanged. A present
/// parameter hydrates to an active filter. Range values outside the
/// slider's bounds are rejected.
pub fn filter_field(template: Filter) -> QsField<Filter> {
    let key = template.id.clone();
    let default = template.clone();
    QsField::new(
        &key,
        default,
        move |raw| match raw {
            None => Some(template.clone()),
            Some(s) => {
                let value = parse_filter_value(&template, s)?;
                Some(Filter {
                    active: true,
                    value,
                    ..template.clone()
                })
            }
        },
        |f: &Filter| f.active.then(|| dehydrate_filter_value(&f.value)),
    )
    .with_validator(Validator::predicate(|f: &Filter| {
        match (f.is_range, f.range_bounds(), f.range_value()) {
            (true, Some(bounds), Some(value)) => value.is_within(bounds),
            _ => true,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rez_core::catalog::{find_lcoe_parameter, find_weight};

    #[test]
    fn test_zone_score_round_trip() {
        let field = max_zone_score_field();
        let default = field.hydrate(None);
        assert!(default.active);
        assert_eq!(default.range_value(), Some(RangeValue::new(0.0, 1.0)));

        let mut narrowed = default.clone();
        narrowed.value = FilterValue::Range(RangeValue::new(0.25, 0.75));
        let raw = field.dehydrate(&narrowed);
        assert_eq!(raw.as_deref(), Some("0.25,0.75"));
        assert_eq!(field.hydrate(raw.as_deref()), narrowed);
        assert_eq!(field.hydrate(Some("oops")), default);
        assert_eq!(field.hydrate(Some("5,2")), default);
        assert_eq!(field.hydrate(Some("0.5,2")), default);
    }

    #[test]
    fn test_lcoe_presence_is_active_flag() {
        let field = max_lcoe_field();
        let absent = field.hydrate(None);
        assert!(!absent.active);
        assert_eq!(field.dehydrate(&absent), None);

        let present = field.hydrate(Some("7,25"));
        assert!(present.active);
        assert_eq!(present.range_bounds(), Some([7.0, 25.0]));
        assert_eq!(field.dehydrate(&present).as_deref(), Some("7,25"));
        assert_eq!(field.hydrate(field.dehydrate(&present).as_deref()), present);

        assert!(!field.hydrate(Some("25,7")).active);
    }

    #[test]
    fn test_resource_field_follows_availability() {
        let field = resource_field(|r| r != Resource::Offshore);
        assert_eq!(field.hydrate(Some("Solar PV")), Some(Resource::Solar));
        assert_eq!(field.hydrate(Some("Off-Shore Wind")), None);
    }

    #[test]
    fn test_zone_type_field() {
        let field = zone_type_field(ZoneType::all());
        assert_eq!(field.hydrate(Some("grid-25")), Some(ZoneType::Grid(25)));
        assert_eq!(field.hydrate(Some("grid-7")), None);
        assert_eq!(field.dehydrate(&Some(ZoneType::Boundaries)).as_deref(), Some("boundaries"));
    }

    #[test]
    fn test_weight_and_lcoe_fields() {
        let weight = weight_field(find_weight("slope").unwrap());
        assert_eq!(weight.hydrate(Some("0.3")), 0.3);
        assert_eq!(weight.hydrate(Some("3")), 1.0);

        let lifetime = lcoe_field(find_lcoe_parameter("n").unwrap(), Some(25.0));
        assert_eq!(lifetime.dehydrate(&Some(25.0)), None);
        assert_eq!(lifetime.dehydrate(&Some(30.0)).as_deref(), Some("30"));
        assert_eq!(lifetime.hydrate(Some("30")), Some(30.0));
        assert_eq!(lifetime.hydrate(Some("0")), Some(25.0));
    }

    #[test]
    fn test_filter_field() {
        let template = Filter {
            id: "landcover".to_string(),
            name: "Land Cover".to_string(),
            kind: FilterKind::MultiSelect {
                options: vec!["forest".into(), "crop".into(), "urban".into()],
            },
            active: false,
            is_range: false,
            value: FilterValue::Set(Vec::new()),
            energy_type: vec![Resource::Solar],
        };
        let field = filter_field(template.clone());
        assert_eq!(field.hydrate(None), template);
        assert_eq!(field.dehydrate(&template), None);

        let chosen = field.hydrate(Some("forest,crop"));
        assert!(chosen.active);
        assert_eq!(chosen.value, FilterValue::Set(vec!["forest".into(), "crop".into()]));
        assert_eq!(field.hydrate(field.dehydrate(&chosen).as_deref()), chosen);
        assert_eq!(field.hydrate(Some("forest,desert")), template);
    }

    #[test]
    fn test_range_filter_field_rejects_out_of_bounds() {
        let template = Filter {
            id: "roads".to_string(),
            name: String::new(),
            kind: FilterKind::Slider {
                range: [0.0, 100.0],
                unit: Some("km".into()),
            },
            active: true,
            is_range: true,
            value: FilterValue::Range(RangeValue::new(0.0, 100.0)),
            energy_type: vec![Resource::Wind],
        };
        let field = filter_field(template.clone());
        assert_eq!(field.hydrate(Some("5,50")).range_value(), Some(RangeValue::new(5.0, 50.0)));
        assert_eq!(field.hydrate(Some("5,500")), template);
        assert_eq!(field.hydrate(Some("50,5")), template);
    }
}
