//! User-adjustable filters and their values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resource::Resource;

/// Bounds used when a slider has no declared range yet.
pub const DEFAULT_RANGE: [f64; 2] = [0.0, 1_000_000.0];

/// A numeric `{min, max}` selection.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct RangeValue {
    pub min: f64,
    pub max: f64,
}

impl RangeValue {
    pub fn new(min: f64, max: f64) -> Self {
        RangeValue { min, max }
    }

    pub fn from_bounds(bounds: [f64; 2]) -> Self {
        RangeValue::new(bounds[0], bounds[1])
    }

    /// Parse `"min,max"`. Anything else, including non-finite numbers,
    /// yields `None`.
    pub fn parse(s: &str) -> Option<RangeValue> {
        let (min, max) = s.split_once(',')?;
        let min = min.trim().parse::<f64>().ok()?;
        let max = max.trim().parse::<f64>().ok()?;
        (min.is_finite() && max.is_finite()).then_some(RangeValue { min, max })
    }

    /// True when the range covers exactly the declared bounds.
    pub fn is_full(&self, bounds: [f64; 2]) -> bool {
        self.min == bounds[0] && self.max == bounds[1]
    }

    /// True when `min <= max` and both ends lie within `bounds`.
    pub fn is_within(&self, bounds: [f64; 2]) -> bool {
        self.min <= self.max && self.min >= bounds[0] && self.max <= bounds[1]
    }
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

/// The input widget a filter is edited with, and what it declares.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FilterKind {
    Slider {
        range: [f64; 2],
        #[serde(default)]
        unit: Option<String>,
    },
    Boolean,
    MultiSelect {
        options: Vec<String>,
    },
    Dropdown {
        options: Vec<String>,
    },
    Text,
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Slider { .. } => "slider",
            FilterKind::Boolean => "boolean",
            FilterKind::MultiSelect { .. } => "multi-select",
            FilterKind::Dropdown { .. } => "dropdown",
            FilterKind::Text => "text",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(f64),
    Range(RangeValue),
    Set(Vec<String>),
    Text(String),
}

/// A filter as edited in the query form.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "input")]
    pub kind: FilterKind,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub is_range: bool,
    pub value: FilterValue,
    /// Resources the filter applies to.
    #[serde(default)]
    pub energy_type: Vec<Resource>,
}

impl Filter {
    pub fn applies_to(&self, resource: Resource) -> bool {
        self.energy_type.contains(&resource)
    }

    /// Declared slider bounds, if this is a slider.
    pub fn range_bounds(&self) -> Option<[f64; 2]> {
        match &self.kind {
            FilterKind::Slider { range, .. } => Some(*range),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match &self.kind {
            FilterKind::Slider { unit, .. } => unit.as_deref(),
            _ => None,
        }
    }

    pub fn range_value(&self) -> Option<RangeValue> {
        match self.value {
            FilterValue::Range(r) => Some(r),
            _ => None,
        }
    }
}

/// Parse a JSON array of filter definitions.
pub fn parse_filters_json(json: &str) -> crate::Result<Vec<Filter>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_parse() {
        assert_eq!(RangeValue::parse("0.2,0.8"), Some(RangeValue::new(0.2, 0.8)));
        assert_eq!(RangeValue::parse(" 1 , 2 "), Some(RangeValue::new(1.0, 2.0)));
        assert_eq!(RangeValue::parse("1"), None);
        assert_eq!(RangeValue::parse("a,b"), None);
        assert_eq!(RangeValue::parse("1,inf"), None);
        assert_eq!(RangeValue::new(0.0, 1.0).to_string(), "0,1");
    }

    #[test]
    fn test_range_bounds_checks() {
        let r = RangeValue::new(2.0, 5.0);
        assert!(r.is_within([0.0, 10.0]));
        assert!(!r.is_within([3.0, 10.0]));
        assert!(!RangeValue::new(5.0, 2.0).is_within([0.0, 10.0]));
        assert!(RangeValue::new(0.0, 10.0).is_full([0.0, 10.0]));
    }

    #[test]
    fn test_filter_deserialize() {
        let json = r#"[
            {"id": "roads", "name": "Distance to Roads", "input": {"type": "slider", "range": [0, 100], "unit": "km"},
             "active": true, "is_range": true, "value": {"min": 1, "max": 20}, "energy_type": ["solar", "wind"]},
            {"id": "protected", "input": {"type": "boolean"}, "active": false, "value": true, "energy_type": ["solar"]},
            {"id": "landcover", "input": {"type": "multi-select", "options": ["a", "b", "c"]},
             "active": true, "value": ["a", "b"], "energy_type": ["wind"]}
        ]"#;
        let filters = parse_filters_json(json).unwrap();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].unit(), Some("km"));
        assert_eq!(filters[0].range_bounds(), Some([0.0, 100.0]));
        assert_eq!(filters[0].range_value(), Some(RangeValue::new(1.0, 20.0)));
        assert_eq!(filters[1].value, FilterValue::Bool(true));
        assert!(!filters[1].is_range);
        assert_eq!(
            filters[2].value,
            FilterValue::Set(vec!["a".to_string(), "b".to_string()])
        );
        assert!(filters[2].applies_to(Resource::Wind));
        assert!(!filters[2].applies_to(Resource::Solar));
    }
}
