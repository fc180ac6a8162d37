//! Built-in scoring weights and LCOE parameters, with their presets.

use std::collections::BTreeMap;

/// A scoring weight applied when computing zone scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weight {
    pub id: &'static str,
    pub name: &'static str,
    pub default: f64,
    pub range: [f64; 2],
}

/// An economic input to the LCOE calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LcoeParameter {
    pub id: &'static str,
    pub name: &'static str,
    pub range: Option<[f64; 2]>,
}

const fn weight(id: &'static str, name: &'static str) -> Weight {
    Weight {
        id,
        name,
        default: 1.0,
        range: [0.0, 1.0],
    }
}

const fn param(id: &'static str, name: &'static str, range: Option<[f64; 2]>) -> LcoeParameter {
    LcoeParameter { id, name, range }
}

pub const WEIGHTS: [Weight; 6] = [
    weight("lcoe_gen", "LCOE Generation"),
    weight("lcoe_transmission", "LCOE Transmission"),
    weight("lcoe_road", "LCOE Road"),
    weight("distance_load", "Distance to Load Centers"),
    weight("pop_density", "Population Density"),
    weight("slope", "Slope"),
];

pub const LCOE_PARAMETERS: [LcoeParameter; 16] = [
    param("turbine_type", "Turbine / Solar Unit Type", Some([0.0, 3.0])),
    param("crf", "Capital Recovery Factor", None),
    param("cg", "Generation - capital [USD/kW]", None),
    param("omfg", "Generation - fixed O&M [USD/MW/y]", None),
    param("omvg", "Generation - variable O&M [USD/MWh]", None),
    param("ct", "Transmission (land cabling) - capital [USD/MW/km]", None),
    param("omft", "Transmission - fixed O&M [USD/km]", None),
    param(
        "cs",
        "Substation - capital [USD / two substations (per new transmission connection) ]",
        None,
    ),
    param("cr", "Road - capital [USD/km]", None),
    param("omfr", "Road - fixed O&M [USD/km]", None),
    param("decom", "Decommission % rate", None),
    param("i", "Economic discount rate", Some([0.1, 100.0])),
    param("n", "Lifetime [years]", Some([1.0, 100.0])),
    param("landuse", "Land Use Factor", Some([0.0, f64::INFINITY])),
    param("tlf", "Technical Loss Factor", Some([0.0, 1.0])),
    param("uf", "Unavailability Factor", Some([0.0, 1.0])),
];

/// Values of the "Default" LCOE preset. Parameters not listed have no
/// preset value.
const DEFAULT_LCOE_PRESET: [(&str, f64); 13] = [
    ("turbine_type", 0.0),
    ("crf", 1.0),
    ("cg", 2000.0),
    ("omfg", 50000.0),
    ("omvg", 4.0),
    ("ct", 1000.0),
    ("omft", 0.0),
    ("cs", 70000.0),
    ("cr", 400000.0),
    ("omfr", 0.0),
    ("decom", 0.0),
    ("i", 0.2),
    ("n", 25.0),
];

impl LcoeParameter {
    /// Whether `value` is acceptable for this parameter.
    pub fn accepts(&self, value: f64) -> bool {
        match self.range {
            Some([lo, hi]) => value >= lo && value <= hi,
            None => value.is_finite(),
        }
    }
}

impl Weight {
    pub fn accepts(&self, value: f64) -> bool {
        value >= self.range[0] && value <= self.range[1]
    }
}

pub fn find_weight(id: &str) -> Option<&'static Weight> {
    WEIGHTS.iter().find(|w| w.id == id)
}

pub fn find_lcoe_parameter(id: &str) -> Option<&'static LcoeParameter> {
    LCOE_PARAMETERS.iter().find(|p| p.id == id)
}

/// Every weight at its default.
pub fn default_weights() -> BTreeMap<String, f64> {
    WEIGHTS
        .iter()
        .map(|w| (w.id.to_string(), w.default))
        .collect()
}

/// The "Default" LCOE preset.
pub fn default_lcoe() -> BTreeMap<String, f64> {
    DEFAULT_LCOE_PRESET
        .iter()
        .map(|(id, v)| (id.to_string(), *v))
        .collect()
}
