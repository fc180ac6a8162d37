use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Multipliers converting the units the UI shows into the units the API
/// expects. Sliders are displayed in km while the API works in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTable(HashMap<String, f64>);

impl UnitTable {
    pub fn new(table: HashMap<String, f64>) -> Self {
        UnitTable(table)
    }

    /// Multiplier for `unit`, 1 when the unit is missing or unknown.
    pub fn multiplier(&self, unit: Option<&str>) -> f64 {
        unit.and_then(|u| self.0.get(u)).copied().unwrap_or(1.0)
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        UnitTable(HashMap::from([("km".to_string(), 1000.0)]))
    }
}
