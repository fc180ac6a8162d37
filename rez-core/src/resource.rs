use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RezError;

/// An energy resource a zone can be scored for.
///
/// Serializes with the API name (`solar`, `wind`, `offshore`), which is what
/// filter definitions list under `energy_type`. The display name is what the
/// `resourceId` URL parameter carries.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Solar,
    Wind,
    Offshore,
}

/// All resources in the order the resource picker lists them.
pub const RESOURCE_LIST: [Resource; 3] = [Resource::Solar, Resource::Wind, Resource::Offshore];

impl Resource {
    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Solar => "Solar PV",
            Resource::Wind => "Wind",
            Resource::Offshore => "Off-Shore Wind",
        }
    }

    /// Path segment used by the tile and zone endpoints.
    pub fn api_name(&self) -> &'static str {
        match self {
            Resource::Solar => "solar",
            Resource::Wind => "wind",
            Resource::Offshore => "offshore",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Resource> {
        RESOURCE_LIST
            .iter()
            .copied()
            .find(|r| r.display_name() == name)
    }

    pub fn is_offshore(&self) -> bool {
        matches!(self, Resource::Offshore)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Resource {
    type Err = RezError;

    /// Accepts either the display name or the API name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::from_display_name(s)
            .or_else(|| RESOURCE_LIST.iter().copied().find(|r| r.api_name() == s))
            .ok_or_else(|| RezError::validation("resourceId", format!("unknown resource '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_lookup() {
        assert_eq!(Resource::from_display_name("Off-Shore Wind"), Some(Resource::Offshore));
        assert_eq!(Resource::from_display_name("offshore"), None);
        assert_eq!("wind".parse::<Resource>().unwrap(), Resource::Wind);
        assert_eq!("Solar PV".parse::<Resource>().unwrap(), Resource::Solar);
        assert!("Hydro".parse::<Resource>().is_err());
    }

    #[test]
    fn test_serde_uses_api_name() {
        let json = serde_json::to_string(&Resource::Offshore).unwrap();
        assert_eq!(json, "\"offshore\"");
        let parsed: Vec<Resource> = serde_json::from_str("[\"solar\",\"wind\"]").unwrap();
        assert_eq!(parsed, vec![Resource::Solar, Resource::Wind]);
    }
}
