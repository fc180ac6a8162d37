use std::fmt;
use std::str::FromStr;

use crate::error::RezError;

/// Grid cell sizes in kilometres offered for gridded zones.
pub const GRID_OPTIONS: [u32; 3] = [9, 25, 50];

/// How candidate zones are delineated.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ZoneType {
    /// Administrative boundaries.
    Boundaries,
    /// Square grid cells of the given size in km.
    Grid(u32),
}

impl ZoneType {
    /// Every zone type the explorer offers.
    pub fn all() -> Vec<ZoneType> {
        std::iter::once(ZoneType::Boundaries)
            .chain(GRID_OPTIONS.iter().map(|s| ZoneType::Grid(*s)))
            .collect()
    }

    /// Identifier carried by the `zoneId` URL parameter.
    pub fn name(&self) -> String {
        match self {
            ZoneType::Boundaries => "boundaries".to_string(),
            ZoneType::Grid(size) => format!("grid-{size}"),
        }
    }

    pub fn api_path(&self) -> String {
        match self {
            ZoneType::Boundaries => "admin".to_string(),
            ZoneType::Grid(size) => format!("grid/{size}"),
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for ZoneType {
    type Err = RezError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "boundaries" {
            return Ok(ZoneType::Boundaries);
        }
        s.strip_prefix("grid-")
            .and_then(|size| size.parse::<u32>().ok())
            .filter(|size| GRID_OPTIONS.contains(size))
            .map(ZoneType::Grid)
            .ok_or_else(|| RezError::validation("zoneId", format!("unknown zone type '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_type_names() {
        for zt in ZoneType::all() {
            assert_eq!(zt.name().parse::<ZoneType>().unwrap(), zt);
        }
        assert_eq!(ZoneType::Grid(25).api_path(), "grid/25");
        assert_eq!(ZoneType::Boundaries.api_path(), "admin");
    }

    #[test]
    fn test_unknown_grid_size_rejected() {
        assert!("grid-10".parse::<ZoneType>().is_err());
        assert!("grid-".parse::<ZoneType>().is_err());
        assert!("hexagons".parse::<ZoneType>().is_err());
    }
}
