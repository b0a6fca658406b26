//! Coordinate Reference System handling
//!
//! The native GeoTIFF reader only recovers an EPSG code from the GeoKey
//! directory, so this is deliberately a thin representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System, identified by EPSG code when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    epsg: Option<u32>,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: Some(code) }
    }

    /// CRS with no known identifier
    pub fn unknown() -> Self {
        Self { epsg: None }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg {
            Some(code) => write!(f, "EPSG:{}", code),
            None => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_epsg() {
        assert_eq!(Crs::from_epsg(32636).to_string(), "EPSG:32636");
        assert_eq!(Crs::unknown().to_string(), "unknown");
    }
}
