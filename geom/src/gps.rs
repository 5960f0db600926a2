use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A point on the WGS 84 ellipsoid. Longitude is x, latitude is y, both in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    longitude: f64,
    latitude: f64,
}

impl LonLat {
    /// Longitude must be in [-pi, pi] and latitude in [-pi/2, pi/2].
    pub fn new(longitude: f64, latitude: f64) -> Result<LonLat> {
        if !(-PI..=PI).contains(&longitude) {
            bail!("longitude {} is out of range", longitude);
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            bail!("latitude {} is out of range", latitude);
        }
        Ok(LonLat {
            longitude,
            latitude,
        })
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Result<LonLat> {
        LonLat::new(lon.to_radians(), lat.to_radians())
    }

    pub fn longitude(self) -> f64 {
        self.longitude
    }

    pub fn latitude(self) -> f64 {
        self.latitude
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LonLat({0}, {1})",
            self.longitude.to_degrees(),
            self.latitude.to_degrees()
        )
    }
}
