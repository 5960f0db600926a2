use anyhow::Result;

use crate::{LonLat, Pt2D};

/// Maps geodesic coordinates onto a plane and back. Implementations are pure functions, so
/// they're shared freely between worker threads.
pub trait Projection: Send + Sync {
    fn project(&self, pt: LonLat) -> Pt2D;
    /// Fails if the planar point doesn't correspond to a valid longitude/latitude.
    fn inverse(&self, pt: Pt2D) -> Result<LonLat>;
}

/// x is the longitude, y is the latitude, both in radians.
#[derive(Clone, Copy, Debug, Default)]
pub struct Equirectangular;

impl Projection for Equirectangular {
    fn project(&self, pt: LonLat) -> Pt2D {
        Pt2D::new(pt.longitude(), pt.latitude())
    }

    fn inverse(&self, pt: Pt2D) -> Result<LonLat> {
        LonLat::new(pt.x(), pt.y())
    }
}

/// The Swiss federal grid, using the approximate formulas from swisstopo. Output is in meters,
/// and only meaningful around Switzerland.
#[derive(Clone, Copy, Debug, Default)]
pub struct CH1903;

impl Projection for CH1903 {
    fn project(&self, pt: LonLat) -> Pt2D {
        // Auxiliary values, in units of 10000 arc-seconds relative to Bern
        let lambda1 = (pt.longitude().to_degrees() * 3600.0 - 26782.5) / 10000.0;
        let phi1 = (pt.latitude().to_degrees() * 3600.0 - 169028.66) / 10000.0;

        let x = 600072.37 + 211455.93 * lambda1
            - 10938.51 * lambda1 * phi1
            - 0.36 * lambda1 * phi1.powi(2)
            - 44.54 * lambda1.powi(3);
        let y = 200147.07 + 308807.95 * phi1 + 3745.25 * lambda1.powi(2) + 76.63 * phi1.powi(2)
            - 194.56 * lambda1.powi(2) * phi1
            + 119.79 * phi1.powi(3);
        Pt2D::new(x, y)
    }

    fn inverse(&self, pt: Pt2D) -> Result<LonLat> {
        let x1 = (pt.x() - 600000.0) / 1000000.0;
        let y1 = (pt.y() - 200000.0) / 1000000.0;

        // In units of 10000 arc-seconds
        let lambda0 = 2.6779094 + 4.728982 * x1 + 0.791484 * x1 * y1 + 0.1306 * x1 * y1.powi(2)
            - 0.0436 * x1.powi(3);
        let phi0 = 16.9023892 + 3.238272 * y1
            - 0.270978 * x1.powi(2)
            - 0.002528 * y1.powi(2)
            - 0.0447 * x1.powi(2) * y1
            - 0.0140 * y1.powi(3);

        let lon = lambda0 * 100.0 / 36.0;
        let lat = phi0 * 100.0 / 36.0;
        LonLat::from_degrees(lon, lat)
    }
}
