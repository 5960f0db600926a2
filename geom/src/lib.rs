//! Planar geometry for map rendering: points, open and closed lines, polygons with holes, and
//! the projections that turn geodesic coordinates into planar ones.

#[macro_use]
extern crate anyhow;

pub use crate::bounds::Bounds;
pub use crate::gps::LonLat;
pub use crate::polygon::Polygon;
pub use crate::polyline::{OpenPolyLine, PolyLine};
pub use crate::projection::{Equirectangular, Projection, CH1903};
pub use crate::pt::{HashablePt2D, Pt2D};
pub use crate::ring::Ring;

mod bounds;
mod gps;
mod polygon;
mod polyline;
mod projection;
mod pt;
mod ring;

/// Turn a sequence of points into GeoJSON-style coordinates.
pub(crate) fn to_geojson_coords(pts: &[Pt2D]) -> Vec<Vec<f64>> {
    pts.iter().map(|pt| vec![pt.x(), pt.y()]).collect()
}
