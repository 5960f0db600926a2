use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Pt2D};

/// A closed sequence of points. The last point is implicitly connected back to the first, so
/// callers shouldn't repeat the first point at the end. Rings aren't necessarily convex, and
/// the winding order is whatever the points were given in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pt2D>", into = "Vec<Pt2D>")]
pub struct Ring {
    pts: Vec<Pt2D>,
}

impl Ring {
    pub fn new(pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.is_empty() {
            bail!("Can't make a ring with no points");
        }
        Ok(Ring { pts })
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt2D> {
        self.pts
    }

    pub fn first_pt(&self) -> Pt2D {
        self.pts[0]
    }

    /// Every edge, including the one from the last point back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Pt2D, Pt2D)> + '_ {
        let n = self.pts.len();
        (0..n).map(move |i| (self.pts[i], self.pts[(i + 1) % n]))
    }

    /// Positive for counter-clockwise rings (with y pointing up), negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for (pt1, pt2) in self.edges() {
            sum += pt1.x() * pt2.y() - pt2.x() * pt1.y();
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Winding-number test against the ring's boundary. Edges only count when they cross the
    /// horizontal line through `pt` with one endpoint at or below it and the other strictly
    /// above, so a vertex exactly level with `pt` isn't counted twice.
    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        let mut winding = 0;
        for (pt1, pt2) in self.edges() {
            if pt1.y() <= pt.y() {
                if pt2.y() > pt.y() && is_left(pt1, pt2, pt) {
                    winding += 1;
                }
            } else if pt2.y() <= pt.y() && is_left(pt2, pt1, pt) {
                winding -= 1;
            }
        }
        winding != 0
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.pts)
    }

    /// GeoJSON repeats the first point at the end.
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![self.geojson_ring()]))
    }

    pub(crate) fn geojson_ring(&self) -> Vec<Vec<f64>> {
        let mut pts = self.pts.clone();
        pts.push(self.pts[0]);
        crate::to_geojson_coords(&pts)
    }
}

impl TryFrom<Vec<Pt2D>> for Ring {
    type Error = anyhow::Error;

    fn try_from(pts: Vec<Pt2D>) -> Result<Ring> {
        Ring::new(pts)
    }
}

impl From<Ring> for Vec<Pt2D> {
    fn from(ring: Ring) -> Vec<Pt2D> {
        ring.pts
    }
}

/// Is `pt` strictly to the left of the directed line from `pt1` to `pt2`?
fn is_left(pt1: Pt2D, pt2: Pt2D, pt: Pt2D) -> bool {
    (pt1.x() - pt.x()) * (pt2.y() - pt.y()) > (pt2.x() - pt.x()) * (pt1.y() - pt.y())
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}
