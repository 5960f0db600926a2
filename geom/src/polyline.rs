use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{Pt2D, Ring};

/// A line that doesn't connect back to its start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenPolyLine {
    pts: Vec<Pt2D>,
}

impl OpenPolyLine {
    pub fn new(pts: Vec<Pt2D>) -> Result<OpenPolyLine> {
        if pts.is_empty() {
            bail!("Can't make a line with no points");
        }
        Ok(OpenPolyLine { pts })
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }
}

/// A line that's either open or closed. Area and containment only make sense for the closed
/// case, so they live on the `Ring`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PolyLine {
    Open(OpenPolyLine),
    Closed(Ring),
}

impl PolyLine {
    pub fn open(pts: Vec<Pt2D>) -> Result<PolyLine> {
        Ok(PolyLine::Open(OpenPolyLine::new(pts)?))
    }

    /// The closing edge is implicit; don't repeat the first point at the end.
    pub fn closed(pts: Vec<Pt2D>) -> Result<PolyLine> {
        Ok(PolyLine::Closed(Ring::new(pts)?))
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        match self {
            PolyLine::Open(pl) => pl.points(),
            PolyLine::Closed(ring) => ring.points(),
        }
    }

    pub fn first_pt(&self) -> Pt2D {
        self.points()[0]
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, PolyLine::Closed(_))
    }

    pub fn as_ring(&self) -> Option<&Ring> {
        match self {
            PolyLine::Open(_) => None,
            PolyLine::Closed(ring) => Some(ring),
        }
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        let mut coords = crate::to_geojson_coords(self.points());
        if let PolyLine::Closed(ring) = self {
            coords.push(vec![ring.first_pt().x(), ring.first_pt().y()]);
        }
        geojson::Geometry::new(geojson::Value::LineString(coords))
    }
}
