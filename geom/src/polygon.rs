use serde::{Deserialize, Serialize};

use crate::{Bounds, Pt2D, Ring};

/// An outer ring with zero or more holes. The holes are assumed to be inside the shell and to
/// not overlap each other; nothing here checks that.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    shell: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(shell: Ring) -> Polygon {
        Polygon {
            shell,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(shell: Ring, holes: Vec<Ring>) -> Polygon {
        Polygon { shell, holes }
    }

    pub fn shell(&self) -> &Ring {
        &self.shell
    }

    pub fn holes(&self) -> &Vec<Ring> {
        &self.holes
    }

    /// The shell's area minus the holes.
    pub fn area(&self) -> f64 {
        self.shell.area() - self.holes.iter().map(|h| h.area()).sum::<f64>()
    }

    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        self.shell.contains_pt(pt) && !self.holes.iter().any(|h| h.contains_pt(pt))
    }

    pub fn get_bounds(&self) -> Bounds {
        self.shell.get_bounds()
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        let mut rings = vec![self.shell.geojson_ring()];
        rings.extend(self.holes.iter().map(|h| h.geojson_ring()));
        geojson::Geometry::new(geojson::Value::Polygon(rings))
    }
}

impl From<Ring> for Polygon {
    fn from(shell: Ring) -> Self {
        Polygon::new(shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Ring {
        Ring::new(vec![
            Pt2D::new(x1, y1),
            Pt2D::new(x2, y1),
            Pt2D::new(x2, y2),
            Pt2D::new(x1, y2),
        ])
        .unwrap()
    }

    #[test]
    fn holes() {
        let p = Polygon::with_holes(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(1.0, 1.0, 3.0, 3.0), square(5.0, 5.0, 6.0, 6.0)],
        );
        assert_eq!(100.0 - 4.0 - 1.0, p.area());
        assert!(p.contains_pt(Pt2D::new(4.0, 4.0)));
        assert!(!p.contains_pt(Pt2D::new(2.0, 2.0)));
        assert!(!p.contains_pt(Pt2D::new(5.5, 5.5)));
        assert!(!p.contains_pt(Pt2D::new(11.0, 5.0)));
        assert_eq!(10.0, p.get_bounds().width());

        let no_holes = Polygon::from(square(0.0, 0.0, 1.0, 1.0));
        assert!(no_holes.holes().is_empty());
    }

    #[test]
    fn geojson_rings_are_closed() {
        let p = Polygon::with_holes(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(1.0, 1.0, 3.0, 3.0)],
        );
        match p.to_geojson().value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(2, rings.len());
                for ring in rings {
                    assert_eq!(5, ring.len());
                    assert_eq!(ring[0], ring[4]);
                }
            }
            x => panic!("Unexpected geometry {:?}", x),
        }
    }
}
