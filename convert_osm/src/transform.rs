use anyhow::Result;

use abstutil::{prettyprint_usize, Attributed, Tags, Timer};
use geom::{PolyLine, Polygon, Projection, Pt2D, Ring};

use crate::map::MapGeometry;
use crate::multipolygon::multipolygon;
use crate::osm::{
    RelationID, AREA, AREA_VALUES, IMPLICIT_AREA_KEYS, POLYGON_KEYS, POLYLINE_KEYS,
};
use crate::reader::{Document, Relation, Way};

/// Turns a Document into projected, tag-filtered lines and polygons.
pub struct Transformer {
    projection: Box<dyn Projection>,
    parallel: bool,
}

impl Transformer {
    pub fn new(projection: Box<dyn Projection>) -> Transformer {
        Transformer {
            projection,
            parallel: true,
        }
    }

    /// Assemble relations one at a time on the current thread. The output doesn't change.
    pub fn sequential(mut self) -> Transformer {
        self.parallel = false;
        self
    }

    /// Ways and relations that can't be turned into geometry are logged and skipped. Errors only
    /// happen if the Document's invariants are broken.
    pub fn transform(&self, doc: &Document, timer: &mut Timer) -> Result<MapGeometry> {
        let mut map = MapGeometry::new();

        timer.start_iter("transform ways", doc.ways.len());
        let mut dropped_ways = 0;
        for (id, way) in &doc.ways {
            timer.next();
            match self.transform_way(doc, way, &mut map) {
                Ok(true) => {}
                Ok(false) => {
                    dropped_ways += 1;
                }
                Err(err) => {
                    timer.warn(format!("Skipping {}: {}", id, err));
                }
            }
        }
        timer.note(format!(
            "{} ways had nothing worth rendering",
            prettyprint_usize(dropped_ways)
        ));

        let requests: Vec<(RelationID, &Relation)> =
            doc.relations.iter().map(|(id, rel)| (*id, rel)).collect();
        let projection: &dyn Projection = self.projection.as_ref();
        let results = if self.parallel {
            timer.parallelize("assemble multipolygons", requests, |(id, rel)| {
                transform_relation(id, rel, doc, projection)
            })
        } else {
            timer.start_iter("assemble multipolygons", requests.len());
            let mut results = Vec::new();
            for (id, rel) in requests {
                timer.next();
                results.push(transform_relation(id, rel, doc, projection));
            }
            results
        };
        // Already in relation ID order, no matter how the work was split up
        for result in results {
            map.polygons.extend(result?);
        }

        Ok(map)
    }

    /// Returns false if the way is dropped for having no interesting tags.
    fn transform_way(&self, doc: &Document, way: &Way, map: &mut MapGeometry) -> Result<bool> {
        let closed = way.is_closed();
        if closed && is_area(&way.tags) {
            // An area that doesn't make a useful polygon isn't rendered as a line either
            let tags = way.tags.keep_only_keys(&POLYGON_KEYS);
            if tags.is_empty() {
                return Ok(false);
            }
            let ring = Ring::new(self.project_way(doc, way)?)?;
            map.polygons.push(Attributed::new(Polygon::new(ring), tags));
            return Ok(true);
        }

        let tags = way.tags.keep_only_keys(&POLYLINE_KEYS);
        if tags.is_empty() {
            return Ok(false);
        }
        let pts = self.project_way(doc, way)?;
        let pl = if closed {
            PolyLine::closed(pts)?
        } else {
            PolyLine::open(pts)?
        };
        map.polylines.push(Attributed::new(pl, tags));
        Ok(true)
    }

    fn project_way(&self, doc: &Document, way: &Way) -> Result<Vec<Pt2D>> {
        way.non_repeating_nodes()
            .iter()
            .map(|n| doc.project_node(*n, self.projection.as_ref()))
            .collect()
    }
}

/// Only says whether the tags describe an area. The way must also be closed.
pub fn is_area(tags: &Tags) -> bool {
    tags.is_any(AREA, &AREA_VALUES) || tags.has_any(&IMPLICIT_AREA_KEYS)
}

fn transform_relation(
    id: RelationID,
    rel: &Relation,
    doc: &Document,
    projection: &dyn Projection,
) -> Result<Vec<Attributed<Polygon>>> {
    let tags = rel.tags.keep_only_keys(&POLYGON_KEYS);
    if tags.is_empty() {
        return Ok(Vec::new());
    }
    multipolygon(id, rel, doc, projection, &tags)
}

#[cfg(test)]
mod tests {
    use geom::{Equirectangular, LonLat};

    use super::*;
    use crate::osm::{NodeID, OsmID, WayID, INNER, OUTER};
    use crate::reader::Member;

    fn tags(kv: &[(&str, &str)]) -> Tags {
        let mut tags = Tags::empty();
        for (k, v) in kv {
            tags.insert(*k, *v);
        }
        tags
    }

    /// Nodes 1 through 4 are a square, 5 through 8 a smaller one inside it.
    fn squares() -> Document {
        let mut doc = Document::new();
        let pts = [
            (0.0, 0.0),
            (0.5, 0.0),
            (0.5, 0.5),
            (0.0, 0.5),
            (0.125, 0.125),
            (0.375, 0.125),
            (0.375, 0.375),
            (0.125, 0.375),
        ];
        for (idx, (x, y)) in pts.iter().enumerate() {
            doc.add_node(
                NodeID(idx as i64 + 1),
                LonLat::new(*x, *y).unwrap(),
                Tags::empty(),
            )
            .unwrap();
        }
        doc
    }

    fn ids(raw: &[i64]) -> Vec<NodeID> {
        raw.iter().map(|n| NodeID(*n)).collect()
    }

    fn transform(doc: &Document) -> MapGeometry {
        Transformer::new(Box::new(Equirectangular))
            .sequential()
            .transform(doc, &mut Timer::throwaway())
            .unwrap()
    }

    #[test]
    fn area_classification() {
        assert!(is_area(&tags(&[("area", "yes")])));
        assert!(is_area(&tags(&[("area", "1")])));
        assert!(is_area(&tags(&[("amenity", "school")])));
        assert!(!is_area(&tags(&[("area", "no")])));
        assert!(!is_area(&tags(&[("highway", "primary")])));
        assert!(!is_area(&Tags::empty()));
    }

    #[test]
    fn ways() {
        let mut doc = squares();
        // A building
        doc.add_way(
            WayID(1),
            ids(&[1, 2, 3, 4, 1]),
            tags(&[("building", "yes"), ("name", "Town hall")]),
        )
        .unwrap();
        // A pedestrian plaza with no polygon-worthy tags is dropped, not turned into a line
        doc.add_way(
            WayID(2),
            ids(&[5, 6, 7, 8, 5]),
            tags(&[("highway", "pedestrian"), ("area", "yes")]),
        )
        .unwrap();
        // A roundabout is a closed line
        doc.add_way(
            WayID(3),
            ids(&[5, 6, 7, 5]),
            tags(&[("highway", "primary"), ("junction", "roundabout")]),
        )
        .unwrap();
        doc.add_way(WayID(4), ids(&[1, 3]), tags(&[("railway", "rail")]))
            .unwrap();
        // Nothing to render
        doc.add_way(WayID(5), ids(&[2, 4]), tags(&[("name", "Nowhere")]))
            .unwrap();

        let map = transform(&doc);
        assert_eq!(1, map.polygons.len());
        assert_eq!(tags(&[("building", "yes")]), *map.polygons[0].tags());
        assert_eq!(4, map.polygons[0].value.shell().points().len());
        assert_eq!(0.25, map.polygons[0].value.area());

        assert_eq!(2, map.polylines.len());
        let roundabout = &map.polylines[0];
        assert_eq!(tags(&[("highway", "primary")]), *roundabout.tags());
        assert!(roundabout.value.is_closed());
        assert_eq!(3, roundabout.value.points().len());
        let rail = &map.polylines[1];
        assert!(!rail.value.is_closed());
        assert_eq!(
            &vec![Pt2D::new(0.0, 0.0), Pt2D::new(0.5, 0.5)],
            rail.value.points()
        );
    }

    #[test]
    fn relations() {
        let mut doc = squares();
        doc.add_way(WayID(1), ids(&[1, 2, 3]), Tags::empty()).unwrap();
        doc.add_way(WayID(2), ids(&[3, 4, 1]), Tags::empty()).unwrap();
        doc.add_way(WayID(3), ids(&[5, 6, 7, 8, 5]), Tags::empty())
            .unwrap();
        let members = vec![
            Member::new(OUTER, OsmID::Way(WayID(2))),
            Member::new(INNER, OsmID::Way(WayID(3))),
            Member::new(OUTER, OsmID::Way(WayID(1))),
        ];
        doc.add_relation(
            RelationID(1),
            members.clone(),
            tags(&[("type", "multipolygon"), ("landuse", "grass")]),
        )
        .unwrap();
        // No tags worth keeping
        doc.add_relation(
            RelationID(2),
            members,
            tags(&[("type", "multipolygon"), ("name", "Park")]),
        )
        .unwrap();

        let map = transform(&doc);
        assert!(map.polylines.is_empty());
        assert_eq!(1, map.polygons.len());
        let polygon = &map.polygons[0];
        assert_eq!(tags(&[("landuse", "grass")]), *polygon.tags());
        assert_eq!(1, polygon.value.holes().len());
        assert_eq!(0.25 - 0.0625, polygon.value.area());

        let parallel = Transformer::new(Box::new(Equirectangular))
            .transform(&doc, &mut Timer::throwaway())
            .unwrap();
        assert_eq!(map, parallel);
    }
}
