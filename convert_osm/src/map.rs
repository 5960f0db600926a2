use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, Attributed, Tags};
use geom::{Bounds, PolyLine, Polygon};

/// Everything worth rendering from one OSM document, in projected coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapGeometry {
    pub polylines: Vec<Attributed<PolyLine>>,
    pub polygons: Vec<Attributed<Polygon>>,
}

impl MapGeometry {
    pub fn new() -> MapGeometry {
        MapGeometry::default()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty() && self.polygons.is_empty()
    }

    /// Covers every line and polygon shell. Empty bounds if there's nothing.
    pub fn get_bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        for pl in &self.polylines {
            for pt in pl.value.points() {
                bounds.update(*pt);
            }
        }
        for p in &self.polygons {
            bounds.union(&p.value.get_bounds());
        }
        bounds
    }

    pub fn describe(&self) -> String {
        format!(
            "{} polylines ({} closed), {} polygons ({} holes)",
            prettyprint_usize(self.polylines.len()),
            prettyprint_usize(
                self.polylines
                    .iter()
                    .filter(|pl| pl.value.is_closed())
                    .count()
            ),
            prettyprint_usize(self.polygons.len()),
            prettyprint_usize(
                self.polygons
                    .iter()
                    .map(|p| p.value.holes().len())
                    .sum()
            ),
        )
    }

    /// Lines first, then polygons. Each feature's properties are its tags.
    pub fn to_geojson(&self) -> GeoJson {
        let mut features = Vec::new();
        for pl in &self.polylines {
            features.push(feature(pl.value.to_geojson(), pl.tags()));
        }
        for p in &self.polygons {
            features.push(feature(p.value.to_geojson(), p.tags()));
        }
        GeoJson::from(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }
}

fn feature(geometry: geojson::Geometry, tags: &Tags) -> Feature {
    let mut properties = serde_json::Map::new();
    for (k, v) in tags.inner() {
        properties.insert(k.to_string(), v.clone().into());
    }
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
