//! Converts OpenStreetMap data into projected lines and polygons ready for rendering. Multipolygon
//! relations are reassembled from their member ways into polygons with holes.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use anyhow::Result;

use abstutil::Timer;
use geom::Projection;

pub use self::map::MapGeometry;
pub use self::transform::Transformer;

mod map;
pub mod multipolygon;
pub mod osm;
pub mod reader;
pub mod transform;

/// Reads an .osm or .osm.gz file and transforms everything in it.
pub fn convert(
    osm_path: &str,
    projection: Box<dyn Projection>,
    parallel: bool,
    timer: &mut Timer,
) -> Result<MapGeometry> {
    timer.start("read OSM");
    let doc = reader::Document::read(osm_path, timer);
    timer.stop("read OSM");
    let doc = doc?;

    let mut transformer = Transformer::new(projection);
    if !parallel {
        transformer = transformer.sequential();
    }
    timer.start("transform");
    let map = transformer.transform(&doc, timer);
    timer.stop("transform");
    map
}
