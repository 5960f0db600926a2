use anyhow::Result;
use structopt::StructOpt;

use abstutil::Timer;
use geom::{Equirectangular, Projection, CH1903};

#[derive(StructOpt, Debug)]
#[structopt(name = "convert_osm")]
struct Flags {
    /// OSM XML file to read. Gzipped files ending in .gz work too.
    #[structopt(long)]
    osm: String,

    /// How to flatten longitude and latitude into planar coordinates. ch1903 is the Swiss grid
    /// in meters; equirectangular keeps the raw radians.
    #[structopt(long, default_value = "ch1903", possible_values = &["ch1903", "equirectangular"])]
    projection: String,

    /// Write the lines and polygons here as GeoJSON
    #[structopt(long)]
    output: Option<String>,

    /// Don't assemble multipolygons on a thread pool
    #[structopt(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    abstutil::logger::setup();
    let flags = Flags::from_args();

    let projection: Box<dyn Projection> = match flags.projection.as_str() {
        "ch1903" => Box::new(CH1903),
        "equirectangular" => Box::new(Equirectangular),
        x => anyhow::bail!("Unknown projection {}", x),
    };

    let mut timer = Timer::new(format!("convert {}", abstutil::basename(&flags.osm)));
    let map = convert_osm::convert(&flags.osm, projection, !flags.sequential, &mut timer)?;
    timer.note(format!("Produced {}", map.describe()));
    if !map.is_empty() {
        let bounds = map.get_bounds();
        timer.note(format!(
            "Everything fits in {:.1} x {:.1}",
            bounds.width(),
            bounds.height()
        ));
    }

    if let Some(path) = flags.output {
        abstutil::write_json(&path, &map.to_geojson())?;
    }
    Ok(())
}
