//! OSM identifiers and the keys that matter for rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Keys worth keeping on polygons.
pub const POLYGON_KEYS: [&str; 6] = [
    "building", "landuse", "layer", "leisure", "natural", "waterway",
];

/// Keys worth keeping on lines.
pub const POLYLINE_KEYS: [&str; 7] = [
    "bridge", "highway", "layer", "man_made", "railway", "tunnel", "waterway",
];

/// A closed way with any of these keys describes an area, even without `area=yes`.
pub const IMPLICIT_AREA_KEYS: [&str; 20] = [
    "aeroway",
    "amenity",
    "building",
    "harbour",
    "historic",
    "landuse",
    "leisure",
    "man_made",
    "military",
    "natural",
    "office",
    "place",
    "power",
    "public_transport",
    "shop",
    "sport",
    "tourism",
    "water",
    "waterway",
    "wetland",
];

pub const AREA: &str = "area";
pub const AREA_VALUES: [&str; 3] = ["yes", "true", "1"];

pub const INNER: &str = "inner";
pub const OUTER: &str = "outer";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeID(pub i64);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WayID(pub i64);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationID(pub i64);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/node/{}", self.0)
    }
}
impl fmt::Display for WayID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/way/{}", self.0)
    }
}
impl fmt::Display for RelationID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/relation/{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OsmID {
    Node(NodeID),
    Way(WayID),
    Relation(RelationID),
}

impl fmt::Display for OsmID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OsmID::Node(n) => write!(f, "{}", n),
            OsmID::Way(w) => write!(f, "{}", w),
            OsmID::Relation(r) => write!(f, "{}", r),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberType {
    Node,
    Way,
    Relation,
}

impl OsmID {
    pub fn member_type(self) -> MemberType {
        match self {
            OsmID::Node(_) => MemberType::Node,
            OsmID::Way(_) => MemberType::Way,
            OsmID::Relation(_) => MemberType::Relation,
        }
    }
}
