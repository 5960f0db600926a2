use std::collections::BTreeMap;
use std::io::Read;

use anyhow::{Context, Result};

use abstutil::{prettyprint_usize, Tags, Timer};
use geom::{LonLat, Projection, Pt2D};

use crate::osm::{MemberType, NodeID, OsmID, RelationID, WayID};

// Every record lives in one of these maps and refers to others by ID, never by reference.
// Per https://wiki.openstreetmap.org/wiki/OSM_XML#Certainties_and_Uncertainties, we assume
// elements come in order: nodes, ways, then relations. A way or relation referring to something
// that hasn't been seen yet is incomplete, and the whole object is skipped.
//
// TODO Filter out visible=false

#[derive(Default)]
pub struct Document {
    pub nodes: BTreeMap<NodeID, Node>,
    pub ways: BTreeMap<WayID, Way>,
    pub relations: BTreeMap<RelationID, Relation>,
}

pub struct Node {
    pub pt: LonLat,
    pub tags: Tags,
}

pub struct Way {
    /// At least 2, and all of them exist in the Document
    pub nodes: Vec<NodeID>,
    pub tags: Tags,
}

impl Way {
    pub fn first_node(&self) -> NodeID {
        self.nodes[0]
    }

    pub fn last_node(&self) -> NodeID {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn is_closed(&self) -> bool {
        self.first_node() == self.last_node()
    }

    /// Closed ways repeat their first node at the end; this omits it.
    pub fn non_repeating_nodes(&self) -> &[NodeID] {
        if self.is_closed() {
            &self.nodes[..self.nodes.len() - 1]
        } else {
            &self.nodes
        }
    }
}

pub struct Relation {
    pub tags: Tags,
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub role: String,
    pub id: OsmID,
}

impl Member {
    pub fn new<S: Into<String>>(role: S, id: OsmID) -> Member {
        Member {
            role: role.into(),
            id,
        }
    }

    pub fn member_type(&self) -> MemberType {
        self.id.member_type()
    }
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Reads an OSM XML file. If the path ends in `.gz`, it's decompressed first.
    pub fn read(path: &str, timer: &mut Timer) -> Result<Document> {
        timer.start(format!("read {}", path));
        let raw_string = read_to_string(path);
        timer.stop(format!("read {}", path));

        Document::parse(&raw_string?, timer)
    }

    pub fn parse(raw_string: &str, timer: &mut Timer) -> Result<Document> {
        timer.start("parse XML");
        let tree = roxmltree::Document::parse(raw_string);
        timer.stop("parse XML");

        let tree = tree?;
        check_not_truncated(raw_string, &tree)?;

        timer.start("scrape objects");
        let result = scrape(&tree);
        timer.stop("scrape objects");
        let (doc, incomplete_ways, incomplete_relations) = result?;

        timer.note(format!(
            "Found {} nodes, {} ways, {} relations",
            prettyprint_usize(doc.nodes.len()),
            prettyprint_usize(doc.ways.len()),
            prettyprint_usize(doc.relations.len())
        ));
        if incomplete_ways > 0 || incomplete_relations > 0 {
            timer.warn(format!(
                "Skipped {} incomplete ways and {} incomplete relations",
                prettyprint_usize(incomplete_ways),
                prettyprint_usize(incomplete_relations)
            ));
        }

        Ok(doc)
    }

    pub fn contains(&self, id: OsmID) -> bool {
        match id {
            OsmID::Node(n) => self.nodes.contains_key(&n),
            OsmID::Way(w) => self.ways.contains_key(&w),
            OsmID::Relation(r) => self.relations.contains_key(&r),
        }
    }

    pub fn project_node(&self, id: NodeID, projection: &dyn Projection) -> Result<Pt2D> {
        match self.nodes.get(&id) {
            Some(node) => Ok(projection.project(node.pt)),
            None => bail!("{} isn't in the document", id),
        }
    }

    pub fn add_node(&mut self, id: NodeID, pt: LonLat, tags: Tags) -> Result<()> {
        if self.nodes.contains_key(&id) {
            bail!("Duplicate {}, your .osm is corrupt", id);
        }
        self.nodes.insert(id, Node { pt, tags });
        Ok(())
    }

    /// All of the nodes must already exist, and there must be at least two.
    pub fn add_way(&mut self, id: WayID, nodes: Vec<NodeID>, tags: Tags) -> Result<()> {
        if self.ways.contains_key(&id) {
            bail!("Duplicate {}, your .osm is corrupt", id);
        }
        if nodes.len() < 2 {
            bail!("{} only has {} nodes", id, nodes.len());
        }
        if let Some(n) = nodes.iter().find(|n| !self.nodes.contains_key(n)) {
            bail!("{} refers to missing {}", id, n);
        }
        self.ways.insert(id, Way { nodes, tags });
        Ok(())
    }

    /// All of the members must already exist.
    pub fn add_relation(
        &mut self,
        id: RelationID,
        members: Vec<Member>,
        tags: Tags,
    ) -> Result<()> {
        if self.relations.contains_key(&id) {
            bail!("Duplicate {}, your .osm is corrupt", id);
        }
        if let Some(m) = members.iter().find(|m| !self.contains(m.id)) {
            bail!("{} refers to missing {}", id, m.id);
        }
        self.relations.insert(id, Relation { tags, members });
        Ok(())
    }
}

/// Returns the document and the number of skipped ways and relations.
fn scrape(tree: &roxmltree::Document) -> Result<(Document, usize, usize)> {
    let mut doc = Document::new();
    let mut incomplete_ways = 0;
    let mut incomplete_relations = 0;

    for obj in tree.descendants() {
        if !obj.is_element() {
            continue;
        }
        match obj.tag_name().name() {
            "node" => {
                let id = NodeID(parse_id(obj)?);
                let pt = LonLat::from_degrees(parse_f64(obj, "lon")?, parse_f64(obj, "lat")?)
                    .with_context(|| format!("bad position for {}", id))?;
                doc.add_node(id, pt, read_tags(obj)?)?;
            }
            "way" => {
                let id = WayID(parse_id(obj)?);
                let mut nodes = Vec::new();
                let mut complete = true;
                for child in obj.children() {
                    if child.tag_name().name() == "nd" {
                        let n = NodeID(parse_i64(child, "ref")?);
                        if !doc.nodes.contains_key(&n) {
                            complete = false;
                        }
                        nodes.push(n);
                    }
                }
                if !complete || nodes.len() < 2 {
                    debug!("Skipping incomplete {}", id);
                    incomplete_ways += 1;
                    continue;
                }
                doc.add_way(id, nodes, read_tags(obj)?)?;
            }
            "relation" => {
                let id = RelationID(parse_id(obj)?);
                let mut members = Vec::new();
                let mut complete = true;
                for child in obj.children() {
                    if child.tag_name().name() != "member" {
                        continue;
                    }
                    let r = parse_i64(child, "ref")?;
                    let member = match attribute(child, "type")?.as_str() {
                        "node" => OsmID::Node(NodeID(r)),
                        "way" => OsmID::Way(WayID(r)),
                        "relation" => OsmID::Relation(RelationID(r)),
                        _ => continue,
                    };
                    if !doc.contains(member) {
                        complete = false;
                    }
                    let role = child.attribute("role").unwrap_or("");
                    members.push(Member::new(role, member));
                }
                if !complete {
                    debug!("Skipping incomplete {}", id);
                    incomplete_relations += 1;
                    continue;
                }
                doc.add_relation(id, members, read_tags(obj)?)?;
            }
            _ => {}
        }
    }

    Ok((doc, incomplete_ways, incomplete_relations))
}

/// roxmltree accepts a root element that's never closed, so a cut-off file would otherwise parse
/// into a partial Document.
fn check_not_truncated(raw_string: &str, tree: &roxmltree::Document) -> Result<()> {
    let root = tree.root_element();
    let name = root.tag_name().name();
    let end = raw_string.trim_end();
    let self_closing = !root.has_children() && end.ends_with("/>");
    if !self_closing && !end.ends_with(&format!("</{}>", name)) {
        bail!("The XML ends before </{}>, so the file is probably truncated", name);
    }
    Ok(())
}

fn read_to_string(path: &str) -> Result<String> {
    if path.ends_with(".gz") {
        let mut raw_string = String::new();
        flate2::read::GzDecoder::new(fs_err::File::open(path)?)
            .read_to_string(&mut raw_string)
            .with_context(|| format!("decompressing {}", path))?;
        Ok(raw_string)
    } else {
        Ok(fs_err::read_to_string(path)?)
    }
}

fn attribute(obj: roxmltree::Node, key: &str) -> Result<String> {
    match obj.attribute(key) {
        Some(value) => Ok(value.to_string()),
        None => bail!("<{}> is missing {}", obj.tag_name().name(), key),
    }
}

fn parse_i64(obj: roxmltree::Node, key: &str) -> Result<i64> {
    let raw = attribute(obj, key)?;
    raw.parse::<i64>()
        .with_context(|| format!("{}={} isn't an integer", key, raw))
}

fn parse_f64(obj: roxmltree::Node, key: &str) -> Result<f64> {
    let raw = attribute(obj, key)?;
    raw.parse::<f64>()
        .with_context(|| format!("{}={} isn't a number", key, raw))
}

fn parse_id(obj: roxmltree::Node) -> Result<i64> {
    parse_i64(obj, "id")
}

fn read_tags(obj: roxmltree::Node) -> Result<Tags> {
    let mut tags = Tags::empty();
    for child in obj.children() {
        if child.tag_name().name() == "tag" {
            tags.insert(attribute(child, "k")?, attribute(child, "v")?);
        }
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="46.5" lon="6.6"><tag k="amenity" v="bench"/></node>
  <node id="2" lat="46.5" lon="6.7"/>
  <node id="3" lat="46.6" lon="6.7"/>
  <way id="10">
    <nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="1"/>
    <tag k="building" v="yes"/>
  </way>
  <way id="11">
    <nd ref="1"/><nd ref="99"/>
  </way>
  <way id="12">
    <nd ref="2"/>
  </way>
  <relation id="100">
    <member type="way" ref="10" role="outer"/>
    <member type="node" ref="1"/>
    <tag k="type" v="multipolygon"/>
  </relation>
  <relation id="101">
    <member type="way" ref="11" role="outer"/>
  </relation>
</osm>"#;

    #[test]
    fn parse_small() {
        let mut timer = Timer::throwaway();
        let doc = Document::parse(SMALL, &mut timer).unwrap();
        assert_eq!(
            vec!["Skipped 2 incomplete ways and 1 incomplete relations".to_string()],
            timer.warnings()
        );
        assert_eq!(3, doc.nodes.len());
        assert!(doc.nodes[&NodeID(1)].tags.is("amenity", "bench"));
        assert!((doc.nodes[&NodeID(2)].pt.longitude() - 6.7_f64.to_radians()).abs() < 1e-12);

        // 11 refers to a missing node and 12 is too short
        assert_eq!(vec![WayID(10)], doc.ways.keys().cloned().collect::<Vec<_>>());
        let way = &doc.ways[&WayID(10)];
        assert!(way.is_closed());
        assert_eq!(
            &[NodeID(1), NodeID(2), NodeID(3)],
            way.non_repeating_nodes()
        );

        // 101 refers to the incomplete way
        assert_eq!(1, doc.relations.len());
        let rel = &doc.relations[&RelationID(100)];
        assert_eq!(
            vec![
                Member::new("outer", OsmID::Way(WayID(10))),
                Member::new("", OsmID::Node(NodeID(1)))
            ],
            rel.members
        );
        assert_eq!(MemberType::Way, rel.members[0].member_type());
    }

    #[test]
    fn corrupt_input() {
        let dupe = r#"<osm><node id="1" lat="0" lon="0"/><node id="1" lat="1" lon="1"/></osm>"#;
        assert!(Document::parse(dupe, &mut Timer::throwaway()).is_err());

        let no_id = r#"<osm><node lat="0" lon="0"/></osm>"#;
        assert!(Document::parse(no_id, &mut Timer::throwaway()).is_err());

        let bad_lat = r#"<osm><node id="1" lat="north" lon="0"/></osm>"#;
        assert!(Document::parse(bad_lat, &mut Timer::throwaway()).is_err());

        assert!(Document::parse("<osm>", &mut Timer::throwaway()).is_err());
        let cut_off = r#"<osm version="0.6"><node id="1" lat="0" lon="0"/>"#;
        assert!(Document::parse(cut_off, &mut Timer::throwaway()).is_err());
        let cut_off_in_node = r#"<osm><node id="1" lat="0" lon="0"/><node id="2" lat="1""#;
        assert!(Document::parse(cut_off_in_node, &mut Timer::throwaway()).is_err());

        // Empty documents and trailing whitespace are fine
        let empty = Document::parse("<osm/>\n", &mut Timer::throwaway()).unwrap();
        assert!(empty.nodes.is_empty());
        assert!(Document::parse("<osm></osm>", &mut Timer::throwaway()).is_ok());
    }

    #[test]
    fn build_by_hand() {
        let mut doc = Document::new();
        let pt = LonLat::new(0.0, 0.0).unwrap();
        doc.add_node(NodeID(1), pt, Tags::empty()).unwrap();
        doc.add_node(NodeID(2), pt, Tags::empty()).unwrap();
        assert!(doc.add_node(NodeID(2), pt, Tags::empty()).is_err());

        assert!(doc.add_way(WayID(1), vec![NodeID(1)], Tags::empty()).is_err());
        assert!(doc
            .add_way(WayID(1), vec![NodeID(1), NodeID(3)], Tags::empty())
            .is_err());
        doc.add_way(WayID(1), vec![NodeID(1), NodeID(2)], Tags::empty())
            .unwrap();
        assert!(!doc.ways[&WayID(1)].is_closed());
        assert_eq!(2, doc.ways[&WayID(1)].non_repeating_nodes().len());

        assert!(doc
            .add_relation(
                RelationID(1),
                vec![Member::new("outer", OsmID::Way(WayID(2)))],
                Tags::empty()
            )
            .is_err());
        doc.add_relation(
            RelationID(1),
            vec![Member::new("outer", OsmID::Way(WayID(1)))],
            Tags::empty(),
        )
        .unwrap();
        assert!(doc.contains(OsmID::Relation(RelationID(1))));
    }
}
