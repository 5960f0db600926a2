//! Multipolygon relations describe an area as an unordered bag of ways, each tagged as part of an
//! outer boundary or an inner hole. The ways don't come in any particular order or direction, and
//! one ring may be split across many ways. Turning that back into polygons happens in two steps:
//!
//! 1) For each role, build a graph of the ways' nodes and walk it to recover closed rings.
//! 2) Nest every inner ring inside the smallest outer ring that fully contains it.
//!
//! Malformed relations don't stop the conversion. If the ways for one role don't form clean
//! loops, that role contributes no rings. Inner rings that aren't inside any outer ring are
//! dropped.

use std::collections::BTreeMap;

use anyhow::Result;
use ordered_float::OrderedFloat;

use abstutil::{Attributed, GraphBuilder, Tags, UndirectedGraph};
use geom::{Polygon, Projection, Ring};

use crate::osm::{NodeID, OsmID, RelationID, INNER, OUTER};
use crate::reader::{Document, Relation};

/// Progress of the ring walk through each node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeStatus {
    Unvisited,
    /// Part of the ring currently being traced
    InProgress,
    /// Part of a finished ring
    Closed,
}

/// Produces one polygon per outer ring of the relation, all carrying the same tags.
pub fn multipolygon(
    rel_id: RelationID,
    rel: &Relation,
    doc: &Document,
    projection: &dyn Projection,
    tags: &Tags,
) -> Result<Vec<Attributed<Polygon>>> {
    let inners = rings_for_role(rel_id, rel, doc, projection, INNER)?;
    let outers = rings_for_role(rel_id, rel, doc, projection, OUTER)?;
    Ok(assemble_polygons(rel_id, inners, outers, tags))
}

/// Recovers all closed rings formed by the relation's ways with the given role. If any node
/// doesn't have exactly two neighbors, the ways don't form simple loops, and no rings are
/// returned. Errors only happen if the Document's invariants are broken.
pub fn rings_for_role(
    rel_id: RelationID,
    rel: &Relation,
    doc: &Document,
    projection: &dyn Projection,
    role: &str,
) -> Result<Vec<Ring>> {
    let graph = build_graph(rel, doc, role)?;

    for n in graph.nodes() {
        let degree = graph.degree(n)?;
        if degree != 2 {
            debug!(
                "{} has {} with {} neighbors among the {} ways, so it contributes no {} rings",
                rel_id, n, degree, role, role
            );
            return Ok(Vec::new());
        }
    }

    let mut status: BTreeMap<NodeID, NodeStatus> = graph
        .nodes()
        .map(|n| (*n, NodeStatus::Unvisited))
        .collect();
    let mut rings = Vec::new();
    for start in graph.nodes() {
        if status[start] != NodeStatus::Unvisited {
            continue;
        }

        status.insert(*start, NodeStatus::InProgress);
        let mut current_ring = vec![*start];
        let mut current = *start;
        // Once the walk starts, one of the two neighbors is always where we just came from, so
        // there's at most one way forward. When there's none, we're back next to the start.
        while let Some(next) = graph
            .neighbors_of(&current)?
            .iter()
            .find(|n| status[*n] == NodeStatus::Unvisited)
            .copied()
        {
            status.insert(next, NodeStatus::InProgress);
            current_ring.push(next);
            current = next;
        }

        let mut pts = Vec::new();
        for n in current_ring {
            status.insert(n, NodeStatus::Closed);
            pts.push(doc.project_node(n, projection)?);
        }
        rings.push(Ring::new(pts)?);
    }
    Ok(rings)
}

/// Each node of a way with the matching role becomes a graph node, and consecutive nodes are
/// connected.
pub(crate) fn build_graph(
    rel: &Relation,
    doc: &Document,
    role: &str,
) -> Result<UndirectedGraph<NodeID>> {
    let mut builder = GraphBuilder::new();
    for member in &rel.members {
        let w = match member.id {
            OsmID::Way(w) if member.role == role => w,
            _ => continue,
        };
        let way = match doc.ways.get(&w) {
            Some(way) => way,
            None => bail!("Relation member {} isn't in the document", w),
        };

        let mut previous: Option<NodeID> = None;
        for n in &way.nodes {
            builder.add_node(*n);
            if let Some(prev) = previous {
                builder.add_edge(prev, *n)?;
            }
            previous = Some(*n);
        }
    }
    Ok(builder.build())
}

/// Attaches each inner ring as a hole of the first outer ring that contains every one of its
/// points, trying outer rings from smallest to largest area. Every outer ring becomes a polygon,
/// in that same order. Inner rings that don't fit anywhere are dropped.
pub fn assemble_polygons(
    rel_id: RelationID,
    inners: Vec<Ring>,
    mut outers: Vec<Ring>,
    tags: &Tags,
) -> Vec<Attributed<Polygon>> {
    // Stable, so equal areas keep their input order
    outers.sort_by_key(|ring| OrderedFloat(ring.area()));

    let mut remaining = inners;
    let mut polygons = Vec::new();
    for outer in outers {
        // Any point contained by the ring is within its bounds, so this is just a fast way to
        // skip the full check
        let bounds = outer.get_bounds();
        let (holes, rest): (Vec<Ring>, Vec<Ring>) = remaining.into_iter().partition(|inner| {
            bounds.contains_bounds(&inner.get_bounds())
                && inner.points().iter().all(|pt| outer.contains_pt(*pt))
        });
        remaining = rest;
        polygons.push(Attributed::new(
            Polygon::with_holes(outer, holes),
            tags.clone(),
        ));
    }

    if !remaining.is_empty() {
        debug!(
            "{} has {} inner rings that aren't inside any outer ring; dropping them",
            rel_id,
            remaining.len()
        );
    }
    polygons
}
