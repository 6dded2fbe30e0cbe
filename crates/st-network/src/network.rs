//! Road network representation and builder.
//!
//! The collector only needs topology: which junction each edge leaves and
//! which one it enters.  Both maps are keyed by SUMO's string IDs.

use std::collections::{HashMap, HashSet};

use st_core::{EdgeId, JunctionId};

// ── JunctionLookup ────────────────────────────────────────────────────────────

/// Outcome of resolving an edge to its end junctions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JunctionLookup {
    Found { from: JunctionId, to: JunctionId },
    /// The edge is not part of the network: a junction-internal edge, or
    /// a vehicle that has left the mapped area.
    SegmentNotFound,
    /// The edge exists but its topology is inconsistent.
    LookupError(String),
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct EdgeEnds {
    from: JunctionId,
    to:   JunctionId,
}

/// Immutable directed road graph.  Build with [`RoadNetworkBuilder`].
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    junctions: HashSet<JunctionId>,
    edges:     HashMap<EdgeId, EdgeEnds>,
}

impl RoadNetwork {
    /// A network with no junctions or edges.  Every lookup against it
    /// yields [`JunctionLookup::SegmentNotFound`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Resolve `edge` to its origin and destination junctions.
    pub fn lookup(&self, edge: &EdgeId) -> JunctionLookup {
        let Some(ends) = self.edges.get(edge) else {
            return JunctionLookup::SegmentNotFound;
        };
        for junction in [&ends.from, &ends.to] {
            if !self.junctions.contains(junction) {
                return JunctionLookup::LookupError(format!(
                    "edge {edge} references undeclared junction {junction}"
                ));
            }
        }
        JunctionLookup::Found { from: ends.from.clone(), to: ends.to.clone() }
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Junctions and edges may be added in any order; an edge whose junctions
/// are never declared is kept and reported by [`RoadNetwork::lookup`].
///
/// # Example
///
/// ```
/// use st_core::{EdgeId, JunctionId};
/// use st_network::{JunctionLookup, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_junction("J0");
/// b.add_junction("J1");
/// b.add_edge("E0", "J0", "J1");
/// let net = b.build();
/// assert_eq!(
///     net.lookup(&EdgeId::from("E0")),
///     JunctionLookup::Found { from: JunctionId::from("J0"), to: JunctionId::from("J1") },
/// );
/// ```
#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    junctions: HashSet<JunctionId>,
    edges:     HashMap<EdgeId, EdgeEnds>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a junction.  Repeated IDs are ignored.
    pub fn add_junction(&mut self, id: impl Into<JunctionId>) {
        self.junctions.insert(id.into());
    }

    /// Add a directed edge from `from` to `to`.  A repeated ID overwrites.
    pub fn add_edge(
        &mut self,
        id:   impl Into<EdgeId>,
        from: impl Into<JunctionId>,
        to:   impl Into<JunctionId>,
    ) {
        self.edges.insert(id.into(), EdgeEnds { from: from.into(), to: to.into() });
    }

    pub fn junction_count(&self) -> usize { self.junctions.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn build(self) -> RoadNetwork {
        RoadNetwork { junctions: self.junctions, edges: self.edges }
    }
}
