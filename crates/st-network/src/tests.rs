//! Unit tests for st-network.
//!
//! All tests use hand-written networks so they run without a SUMO install.

#[cfg(test)]
mod helpers {
    /// A two-edge corridor J0 → J1 → J2 with one junction-internal edge,
    /// one pedestrian crossing, and an internal junction.
    pub const CORRIDOR_NET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<net version="1.16" junctionCornerDetail="5">
    <location netOffset="0.00,0.00" convBoundary="0.00,0.00,200.00,0.00"/>
    <edge id=":J1_0" function="internal">
        <lane id=":J1_0_0" index="0" speed="13.89" length="0.10" shape="100.00,-1.60 100.00,-1.60"/>
    </edge>
    <edge id=":J1_c0" function="crossing" crossingEdges="E1">
        <lane id=":J1_c0_0" index="0" speed="2.78" length="3.20"/>
    </edge>
    <edge id="E0" from="J0" to="J1" priority="-1">
        <lane id="E0_0" index="0" speed="13.89" length="100.00" shape="0.00,-1.60 100.00,-1.60"/>
    </edge>
    <edge id="E1" from="J1" to="J2" priority="-1">
        <lane id="E1_0" index="0" speed="13.89" length="100.00" shape="100.00,-1.60 200.00,-1.60"/>
    </edge>
    <junction id="J0" type="dead_end" x="0.00" y="0.00" incLanes="" intLanes="" shape="0.00,0.00 0.00,-3.20"/>
    <junction id="J1" type="priority" x="100.00" y="0.00" incLanes="E0_0" intLanes=":J1_0_0" shape="100.00,0.00">
        <request index="0" response="0" foes="0" cont="0"/>
    </junction>
    <junction id="J2" type="dead_end" x="200.00" y="0.00" incLanes="E1_0" intLanes="" shape="200.00,0.00"/>
    <junction id=":J1_w0" type="internal" x="100.00" y="0.00" incLanes="" intLanes=""/>
    <connection from="E0" to="E1" fromLane="0" toLane="0" via=":J1_0_0" dir="s" state="M"/>
</net>
"#;
}

#[cfg(test)]
mod network {
    use st_core::{EdgeId, JunctionId};

    use crate::{JunctionLookup, RoadNetwork, RoadNetworkBuilder};

    #[test]
    fn empty_network_finds_nothing() {
        let net = RoadNetwork::empty();
        assert_eq!((net.junction_count(), net.edge_count()), (0, 0));
        assert_eq!(net.lookup(&EdgeId::from("E0")), JunctionLookup::SegmentNotFound);
    }

    #[test]
    fn found_returns_both_ends() {
        let mut b = RoadNetworkBuilder::new();
        b.add_junction("A");
        b.add_junction("B");
        b.add_edge("AB", "A", "B");
        let net = b.build();

        assert_eq!(
            net.lookup(&EdgeId::from("AB")),
            JunctionLookup::Found { from: JunctionId::from("A"), to: JunctionId::from("B") }
        );
    }

    #[test]
    fn undeclared_junction_is_lookup_error() {
        let mut b = RoadNetworkBuilder::new();
        b.add_junction("A");
        b.add_edge("AX", "A", "X");
        let net = b.build();

        match net.lookup(&EdgeId::from("AX")) {
            JunctionLookup::LookupError(detail) => assert!(detail.contains("X")),
            other => panic!("expected LookupError, got {other:?}"),
        }
    }

    #[test]
    fn repeated_ids_collapse() {
        let mut b = RoadNetworkBuilder::new();
        b.add_junction("A");
        b.add_junction("A");
        b.add_junction("B");
        b.add_edge("AB", "A", "B");
        b.add_edge("AB", "B", "A");
        assert_eq!((b.junction_count(), b.edge_count()), (2, 1));
        let net = b.build();
        assert_eq!(
            net.lookup(&EdgeId::from("AB")),
            JunctionLookup::Found { from: JunctionId::from("B"), to: JunctionId::from("A") }
        );
    }
}

#[cfg(test)]
mod netxml {
    use std::io::Cursor;

    use st_core::{EdgeId, JunctionId};

    use super::helpers::CORRIDOR_NET;
    use crate::{JunctionLookup, NetworkError, load_net_reader, load_net_xml};

    #[test]
    fn loads_normal_edges_and_junctions() {
        let net = load_net_reader(Cursor::new(CORRIDOR_NET)).unwrap();
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.junction_count(), 3);
        assert_eq!(
            net.lookup(&EdgeId::from("E1")),
            JunctionLookup::Found { from: JunctionId::from("J1"), to: JunctionId::from("J2") }
        );
    }

    #[test]
    fn internal_and_pedestrian_edges_skipped() {
        let net = load_net_reader(Cursor::new(CORRIDOR_NET)).unwrap();
        assert_eq!(net.lookup(&EdgeId::from(":J1_0")), JunctionLookup::SegmentNotFound);
        assert_eq!(net.lookup(&EdgeId::from(":J1_c0")), JunctionLookup::SegmentNotFound);
        // J0, J1, J2 only; the internal :J1_w0 is not declared.
        assert_eq!(net.junction_count(), 3);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("map.net.xml");
        std::fs::write(&path, CORRIDOR_NET).unwrap();
        let net = load_net_xml(&path).unwrap();
        assert_eq!(net.edge_count(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let result = load_net_xml(&dir.path().join("absent.net.xml"));
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }

    #[test]
    fn edge_without_id_rejected() {
        let xml = r#"<net><edge from="A" to="B"/></net>"#;
        assert!(matches!(
            load_net_reader(Cursor::new(xml)),
            Err(NetworkError::MissingAttribute { element: "edge", attribute: "id" })
        ));
    }

    #[test]
    fn junction_without_id_rejected() {
        let xml = r#"<net><junction type="priority" x="0" y="0"/></net>"#;
        assert!(matches!(
            load_net_reader(Cursor::new(xml)),
            Err(NetworkError::MissingAttribute { element: "junction", attribute: "id" })
        ));
    }

    #[test]
    fn malformed_xml_rejected() {
        let xml = r#"<net><edge id="E0" from="A" to="B"></junction></net>"#;
        assert!(matches!(load_net_reader(Cursor::new(xml)), Err(NetworkError::Xml { .. })));
    }
}
