//! SUMO `.net.xml` reader.
//!
//! # What is loaded
//!
//! - `<junction>` ids, except `type="internal"`.
//! - `<edge>` elements with `from` and `to`, except those whose `function`
//!   is `internal`, `crossing`, or `walkingarea`.
//!
//! Everything else (lanes, connections, traffic-light programs) is skipped.
//! The file is streamed; only the kept IDs are held in memory.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{NetworkError, NetworkResult};

/// Load a road network from a SUMO `.net.xml` file.
pub fn load_net_xml(path: &Path) -> NetworkResult<RoadNetwork> {
    let file = File::open(path)?;
    let net = load_net_reader(file)?;
    info!(
        "loaded {} ({} junctions, {} edges)",
        path.display(),
        net.junction_count(),
        net.edge_count()
    );
    Ok(net)
}

/// Like [`load_net_xml`] but accepts any `Read` source.
pub fn load_net_reader<R: Read>(source: R) -> NetworkResult<RoadNetwork> {
    let mut reader = Reader::from_reader(BufReader::new(source));
    let mut builder = RoadNetworkBuilder::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"junction" => read_junction(&reader, &e, &mut builder)?,
                b"edge" => read_edge(&reader, &e, &mut builder)?,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(builder.build())
}

// ── Element handlers ──────────────────────────────────────────────────────────

fn read_junction<B>(
    reader:  &Reader<B>,
    e:       &BytesStart<'_>,
    builder: &mut RoadNetworkBuilder,
) -> NetworkResult<()> {
    if attr(reader, e, b"type")?.as_deref() == Some("internal") {
        return Ok(());
    }
    let id = attr(reader, e, b"id")?
        .ok_or(NetworkError::MissingAttribute { element: "junction", attribute: "id" })?;
    builder.add_junction(id);
    Ok(())
}

fn read_edge<B>(
    reader:  &Reader<B>,
    e:       &BytesStart<'_>,
    builder: &mut RoadNetworkBuilder,
) -> NetworkResult<()> {
    if matches!(
        attr(reader, e, b"function")?.as_deref(),
        Some("internal" | "crossing" | "walkingarea")
    ) {
        return Ok(());
    }
    let id = attr(reader, e, b"id")?
        .ok_or(NetworkError::MissingAttribute { element: "edge", attribute: "id" })?;
    let (Some(from), Some(to)) = (attr(reader, e, b"from")?, attr(reader, e, b"to")?) else {
        return Ok(());
    };
    builder.add_edge(id, from, to);
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn xml_error<B>(reader: &Reader<B>, source: quick_xml::Error) -> NetworkError {
    NetworkError::Xml { position: reader.buffer_position() as u64, source }
}

/// Unescaped value of attribute `name`, if present.
fn attr<B>(reader: &Reader<B>, e: &BytesStart<'_>, name: &[u8]) -> NetworkResult<Option<String>> {
    for a in e.attributes() {
        let a = a.map_err(|err| xml_error(reader, err.into()))?;
        if a.key.as_ref() == name {
            let value = a.unescape_value().map_err(|err| xml_error(reader, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
