use std::io::{self, BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sha2::{Digest, Sha256};

use super::document::DocumentError;
use super::node::{Node, NodeId};
use crate::types::identifiers::ContentDigest;

const TYPE_ATTR: &[u8] = b"TYPE";
const LABEL_ATTR: &[u8] = b"N";

/// Hashes every byte that passes through.
struct DigestReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R: Read> Read for DigestReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

struct OpenElement {
    node: NodeId,
    last_child: Option<NodeId>,
}

fn malformed(err: impl std::fmt::Display) -> DocumentError {
    DocumentError::Malformed(err.to_string())
}

/// Build the node arena from a markup stream.
///
/// Text placement follows the usual element-tree convention: character data
/// goes to the open element's `text` until its first child closes, and to
/// the most recently closed child's `tail` afterwards.
pub(crate) fn parse_stream<R: Read>(body: R) -> Result<(Vec<Node>, ContentDigest), DocumentError> {
    let hashing = DigestReader {
        inner: body,
        hasher: Sha256::new(),
    };
    let mut reader = Reader::from_reader(BufReader::new(hashing));
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut nodes: Vec<Node> = Vec::new();
    let mut open: Vec<OpenElement> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(malformed)? {
            Event::Start(e) => {
                let id = push_element(&mut nodes, &open, &e)?;
                open.push(OpenElement {
                    node: id,
                    last_child: None,
                });
            }
            Event::Empty(e) => {
                let id = push_element(&mut nodes, &open, &e)?;
                nodes[id].end = id + 1;
                if let Some(parent) = open.last_mut() {
                    parent.last_child = Some(id);
                }
            }
            Event::End(_) => {
                let closed = open
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                nodes[closed.node].end = nodes.len();
                if let Some(parent) = open.last_mut() {
                    parent.last_child = Some(closed.node);
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(malformed)?;
                append_text(&mut nodes, &open, &text);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                append_text(&mut nodes, &open, &String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if !open.is_empty() {
        return Err(malformed(format!("{} unclosed element(s)", open.len())));
    }
    if nodes.is_empty() {
        return Err(DocumentError::Empty);
    }

    let hasher = reader.into_inner().into_inner().hasher;
    Ok((nodes, ContentDigest::from_hasher(hasher)))
}

fn push_element(
    nodes: &mut Vec<Node>,
    open: &[OpenElement],
    start: &BytesStart<'_>,
) -> Result<NodeId, DocumentError> {
    if open.is_empty() && !nodes.is_empty() {
        return Err(malformed("more than one root element"));
    }

    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut kind = None;
    let mut label = None;
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        match attr.key.as_ref() {
            TYPE_ATTR => kind = Some(attr.unescape_value().map_err(malformed)?.into_owned()),
            LABEL_ATTR => label = Some(attr.unescape_value().map_err(malformed)?.into_owned()),
            _ => {}
        }
    }

    nodes.push(Node::element(tag, kind, label));
    Ok(nodes.len() - 1)
}

fn append_text(nodes: &mut [Node], open: &[OpenElement], text: &str) {
    // Character data outside the root element is not part of any node.
    let Some(current) = open.last() else {
        return;
    };
    let slot = match current.last_child {
        Some(child) => &mut nodes[child].tail,
        None => &mut nodes[current.node].text,
    };
    match slot {
        Some(existing) => existing.push_str(text),
        None => *slot = Some(text.to_owned()),
    }
}
