// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OOXML word processing passes over a staged `.docx` file.
//
// The text pass and the image pass each open the staged file on their own, so
// either can fail without affecting what the other has read.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use einlass_core::error::{EinlassError, Result};
use einlass_core::types::{DocumentKind, EmbeddedImage};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument, warn};
use zip::ZipArchive;

use crate::media::{GENERIC_CONTENT_TYPE, extension_for};

const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Upper bound on the decompressed size of any single package part.
const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Raw text of the main document body.
///
/// Each paragraph is followed by a blank line. Tabs and line breaks inside
/// runs are kept as `\t` and `\n`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_text(path: &Path) -> Result<String> {
    let mut archive = open_archive(path)?;
    let xml = read_part_string(&mut archive, DOCUMENT_PART)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::with_capacity(xml.len() / 4);
    let mut paragraph = String::new();
    let mut in_run = false;
    let mut in_text = false;
    let mut fallback = FallbackSkipper::default();

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        if fallback.skip(&event) {
            continue;
        }
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => {
                    text.push_str(&paragraph);
                    text.push_str("\n\n");
                    paragraph.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" if in_run => paragraph.push('\t'),
                b"w:br" | b"w:cr" if in_run => paragraph.push('\n'),
                b"w:p" => text.push_str("\n\n"),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let unescaped = t.unescape().map_err(xml_error)?;
                paragraph.push_str(&unescaped);
            }
            Event::CData(c) if in_text => {
                paragraph.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(chars = text.len(), "Word text extracted");
    Ok(text)
}

/// Embedded images of the main document body, in document order.
///
/// Each `a:blip` / `v:imagedata` reference is resolved through the document
/// relationships; the declared content type comes from `[Content_Types].xml`.
/// Linked (external) images are skipped.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_images(path: &Path) -> Result<Vec<EmbeddedImage>> {
    let mut archive = open_archive(path)?;
    let document_xml = read_part_string(&mut archive, DOCUMENT_PART)?;
    let references = image_references(&document_xml)?;
    if references.is_empty() {
        return Ok(Vec::new());
    }

    let relationships = match read_optional_part(&mut archive, DOCUMENT_RELS_PART)? {
        Some(xml) => parse_relationships(&xml)?,
        None => {
            return Err(malformed(format!(
                "document references images but {DOCUMENT_RELS_PART} is missing"
            )));
        }
    };
    let content_types = match read_optional_part(&mut archive, CONTENT_TYPES_PART)? {
        Some(xml) => ContentTypes::parse(&xml)?,
        None => ContentTypes::default(),
    };

    let mut images = Vec::with_capacity(references.len());
    for rel_id in references {
        let relationship = relationships
            .get(&rel_id)
            .ok_or_else(|| malformed(format!("image relationship '{rel_id}' not found")))?;
        if relationship.external {
            debug!(rel_id, target = %relationship.target, "Skipping linked image");
            continue;
        }

        let part = resolve_target(&relationship.target);
        let bytes = read_part_bytes(&mut archive, &part)?;
        let content_type = content_types.lookup(&part);
        let extension = extension_for(&content_type).to_string();
        images.push(EmbeddedImage {
            bytes,
            content_type,
            extension,
        });
    }

    debug!(count = images.len(), "Word images extracted");
    Ok(images)
}

// -- Archive helpers ----------------------------------------------------------

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|err| EinlassError::staging("read", err))?;
    ZipArchive::new(file).map_err(|err| malformed(format!("not a valid OOXML package: {err}")))
}

fn read_part_bytes(archive: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>> {
    let entry = archive
        .by_name(name)
        .map_err(|err| malformed(format!("missing part {name}: {err}")))?;
    // The declared size comes from the upload; only trust it up to the cap.
    let size_hint = entry.size().min(MAX_PART_BYTES);
    read_limited(entry, name, size_hint, MAX_PART_BYTES)
}

/// Read at most `limit` bytes from `reader`; anything longer is malformed.
fn read_limited(reader: impl Read, name: &str, size_hint: u64, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(size_hint as usize);
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| malformed(format!("failed to read part {name}: {err}")))?;
    if bytes.len() as u64 > limit {
        return Err(malformed(format!(
            "part {name} decompresses to more than {limit} bytes"
        )));
    }
    Ok(bytes)
}

fn read_part_string(archive: &mut ZipArchive<File>, name: &str) -> Result<String> {
    let bytes = read_part_bytes(archive, name)?;
    String::from_utf8(bytes).map_err(|err| malformed(format!("part {name} is not UTF-8: {err}")))
}

fn read_optional_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    if archive.file_names().any(|entry| entry == name) {
        read_part_string(archive, name).map(Some)
    } else {
        Ok(None)
    }
}

// -- Markup compatibility -----------------------------------------------------

/// Skips `mc:Fallback` branches.
///
/// Word writes shapes and text boxes twice inside `mc:AlternateContent`: the
/// preferred `mc:Choice` and a VML `mc:Fallback` copy. Only the choice is read.
#[derive(Debug, Default)]
struct FallbackSkipper {
    depth: usize,
}

impl FallbackSkipper {
    /// True when `event` opens, closes, or lies inside a fallback branch.
    fn skip(&mut self, event: &Event<'_>) -> bool {
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"Fallback" => {
                self.depth += 1;
                true
            }
            Event::End(e) if e.local_name().as_ref() == b"Fallback" => {
                self.depth = self.depth.saturating_sub(1);
                true
            }
            Event::Eof => false,
            _ => self.depth > 0,
        }
    }
}

// -- Image references ---------------------------------------------------------

/// Relationship ids of every image reference, in document order.
fn image_references(document_xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(document_xml);
    let mut references = Vec::new();
    let mut fallback = FallbackSkipper::default();

    loop {
        let event = reader.read_event().map_err(xml_error)?;
        if fallback.skip(&event) {
            continue;
        }
        match event {
            Event::Start(e) | Event::Empty(e) => {
                let wanted: &[u8] = match e.name().as_ref() {
                    b"a:blip" => b"embed",
                    b"v:imagedata" => b"id",
                    _ => continue,
                };
                if let Some(id) = prefixed_attribute(&e, wanted)? {
                    references.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(references)
}

/// Value of a namespaced attribute (`r:embed`, `r:id`) by local name.
fn prefixed_attribute(element: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| malformed(format!("bad attribute: {err}")))?;
        if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == local {
            let value = attr.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

// -- Relationships ------------------------------------------------------------

#[derive(Debug)]
struct Relationship {
    target: String,
    external: bool,
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, Relationship>> {
    let mut reader = Reader::from_str(xml);
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut external = false;
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| malformed(format!("bad attribute: {err}")))?;
                    let value = attr.unescape_value().map_err(xml_error)?.into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value),
                        b"Target" => target = Some(value),
                        b"TargetMode" => external = value.eq_ignore_ascii_case("External"),
                        _ => {}
                    }
                }
                match (id, target) {
                    (Some(id), Some(target)) => {
                        relationships.insert(id, Relationship { target, external });
                    }
                    _ => warn!("Ignoring relationship without Id or Target"),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(relationships)
}

/// Resolve a relationship target against the `word/` directory.
fn resolve_target(target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{target}"),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

// -- Content types ------------------------------------------------------------

#[derive(Debug, Default)]
struct ContentTypes {
    /// Lower-cased extension -> content type.
    defaults: HashMap<String, String>,
    /// Part name without leading slash -> content type.
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut types = Self::default();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) | Event::Empty(e) => {
                    let is_default = match e.local_name().as_ref() {
                        b"Default" => true,
                        b"Override" => false,
                        _ => continue,
                    };
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr =
                            attr.map_err(|err| malformed(format!("bad attribute: {err}")))?;
                        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(value),
                            b"ContentType" => content_type = Some(value),
                            _ => {}
                        }
                    }
                    if let (Some(key), Some(content_type)) = (key, content_type) {
                        if is_default {
                            types.defaults.insert(key.to_ascii_lowercase(), content_type);
                        } else {
                            types
                                .overrides
                                .insert(key.trim_start_matches('/').to_string(), content_type);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(types)
    }

    fn lookup(&self, part: &str) -> String {
        if let Some(content_type) = self.overrides.get(part) {
            return content_type.clone();
        }
        part.rsplit_once('.')
            .and_then(|(_, ext)| self.defaults.get(&ext.to_ascii_lowercase()))
            .cloned()
            .unwrap_or_else(|| GENERIC_CONTENT_TYPE.to_string())
    }
}

// -- Errors -------------------------------------------------------------------

fn malformed(detail: String) -> EinlassError {
    EinlassError::malformed(DocumentKind::Word, detail)
}

fn xml_error(err: quick_xml::Error) -> EinlassError {
    malformed(format!("invalid XML: {err}"))
}
