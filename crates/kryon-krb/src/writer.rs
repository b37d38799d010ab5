//! Document encoder.
//!
//! Sections are written in canonical order: header, elements, styles,
//! components, animations, strings, resources. Counts and offsets are
//! recomputed from the tables; version and flags are taken from the header.

use crate::document::{Document, ResourceData};
use crate::record::{count_u8, push_sized, write_element_record, write_property};
use crate::types::{FILE_HEADER_SIZE, MAGIC, RESOURCE_FORMAT_EXTERNAL, RESOURCE_FORMAT_INLINE};
use crate::KrbError;

fn count_u16(len: usize, what: &'static str) -> Result<u16, KrbError> {
    u16::try_from(len).map_err(|_| KrbError::Overflow { what, len })
}

fn offset_u32(len: usize) -> Result<u32, KrbError> {
    u32::try_from(len).map_err(|_| KrbError::Overflow {
        what: "document",
        len,
    })
}

/// Encode a document to bytes.
pub fn encode(doc: &Document) -> Result<Vec<u8>, KrbError> {
    let mut out = vec![0u8; FILE_HEADER_SIZE];

    let element_offset = out.len();
    for record in &doc.elements {
        write_element_record(record, &mut out)?;
    }

    let style_offset = out.len();
    for style in &doc.styles {
        out.push(style.id);
        out.push(style.name_index);
        out.push(count_u8(style.properties.len(), "style property count")?);
        for property in &style.properties {
            write_property(property, &mut out)?;
        }
    }

    let component_offset = out.len();
    for component in &doc.components {
        out.push(component.name_index);
        out.push(count_u8(component.properties.len(), "component property count")?);
        for def in &component.properties {
            out.push(def.name_index);
            out.push(def.value_type.0);
            push_sized(&mut out, &def.default_value, "component property default")?;
        }
        let size = count_u16(component.template.len(), "component template")?;
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&component.template);
    }

    let animation_offset = out.len();
    out.extend_from_slice(&doc.animation_data);

    let string_offset = out.len();
    for string in &doc.strings {
        push_sized(&mut out, string, "string")?;
    }

    let resource_offset = out.len();
    for resource in &doc.resources {
        out.push(resource.resource_type.0);
        out.push(resource.name_index);
        match &resource.data {
            ResourceData::External { path_index } => {
                out.push(RESOURCE_FORMAT_EXTERNAL);
                out.push(*path_index);
            }
            ResourceData::Inline(bytes) => {
                out.push(RESOURCE_FORMAT_INLINE);
                let size = count_u16(bytes.len(), "inline resource")?;
                out.extend_from_slice(&size.to_le_bytes());
                out.extend_from_slice(bytes);
            }
        }
    }

    let total_size = offset_u32(out.len())?;

    let mut header = Vec::with_capacity(FILE_HEADER_SIZE);
    header.extend_from_slice(&MAGIC);
    header.push(doc.header.version_minor);
    header.push(doc.header.version_major);
    header.extend_from_slice(&doc.header.flags.bits().to_le_bytes());
    for count in [
        count_u16(doc.elements.len(), "element count")?,
        count_u16(doc.styles.len(), "style count")?,
        count_u16(doc.components.len(), "component count")?,
        doc.header.animation_count,
        count_u16(doc.strings.len(), "string count")?,
        count_u16(doc.resources.len(), "resource count")?,
    ] {
        header.extend_from_slice(&count.to_le_bytes());
    }
    for offset in [
        element_offset,
        style_offset,
        component_offset,
        animation_offset,
        string_offset,
        resource_offset,
    ] {
        header.extend_from_slice(&offset_u32(offset)?.to_le_bytes());
    }
    header.extend_from_slice(&total_size.to_le_bytes());
    out[..FILE_HEADER_SIZE].copy_from_slice(&header);

    Ok(out)
}
