//! The parsed document and its lookup tables.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::reader::BinaryReader;
use crate::record::{read_element_record, read_property, CustomProperty, ElementRecord, Property};
use crate::types::{
    HeaderFlags, ResourceType, ValueType, COMPONENT_NAME_KEY, FILE_HEADER_SIZE, MAGIC,
    RESOURCE_FORMAT_EXTERNAL, RESOURCE_FORMAT_INLINE,
};
use crate::KrbError;

/// The 48-byte file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub flags: HeaderFlags,
    pub element_count: u16,
    pub style_count: u16,
    pub component_count: u16,
    pub animation_count: u16,
    pub string_count: u16,
    pub resource_count: u16,
    pub element_offset: u32,
    pub style_offset: u32,
    pub component_offset: u32,
    pub animation_offset: u32,
    pub string_offset: u32,
    pub resource_offset: u32,
    pub total_size: u32,
}

impl FileHeader {
    fn read(reader: &mut BinaryReader<'_>) -> Result<Self, KrbError> {
        let magic = reader.read_bytes(4)?;
        if magic != MAGIC {
            return Err(KrbError::InvalidMagic([magic[0], magic[1], magic[2], magic[3]]));
        }
        let version_minor = reader.read_u8()?;
        let version_major = reader.read_u8()?;
        let flags = HeaderFlags::from_bits_retain(reader.read_u16()?);
        Ok(Self {
            version_major,
            version_minor,
            flags,
            element_count: reader.read_u16()?,
            style_count: reader.read_u16()?,
            component_count: reader.read_u16()?,
            animation_count: reader.read_u16()?,
            string_count: reader.read_u16()?,
            resource_count: reader.read_u16()?,
            element_offset: reader.read_u32()?,
            style_offset: reader.read_u32()?,
            component_offset: reader.read_u32()?,
            animation_offset: reader.read_u32()?,
            string_offset: reader.read_u32()?,
            resource_offset: reader.read_u32()?,
            total_size: reader.read_u32()?,
        })
    }
}

/// A named, ordered property list referenced by style id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// 1-based style id.
    pub id: u8,
    pub name_index: u8,
    pub properties: Vec<Property>,
}

impl Style {
    /// Last property with the given id.
    pub fn property(&self, id: crate::types::PropertyId) -> Option<&Property> {
        self.properties.iter().rev().find(|p| p.id == id)
    }
}

/// A declared component property with its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPropertyDef {
    pub name_index: u8,
    pub value_type: ValueType,
    pub default_value: Vec<u8>,
}

/// A reusable component: name, declared properties and template blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefinition {
    pub name_index: u8,
    pub properties: Vec<ComponentPropertyDef>,
    /// Encoded element records of the template, root first.
    pub template: Vec<u8>,
}

impl ComponentDefinition {
    /// Declared default of the property named `key`.
    pub fn property_default<'d>(
        &'d self,
        doc: &Document,
        key: &str,
    ) -> Option<&'d ComponentPropertyDef> {
        self.properties
            .iter()
            .find(|def| doc.string(def.name_index) == Some(key))
    }
}

/// Where a resource's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceData {
    /// A file path (string index) relative to the document.
    External { path_index: u8 },
    /// Bytes embedded in the document.
    Inline(Vec<u8>),
}

/// A resource table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub resource_type: ResourceType,
    pub name_index: u8,
    pub data: ResourceData,
}

/// An immutable, parsed KRB document.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) header: FileHeader,
    pub(crate) elements: Vec<ElementRecord>,
    pub(crate) offset_index: HashMap<u32, usize>,
    pub(crate) styles: Vec<Style>,
    pub(crate) components: Vec<ComponentDefinition>,
    pub(crate) animation_data: Vec<u8>,
    pub(crate) strings: Vec<Vec<u8>>,
    pub(crate) resources: Vec<Resource>,
}

fn section_reader<'a>(
    reader: &BinaryReader<'a>,
    section: &'static str,
    offset: u32,
    count: u16,
    len: usize,
) -> Result<Option<BinaryReader<'a>>, KrbError> {
    if count == 0 {
        return Ok(None);
    }
    let offset = offset as usize;
    if offset < FILE_HEADER_SIZE || offset >= len {
        return Err(KrbError::SectionOutOfBounds {
            section,
            offset,
            len,
        });
    }
    reader.at(offset).map(Some)
}

impl Document {
    /// Parse a complete KRB byte stream.
    pub fn parse(data: &[u8]) -> Result<Self, KrbError> {
        let mut reader = BinaryReader::new(data);
        let header = FileHeader::read(&mut reader)?;
        let len = data.len();

        if header.flags.contains(HeaderFlags::COMPRESSED) {
            return Err(KrbError::Unsupported("compressed documents"));
        }
        if header.total_size as usize != len {
            warn!(
                declared = header.total_size,
                actual = len,
                "KRB total size does not match buffer length"
            );
        }

        let mut elements = Vec::with_capacity(header.element_count as usize);
        if let Some(mut r) = section_reader(
            &reader,
            "elements",
            header.element_offset,
            header.element_count,
            len,
        )? {
            for _ in 0..header.element_count {
                elements.push(read_element_record(&mut r)?);
            }
        }
        let offset_index = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.offset, i))
            .collect();

        let mut styles = Vec::with_capacity(header.style_count as usize);
        if let Some(mut r) =
            section_reader(&reader, "styles", header.style_offset, header.style_count, len)?
        {
            for _ in 0..header.style_count {
                let id = r.read_u8()?;
                let name_index = r.read_u8()?;
                let count = r.read_u8()?;
                let mut properties = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    properties.push(read_property(&mut r)?);
                }
                styles.push(Style {
                    id,
                    name_index,
                    properties,
                });
            }
        }

        let mut components = Vec::with_capacity(header.component_count as usize);
        if let Some(mut r) = section_reader(
            &reader,
            "components",
            header.component_offset,
            header.component_count,
            len,
        )? {
            for _ in 0..header.component_count {
                let name_index = r.read_u8()?;
                let def_count = r.read_u8()?;
                let mut properties = Vec::with_capacity(def_count as usize);
                for _ in 0..def_count {
                    let prop_name = r.read_u8()?;
                    let value_type = ValueType(r.read_u8()?);
                    let size = r.read_u8()? as usize;
                    properties.push(ComponentPropertyDef {
                        name_index: prop_name,
                        value_type,
                        default_value: r.read_bytes(size)?.to_vec(),
                    });
                }
                let template_size = r.read_u16()? as usize;
                let template = r.read_bytes(template_size)?.to_vec();
                components.push(ComponentDefinition {
                    name_index,
                    properties,
                    template,
                });
            }
        }

        let mut animation_data = Vec::new();
        if let Some(mut r) = section_reader(
            &reader,
            "animations",
            header.animation_offset,
            header.animation_count,
            len,
        )? {
            // Animation records are opaque; the section runs to the next section.
            let start = header.animation_offset;
            let end = [
                (header.element_count, header.element_offset),
                (header.style_count, header.style_offset),
                (header.component_count, header.component_offset),
                (header.string_count, header.string_offset),
                (header.resource_count, header.resource_offset),
            ]
            .iter()
            .filter(|(count, offset)| *count > 0 && *offset > start)
            .map(|(_, offset)| *offset as usize)
            .min()
            .unwrap_or(len)
            .min(len);
            animation_data = r.read_bytes(end - start as usize)?.to_vec();
        }

        let mut strings = Vec::with_capacity(header.string_count as usize);
        if let Some(mut r) = section_reader(
            &reader,
            "strings",
            header.string_offset,
            header.string_count,
            len,
        )? {
            for _ in 0..header.string_count {
                let size = r.read_u8()? as usize;
                strings.push(r.read_bytes(size)?.to_vec());
            }
        }

        let mut resources = Vec::with_capacity(header.resource_count as usize);
        if let Some(mut r) = section_reader(
            &reader,
            "resources",
            header.resource_offset,
            header.resource_count,
            len,
        )? {
            for _ in 0..header.resource_count {
                let resource_type = ResourceType(r.read_u8()?);
                let name_index = r.read_u8()?;
                let data = match r.read_u8()? {
                    RESOURCE_FORMAT_EXTERNAL => ResourceData::External {
                        path_index: r.read_u8()?,
                    },
                    RESOURCE_FORMAT_INLINE => {
                        let size = r.read_u16()? as usize;
                        ResourceData::Inline(r.read_bytes(size)?.to_vec())
                    }
                    _ => return Err(KrbError::Unsupported("unknown resource format")),
                };
                resources.push(Resource {
                    resource_type,
                    name_index,
                    data,
                });
            }
        }

        debug!(
            elements = elements.len(),
            styles = styles.len(),
            components = components.len(),
            strings = strings.len(),
            resources = resources.len(),
            "Parsed KRB document"
        );

        Ok(Self {
            header,
            elements,
            offset_index,
            styles,
            components,
            animation_data,
            strings,
            resources,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn flags(&self) -> HeaderFlags {
        self.header.flags
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&ElementRecord> {
        self.elements.get(index)
    }

    /// Index of the element whose record starts at `offset`.
    pub fn element_index_at(&self, offset: u32) -> Option<usize> {
        self.offset_index.get(&offset).copied()
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Look up a string by index. Invalid UTF-8 is a lookup miss.
    pub fn string(&self, index: u8) -> Option<&str> {
        let bytes = self.strings.get(index as usize)?;
        std::str::from_utf8(bytes).ok()
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Look up a style by its 1-based id. Id 0 means "no style".
    pub fn style(&self, id: u8) -> Option<&Style> {
        if id == 0 {
            return None;
        }
        self.styles.iter().find(|s| s.id == id)
    }

    /// Id of the first style named `name`.
    pub fn style_id_by_name(&self, name: &str) -> Option<u8> {
        self.styles
            .iter()
            .find(|s| self.string(s.name_index) == Some(name))
            .map(|s| s.id)
    }

    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    /// Look up a component definition by name.
    pub fn component(&self, name: &str) -> Option<&ComponentDefinition> {
        self.components
            .iter()
            .find(|c| self.string(c.name_index) == Some(name))
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, index: u8) -> Option<&Resource> {
        self.resources.get(index as usize)
    }

    pub fn animation_count(&self) -> u16 {
        self.header.animation_count
    }

    /// Custom property whose key string equals `key`.
    pub fn find_custom<'p>(
        &self,
        properties: &'p [CustomProperty],
        key: &str,
    ) -> Option<&'p CustomProperty> {
        properties
            .iter()
            .find(|p| self.string(p.key_index) == Some(key))
    }

    /// String value of the custom property `key`.
    pub fn custom_string(&self, properties: &[CustomProperty], key: &str) -> Option<&str> {
        let property = self.find_custom(properties, key)?;
        self.value_string(property.value_type, &property.value)
    }

    /// Decode a string-typed value (a one-byte string index).
    pub fn value_string(&self, value_type: ValueType, value: &[u8]) -> Option<&str> {
        if value_type != ValueType::STRING {
            return None;
        }
        value.first().and_then(|index| self.string(*index))
    }

    /// Component name declared by a placeholder's custom properties.
    pub fn component_name_of(&self, properties: &[CustomProperty]) -> Option<&str> {
        self.custom_string(properties, COMPONENT_NAME_KEY)
    }
}
