//! Element records: the shared layout of document elements and component
//! template entries.

use crate::reader::BinaryReader;
use crate::types::{ElementType, EventType, LayoutFlags, PropertyId, ValueType};
use crate::KrbError;

/// Fixed header of an element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHeader {
    pub element_type: ElementType,
    /// String index of the element id; 0 means no id.
    pub id: u8,
    pub pos_x: u16,
    pub pos_y: u16,
    pub width: u16,
    pub height: u16,
    pub layout: LayoutFlags,
    /// Style id; 0 means no style.
    pub style_id: u8,
}

impl ElementHeader {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            id: 0,
            pos_x: 0,
            pos_y: 0,
            width: 0,
            height: 0,
            layout: LayoutFlags::default(),
            style_id: 0,
        }
    }
}

/// A standard property: id, value type and raw value bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub id: PropertyId,
    pub value_type: ValueType,
    pub value: Vec<u8>,
}

impl Property {
    pub fn new(id: PropertyId, value_type: ValueType, value: Vec<u8>) -> Self {
        Self {
            id,
            value_type,
            value,
        }
    }

    pub fn byte(id: PropertyId, value: u8) -> Self {
        Self::new(id, ValueType::BYTE, vec![value])
    }

    pub fn short(id: PropertyId, value: u16) -> Self {
        Self::new(id, ValueType::SHORT, value.to_le_bytes().to_vec())
    }

    pub fn color(id: PropertyId, rgba: [u8; 4]) -> Self {
        Self::new(id, ValueType::COLOR, rgba.to_vec())
    }

    /// A string-valued property referencing the string table.
    pub fn string(id: PropertyId, index: u8) -> Self {
        Self::new(id, ValueType::STRING, vec![index])
    }

    pub fn resource(id: PropertyId, index: u8) -> Self {
        Self::new(id, ValueType::RESOURCE, vec![index])
    }

    /// A percentage property; `1.0` encodes as 100%.
    pub fn percentage(id: PropertyId, fraction: f32) -> Self {
        let fixed = (fraction * 256.0).round().clamp(0.0, u16::MAX as f32) as u16;
        Self::new(id, ValueType::PERCENTAGE, fixed.to_le_bytes().to_vec())
    }

    pub fn edge_insets(id: PropertyId, top: u8, right: u8, bottom: u8, left: u8) -> Self {
        Self::new(id, ValueType::EDGE_INSETS, vec![top, right, bottom, left])
    }

    /// First value byte.
    pub fn as_u8(&self) -> Option<u8> {
        self.value.first().copied()
    }

    /// First two value bytes as a little-endian u16.
    pub fn as_u16(&self) -> Option<u16> {
        match self.value.as_slice() {
            [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }
}

/// A custom property keyed by a string-table index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProperty {
    pub key_index: u8,
    pub value_type: ValueType,
    pub value: Vec<u8>,
}

impl CustomProperty {
    pub fn new(key_index: u8, value_type: ValueType, value: Vec<u8>) -> Self {
        Self {
            key_index,
            value_type,
            value,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.value.first().copied()
    }
}

/// An event binding: event type and handler name string index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventEntry {
    pub event_type: EventType,
    pub handler_index: u8,
}

/// An animation reference. Decoded and carried, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRef {
    pub animation_index: u8,
    pub trigger: u8,
}

/// One decoded element record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRecord {
    /// Byte offset of the record header within its container (the file for
    /// document elements, the template blob for template entries).
    pub offset: u32,
    pub header: ElementHeader,
    pub properties: Vec<Property>,
    pub custom_properties: Vec<CustomProperty>,
    pub events: Vec<EventEntry>,
    pub animations: Vec<AnimationRef>,
    /// Child offsets relative to this record's header start.
    pub child_offsets: Vec<u16>,
}

impl ElementRecord {
    pub fn new(header: ElementHeader) -> Self {
        Self {
            offset: 0,
            header,
            properties: Vec::new(),
            custom_properties: Vec::new(),
            events: Vec::new(),
            animations: Vec::new(),
            child_offsets: Vec::new(),
        }
    }

    /// Last property with the given id.
    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.iter().rev().find(|p| p.id == id)
    }

    /// Absolute offsets of the declared children.
    pub fn child_positions(&self) -> impl Iterator<Item = u32> + '_ {
        self.child_offsets
            .iter()
            .map(move |rel| self.offset + u32::from(*rel))
    }

    /// Number of bytes this record occupies when encoded.
    pub fn encoded_len(&self) -> usize {
        crate::types::ELEMENT_HEADER_SIZE
            + self
                .properties
                .iter()
                .map(|p| 3 + p.value.len())
                .sum::<usize>()
            + self
                .custom_properties
                .iter()
                .map(|p| 3 + p.value.len())
                .sum::<usize>()
            + self.events.len() * 2
            + self.animations.len() * 2
            + self.child_offsets.len() * 2
    }
}

pub(crate) fn read_property(reader: &mut BinaryReader<'_>) -> Result<Property, KrbError> {
    let id = PropertyId(reader.read_u8()?);
    let value_type = ValueType(reader.read_u8()?);
    let size = reader.read_u8()? as usize;
    let value = reader.read_bytes(size)?.to_vec();
    Ok(Property {
        id,
        value_type,
        value,
    })
}

pub(crate) fn write_property(property: &Property, out: &mut Vec<u8>) -> Result<(), KrbError> {
    out.push(property.id.0);
    out.push(property.value_type.0);
    push_sized(out, &property.value, "property value")
}

pub(crate) fn push_sized(out: &mut Vec<u8>, bytes: &[u8], what: &'static str) -> Result<(), KrbError> {
    let len = u8::try_from(bytes.len()).map_err(|_| KrbError::Overflow {
        what,
        len: bytes.len(),
    })?;
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}

pub(crate) fn count_u8(len: usize, what: &'static str) -> Result<u8, KrbError> {
    u8::try_from(len).map_err(|_| KrbError::Overflow { what, len })
}

/// Read one element record at the reader's current position.
pub fn read_element_record(reader: &mut BinaryReader<'_>) -> Result<ElementRecord, KrbError> {
    let offset = reader.position() as u32;
    let element_type = ElementType::from_u8(reader.read_u8()?);
    let id = reader.read_u8()?;
    let pos_x = reader.read_u16()?;
    let pos_y = reader.read_u16()?;
    let width = reader.read_u16()?;
    let height = reader.read_u16()?;
    let layout = LayoutFlags(reader.read_u8()?);
    let style_id = reader.read_u8()?;
    let property_count = reader.read_u8()?;
    let child_count = reader.read_u8()?;
    let event_count = reader.read_u8()?;
    let animation_count = reader.read_u8()?;
    let custom_count = reader.read_u8()?;

    let mut record = ElementRecord::new(ElementHeader {
        element_type,
        id,
        pos_x,
        pos_y,
        width,
        height,
        layout,
        style_id,
    });
    record.offset = offset;

    for _ in 0..property_count {
        record.properties.push(read_property(reader)?);
    }
    for _ in 0..custom_count {
        let key_index = reader.read_u8()?;
        let value_type = ValueType(reader.read_u8()?);
        let size = reader.read_u8()? as usize;
        let value = reader.read_bytes(size)?.to_vec();
        record
            .custom_properties
            .push(CustomProperty::new(key_index, value_type, value));
    }
    for _ in 0..event_count {
        let event_type = EventType(reader.read_u8()?);
        let handler_index = reader.read_u8()?;
        record.events.push(EventEntry {
            event_type,
            handler_index,
        });
    }
    for _ in 0..animation_count {
        let animation_index = reader.read_u8()?;
        let trigger = reader.read_u8()?;
        record.animations.push(AnimationRef {
            animation_index,
            trigger,
        });
    }
    for _ in 0..child_count {
        record.child_offsets.push(reader.read_u16()?);
    }

    Ok(record)
}

/// Append the encoded form of `record` to `out`.
pub fn write_element_record(record: &ElementRecord, out: &mut Vec<u8>) -> Result<(), KrbError> {
    let header = &record.header;
    out.push(header.element_type.to_u8());
    out.push(header.id);
    out.extend_from_slice(&header.pos_x.to_le_bytes());
    out.extend_from_slice(&header.pos_y.to_le_bytes());
    out.extend_from_slice(&header.width.to_le_bytes());
    out.extend_from_slice(&header.height.to_le_bytes());
    out.push(header.layout.0);
    out.push(header.style_id);
    out.push(count_u8(record.properties.len(), "property count")?);
    out.push(count_u8(record.child_offsets.len(), "child count")?);
    out.push(count_u8(record.events.len(), "event count")?);
    out.push(count_u8(record.animations.len(), "animation count")?);
    out.push(count_u8(record.custom_properties.len(), "custom property count")?);

    for property in &record.properties {
        write_property(property, out)?;
    }
    for custom in &record.custom_properties {
        out.push(custom.key_index);
        out.push(custom.value_type.0);
        push_sized(out, &custom.value, "custom property value")?;
    }
    for event in &record.events {
        out.push(event.event_type.0);
        out.push(event.handler_index);
    }
    for animation in &record.animations {
        out.push(animation.animation_index);
        out.push(animation.trigger);
    }
    for child in &record.child_offsets {
        out.extend_from_slice(&child.to_le_bytes());
    }
    Ok(())
}

/// Decode a component template blob into its element records.
///
/// Record offsets are relative to the start of the blob.
pub fn decode_template(blob: &[u8]) -> Result<Vec<ElementRecord>, KrbError> {
    let mut reader = BinaryReader::new(blob);
    let mut records = Vec::new();
    while !reader.is_empty() {
        records.push(read_element_record(&mut reader)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ElementRecord {
        let mut header = ElementHeader::new(ElementType::Button);
        header.id = 3;
        header.width = 120;
        header.height = 40;
        header.style_id = 2;
        let mut record = ElementRecord::new(header);
        record
            .properties
            .push(Property::color(PropertyId::BG_COLOR, [10, 20, 30, 255]));
        record
            .properties
            .push(Property::new(PropertyId(0x7E), ValueType(0x42), vec![1, 2, 3]));
        record
            .custom_properties
            .push(CustomProperty::new(4, ValueType::STRING, vec![5]));
        record.events.push(EventEntry {
            event_type: EventType::CLICK,
            handler_index: 6,
        });
        record.animations.push(AnimationRef {
            animation_index: 0,
            trigger: 1,
        });
        record.child_offsets.push(64);
        record
    }

    #[test]
    fn test_record_bytes_preserved() {
        let record = sample_record();
        let mut bytes = Vec::new();
        write_element_record(&record, &mut bytes).unwrap();
        assert_eq!(bytes.len(), record.encoded_len());

        let mut reader = BinaryReader::new(&bytes);
        let decoded = read_element_record(&mut reader).unwrap();
        assert_eq!(decoded, record);

        let mut again = Vec::new();
        write_element_record(&decoded, &mut again).unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn test_truncated_record_fails() {
        let mut bytes = Vec::new();
        write_element_record(&sample_record(), &mut bytes).unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(decode_template(&bytes).is_err());
    }

    #[test]
    fn test_child_positions_are_absolute() {
        let mut record = sample_record();
        record.offset = 100;
        let positions: Vec<u32> = record.child_positions().collect();
        assert_eq!(positions, vec![164]);
    }

    #[test]
    fn test_percentage_fixed_point() {
        let p = Property::percentage(PropertyId::MAX_WIDTH, 0.5);
        assert_eq!(p.as_u16(), Some(128));
    }

    #[test]
    fn test_oversized_value_rejected() {
        let mut record = sample_record();
        record.properties[0].value = vec![0; 300];
        let mut out = Vec::new();
        assert!(matches!(
            write_element_record(&record, &mut out),
            Err(KrbError::Overflow { .. })
        ));
    }
}
