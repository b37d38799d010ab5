//! Programmatic construction of KRB documents.
//!
//! The builder interns strings, assigns style ids, lays records out in
//! canonical order and computes child offsets, so callers only describe the
//! tree. Children must be added after their parent.

use std::collections::HashMap;

use crate::document::{
    ComponentDefinition, ComponentPropertyDef, Document, FileHeader, Resource, ResourceData, Style,
};
use crate::record::{
    write_element_record, CustomProperty, ElementHeader, ElementRecord, EventEntry, Property,
};
use crate::types::{
    ElementType, EventType, HeaderFlags, LayoutFlags, PropertyId, ResourceType, ValueType,
    COMPONENT_NAME_KEY, FILE_HEADER_SIZE, VERSION_MAJOR, VERSION_MINOR,
};
use crate::writer::encode;
use crate::KrbError;

#[derive(Debug, Clone)]
enum PendingProperty {
    Raw(Property),
    Str(PropertyId, String),
}

#[derive(Debug, Clone)]
enum PendingCustom {
    Raw(String, ValueType, Vec<u8>),
    Str(String, String),
}

/// Description of one element, resolved into a record at build time.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    header: ElementHeader,
    id: Option<String>,
    properties: Vec<PendingProperty>,
    custom: Vec<PendingCustom>,
    events: Vec<(EventType, String)>,
}

impl ElementBuilder {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            header: ElementHeader::new(element_type),
            id: None,
            properties: Vec::new(),
            custom: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn position(mut self, x: u16, y: u16) -> Self {
        self.header.pos_x = x;
        self.header.pos_y = y;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.header.width = width;
        self.header.height = height;
        self
    }

    pub fn layout(mut self, layout: LayoutFlags) -> Self {
        self.header.layout = layout;
        self
    }

    pub fn style(mut self, style_id: u8) -> Self {
        self.header.style_id = style_id;
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(PendingProperty::Raw(property));
        self
    }

    /// A string-valued property, interned at build time.
    pub fn string_property(mut self, id: PropertyId, value: &str) -> Self {
        self.properties
            .push(PendingProperty::Str(id, value.to_string()));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.string_property(PropertyId::TEXT_CONTENT, text)
    }

    pub fn custom(mut self, key: &str, value_type: ValueType, value: Vec<u8>) -> Self {
        self.custom
            .push(PendingCustom::Raw(key.to_string(), value_type, value));
        self
    }

    pub fn custom_string(mut self, key: &str, value: &str) -> Self {
        self.custom
            .push(PendingCustom::Str(key.to_string(), value.to_string()));
        self
    }

    /// Mark this element as a placeholder for the named component.
    pub fn component(self, name: &str) -> Self {
        self.custom_string(COMPONENT_NAME_KEY, name)
    }

    pub fn on(mut self, event: EventType, handler: &str) -> Self {
        self.events.push((event, handler.to_string()));
        self
    }
}

#[derive(Debug, Default)]
struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, u8>,
    overflowed: bool,
}

impl StringTable {
    fn new() -> Self {
        let mut table = Self::default();
        // Index 0 is the empty string, so an id byte of 0 reads as "no id".
        table.intern("");
        table
    }

    fn intern(&mut self, s: &str) -> u8 {
        if let Some(index) = self.index.get(s) {
            return *index;
        }
        match u8::try_from(self.strings.len()) {
            Ok(index) => {
                self.strings.push(s.to_string());
                self.index.insert(s.to_string(), index);
                index
            }
            Err(_) => {
                self.overflowed = true;
                0
            }
        }
    }
}

#[derive(Debug, Default)]
struct RecordTree {
    elements: Vec<ElementBuilder>,
    children: Vec<Vec<usize>>,
}

impl RecordTree {
    fn push(&mut self, element: ElementBuilder) -> usize {
        self.elements.push(element);
        self.children.push(Vec::new());
        self.elements.len() - 1
    }

    fn add_child(&mut self, parent: usize, child: usize) {
        if let Some(children) = self.children.get_mut(parent) {
            children.push(child);
        }
    }

    fn records(&self, strings: &mut StringTable, base: u32) -> Result<Vec<ElementRecord>, KrbError> {
        let mut records = Vec::with_capacity(self.elements.len());
        for (i, element) in self.elements.iter().enumerate() {
            let mut header = element.header;
            if let Some(id) = &element.id {
                header.id = strings.intern(id);
            }
            let mut record = ElementRecord::new(header);
            for property in &element.properties {
                record.properties.push(match property {
                    PendingProperty::Raw(p) => p.clone(),
                    PendingProperty::Str(id, value) => Property::string(*id, strings.intern(value)),
                });
            }
            for custom in &element.custom {
                record.custom_properties.push(match custom {
                    PendingCustom::Raw(key, value_type, value) => {
                        CustomProperty::new(strings.intern(key), *value_type, value.clone())
                    }
                    PendingCustom::Str(key, value) => CustomProperty::new(
                        strings.intern(key),
                        ValueType::STRING,
                        vec![strings.intern(value)],
                    ),
                });
            }
            for (event_type, handler) in &element.events {
                record.events.push(EventEntry {
                    event_type: *event_type,
                    handler_index: strings.intern(handler),
                });
            }
            record.child_offsets = vec![0; self.children[i].len()];
            records.push(record);
        }

        let mut offset = base;
        for record in &mut records {
            record.offset = offset;
            offset += record.encoded_len() as u32;
        }

        for (parent, children) in self.children.iter().enumerate() {
            for (slot, child) in children.iter().enumerate() {
                if *child <= parent || *child >= records.len() {
                    return Err(KrbError::InvalidChild {
                        parent,
                        child: *child,
                    });
                }
                let relative = records[*child].offset - records[parent].offset;
                records[parent].child_offsets[slot] =
                    u16::try_from(relative).map_err(|_| KrbError::Overflow {
                        what: "child offset",
                        len: relative as usize,
                    })?;
            }
        }
        Ok(records)
    }
}

/// Builder for a component template: an element tree whose first element is
/// the template root.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    tree: RecordTree,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&mut self, element: ElementBuilder) -> usize {
        self.tree.push(element)
    }

    pub fn add_child(&mut self, parent: usize, child: usize) {
        self.tree.add_child(parent, child);
    }
}

#[derive(Debug)]
struct PendingComponent {
    name: String,
    defaults: Vec<(String, String)>,
    template: TemplateBuilder,
}

/// Builder for a complete document.
#[derive(Debug)]
pub struct DocumentBuilder {
    strings: StringTable,
    tree: RecordTree,
    styles: Vec<Style>,
    components: Vec<PendingComponent>,
    resources: Vec<Resource>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            strings: StringTable::new(),
            tree: RecordTree::default(),
            styles: Vec::new(),
            components: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Intern a string and return its index.
    pub fn string(&mut self, s: &str) -> u8 {
        self.strings.intern(s)
    }

    /// Add a named style and return its id.
    pub fn style(&mut self, name: &str, properties: Vec<Property>) -> u8 {
        let id = (self.styles.len() + 1).min(u8::MAX as usize) as u8;
        let name_index = self.strings.intern(name);
        self.styles.push(Style {
            id,
            name_index,
            properties,
        });
        id
    }

    /// Add an external file resource and return its index.
    pub fn external_resource(&mut self, resource_type: ResourceType, name: &str, path: &str) -> u8 {
        let name_index = self.strings.intern(name);
        let path_index = self.strings.intern(path);
        self.push_resource(Resource {
            resource_type,
            name_index,
            data: ResourceData::External { path_index },
        })
    }

    /// Add an inline resource and return its index.
    pub fn inline_resource(&mut self, resource_type: ResourceType, name: &str, bytes: Vec<u8>) -> u8 {
        let name_index = self.strings.intern(name);
        self.push_resource(Resource {
            resource_type,
            name_index,
            data: ResourceData::Inline(bytes),
        })
    }

    fn push_resource(&mut self, resource: Resource) -> u8 {
        self.resources.push(resource);
        (self.resources.len() - 1).min(u8::MAX as usize) as u8
    }

    pub fn element(&mut self, element: ElementBuilder) -> usize {
        self.tree.push(element)
    }

    pub fn add_child(&mut self, parent: usize, child: usize) {
        self.tree.add_child(parent, child);
    }

    /// Add a component definition and return its index.
    pub fn component(&mut self, name: &str, template: TemplateBuilder) -> usize {
        self.components.push(PendingComponent {
            name: name.to_string(),
            defaults: Vec::new(),
            template,
        });
        self.components.len() - 1
    }

    /// Declare a string-valued property default on a component.
    pub fn component_default(&mut self, component: usize, key: &str, value: &str) {
        if let Some(pending) = self.components.get_mut(component) {
            pending.defaults.push((key.to_string(), value.to_string()));
        }
    }

    /// Encode the document.
    pub fn to_bytes(mut self) -> Result<Vec<u8>, KrbError> {
        let elements = self
            .tree
            .records(&mut self.strings, FILE_HEADER_SIZE as u32)?;

        let mut components = Vec::with_capacity(self.components.len());
        for pending in &self.components {
            let name_index = self.strings.intern(&pending.name);
            let properties = pending
                .defaults
                .iter()
                .map(|(key, value)| ComponentPropertyDef {
                    name_index: self.strings.intern(key),
                    value_type: ValueType::STRING,
                    default_value: vec![self.strings.intern(value)],
                })
                .collect::<Vec<_>>();
            let mut template = Vec::new();
            for record in pending.template.tree.records(&mut self.strings, 0)? {
                write_element_record(&record, &mut template)?;
            }
            components.push(ComponentDefinition {
                name_index,
                properties,
                template,
            });
        }

        if self.strings.overflowed {
            return Err(KrbError::Overflow {
                what: "string table",
                len: 256,
            });
        }

        let mut flags = HeaderFlags::EXTENDED_COLOR;
        flags.set(HeaderFlags::HAS_STYLES, !self.styles.is_empty());
        flags.set(HeaderFlags::HAS_COMPONENT_DEFS, !components.is_empty());
        flags.set(HeaderFlags::HAS_RESOURCES, !self.resources.is_empty());
        flags.set(
            HeaderFlags::HAS_APP,
            elements
                .first()
                .is_some_and(|e| e.header.element_type == ElementType::App),
        );

        let doc = Document {
            header: FileHeader {
                version_major: VERSION_MAJOR,
                version_minor: VERSION_MINOR,
                flags,
                element_count: 0,
                style_count: 0,
                component_count: 0,
                animation_count: 0,
                string_count: 0,
                resource_count: 0,
                element_offset: 0,
                style_offset: 0,
                component_offset: 0,
                animation_offset: 0,
                string_offset: 0,
                resource_offset: 0,
                total_size: 0,
            },
            elements,
            offset_index: HashMap::new(),
            styles: self.styles,
            components,
            animation_data: Vec::new(),
            strings: self
                .strings
                .strings
                .into_iter()
                .map(String::into_bytes)
                .collect(),
            resources: self.resources,
        };
        encode(&doc)
    }

    /// Encode and parse back into a [`Document`].
    pub fn build(self) -> Result<Document, KrbError> {
        Document::parse(&self.to_bytes()?)
    }
}
