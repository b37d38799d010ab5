//! Enumerations and flag sets of the KRB binary format.
//!
//! Open-ended byte codes (property ids, value types, event types) are
//! newtypes with associated constants so unknown codes survive a decode and
//! re-encode unchanged. Closed sets are plain enums.

use bitflags::bitflags;

/// Magic number at the start of every KRB file.
pub const MAGIC: [u8; 4] = *b"KRB1";

/// Format version written by this crate.
pub const VERSION_MAJOR: u8 = 0;
pub const VERSION_MINOR: u8 = 4;

/// Size of the file header in bytes.
pub const FILE_HEADER_SIZE: usize = 48;

/// Size of the fixed part of an element record in bytes.
pub const ELEMENT_HEADER_SIZE: usize = 17;

/// Custom property key marking an element as a component placeholder.
pub const COMPONENT_NAME_KEY: &str = "_componentName";

/// Element id of the node that receives a component instance's children.
pub const CHILDREN_SLOT_ID: &str = "children_host";

/// Resource index byte meaning "no resource".
pub const NO_RESOURCE: u8 = 0xFF;

/// Text alignment byte meaning "inherit".
pub const UNSET_TEXT_ALIGNMENT: u8 = 0xFF;

bitflags! {
    /// File header flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeaderFlags: u16 {
        const HAS_STYLES = 0x0001;
        const HAS_COMPONENT_DEFS = 0x0002;
        const HAS_ANIMATIONS = 0x0004;
        const HAS_RESOURCES = 0x0008;
        const COMPRESSED = 0x0010;
        const FIXED_POINT = 0x0020;
        const EXTENDED_COLOR = 0x0040;
        const HAS_APP = 0x0080;
    }
}

/// Element type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    App,
    Container,
    Text,
    Image,
    Canvas,
    Button,
    Input,
    List,
    Grid,
    Scrollable,
    Video,
    Custom(u8),
}

impl ElementType {
    pub fn from_u8(b: u8) -> Self {
        match b {
            0x00 => ElementType::App,
            0x01 => ElementType::Container,
            0x02 => ElementType::Text,
            0x03 => ElementType::Image,
            0x04 => ElementType::Canvas,
            0x10 => ElementType::Button,
            0x11 => ElementType::Input,
            0x20 => ElementType::List,
            0x21 => ElementType::Grid,
            0x22 => ElementType::Scrollable,
            0x30 => ElementType::Video,
            other => ElementType::Custom(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            ElementType::App => 0x00,
            ElementType::Container => 0x01,
            ElementType::Text => 0x02,
            ElementType::Image => 0x03,
            ElementType::Canvas => 0x04,
            ElementType::Button => 0x10,
            ElementType::Input => 0x11,
            ElementType::List => 0x20,
            ElementType::Grid => 0x21,
            ElementType::Scrollable => 0x22,
            ElementType::Video => 0x30,
            ElementType::Custom(b) => b,
        }
    }

    /// Types that accept children appended during slot insertion.
    pub fn is_container_like(self) -> bool {
        matches!(
            self,
            ElementType::App
                | ElementType::Container
                | ElementType::List
                | ElementType::Grid
                | ElementType::Scrollable
        )
    }

    /// Types whose foreground color is inherited from ancestors.
    pub fn is_text_bearing(self) -> bool {
        matches!(
            self,
            ElementType::Text | ElementType::Button | ElementType::Input
        )
    }

    /// Types that react to pointer input by default.
    pub fn is_interactive(self) -> bool {
        matches!(self, ElementType::Button | ElementType::Input)
    }
}

/// Property identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(pub u8);

impl PropertyId {
    pub const INVALID: PropertyId = PropertyId(0x00);
    pub const BG_COLOR: PropertyId = PropertyId(0x01);
    pub const FG_COLOR: PropertyId = PropertyId(0x02);
    pub const BORDER_COLOR: PropertyId = PropertyId(0x03);
    pub const BORDER_WIDTH: PropertyId = PropertyId(0x04);
    pub const BORDER_RADIUS: PropertyId = PropertyId(0x05);
    pub const PADDING: PropertyId = PropertyId(0x06);
    pub const MARGIN: PropertyId = PropertyId(0x07);
    pub const TEXT_CONTENT: PropertyId = PropertyId(0x08);
    pub const FONT_SIZE: PropertyId = PropertyId(0x09);
    pub const FONT_WEIGHT: PropertyId = PropertyId(0x0A);
    pub const TEXT_ALIGNMENT: PropertyId = PropertyId(0x0B);
    pub const IMAGE_SOURCE: PropertyId = PropertyId(0x0C);
    pub const OPACITY: PropertyId = PropertyId(0x0D);
    pub const Z_INDEX: PropertyId = PropertyId(0x0E);
    pub const VISIBILITY: PropertyId = PropertyId(0x0F);
    pub const GAP: PropertyId = PropertyId(0x10);
    pub const MIN_WIDTH: PropertyId = PropertyId(0x11);
    pub const MIN_HEIGHT: PropertyId = PropertyId(0x12);
    pub const MAX_WIDTH: PropertyId = PropertyId(0x13);
    pub const MAX_HEIGHT: PropertyId = PropertyId(0x14);
    pub const ASPECT_RATIO: PropertyId = PropertyId(0x15);
    pub const TRANSFORM: PropertyId = PropertyId(0x16);
    pub const SHADOW: PropertyId = PropertyId(0x17);
    pub const OVERFLOW: PropertyId = PropertyId(0x18);
    pub const CUSTOM_DATA_BLOB: PropertyId = PropertyId(0x19);
    pub const LAYOUT_FLAGS: PropertyId = PropertyId(0x1A);
    pub const WINDOW_WIDTH: PropertyId = PropertyId(0x20);
    pub const WINDOW_HEIGHT: PropertyId = PropertyId(0x21);
    pub const WINDOW_TITLE: PropertyId = PropertyId(0x22);
    pub const RESIZABLE: PropertyId = PropertyId(0x23);
    pub const KEEP_ASPECT: PropertyId = PropertyId(0x24);
    pub const SCALE_FACTOR: PropertyId = PropertyId(0x25);
    pub const ICON: PropertyId = PropertyId(0x26);
    pub const VERSION: PropertyId = PropertyId(0x27);
    pub const AUTHOR: PropertyId = PropertyId(0x28);
}

/// Property value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueType(pub u8);

impl ValueType {
    pub const NONE: ValueType = ValueType(0x00);
    pub const BYTE: ValueType = ValueType(0x01);
    pub const SHORT: ValueType = ValueType(0x02);
    pub const COLOR: ValueType = ValueType(0x03);
    pub const STRING: ValueType = ValueType(0x04);
    pub const RESOURCE: ValueType = ValueType(0x05);
    /// 8.8 fixed point, 256 = 100%.
    pub const PERCENTAGE: ValueType = ValueType(0x06);
    pub const RECT: ValueType = ValueType(0x07);
    pub const EDGE_INSETS: ValueType = ValueType(0x08);
    pub const ENUM: ValueType = ValueType(0x09);
    pub const VECTOR: ValueType = ValueType(0x0A);
    pub const CUSTOM: ValueType = ValueType(0x0B);
}

/// Event type code of an element's event binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventType(pub u8);

impl EventType {
    pub const NONE: EventType = EventType(0x00);
    pub const CLICK: EventType = EventType(0x01);
    pub const PRESS: EventType = EventType(0x02);
    pub const RELEASE: EventType = EventType(0x03);
    pub const LONG_PRESS: EventType = EventType(0x04);
    pub const HOVER: EventType = EventType(0x05);
    pub const FOCUS: EventType = EventType(0x06);
    pub const BLUR: EventType = EventType(0x07);
    pub const CHANGE: EventType = EventType(0x08);
    pub const SUBMIT: EventType = EventType(0x09);
    pub const CUSTOM: EventType = EventType(0x0A);
}

/// Kind of a resource table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceType(pub u8);

impl ResourceType {
    pub const IMAGE: ResourceType = ResourceType(0x01);
    pub const FONT: ResourceType = ResourceType(0x02);
    pub const SOUND: ResourceType = ResourceType(0x03);
    pub const VIDEO: ResourceType = ResourceType(0x04);
    pub const CUSTOM: ResourceType = ResourceType(0x05);
}

/// Storage format byte of a resource entry.
pub const RESOURCE_FORMAT_EXTERNAL: u8 = 0x00;
pub const RESOURCE_FORMAT_INLINE: u8 = 0x01;

/// Flow direction of a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Row,
    Column,
    RowReverse,
    ColumnReverse,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Row | Direction::RowReverse)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::RowReverse | Direction::ColumnReverse)
    }
}

/// Main-axis distribution of a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainAlignment {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Cross-axis placement of a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossAlignment {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

/// The packed layout byte of an element header.
///
/// Bits 0-1 direction, bits 2-3 main alignment, bits 4-5 cross alignment,
/// bit 6 grow, bit 7 absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayoutFlags(pub u8);

impl LayoutFlags {
    const GROW: u8 = 0x40;
    const ABSOLUTE: u8 = 0x80;

    pub fn new(
        direction: Direction,
        alignment: MainAlignment,
        cross: CrossAlignment,
        grow: bool,
        absolute: bool,
    ) -> Self {
        let mut bits = direction as u8 | ((alignment as u8) << 2) | ((cross as u8) << 4);
        if grow {
            bits |= Self::GROW;
        }
        if absolute {
            bits |= Self::ABSOLUTE;
        }
        LayoutFlags(bits)
    }

    pub fn direction(self) -> Direction {
        match self.0 & 0x03 {
            0 => Direction::Row,
            1 => Direction::Column,
            2 => Direction::RowReverse,
            _ => Direction::ColumnReverse,
        }
    }

    pub fn alignment(self) -> MainAlignment {
        match (self.0 >> 2) & 0x03 {
            0 => MainAlignment::Start,
            1 => MainAlignment::Center,
            2 => MainAlignment::End,
            _ => MainAlignment::SpaceBetween,
        }
    }

    pub fn cross_alignment(self) -> CrossAlignment {
        match (self.0 >> 4) & 0x03 {
            0 => CrossAlignment::Start,
            1 => CrossAlignment::Center,
            2 => CrossAlignment::End,
            _ => CrossAlignment::Stretch,
        }
    }

    pub fn grow(self) -> bool {
        self.0 & Self::GROW != 0
    }

    pub fn absolute(self) -> bool {
        self.0 & Self::ABSOLUTE != 0
    }

    pub fn with_grow(self, grow: bool) -> Self {
        if grow {
            LayoutFlags(self.0 | Self::GROW)
        } else {
            LayoutFlags(self.0 & !Self::GROW)
        }
    }

    pub fn with_absolute(self, absolute: bool) -> Self {
        if absolute {
            LayoutFlags(self.0 | Self::ABSOLUTE)
        } else {
            LayoutFlags(self.0 & !Self::ABSOLUTE)
        }
    }
}
