//! Static type catalogs for both editing surfaces.
//!
//! Only the structural columns live here: default node sizes and labels for
//! the graph canvas, and field-type keys with their category for the form
//! grid. Icons, colors, and help text belong to the host.

use crate::model::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The workflow node types available on the graph canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Task,
    Decision,
    Parallel,
    Timer,
    Notification,
    Process,
    Database,
    Integration,
}

impl NodeKind {
    pub const ALL: [NodeKind; 10] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Task,
        NodeKind::Decision,
        NodeKind::Parallel,
        NodeKind::Timer,
        NodeKind::Notification,
        NodeKind::Process,
        NodeKind::Database,
        NodeKind::Integration,
    ];

    pub fn key(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Task => "task",
            NodeKind::Decision => "decision",
            NodeKind::Parallel => "parallel",
            NodeKind::Timer => "timer",
            NodeKind::Notification => "notification",
            NodeKind::Process => "process",
            NodeKind::Database => "database",
            NodeKind::Integration => "integration",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Size a freshly created node of this kind gets unless overridden.
    pub fn default_size(self) -> Size {
        let (width, height) = match self {
            NodeKind::Start | NodeKind::End => (60.0, 60.0),
            NodeKind::Task | NodeKind::Notification => (180.0, 70.0),
            NodeKind::Decision | NodeKind::Parallel => (120.0, 120.0),
            NodeKind::Timer => (80.0, 80.0),
            NodeKind::Process | NodeKind::Integration => (200.0, 80.0),
            NodeKind::Database => (160.0, 80.0),
        };
        Size { width, height }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            NodeKind::Start => "Start",
            NodeKind::End => "End",
            NodeKind::Task => "Task",
            NodeKind::Decision => "Decision",
            NodeKind::Parallel => "Parallel",
            NodeKind::Timer => "Timer",
            NodeKind::Notification => "Notification",
            NodeKind::Process => "Process",
            NodeKind::Database => "Database",
            NodeKind::Integration => "Integration",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─── Field kinds ─────────────────────────────────────────────────────────

/// Palette grouping for form field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Basic,
    Choice,
    DateTime,
    Media,
    Advanced,
    Layout,
}

macro_rules! field_kinds {
    ($($variant:ident => ($key:literal, $label:literal, $category:ident)),+ $(,)?) => {
        /// Form field types that can be dropped onto the grid.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum FieldKind {
            #[default]
            $($variant),+
        }

        impl FieldKind {
            pub const ALL: &'static [FieldKind] = &[$(FieldKind::$variant),+];

            pub fn key(self) -> &'static str {
                match self {
                    $(FieldKind::$variant => $key),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(FieldKind::$variant => $label),+
                }
            }

            pub fn category(self) -> FieldCategory {
                match self {
                    $(FieldKind::$variant => FieldCategory::$category),+
                }
            }
        }
    };
}

// The first entry is the default kind used by click-to-create.
field_kinds! {
    Text => ("text", "Text", Basic),
    Textarea => ("textarea", "Paragraph", Basic),
    Number => ("number", "Number", Basic),
    Email => ("email", "Email", Basic),
    Phone => ("phone", "Phone", Basic),
    Url => ("url", "URL", Basic),
    Password => ("password", "Password", Basic),
    Currency => ("currency", "Currency", Basic),
    Percentage => ("percentage", "Percentage", Basic),
    Select => ("select", "Dropdown", Choice),
    MultiSelect => ("multi_select", "Multi Select", Choice),
    Radio => ("radio", "Radio Group", Choice),
    Checkbox => ("checkbox", "Checkbox", Choice),
    CheckboxGroup => ("checkbox_group", "Checkbox Group", Choice),
    Toggle => ("toggle", "Toggle", Choice),
    Rating => ("rating", "Rating", Choice),
    Slider => ("slider", "Slider", Choice),
    Tags => ("tags", "Tags", Choice),
    Date => ("date", "Date", DateTime),
    Time => ("time", "Time", DateTime),
    DateTime => ("date_time", "Date & Time", DateTime),
    DateRange => ("date_range", "Date Range", DateTime),
    Duration => ("duration", "Duration", DateTime),
    File => ("file", "File Upload", Media),
    Image => ("image", "Image", Media),
    Signature => ("signature", "Signature", Media),
    Attachment => ("attachment", "Attachments", Media),
    Barcode => ("barcode", "Barcode", Media),
    User => ("user", "User Picker", Advanced),
    Department => ("department", "Department", Advanced),
    Lookup => ("lookup", "Lookup", Advanced),
    Table => ("table", "Table", Advanced),
    Formula => ("formula", "Formula", Advanced),
    AutoNumber => ("auto_number", "Auto Number", Advanced),
    Address => ("address", "Address", Advanced),
    Location => ("location", "Location", Advanced),
    Color => ("color", "Color", Advanced),
    RichText => ("rich_text", "Rich Text", Advanced),
    Section => ("section", "Section", Layout),
    Divider => ("divider", "Divider", Layout),
    Heading => ("heading", "Heading", Layout),
    Spacer => ("spacer", "Spacer", Layout),
}

impl FieldKind {
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.key() == key)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
