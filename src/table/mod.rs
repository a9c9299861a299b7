//! Generic tabular view
//!
//! A filterable, searchable, paginated grid over an in-memory row set,
//! decoupled from any specific entity. Controllers map API shapes into
//! [`Row`]s and [`Column`]s; frontends render the string cells however
//! they like.

pub mod view;

pub use view::{PageRender, RenderedRow, TableConfig, TableView};

use serde_json::Value;

/// One data item. Identity by `id`; insertion order of both rows and
/// fields is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: String,
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new(id: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Case-insensitive substring match against every field's string
    /// representation.
    fn matches(&self, needle_lower: &str) -> bool {
        self.fields
            .iter()
            .any(|(_, v)| display_value(v).to_lowercase().contains(needle_lower))
    }
}

/// How a value prints when a column has no render function. Strings drop
/// their quotes, null prints empty; everything else uses its JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Alignment hint for frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Render function applied to a cell: `(value, row) -> displayable`.
pub type CellRender = fn(&Value, &Row) -> String;

/// Describes one column of the grid.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub accessor: String,
    pub render: Option<CellRender>,
    pub align: Align,
}

impl Column {
    pub fn new(header: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor: accessor.into(),
            render: None,
            align: Align::Left,
        }
    }

    pub fn render(mut self, f: CellRender) -> Self {
        self.render = Some(f);
        self
    }

    pub fn align_right(mut self) -> Self {
        self.align = Align::Right;
        self
    }
}

/// Per-row callback invoked with the row it was clicked on.
pub type RowCallback = Box<dyn FnMut(&Row) + Send>;

/// Typed capabilities for the trailing actions column. Absent callbacks
/// mean the column (or that action) is not offered at all.
#[derive(Default)]
pub struct RowActions {
    pub edit: Option<RowCallback>,
    pub delete: Option<RowCallback>,
}

impl RowActions {
    pub fn any(&self) -> bool {
        self.edit.is_some() || self.delete.is_some()
    }
}
