//! Table view-state machine: search, pagination, rendering.

use super::{display_value, Align, Column, Row, RowActions};

/// Table configuration.
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub searchable: bool,
    pub paginated: bool,
    pub rows_per_page: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            searchable: true,
            paginated: true,
            rows_per_page: 8,
        }
    }
}

/// One rendered data row: string cells in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: String,
    pub cells: Vec<String>,
}

/// A fully rendered page, ready for any frontend to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRender {
    pub headers: Vec<String>,
    pub aligns: Vec<Align>,
    pub rows: Vec<RenderedRow>,
    /// Placeholder spanning all columns when nothing matched.
    pub placeholder: Option<String>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    /// Whether a trailing actions column is present.
    pub has_actions: bool,
}

/// Generic data grid over an in-memory row set.
pub struct TableView {
    columns: Vec<Column>,
    rows: Vec<Row>,
    config: TableConfig,
    actions: RowActions,
    query: String,
    page: usize,
}

impl TableView {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self::with_config(columns, rows, TableConfig::default())
    }

    pub fn with_config(columns: Vec<Column>, rows: Vec<Row>, mut config: TableConfig) -> Self {
        config.rows_per_page = config.rows_per_page.max(1);
        Self {
            columns,
            rows,
            config,
            actions: RowActions::default(),
            query: String::new(),
            page: 1,
        }
    }

    pub fn with_actions(mut self, actions: RowActions) -> Self {
        self.actions = actions;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Apply a search query. Filtering resets the view to page 1; on an
    /// unsearchable table this is a no-op.
    pub fn set_query(&mut self, query: impl Into<String>) {
        if !self.config.searchable {
            return;
        }
        self.query = query.into();
        self.page = 1;
    }

    /// Replace the row set, keeping the current page in range.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.page = self.page.clamp(1, self.total_pages());
    }

    /// Rows matching the current query, in insertion order.
    pub fn filtered(&self) -> Vec<&Row> {
        if self.query.is_empty() {
            return self.rows.iter().collect();
        }
        let needle = self.query.to_lowercase();
        self.rows.iter().filter(|r| r.matches(&needle)).collect()
    }

    pub fn total_pages(&self) -> usize {
        if !self.config.paginated {
            return 1;
        }
        let filtered = self.filtered().len();
        (filtered.div_ceil(self.config.rows_per_page)).max(1)
    }

    /// Jump to a page, clamped to `[1, total_pages]`.
    pub fn goto(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn first(&mut self) {
        self.goto(1);
    }

    pub fn prev(&mut self) {
        self.goto(self.page.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.goto(self.page + 1);
    }

    pub fn last(&mut self) {
        self.goto(self.total_pages());
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// The filtered rows visible on the current page.
    pub fn page_rows(&self) -> Vec<&Row> {
        let filtered = self.filtered();
        if !self.config.paginated {
            return filtered;
        }
        let per = self.config.rows_per_page;
        let start = (self.page - 1) * per;
        filtered.into_iter().skip(start).take(per).collect()
    }

    fn render_cell(column: &Column, row: &Row) -> String {
        let value = row.get(&column.accessor).cloned().unwrap_or_default();
        match column.render {
            Some(render) => render(&value, row),
            None => display_value(&value),
        }
    }

    /// Render the current page to string cells.
    pub fn render_page(&self) -> PageRender {
        let total_rows = self.filtered().len();
        let rows: Vec<RenderedRow> = self
            .page_rows()
            .into_iter()
            .map(|row| RenderedRow {
                id: row.id().to_string(),
                cells: self
                    .columns
                    .iter()
                    .map(|c| Self::render_cell(c, row))
                    .collect(),
            })
            .collect();

        PageRender {
            headers: self.columns.iter().map(|c| c.header.clone()).collect(),
            aligns: self.columns.iter().map(|c| c.align).collect(),
            placeholder: rows.is_empty().then(|| "No results".to_string()),
            rows,
            page: self.page,
            total_pages: self.total_pages(),
            total_rows,
            has_actions: self.actions.any(),
        }
    }

    /// Invoke the edit callback for the row with this id.
    pub fn edit(&mut self, id: &str) -> bool {
        let Some(row) = self.rows.iter().find(|r| r.id() == id).cloned() else {
            return false;
        };
        match self.actions.edit.as_mut() {
            Some(callback) => {
                callback(&row);
                true
            }
            None => false,
        }
    }

    /// Ask for confirmation, then invoke the delete callback. The callback
    /// never runs when confirmation is declined or the action is absent.
    pub fn delete(&mut self, id: &str, confirm: &mut dyn FnMut(&Row) -> bool) -> bool {
        let Some(row) = self.rows.iter().find(|r| r.id() == id).cloned() else {
            return false;
        };
        if self.actions.delete.is_none() || !confirm(&row) {
            return false;
        }
        if let Some(callback) = self.actions.delete.as_mut() {
            callback(&row);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::Value;

    use super::*;

    fn columns() -> Vec<Column> {
        vec![Column::new("Name", "name"), Column::new("Status", "status")]
    }

    fn rows(n: usize) -> Vec<Row> {
        (1..=n)
            .map(|i| {
                Row::new(i)
                    .field("id", i)
                    .field("name", format!("Item {i:02}"))
                    .field("status", if i % 2 == 0 { "Active" } else { "Paused" })
            })
            .collect()
    }

    fn view(n: usize, per: usize) -> TableView {
        TableView::with_config(
            columns(),
            rows(n),
            TableConfig {
                rows_per_page: per,
                ..TableConfig::default()
            },
        )
    }

    #[test]
    fn pages_reproduce_the_filtered_list_exactly() {
        for n in [0usize, 1, 7, 8, 9, 25] {
            for per in [1usize, 3, 8] {
                let mut table = view(n, per);
                let expected: Vec<String> =
                    table.filtered().iter().map(|r| r.id().to_string()).collect();

                let mut collected = Vec::new();
                table.first();
                loop {
                    collected.extend(table.page_rows().iter().map(|r| r.id().to_string()));
                    if !table.can_next() {
                        break;
                    }
                    table.next();
                }
                assert_eq!(collected, expected, "n={n} per={per}");
                assert_eq!(table.total_pages(), n.div_ceil(per).max(1));
            }
        }
    }

    #[test]
    fn search_is_case_insensitive_and_idempotent() {
        let mut table = view(25, 8);
        table.set_query("item 0");
        let once: Vec<String> = table.filtered().iter().map(|r| r.id().to_string()).collect();
        table.set_query("ITEM 0");
        let twice: Vec<String> = table.filtered().iter().map(|r| r.id().to_string()).collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 9); // Item 01..Item 09
    }

    #[test]
    fn search_matches_any_field() {
        let mut table = view(10, 8);
        table.set_query("paused");
        assert_eq!(table.filtered().len(), 5);
        // Numeric fields participate through their string form.
        table.set_query("10");
        assert!(!table.filtered().is_empty());
    }

    #[test]
    fn filtering_resets_to_page_one() {
        let mut table = view(25, 8);
        table.last();
        assert_eq!(table.page(), 4);
        table.set_query("active");
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn page_navigation_clamps_at_boundaries() {
        let mut table = view(25, 8);
        table.goto(0);
        assert_eq!(table.page(), 1);
        table.prev();
        assert_eq!(table.page(), 1);
        assert!(!table.can_prev());

        table.goto(99);
        assert_eq!(table.page(), 4);
        table.next();
        assert_eq!(table.page(), 4);
        assert!(!table.can_next());
    }

    #[test]
    fn shrinking_row_set_reclamps_the_page() {
        let mut table = view(25, 8);
        table.last();
        assert_eq!(table.page(), 4);
        table.set_rows(rows(9));
        assert_eq!(table.total_pages(), 2);
        assert_eq!(table.page(), 2);
    }

    #[test]
    fn empty_filter_renders_placeholder_on_single_page() {
        let mut table = view(25, 8);
        table.set_query("no such thing");
        assert_eq!(table.total_pages(), 1);
        let render = table.render_page();
        assert!(render.rows.is_empty());
        assert_eq!(render.placeholder.as_deref(), Some("No results"));
    }

    #[test]
    fn query_matching_three_rows_fits_one_page() {
        // 25 rows, rows_per_page 8, query hits exactly 3.
        let mut data = rows(25);
        for i in [4usize, 11, 18] {
            data[i] = Row::new(i + 1)
                .field("id", i + 1)
                .field("name", format!("Special {}", i + 1))
                .field("status", "Active");
        }
        let mut table = TableView::with_config(columns(), data, TableConfig::default());
        table.set_query("special");
        let render = table.render_page();
        assert_eq!(table.total_pages(), 1);
        assert_eq!(table.page(), 1);
        assert_eq!(render.rows.len(), 3);
        assert!(render.placeholder.is_none());
    }

    #[test]
    fn render_uses_column_render_function() {
        fn shout(value: &Value, _row: &Row) -> String {
            display_value(value).to_uppercase()
        }
        let cols = vec![Column::new("Name", "name").render(shout)];
        let table = TableView::new(cols, rows(1));
        let render = table.render_page();
        assert_eq!(render.rows[0].cells, vec!["ITEM 01".to_string()]);
    }

    #[test]
    fn missing_accessor_renders_empty() {
        let cols = vec![Column::new("Ghost", "missing")];
        let table = TableView::new(cols, rows(1));
        assert_eq!(table.render_page().rows[0].cells, vec![String::new()]);
    }

    #[test]
    fn unsearchable_table_ignores_queries() {
        let mut table = TableView::with_config(
            columns(),
            rows(5),
            TableConfig {
                searchable: false,
                ..TableConfig::default()
            },
        );
        table.set_query("item 01");
        assert_eq!(table.filtered().len(), 5);
    }

    #[test]
    fn unpaginated_table_shows_everything() {
        let table = TableView::with_config(
            columns(),
            rows(25),
            TableConfig {
                paginated: false,
                ..TableConfig::default()
            },
        );
        assert_eq!(table.total_pages(), 1);
        assert_eq!(table.page_rows().len(), 25);
    }

    #[test]
    fn delete_requires_confirmation() {
        let deleted = Arc::new(AtomicUsize::new(0));
        let counter = deleted.clone();
        let actions = RowActions {
            edit: None,
            delete: Some(Box::new(move |_row| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        };
        let mut table = TableView::new(columns(), rows(3)).with_actions(actions);
        assert!(table.render_page().has_actions);

        assert!(!table.delete("2", &mut |_| false));
        assert_eq!(deleted.load(Ordering::SeqCst), 0);

        assert!(table.delete("2", &mut |row| row.id() == "2"));
        assert_eq!(deleted.load(Ordering::SeqCst), 1);

        // Unknown row is a no-op.
        assert!(!table.delete("99", &mut |_| true));
        assert_eq!(deleted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn edit_invokes_callback_with_the_row() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let actions = RowActions {
            edit: Some(Box::new(move |row| {
                sink.lock().unwrap().push(row.id().to_string());
            })),
            delete: None,
        };
        let mut table = TableView::new(columns(), rows(3)).with_actions(actions);
        assert!(table.edit("3"));
        assert!(!table.edit("99"));
        assert_eq!(*seen.lock().unwrap(), vec!["3".to_string()]);
    }
}
