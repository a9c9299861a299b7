//! Dashboard view - platform metrics overview for admins.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{require_token, Generation};
use crate::api::dto::DashboardStat;
use crate::api::DhritiApi;
use crate::error::Error;
use crate::session::SessionStore;
use crate::table::{Column, Row, TableConfig, TableView};

pub struct DashboardController {
    api: Arc<dyn DhritiApi>,
    session: Arc<SessionStore>,
    stats: Mutex<Vec<DashboardStat>>,
    generation: Generation,
}

impl DashboardController {
    pub fn new(api: Arc<dyn DhritiApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            stats: Mutex::new(Vec::new()),
            generation: Generation::default(),
        }
    }

    pub async fn refresh(&self) -> Result<(), Error> {
        let seq = self.generation.begin();
        let token = require_token(&self.session)?;
        let summary = self.api.dashboard_summary(&token).await?;
        if !self.generation.is_current(seq) {
            return Ok(());
        }
        *self.stats.lock().unwrap() = summary.stats;
        Ok(())
    }

    pub fn stats(&self) -> Vec<DashboardStat> {
        self.stats.lock().unwrap().clone()
    }

    fn row(stat: &DashboardStat) -> Row {
        Row::new(&stat.id)
            .field("id", stat.id.clone())
            .field("label", stat.label.clone())
            .field("value", stat.value.clone())
            .field("trend", stat.trend.clone())
            .field("icon", stat.icon.clone())
    }

    fn dash_when_empty(value: &Value, _row: &Row) -> String {
        let text = crate::table::display_value(value);
        if text.is_empty() {
            "—".to_string()
        } else {
            text
        }
    }

    /// Stat cards as a grid: label, value, trend.
    pub fn table(&self) -> TableView {
        let columns = vec![
            Column::new("Metric", "label"),
            Column::new("Value", "value").align_right(),
            Column::new("Trend", "trend").render(Self::dash_when_empty),
        ];
        let rows = self.stats.lock().unwrap().iter().map(Self::row).collect();
        // The summary is a handful of cards; pagination adds nothing.
        TableView::with_config(
            columns,
            rows,
            TableConfig {
                paginated: false,
                ..TableConfig::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::dto::DashboardSummary;
    use crate::views::stub::StubApi;

    fn stat(id: &str, label: &str, value: Value) -> DashboardStat {
        DashboardStat {
            id: id.to_string(),
            label: label.to_string(),
            value,
            trend: None,
            icon: Some("📁".to_string()),
        }
    }

    #[tokio::test]
    async fn refresh_maps_stats_into_rows() {
        let api = Arc::new(StubApi::default());
        api.summaries.lock().unwrap().push_back(Ok(DashboardSummary {
            stats: vec![
                stat("activeProjects", "Total Active Projects", json!(4)),
                stat("avgTaskTime", "Avg Task Time (min)", json!("—")),
            ],
        }));

        let session = Arc::new(SessionStore::in_memory());
        session.set_token("tok").unwrap();
        let controller = DashboardController::new(api, session);
        controller.refresh().await.unwrap();

        let render = controller.table().render_page();
        assert_eq!(render.headers, vec!["Metric", "Value", "Trend"]);
        assert_eq!(render.rows[0].cells, vec!["Total Active Projects", "4", "—"]);
        assert_eq!(render.rows[1].cells[1], "—");
        assert_eq!(render.total_pages, 1);
    }

    #[tokio::test]
    async fn requires_a_session_token() {
        let api = Arc::new(StubApi::default());
        let controller = DashboardController::new(api.clone(), Arc::new(SessionStore::in_memory()));
        assert!(matches!(
            controller.refresh().await.unwrap_err(),
            Error::AuthRequired
        ));
        assert_eq!(api.call_count(), 0);
    }
}
