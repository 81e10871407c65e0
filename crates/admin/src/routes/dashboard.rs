//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::{components::SidebarView, filters, middleware::RequireSessionFlag};

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub sidebar: SidebarView,
}

/// Dashboard page handler.
///
/// GET /dashboard
#[instrument(skip(_gate))]
pub async fn index(RequireSessionFlag(_gate): RequireSessionFlag) -> DashboardTemplate {
    DashboardTemplate {
        sidebar: SidebarView::new("/dashboard"),
    }
}
