use std::sync::Arc;

use axum::extract::FromRef;
use storage::Database;
use storage::services::dashboard::DashboardService;

use crate::middleware::auth::ApiKeys;
use crate::notifications::{Notification, Notifier};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Database,
    pub dashboards: Arc<DashboardService>,
    pub notifier: Notifier,
    pub api_keys: ApiKeys,
}

impl AppState {
    pub fn new(db: Database, dashboards: DashboardService, api_keys: ApiKeys) -> Self {
        Self {
            db,
            dashboards: Arc::new(dashboards),
            notifier: Notifier::default(),
            api_keys,
        }
    }

    /// Called after every committed write.
    pub fn invalidate(&self) {
        self.dashboards.invalidate();
    }

    /// Drops cached dashboards, then pushes the given messages to viewers.
    pub fn changed(&self, notifications: impl IntoIterator<Item = Notification>) {
        self.invalidate();
        for notification in notifications {
            self.notifier.publish(notification);
        }
    }
}
