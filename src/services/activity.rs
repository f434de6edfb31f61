use crate::entities::activity_log::{self, TIMESTAMP_FORMAT};
use crate::errors::ServiceError;
use chrono::Local;
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Append-only writer for the activity log
#[derive(Clone)]
pub struct ActivityRecorder {
    db: Arc<DatabaseConnection>,
}

impl ActivityRecorder {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append one entry stamped with the current server-local time
    #[instrument(skip(self))]
    pub async fn record(&self, activity: &str) -> Result<activity_log::Model, ServiceError> {
        let entry = activity_log::ActiveModel {
            id: NotSet,
            activity: Set(activity.to_string()),
            timestamp: Set(local_timestamp()),
        };

        Ok(entry.insert(&*self.db).await?)
    }

    /// Like [`record`](Self::record), but a failed write is only logged.
    pub async fn record_best_effort(&self, activity: &str) {
        if let Err(err) = self.record(activity).await {
            warn!(error = %err, activity, "failed to record activity");
        }
    }
}

/// Current local time as `YYYY-MM-DD HH:MM:SS`
pub fn local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
