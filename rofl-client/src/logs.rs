//! Log retrieval endpoints

use crate::SchedulerClient;
use crate::error::Result;
use rofl_core::domain::token::SessionToken;
use rofl_core::dto::logs::{LogsRequest, LogsResponse};
use tracing::debug;

/// Path of the log retrieval endpoint, relative to the scheduler base URL
pub const LOGS_PATH: &str = "/rofl-scheduler/v1/logs/get";

impl SchedulerClient {
    // =============================================================================
    // Machine Logs
    // =============================================================================

    /// Fetch the current logs of a machine instance
    ///
    /// # Arguments
    /// * `token` - Session token sent as a bearer credential
    /// * `instance_id` - The instance whose logs to fetch
    ///
    /// # Returns
    /// All log lines the scheduler currently holds for the instance
    pub async fn get_logs(&self, token: &SessionToken, instance_id: &str) -> Result<LogsResponse> {
        debug!(path = LOGS_PATH, instance_id, "Fetching instance logs");

        let response = self
            .client
            .post(self.url(LOGS_PATH))
            .bearer_auth(token.as_str())
            .json(&LogsRequest {
                instance_id: instance_id.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
