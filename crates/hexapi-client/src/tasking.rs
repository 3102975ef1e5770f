//! Tasking client
//!
//! Read-only access to the taskings of each CIS contract on the account.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::AirbusSession;
use hexapi_core::tasking::{cis_contract_ids, tasking_url};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone)]
pub struct TaskingClient {
    session: AirbusSession,
}

impl TaskingClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_session(AirbusSession::connect(config).await?))
    }

    pub fn with_session(session: AirbusSession) -> Self {
        Self { session }
    }

    pub fn tasking_api_url(&self, contract_id: &str) -> String {
        tasking_url(&self.session.endpoints.tasking_api, contract_id)
    }

    /// CIS contract ids listed in the account services.
    pub async fn cis_contract_ids(&self) -> Result<Vec<String>> {
        let services = self.session.auth.roles().await?;
        Ok(cis_contract_ids(&services))
    }

    /// Taskings of one contract.
    pub async fn taskings(&self, contract_id: &str) -> Result<Value> {
        let url = self.tasking_api_url(contract_id);
        let response = self.session.get_json_headers(&url).await?;
        Ok(response.json().await?)
    }

    /// Taskings of every contract on the account, paired with the contract id.
    pub async fn taskings_for_all_contracts(&self) -> Result<Vec<(String, Value)>> {
        let ids = self.cis_contract_ids().await?;
        info!(contracts = ids.len(), "listing taskings");

        let mut taskings = Vec::with_capacity(ids.len());
        for id in ids {
            let listing = self.taskings(&id).await?;
            taskings.push((id, listing));
        }
        Ok(taskings)
    }
}
