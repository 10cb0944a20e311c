//! Search Head Cluster membership for [`SplunkClient`].

use crate::client::SplunkClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::ShcMember;

impl SplunkClient {
    /// List the members of the cluster this client's host belongs to.
    pub async fn shc_members(&mut self) -> Result<Vec<ShcMember>> {
        crate::retry_call!(
            self,
            __token,
            endpoints::get_shc_members(
                &self.http,
                &self.base_url,
                &__token,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )
    }
}
