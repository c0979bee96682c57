//! Contact endpoints.

use courier_core::error::CourierResult;
use crate::client::ApiClient;
use crate::response::ContactResponse;

impl ApiClient {
    /// Fetch the full contact listing for the logged-in user.
    pub async fn contacts(&self) -> CourierResult<Vec<ContactResponse>> {
        self.get_json("/contacts").await
    }

    /// Fetch a single contact by id.
    pub async fn contact(&self, id: &str) -> CourierResult<ContactResponse> {
        self.get_json(&format!("/contacts/{id}")).await
    }
}
