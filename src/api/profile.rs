use serde_json::Value;

use super::types::{ChangePasswordRequest, GetProfileResponse};
use crate::http::{ApiClient, ApiResult, Transport, encode};

pub async fn get_profile<T: Transport>(client: &ApiClient<T>) -> ApiResult<GetProfileResponse> {
    client.get("/profile", None, None).await
}

#[tracing::instrument(skip_all)]
pub async fn change_password<T: Transport>(
    client: &ApiClient<T>,
    request: &ChangePasswordRequest,
) -> ApiResult<Value> {
    client
        .put("/profile/change_password", Some(encode(request)?), None)
        .await
}
