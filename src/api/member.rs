use super::types::{MemberListResponse, SearchInfoResponse, SearchRequest};
use crate::http::{ApiClient, ApiResult, Transport, encode};

/// Filter options (colleges, departments, levels) for the search form.
pub async fn search_info<T: Transport>(client: &ApiClient<T>) -> ApiResult<SearchInfoResponse> {
    client.get("/member/info", None, None).await
}

#[tracing::instrument(skip(client))]
pub async fn search<T: Transport>(
    client: &ApiClient<T>,
    request: &SearchRequest,
) -> ApiResult<MemberListResponse> {
    client.post("/member/search", Some(encode(request)?), None).await
}
