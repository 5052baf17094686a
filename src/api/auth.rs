use log::debug;
use serde_json::Value;

use super::types::{LoginRequest, LoginResponse};
use crate::http::{ApiClient, ApiResult, Transport, encode};
use crate::session::SessionContext;

#[tracing::instrument(skip(client, request), fields(qq_id = request.qq_id))]
pub async fn login<T: Transport>(
    client: &ApiClient<T>,
    request: &LoginRequest,
) -> ApiResult<LoginResponse> {
    client.post("/login", Some(encode(request)?), None).await
}

pub async fn logout<T: Transport>(client: &ApiClient<T>) -> ApiResult<Value> {
    client.get("/logout", None, None).await
}

/// Logs in and, on success, signs the session in.
pub async fn login_session<T: Transport>(
    client: &ApiClient<T>,
    session: &mut SessionContext,
    request: &LoginRequest,
) -> ApiResult<LoginResponse> {
    let envelope = login(client, request).await?;
    session.sign_in(envelope.payload.clone().into());
    Ok(envelope)
}

/// Logs out and clears the session whatever the server said.
pub async fn logout_session<T: Transport>(
    client: &ApiClient<T>,
    session: &mut SessionContext,
) -> ApiResult<Value> {
    let result = logout(client).await;
    if let Err(e) = &result {
        debug!("Server logout failed, clearing local session anyway: {}", e);
    }
    session.sign_out();
    result
}
