use serde_json::Value;

use super::types::{CheckQqRequest, CheckQqResponse, CollegeListResponse, SignUpRequest};
use crate::http::{ApiClient, ApiResult, Transport, encode};

pub async fn college_list<T: Transport>(client: &ApiClient<T>) -> ApiResult<CollegeListResponse> {
    client.get("/signup/info", None, None).await
}

/// Checks whether a QQ number is still free; a taken number answers 409.
pub async fn check_qq<T: Transport>(
    client: &ApiClient<T>,
    request: &CheckQqRequest,
) -> ApiResult<CheckQqResponse> {
    client
        .get("/signup/check_qq", Some(encode(request)?), None)
        .await
}

#[tracing::instrument(skip(client, request), fields(qq_id = request.qq_id))]
pub async fn sign_up<T: Transport>(
    client: &ApiClient<T>,
    request: &SignUpRequest,
) -> ApiResult<Value> {
    client.post("/signup", Some(encode(request)?), None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ClientConfig, Method, MockTransport, TransportError, TransportResponse};
    use serde_json::json;

    fn client(transport: MockTransport) -> ApiClient<MockTransport> {
        ApiClient::with_transport(ClientConfig::new("http://localhost:3000/api"), transport)
    }

    #[tokio::test]
    async fn test_college_list() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == Method::Get && req.url.ends_with("/signup/info"))
            .returning(|_| {
                Ok(TransportResponse {
                    status: 200,
                    body: Some(json!({"colleges": [{"name": "其他", "code": "OTHERS"}]})),
                })
            });

        let env = college_list(&client(transport)).await.unwrap();
        assert_eq!(env.payload.colleges.len(), 1);
    }

    #[tokio::test]
    async fn test_check_qq_uses_query() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.query == vec![("qq_id".to_string(), "10001".to_string())] && req.body.is_none()
            })
            .returning(|_| {
                Err(TransportError::Status(TransportResponse {
                    status: 409,
                    body: Some(json!({"detail": {"message": "该 QQ 号已被注册", "code": "QQID_EXISTS"}})),
                }))
            });

        let err = check_qq(&client(transport), &CheckQqRequest { qq_id: 10001 })
            .await
            .unwrap_err();
        assert_eq!(err.status_code, 409);
        assert_eq!(err.code, "QQID_EXISTS");
    }

    #[tokio::test]
    async fn test_sign_up_string_payload() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == Method::Post && req.url.ends_with("/signup"))
            .returning(|_| {
                Ok(TransportResponse {
                    status: 200,
                    body: Some(json!("注册成功")),
                })
            });

        let request = SignUpRequest {
            qq_id: 10001,
            nickname: "steve".into(),
            password: "pw".into(),
            mc_name: None,
            real_name: "张三".into(),
            student_id: "2025".into(),
            college_name: "其他".into(),
            major: None,
            grade: None,
            class_index: None,
        };
        let env = sign_up(&client(transport), &request).await.unwrap();
        assert_eq!(env.payload, json!("注册成功"));
    }
}
