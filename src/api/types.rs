use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DepartmentInfo {
    pub name: String,
    pub code: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CollegeInfo {
    pub name: String,
    pub code: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserLevelInfo {
    pub level: String,
    pub code: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoginRequest {
    #[serde(rename = "QQID")]
    pub qq_id: u64,
    pub password: String,
}

/// Login result.
///
/// The server sends `user_id`, `nickname` and `token`; the `user_id`/`token`
/// pair is what its auth layer later expects as cookies. `QQID` and `MCName`
/// are accepted when present.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "QQID", default, skip_serializing_if = "Option::is_none")]
    pub qq_id: Option<String>,
    #[serde(rename = "MCName", default, skip_serializing_if = "Option::is_none")]
    pub mc_name: Option<String>,
}

/// A member record as listed by search and returned by the profile endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    #[serde(rename = "QQID")]
    pub qq_id: u64,
    #[serde(rename = "MCName", default)]
    pub mc_name: Option<String>,
    pub nickname: String,
    pub create_at: String,
    pub real_name: String,
    #[serde(rename = "studentID")]
    pub student_id: String,
    pub college_name: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub grade: Option<u32>,
    #[serde(default)]
    pub class_index: Option<u32>,
    #[serde(default)]
    pub departments: Vec<DepartmentInfo>,
    pub level: String,
}

pub type GetProfileResponse = MemberInfo;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MemberListResponse {
    pub members: Vec<MemberInfo>,
    pub total: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SearchInfoResponse {
    #[serde(default)]
    pub colleges: Vec<CollegeInfo>,
    #[serde(default)]
    pub departments: Vec<DepartmentInfo>,
    #[serde(default)]
    pub levels: Vec<UserLevelInfo>,
}

/// Member search filters. Unset fields are left out of the request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_at_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_at_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colleges: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CollegeListResponse {
    pub colleges: Vec<CollegeInfo>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CheckQqRequest {
    pub qq_id: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CheckQqResponse {
    #[serde(rename = "QQID")]
    pub qq_id: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(rename = "QQID")]
    pub qq_id: u64,
    pub nickname: String,
    pub password: String,
    #[serde(rename = "MCName", skip_serializing_if = "Option::is_none")]
    pub mc_name: Option<String>,
    pub real_name: String,
    #[serde(rename = "studentID")]
    pub student_id: String,
    pub college_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_index: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_info_wire_names() {
        let member: MemberInfo = serde_json::from_value(json!({
            "QQID": 10001,
            "MCName": null,
            "nickname": "steve",
            "createAt": "2025-09-01T08:00:00",
            "realName": "张三",
            "studentID": "202501010101",
            "collegeName": "信息科学与工程学院",
            "major": "计算机科学与技术",
            "grade": 2025,
            "classIndex": 3,
            "departments": [{"name": "技术部", "code": "TECH"}],
            "level": "member"
        }))
        .unwrap();

        assert_eq!(member.qq_id, 10001);
        assert_eq!(member.mc_name, None);
        assert_eq!(member.student_id, "202501010101");
        assert_eq!(member.class_index, Some(3));
        assert_eq!(member.departments[0].code, "TECH");
    }

    #[test]
    fn test_login_response_server_shape() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "user_id": 1,
            "nickname": "steve",
            "token": "abc"
        }))
        .unwrap();

        assert_eq!(resp.user_id, Some(1));
        assert_eq!(resp.token.as_deref(), Some("abc"));
        assert_eq!(resp.qq_id, None);
        assert_eq!(resp.mc_name, None);
    }

    #[test]
    fn test_login_response_profile_shape() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "QQID": "10001",
            "MCName": null,
            "nickname": "steve"
        }))
        .unwrap();

        assert_eq!(resp.qq_id.as_deref(), Some("10001"));
        assert_eq!(resp.user_id, None);
        assert_eq!(resp.token, None);
    }

    #[test]
    fn test_search_request_omits_unset_fields() {
        let req = SearchRequest {
            global_query: Some("steve".into()),
            levels: Some(vec!["member".into()]),
            page_size: Some(5),
            page_index: Some(1),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"globalQuery": "steve", "levels": ["member"], "pageSize": 5, "pageIndex": 1})
        );
    }

    #[test]
    fn test_sign_up_request_wire_names() {
        let req = SignUpRequest {
            qq_id: 10001,
            nickname: "steve".into(),
            password: "pw".into(),
            mc_name: Some("Steve".into()),
            real_name: "张三".into(),
            student_id: "2025".into(),
            college_name: "其他".into(),
            major: None,
            grade: None,
            class_index: None,
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "QQID": 10001,
                "nickname": "steve",
                "password": "pw",
                "MCName": "Steve",
                "realName": "张三",
                "studentID": "2025",
                "collegeName": "其他"
            })
        );
    }
}
