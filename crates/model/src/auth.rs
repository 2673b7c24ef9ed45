use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::people::UserRequest;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// AuthInfo: the resolved identity behind a confirmed login.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthInfo {
    pub subject_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendCodeRequest {
    pub mobile_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginConfirmRequest {
    pub mobile_phone: String,
    #[serde(rename = "smscode")]
    pub sms_code: String,
}

/// Confirms a code and registers the user under the confirmed phone.
/// Any `phone` inside `user` is overwritten by `mobile_phone`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterConfirmRequest {
    pub mobile_phone: String,
    pub otp: String,
    pub user: UserRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub id: Uuid,
    pub phone: String,
    pub auth: AuthInfo,
}
