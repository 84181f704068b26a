//! 稳定的 DTO 与 REST 接口契约。
//!
//! 线上字段一律 snake_case（登录请求除外，见 [`LoginRequest`]），
//! 日期为 ISO-8601。

pub mod datetime;
mod entities;
mod requests;

use serde::{Deserialize, Serialize};

pub use entities::{
    ActionDto, BackupListDto, FeatureDto, ItemDto, MaterialDto, OperationDto, PermissionDto,
    ReportDto, ResourceDto, RoleDto, SensorDto, SystemDto, TankDto, UserDto, WorkDto,
};
pub use requests::{
    CreateBackupRequest, CreateRoleRequest, CreateSystemRequest, CreateUserRequest,
    MaterialRequest, ReportRequest, RestoreBackupRequest, SensorRequest, TankRequest,
    UpdatePasswordRequest, UpdateRoleRequest, UpdateSystemRequest, UpdateUserRequest,
    UpdateUsernameRequest,
};

/// 服务端的消息体：失败响应的错误说明，部分写接口的成功回执。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 登录请求体。
///
/// 服务端沿用客户端默认编码，此处字段为 camelCase。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub system_id: i64,
    pub user_id: i64,
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
