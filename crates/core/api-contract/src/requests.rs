//! 写接口的请求体。

use crate::datetime;
use crate::entities::PermissionDto;
use chrono::{DateTime, Utc};
use domain::{Material, PermissionDiff, PermissionMap, ReportDraft, Sensor, Tank};
use serde::{Deserialize, Serialize};

/// 创建系统：同时创建首个管理员用户。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSystemRequest {
    pub name: String,
    pub year: i32,
    pub owner_name: String,
    pub password: String,
}

/// 修改系统；未设置的字段不上送。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSystemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl UpdateSystemRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.year.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub password: String,
    pub role_id: i64,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub role_id: i64,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUsernameRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
}

/// 角色更新：改名并按差量增删权限。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: String,
    pub inserts: Vec<PermissionDto>,
    pub deletes: Vec<PermissionDto>,
}

impl UpdateRoleRequest {
    pub fn from_diff(name: impl Into<String>, diff: &PermissionDiff) -> Self {
        Self {
            name: name.into(),
            inserts: permission_dtos(&diff.inserts),
            deletes: permission_dtos(&diff.deletes),
        }
    }
}

fn permission_dtos(map: &PermissionMap) -> Vec<PermissionDto> {
    map.to_permissions().iter().map(PermissionDto::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRequest {
    pub name: String,
    pub note: String,
}

impl From<&Material> for MaterialRequest {
    fn from(material: &Material) -> Self {
        Self {
            name: material.name.clone(),
            note: material.note.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankRequest {
    pub name: String,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<i64>,
}

impl From<&Tank> for TankRequest {
    fn from(tank: &Tank) -> Self {
        Self {
            name: tank.name.clone(),
            note: tank.note.clone(),
            material_id: tank.material_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRequest {
    pub name: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_id: Option<i64>,
    pub position: String,
    #[serde(with = "datetime")]
    pub date: DateTime<Utc>,
}

impl From<&Sensor> for SensorRequest {
    fn from(sensor: &Sensor) -> Self {
        Self {
            name: sensor.name.clone(),
            unit: sensor.unit.clone(),
            tank_id: sensor.tank_id,
            position: sensor.position.clone(),
            date: sensor.date,
        }
    }
}

/// 报告提交体。备注总是上送，缺省为空串。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(with = "datetime")]
    pub date: DateTime<Utc>,
    pub user_id: i64,
    pub work_id: i64,
    pub operation_id: i64,
    pub kind_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default)]
    pub note: String,
}

impl From<&ReportDraft> for ReportRequest {
    fn from(draft: &ReportDraft) -> Self {
        Self {
            date: draft.date,
            user_id: draft.user_id,
            work_id: draft.work_id,
            operation_id: draft.operation_id,
            kind_id: draft.kind_id,
            feature_id: draft.feature_id,
            value: draft.value,
            note: draft.note.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBackupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreBackupRequest {
    pub filename: String,
}
