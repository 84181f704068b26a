//! 响应实体 DTO 及其与领域模型的互转。

use crate::datetime;
use chrono::{DateTime, Utc};
use domain::{
    Action, Feature, Item, Material, Operation, Permission, Report, ReportNames, Resource, Role,
    Sensor, System, TargetType, Tank, User, Work,
};
use serde::{Deserialize, Serialize};

/// 系统返回结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDto {
    pub id: i64,
    pub name: String,
    pub year: i32,
}

/// 用户返回结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub role_id: i64,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDto {
    pub resource_id: i64,
    pub action_ids: Vec<i64>,
}

/// 角色返回结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDto {
    pub id: i64,
    pub name: String,
}

/// 原料返回结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub note: String,
}

/// 酒罐返回结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub material_id: Option<i64>,
}

/// 传感器返回结构。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub tank_id: Option<i64>,
    #[serde(default)]
    pub position: String,
    #[serde(with = "datetime")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDto {
    pub id: i64,
    pub name: String,
}

/// 工序返回结构。
///
/// 旧版服务端不返回 `target_type` 与 `feature_ids`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDto {
    pub id: i64,
    pub name: String,
    pub work_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: String,
}

/// 报告返回结构；名称字段由服务端联表给出，可能缺失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDto {
    pub id: i64,
    #[serde(with = "datetime")]
    pub date: DateTime<Utc>,
    pub user_id: i64,
    pub work_id: i64,
    pub operation_id: i64,
    pub kind_id: i64,
    #[serde(default)]
    pub feature_id: Option<i64>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// 备份文件列表。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupListDto {
    pub backups: Vec<String>,
}

/// 只取 id/name 的精简条目，可从任意实体解码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: i64,
    pub name: String,
}

impl From<SystemDto> for System {
    fn from(dto: SystemDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            year: dto.year,
        }
    }
}

impl From<&System> for SystemDto {
    fn from(system: &System) -> Self {
        Self {
            id: system.id,
            name: system.name.clone(),
            year: system.year,
        }
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            role_id: dto.role_id,
            is_enabled: dto.is_enabled,
        }
    }
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role_id: user.role_id,
            is_enabled: user.is_enabled,
        }
    }
}

impl From<PermissionDto> for Permission {
    fn from(dto: PermissionDto) -> Self {
        Permission::new(dto.resource_id, dto.action_ids)
    }
}

impl From<&Permission> for PermissionDto {
    fn from(permission: &Permission) -> Self {
        Self {
            resource_id: permission.resource_id,
            action_ids: permission.action_ids.clone(),
        }
    }
}

impl From<RoleDto> for Role {
    fn from(dto: RoleDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            permissions: dto.permissions.into_iter().map(Permission::from).collect(),
        }
    }
}

impl From<&Role> for RoleDto {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            permissions: role.permissions.iter().map(PermissionDto::from).collect(),
        }
    }
}

impl From<ResourceDto> for Resource {
    fn from(dto: ResourceDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<ActionDto> for Action {
    fn from(dto: ActionDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<MaterialDto> for Material {
    fn from(dto: MaterialDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            note: dto.note,
        }
    }
}

impl From<&Material> for MaterialDto {
    fn from(material: &Material) -> Self {
        Self {
            id: material.id,
            name: material.name.clone(),
            note: material.note.clone(),
        }
    }
}

impl From<TankDto> for Tank {
    fn from(dto: TankDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            note: dto.note,
            material_id: dto.material_id,
        }
    }
}

impl From<&Tank> for TankDto {
    fn from(tank: &Tank) -> Self {
        Self {
            id: tank.id,
            name: tank.name.clone(),
            note: tank.note.clone(),
            material_id: tank.material_id,
        }
    }
}

impl From<SensorDto> for Sensor {
    fn from(dto: SensorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            unit: dto.unit,
            tank_id: dto.tank_id,
            position: dto.position,
            date: dto.date,
        }
    }
}

impl From<&Sensor> for SensorDto {
    fn from(sensor: &Sensor) -> Self {
        Self {
            id: sensor.id,
            name: sensor.name.clone(),
            unit: sensor.unit.clone(),
            tank_id: sensor.tank_id,
            position: sensor.position.clone(),
            date: sensor.date,
        }
    }
}

impl From<WorkDto> for Work {
    fn from(dto: WorkDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<OperationDto> for Operation {
    fn from(dto: OperationDto) -> Self {
        // 未知或缺失的 target_type 按旧版固定规则推断：对象看作业，特征看工序。
        let (target, measures_features) =
            match dto.target_type.as_deref().and_then(TargetType::parse) {
                Some(target) => (target, target == TargetType::Features),
                None => (
                    TargetType::infer_legacy(dto.work_id),
                    Operation::legacy_measures_features(dto.id),
                ),
            };
        Self {
            id: dto.id,
            name: dto.name,
            work_id: dto.work_id,
            target,
            feature_ids: dto.feature_ids.unwrap_or_default(),
            measures_features,
        }
    }
}

impl From<&Operation> for OperationDto {
    fn from(operation: &Operation) -> Self {
        // 原料或酒罐上的特征工序没有线上名称，留空交回推断规则。
        let named = !operation.measures_features || operation.target == TargetType::Features;
        Self {
            id: operation.id,
            name: operation.name.clone(),
            work_id: operation.work_id,
            target_type: named.then(|| operation.target.as_str().to_string()),
            feature_ids: Some(operation.feature_ids.clone()),
        }
    }
}

impl From<FeatureDto> for Feature {
    fn from(dto: FeatureDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            unit: dto.unit,
        }
    }
}

impl From<ReportDto> for Report {
    fn from(dto: ReportDto) -> Self {
        Self {
            id: dto.id,
            date: dto.date,
            user_id: dto.user_id,
            work_id: dto.work_id,
            operation_id: dto.operation_id,
            kind_id: dto.kind_id,
            feature_id: dto.feature_id,
            value: dto.value,
            note: dto.note.filter(|note| !note.is_empty()),
            names: ReportNames {
                username: dto.username,
                work_name: dto.work_name,
                operation_name: dto.operation_name,
                kind_name: dto.kind_name,
                feature_name: dto.feature_name,
                unit: dto.unit,
            },
        }
    }
}

impl From<&Report> for ReportDto {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            date: report.date,
            user_id: report.user_id,
            work_id: report.work_id,
            operation_id: report.operation_id,
            kind_id: report.kind_id,
            feature_id: report.feature_id,
            value: report.value,
            note: report.note.clone(),
            username: report.names.username.clone(),
            work_name: report.names.work_name.clone(),
            operation_name: report.names.operation_name.clone(),
            kind_name: report.names.kind_name.clone(),
            feature_name: report.names.feature_name.clone(),
            unit: report.names.unit.clone(),
        }
    }
}

impl From<ItemDto> for Item {
    fn from(dto: ItemDto) -> Self {
        Item::new(dto.id, dto.name)
    }
}

impl From<&Resource> for ResourceDto {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id,
            name: resource.name.clone(),
        }
    }
}

impl From<&Action> for ActionDto {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id,
            name: action.name.clone(),
        }
    }
}

impl From<&Work> for WorkDto {
    fn from(work: &Work) -> Self {
        Self {
            id: work.id,
            name: work.name.clone(),
        }
    }
}

impl From<&Feature> for FeatureDto {
    fn from(feature: &Feature) -> Self {
        Self {
            id: feature.id,
            name: feature.name.clone(),
            unit: feature.unit.clone(),
        }
    }
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
        }
    }
}
