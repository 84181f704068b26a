use crate::permissions::{ActionId, Permission, ResourceId};
use chrono::{DateTime, Utc};

/// 旧版服务端约定：该作业下的工序以原料为对象。
pub const LEGACY_MATERIAL_WORK_ID: i64 = 1;

/// 旧版服务端约定：需要录入特征值的工序。
pub const LEGACY_FEATURE_OPERATION_IDS: [i64; 3] = [4, 13, 17];

/// 系统（租户/酒庄实例）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    pub id: i64,
    pub name: String,
    pub year: i32,
}

/// 系统内用户。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role_id: i64,
    pub is_enabled: bool,
}

/// 角色及其权限列表。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub id: ActionId,
    pub name: String,
}

/// 原料。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub id: i64,
    pub name: String,
    pub note: String,
}

/// 酒罐，可选关联当前盛放的原料。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tank {
    pub id: i64,
    pub name: String,
    pub note: String,
    pub material_id: Option<i64>,
}

/// 传感器，可选安装在某个酒罐上。
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub tank_id: Option<i64>,
    pub position: String,
    pub date: DateTime<Utc>,
}

/// 作业（报告分类第一层）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    pub id: i64,
    pub name: String,
}

/// 工序的对象类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    Material,
    Tank,
    /// 在酒罐上测量特征值。
    Features,
}

impl TargetType {
    /// 线上名称。
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Material => "material",
            TargetType::Tank => "tank",
            TargetType::Features => "features",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "material" => Some(TargetType::Material),
            "tank" => Some(TargetType::Tank),
            "features" => Some(TargetType::Features),
            _ => None,
        }
    }

    /// 服务端未下发 target_type 时，对象类型只由作业决定。
    pub fn infer_legacy(work_id: i64) -> Self {
        if work_id == LEGACY_MATERIAL_WORK_ID {
            TargetType::Material
        } else {
            TargetType::Tank
        }
    }
}

/// 工序（报告分类第二层）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub id: i64,
    pub name: String,
    pub work_id: i64,
    pub target: TargetType,
    pub feature_ids: Vec<i64>,
    /// `feature_ids` 为空时仍需录入特征值（从全部特征中选）。
    pub measures_features: bool,
}

impl Operation {
    /// 旧版服务端：特征工序与对象类型无关，由工序 id 单独判定。
    pub fn legacy_measures_features(operation_id: i64) -> bool {
        LEGACY_FEATURE_OPERATION_IDS.contains(&operation_id)
    }
}

/// 可测量特征（带单位）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub id: i64,
    pub name: String,
    pub unit: String,
}

/// 生产报告。
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub user_id: i64,
    pub work_id: i64,
    pub operation_id: i64,
    pub kind_id: i64,
    pub feature_id: Option<i64>,
    pub value: Option<f64>,
    pub note: Option<String>,
    pub names: ReportNames,
}

/// 服务端联表返回的展示名称，旧版服务端不返回。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportNames {
    pub username: Option<String>,
    pub work_name: Option<String>,
    pub operation_name: Option<String>,
    pub kind_name: Option<String>,
    pub feature_name: Option<String>,
    pub unit: Option<String>,
}

/// 选择器使用的精简条目。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub id: i64,
    pub name: String,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&Material> for Item {
    fn from(material: &Material) -> Self {
        Item::new(material.id, material.name.clone())
    }
}

impl From<&Tank> for Item {
    fn from(tank: &Tank) -> Self {
        Item::new(tank.id, tank.name.clone())
    }
}

impl From<&User> for Item {
    fn from(user: &User) -> Self {
        Item::new(user.id, user.name.clone())
    }
}

impl From<&Feature> for Item {
    fn from(feature: &Feature) -> Self {
        Item::new(feature.id, feature.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_inference_matches_fixed_table() {
        assert_eq!(TargetType::infer_legacy(1), TargetType::Material);
        assert_eq!(TargetType::infer_legacy(2), TargetType::Tank);
        assert!(Operation::legacy_measures_features(13));
        assert!(!Operation::legacy_measures_features(5));
    }

    #[test]
    fn target_type_parses_wire_names() {
        assert_eq!(TargetType::parse("Material"), Some(TargetType::Material));
        assert_eq!(TargetType::parse(" tank "), Some(TargetType::Tank));
        assert_eq!(TargetType::parse("features"), Some(TargetType::Features));
        assert_eq!(TargetType::parse("barrel"), None);
    }
}
