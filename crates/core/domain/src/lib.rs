pub mod data;
pub mod permissions;
pub mod taxonomy;
pub mod validation;

pub use data::{
    Action, Feature, Item, Material, Operation, Report, ReportNames, Resource, Role, Sensor,
    System, TargetType, Tank, User, Work,
};
pub use permissions::{
    ActionId, Permission, PermissionDiff, PermissionLine, PermissionMap, PermissionMatrix,
    ResourceId, ResourcePermission,
};
pub use taxonomy::{
    FeatureRequirement, KindCatalog, ReportDraft, ReportRequirements, ResolvedReport, Taxonomy,
    TaxonomyError,
};
pub use validation::{MIN_PASSWORD_LEN, ValidationError, ValidationErrors};

/// 系统上下文：登录后所有系统级操作共享的执行上下文。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemContext {
    pub system_id: i64,
    pub user_id: i64,
    pub system_name: String,
    pub username: String,
}

impl SystemContext {
    /// 构造显式系统与用户的上下文。
    pub fn new(
        system_id: i64,
        user_id: i64,
        system_name: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            system_id,
            user_id,
            system_name: system_name.into(),
            username: username.into(),
        }
    }
}

impl Default for SystemContext {
    /// 未登录占位上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            system_id: 0,
            user_id: 0,
            system_name: "No System".to_string(),
            username: "No Name".to_string(),
        }
    }
}
