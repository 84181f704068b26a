//! 报告分类导航：作业 → 工序 → 对象（原料/酒罐）→ 特征。
//!
//! 纯查表逻辑，不保存任何跨调用状态。工序的 target 决定对象从哪个目录选择，
//! 工序声明的特征决定是否需要录入特征与数值。

use crate::data::{Feature, Item, Material, Operation, Report, TargetType, Tank, User, Work};
use chrono::{DateTime, Utc};

/// 对象选择所用的目录。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindCatalog {
    Material,
    Tank,
}

impl KindCatalog {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindCatalog::Material => "material",
            KindCatalog::Tank => "tank",
        }
    }
}

impl std::fmt::Display for KindCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 特征录入要求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureRequirement {
    NotApplicable,
    /// 必须选择特征并录入数值；`feature_ids` 为可选范围。
    Required { feature_ids: Vec<i64> },
}

impl FeatureRequirement {
    pub fn is_required(&self) -> bool {
        matches!(self, FeatureRequirement::Required { .. })
    }

    pub fn allows(&self, feature_id: i64) -> bool {
        match self {
            FeatureRequirement::NotApplicable => false,
            FeatureRequirement::Required { feature_ids } => feature_ids.contains(&feature_id),
        }
    }
}

/// 某个工序对报告字段的要求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequirements {
    pub operation_id: i64,
    pub kind: KindCatalog,
    pub feature: FeatureRequirement,
}

/// 分类规则违例。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("unknown work: {0}")]
    UnknownWork(i64),
    #[error("unknown operation: {0}")]
    UnknownOperation(i64),
    #[error("operation {operation_id} does not belong to work {work_id}")]
    OperationNotInWork { operation_id: i64, work_id: i64 },
    #[error("{catalog} {kind_id} not found")]
    KindNotFound { catalog: KindCatalog, kind_id: i64 },
    #[error("a feature is required for this operation")]
    FeatureRequired,
    #[error("feature {0} is not allowed for this operation")]
    FeatureNotAllowed(i64),
    #[error("a numeric value is required for this operation")]
    ValueRequired,
    #[error("value must be a finite number")]
    InvalidValue,
}

/// 待提交的报告草稿。
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub date: DateTime<Utc>,
    pub user_id: i64,
    pub work_id: i64,
    pub operation_id: i64,
    pub kind_id: i64,
    pub feature_id: Option<i64>,
    pub value: Option<f64>,
    pub note: Option<String>,
}

impl From<&Report> for ReportDraft {
    fn from(report: &Report) -> Self {
        Self {
            date: report.date,
            user_id: report.user_id,
            work_id: report.work_id,
            operation_id: report.operation_id,
            kind_id: report.kind_id,
            feature_id: report.feature_id,
            value: report.value,
            note: report.note.clone(),
        }
    }
}

/// 名称展开后的报告。
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReport {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub username: String,
    pub work: String,
    pub operation: String,
    pub kind: String,
    pub feature: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub note: Option<String>,
}

/// 静态参考数据：作业、工序、特征。
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    works: Vec<Work>,
    operations: Vec<Operation>,
    features: Vec<Feature>,
}

impl Taxonomy {
    pub fn new(works: Vec<Work>, operations: Vec<Operation>, features: Vec<Feature>) -> Self {
        Self {
            works,
            operations,
            features,
        }
    }

    pub fn works(&self) -> &[Work] {
        &self.works
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn work(&self, work_id: i64) -> Option<&Work> {
        self.works.iter().find(|work| work.id == work_id)
    }

    pub fn operation(&self, operation_id: i64) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|operation| operation.id == operation_id)
    }

    pub fn feature(&self, feature_id: i64) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == feature_id)
    }

    /// 作业下的工序，保持服务端顺序。
    pub fn operations_for(&self, work_id: i64) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|operation| operation.work_id == work_id)
            .collect()
    }

    pub fn requirements(&self, operation_id: i64) -> Result<ReportRequirements, TaxonomyError> {
        let operation = self
            .operation(operation_id)
            .ok_or(TaxonomyError::UnknownOperation(operation_id))?;
        Ok(self.requirements_of(operation))
    }

    fn requirements_of(&self, operation: &Operation) -> ReportRequirements {
        let kind = match operation.target {
            TargetType::Material => KindCatalog::Material,
            TargetType::Tank | TargetType::Features => KindCatalog::Tank,
        };
        let feature = if !operation.feature_ids.is_empty() {
            FeatureRequirement::Required {
                feature_ids: operation.feature_ids.clone(),
            }
        } else if operation.measures_features || operation.target == TargetType::Features {
            FeatureRequirement::Required {
                feature_ids: self.features.iter().map(|feature| feature.id).collect(),
            }
        } else {
            FeatureRequirement::NotApplicable
        };
        ReportRequirements {
            operation_id: operation.id,
            kind,
            feature,
        }
    }

    /// 对象候选，只取与要求匹配的目录。
    pub fn kind_options(
        &self,
        requirements: &ReportRequirements,
        materials: &[Material],
        tanks: &[Tank],
    ) -> Vec<Item> {
        match requirements.kind {
            KindCatalog::Material => materials.iter().map(Item::from).collect(),
            KindCatalog::Tank => tanks.iter().map(Item::from).collect(),
        }
    }

    pub fn feature_options(&self, requirements: &ReportRequirements) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|feature| requirements.feature.allows(feature.id))
            .collect()
    }

    /// 校验草稿；不适用的特征与数值会被清除，空备注归一为 None。
    pub fn validate(
        &self,
        draft: ReportDraft,
        materials: &[Material],
        tanks: &[Tank],
    ) -> Result<ReportDraft, TaxonomyError> {
        if self.work(draft.work_id).is_none() {
            return Err(TaxonomyError::UnknownWork(draft.work_id));
        }
        let operation = self
            .operation(draft.operation_id)
            .ok_or(TaxonomyError::UnknownOperation(draft.operation_id))?;
        if operation.work_id != draft.work_id {
            return Err(TaxonomyError::OperationNotInWork {
                operation_id: operation.id,
                work_id: draft.work_id,
            });
        }
        let requirements = self.requirements_of(operation);
        let kind_exists = match requirements.kind {
            KindCatalog::Material => materials.iter().any(|material| material.id == draft.kind_id),
            KindCatalog::Tank => tanks.iter().any(|tank| tank.id == draft.kind_id),
        };
        if !kind_exists {
            return Err(TaxonomyError::KindNotFound {
                catalog: requirements.kind,
                kind_id: draft.kind_id,
            });
        }

        let (feature_id, value) = if requirements.feature.is_required() {
            let feature_id = draft.feature_id.ok_or(TaxonomyError::FeatureRequired)?;
            if !requirements.feature.allows(feature_id) {
                return Err(TaxonomyError::FeatureNotAllowed(feature_id));
            }
            let value = draft.value.ok_or(TaxonomyError::ValueRequired)?;
            if !value.is_finite() {
                return Err(TaxonomyError::InvalidValue);
            }
            (Some(feature_id), Some(value))
        } else {
            (None, None)
        };

        let note = draft
            .note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());

        Ok(ReportDraft {
            feature_id,
            value,
            note,
            ..draft
        })
    }

    /// 展开报告的名称链；服务端已给出的名称优先。
    pub fn resolve(
        &self,
        report: &Report,
        users: &[User],
        materials: &[Material],
        tanks: &[Tank],
    ) -> ResolvedReport {
        let names = &report.names;
        let operation = self.operation(report.operation_id);
        let kind_catalog = operation
            .map(|operation| self.requirements_of(operation).kind)
            .unwrap_or(KindCatalog::Tank);
        let kind_name = match kind_catalog {
            KindCatalog::Material => materials
                .iter()
                .find(|material| material.id == report.kind_id)
                .map(|material| material.name.clone()),
            KindCatalog::Tank => tanks
                .iter()
                .find(|tank| tank.id == report.kind_id)
                .map(|tank| tank.name.clone()),
        };
        let feature = report.feature_id.and_then(|id| self.feature(id));

        ResolvedReport {
            id: report.id,
            date: report.date,
            username: names
                .username
                .clone()
                .or_else(|| {
                    users
                        .iter()
                        .find(|user| user.id == report.user_id)
                        .map(|user| user.name.clone())
                })
                .unwrap_or_else(|| unknown(report.user_id)),
            work: names
                .work_name
                .clone()
                .or_else(|| self.work(report.work_id).map(|work| work.name.clone()))
                .unwrap_or_else(|| unknown(report.work_id)),
            operation: names
                .operation_name
                .clone()
                .or_else(|| operation.map(|operation| operation.name.clone()))
                .unwrap_or_else(|| unknown(report.operation_id)),
            kind: names
                .kind_name
                .clone()
                .or(kind_name)
                .unwrap_or_else(|| unknown(report.kind_id)),
            feature: report.feature_id.map(|feature_id| {
                names
                    .feature_name
                    .clone()
                    .or_else(|| feature.map(|feature| feature.name.clone()))
                    .unwrap_or_else(|| unknown(feature_id))
            }),
            value: report.value,
            unit: names
                .unit
                .clone()
                .or_else(|| feature.map(|feature| feature.unit.clone())),
            note: report.note.clone(),
        }
    }
}

fn unknown(id: i64) -> String {
    format!("#{id}")
}
