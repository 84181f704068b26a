//! 生产报告：按 作业 → 工序 → 对象 → 特征 逐级选择。

use super::{Context, Named, find, resolve};
use crate::cli::{ReportArgs, ReportsCommand};
use crate::error::{CliError, CliResult};
use crate::output::{Table, or_dash};
use chrono::Utc;
use domain::{
    FeatureRequirement, KindCatalog, Material, Operation, ReportDraft, ResolvedReport, Tank,
    Taxonomy, User,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ReportRow {
    id: i64,
    date: String,
    username: String,
    work: String,
    operation: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl From<ResolvedReport> for ReportRow {
    fn from(report: ResolvedReport) -> Self {
        Self {
            id: report.id,
            date: api_contract::datetime::format(&report.date),
            username: report.username,
            work: report.work,
            operation: report.operation,
            kind: report.kind,
            feature: report.feature,
            value: report.value,
            unit: report.unit,
            note: report.note,
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanRow {
    operation_id: i64,
    operation: String,
    kind: &'static str,
    feature_required: bool,
    kind_options: Vec<String>,
    feature_options: Vec<String>,
}

pub async fn reports(ctx: &mut Context, command: ReportsCommand) -> CliResult {
    let session = ctx.session().await?;
    let system_id = session.system_id;
    match command {
        ReportsCommand::List { work } => {
            let taxonomy = ctx.api.taxonomy().await?;
            let work_id = match work {
                Some(work) => Some(resolve(taxonomy.works(), &work, "work")?.id),
                None => None,
            };
            let reports = ctx.api.reports(system_id).await?;
            let users = ctx.api.users(system_id).await?;
            let materials = ctx.api.materials(system_id).await?;
            let tanks = ctx.api.tanks(system_id).await?;

            let rows: Vec<ReportRow> = reports
                .iter()
                .filter(|report| work_id.is_none_or(|work_id| report.work_id == work_id))
                .map(|report| taxonomy.resolve(report, &users, &materials, &tanks).into())
                .collect();
            let mut table = Table::new([
                "ID", "DATE", "USER", "WORK", "OPERATION", "KIND", "FEATURE", "VALUE", "NOTE",
            ]);
            for row in &rows {
                let value = row.value.map(|value| match &row.unit {
                    Some(unit) if !unit.is_empty() => format!("{value} {unit}"),
                    _ => value.to_string(),
                });
                table.row([
                    row.id.to_string(),
                    row.date.clone(),
                    row.username.clone(),
                    row.work.clone(),
                    row.operation.clone(),
                    row.kind.clone(),
                    or_dash(row.feature.as_deref()),
                    or_dash(value),
                    or_dash(row.note.as_deref()),
                ]);
            }
            ctx.out.emit(&rows, table)
        }
        ReportsCommand::Plan { work, operation } => {
            let taxonomy = ctx.api.taxonomy().await?;
            let work = resolve(taxonomy.works(), &work, "work")?.clone();
            let operations: Vec<Operation> = match operation {
                Some(key) => vec![operation_in(&taxonomy, work.id, &key)?.clone()],
                None => taxonomy
                    .operations_for(work.id)
                    .into_iter()
                    .cloned()
                    .collect(),
            };
            let materials = ctx.api.materials(system_id).await?;
            let tanks = ctx.api.tanks(system_id).await?;

            let mut plans = Vec::with_capacity(operations.len());
            for operation in &operations {
                let requirements = taxonomy.requirements(operation.id)?;
                plans.push(PlanRow {
                    operation_id: operation.id,
                    operation: operation.name.clone(),
                    kind: requirements.kind.as_str(),
                    feature_required: requirements.feature.is_required(),
                    kind_options: taxonomy
                        .kind_options(&requirements, &materials, &tanks)
                        .into_iter()
                        .map(|item| item.name)
                        .collect(),
                    feature_options: taxonomy
                        .feature_options(&requirements)
                        .into_iter()
                        .map(|feature| feature.name.clone())
                        .collect(),
                });
            }
            let mut table = Table::new(["ID", "OPERATION", "KIND", "FEATURES", "CHOICES"]);
            for plan in &plans {
                let features = if plan.feature_required {
                    plan.feature_options.join(", ")
                } else {
                    "-".to_string()
                };
                table.row([
                    plan.operation_id.to_string(),
                    plan.operation.clone(),
                    plan.kind.to_string(),
                    features,
                    plan.kind_options.join(", "),
                ]);
            }
            if !ctx.out.is_json() {
                println!("{} (#{})", work.name, work.id);
            }
            ctx.out.emit(&plans, table)
        }
        ReportsCommand::Add(args) => {
            let taxonomy = ctx.api.taxonomy().await?;
            let materials = ctx.api.materials(system_id).await?;
            let tanks = ctx.api.tanks(system_id).await?;
            let draft = build_draft(&taxonomy, &materials, &tanks, session.user_id, args)?;
            let draft = ctx
                .api
                .create_report(system_id, &taxonomy, draft, &materials, &tanks)
                .await?;
            ctx.out.done(&format!(
                "recorded report for operation #{} on {}",
                draft.operation_id,
                api_contract::datetime::format(&draft.date)
            ))
        }
        ReportsCommand::Update { id, user, report } => {
            let taxonomy = ctx.api.taxonomy().await?;
            let materials = ctx.api.materials(system_id).await?;
            let tanks = ctx.api.tanks(system_id).await?;
            let existing = ctx
                .api
                .reports(system_id)
                .await?
                .into_iter()
                .find(|existing| existing.id == id)
                .ok_or_else(|| CliError::not_found("report", &id.to_string()))?;
            let user_id = match user {
                Some(key) => {
                    let users = ctx.api.users(system_id).await?;
                    attributed_user(&users, &key)?
                }
                None => existing.user_id,
            };
            let date = report.date.unwrap_or(existing.date);
            let mut draft = build_draft(&taxonomy, &materials, &tanks, user_id, report)?;
            draft.date = date;
            ctx.api
                .update_report(id, &taxonomy, draft, &materials, &tanks)
                .await?;
            ctx.out.done(&format!("updated report #{id}"))
        }
        ReportsCommand::Delete { id } => {
            ctx.api.delete_report(id).await?;
            ctx.out.done(&format!("deleted report #{id}"))
        }
    }
}

/// 数字直接作为 id，交给分类校验；名称在作业内查找。
fn operation_in<'a>(taxonomy: &'a Taxonomy, work_id: i64, key: &str) -> CliResult<&'a Operation> {
    let found = match key.trim().parse::<i64>() {
        Ok(id) => taxonomy.operation(id),
        Err(_) => taxonomy
            .operations_for(work_id)
            .into_iter()
            .find(|operation| operation.name.eq_ignore_ascii_case(key.trim())),
    };
    found.ok_or_else(|| CliError::not_found("operation", key))
}

/// 改派报告只允许系统内已启用的用户。
fn attributed_user(users: &[User], key: &str) -> CliResult<i64> {
    let user = resolve(users, key, "user")?;
    if !user.is_enabled {
        return Err(CliError::Usage(format!("user {} is disabled", user.name)));
    }
    Ok(user.id)
}

fn id_or_name<T: Named>(items: &[T], key: &str, kind: &str) -> CliResult<i64> {
    match key.trim().parse::<i64>() {
        Ok(id) => Ok(id),
        Err(_) => find(items, key)
            .map(Named::id)
            .ok_or_else(|| CliError::not_found(kind, key)),
    }
}

fn build_draft(
    taxonomy: &Taxonomy,
    materials: &[Material],
    tanks: &[Tank],
    user_id: i64,
    args: ReportArgs,
) -> CliResult<ReportDraft> {
    let work_id = id_or_name(taxonomy.works(), &args.work, "work")?;
    let operation = operation_in(taxonomy, work_id, &args.operation)?;
    let requirements = taxonomy.requirements(operation.id)?;
    let kind_id = match requirements.kind {
        KindCatalog::Material => id_or_name(materials, &args.kind, "material")?,
        KindCatalog::Tank => id_or_name(tanks, &args.kind, "tank")?,
    };
    let feature_id = match (&requirements.feature, args.feature.as_deref()) {
        (FeatureRequirement::Required { .. }, Some(key)) => {
            Some(id_or_name(taxonomy.features(), key, "feature")?)
        }
        _ => None,
    };
    Ok(ReportDraft {
        date: args.date.unwrap_or_else(Utc::now),
        user_id,
        work_id,
        operation_id: operation.id,
        kind_id,
        feature_id,
        value: args.value,
        note: args.note,
    })
}
