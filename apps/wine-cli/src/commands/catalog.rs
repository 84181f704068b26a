use super::{Context, resolve};
use crate::cli::CatalogCommand;
use crate::error::CliResult;
use crate::output::Table;
use api_contract::{ActionDto, FeatureDto, OperationDto, ResourceDto, WorkDto};
use domain::Operation;

/// 共享目录不依赖登录。
pub async fn catalog(ctx: &mut Context, command: CatalogCommand) -> CliResult {
    match command {
        CatalogCommand::Works => {
            let works = ctx.api.works().await?;
            let mut table = Table::new(["ID", "NAME"]);
            for work in &works {
                table.row([work.id.to_string(), work.name.clone()]);
            }
            let dtos: Vec<WorkDto> = works.iter().map(WorkDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        CatalogCommand::Operations { work } => {
            let operations = ctx.api.operations().await?;
            let operations: Vec<Operation> = match work {
                Some(work) => {
                    let works = ctx.api.works().await?;
                    let work_id = resolve(&works, &work, "work")?.id;
                    operations
                        .into_iter()
                        .filter(|operation| operation.work_id == work_id)
                        .collect()
                }
                None => operations,
            };
            let mut table = Table::new(["ID", "NAME", "WORK", "TARGET", "FEATURES"]);
            for operation in &operations {
                let features: Vec<String> =
                    operation.feature_ids.iter().map(i64::to_string).collect();
                table.row([
                    operation.id.to_string(),
                    operation.name.clone(),
                    operation.work_id.to_string(),
                    operation.target.as_str().to_string(),
                    features.join(","),
                ]);
            }
            let dtos: Vec<OperationDto> = operations.iter().map(OperationDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        CatalogCommand::Features => {
            let features = ctx.api.features().await?;
            let mut table = Table::new(["ID", "NAME", "UNIT"]);
            for feature in &features {
                table.row([feature.id.to_string(), feature.name.clone(), feature.unit.clone()]);
            }
            let dtos: Vec<FeatureDto> = features.iter().map(FeatureDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        CatalogCommand::Resources => {
            let resources = ctx.api.resources().await?;
            let mut table = Table::new(["ID", "NAME"]);
            for resource in &resources {
                table.row([resource.id.to_string(), resource.name.clone()]);
            }
            let dtos: Vec<ResourceDto> = resources.iter().map(ResourceDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        CatalogCommand::Actions => {
            let actions = ctx.api.actions().await?;
            let mut table = Table::new(["ID", "NAME"]);
            for action in &actions {
                table.row([action.id.to_string(), action.name.clone()]);
            }
            let dtos: Vec<ActionDto> = actions.iter().map(ActionDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
    }
}
