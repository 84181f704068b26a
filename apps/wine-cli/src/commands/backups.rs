use super::Context;
use crate::cli::BackupsCommand;
use crate::error::CliResult;
use crate::output::Table;
use api_contract::BackupListDto;

pub async fn backups(ctx: &mut Context, command: BackupsCommand) -> CliResult {
    ctx.session().await?;
    match command {
        BackupsCommand::List => {
            let backups = ctx.api.backups().await?;
            let mut table = Table::new(["FILENAME"]);
            for filename in &backups {
                table.row([filename]);
            }
            ctx.out.emit(&BackupListDto { backups }, table)
        }
        BackupsCommand::Create { note } => {
            ctx.api.create_backup(note).await?;
            ctx.out.done("backup created")
        }
        BackupsCommand::Restore { filename } => {
            ctx.api.restore_backup(&filename).await?;
            tracing::info!(filename = %filename, "backup restored");
            ctx.out.done(&format!("restored {filename}"))
        }
        BackupsCommand::Delete { filename } => {
            ctx.api.delete_backup(&filename).await?;
            ctx.out.done(&format!("deleted {filename}"))
        }
    }
}
