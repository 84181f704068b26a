//! 系统、登录与当前用户。

use super::{Context, resolve};
use crate::cli::{LoginArgs, MeCommand, SystemsCommand};
use crate::error::{CliError, CliResult};
use crate::output::{Table, or_dash};
use api_contract::{CreateSystemRequest, SystemDto};
use chrono::{Datelike, Utc};
use serde::Serialize;
use wine_auth::Session;

pub async fn systems(ctx: &mut Context, command: SystemsCommand) -> CliResult {
    match command {
        SystemsCommand::List => {
            let systems = ctx.api.systems().await?;
            let dtos: Vec<SystemDto> = systems.iter().map(SystemDto::from).collect();
            let mut table = Table::new(["ID", "NAME", "YEAR"]);
            for system in &systems {
                table.row([system.id.to_string(), system.name.clone(), system.year.to_string()]);
            }
            ctx.out.emit(&dtos, table)
        }
        SystemsCommand::Show { id } => {
            let system_id = match id {
                Some(id) => id,
                None => ctx.session().await?.system_id,
            };
            let system = ctx.api.system(system_id).await?;
            let mut table = Table::new(["ID", "NAME", "YEAR"]);
            table.row([system.id.to_string(), system.name.clone(), system.year.to_string()]);
            ctx.out.emit(&SystemDto::from(&system), table)
        }
        SystemsCommand::Create {
            name,
            year,
            owner,
            password,
            confirm,
        } => {
            let request = CreateSystemRequest {
                name,
                year: year.unwrap_or_else(|| Utc::now().year()),
                owner_name: owner,
                password,
            };
            ctx.api.create_system(&request, &confirm).await?;
            ctx.out.done(&format!("created system {:?}", request.name.trim()))
        }
        SystemsCommand::Rename { name } => {
            let mut session = ctx.session().await?;
            ctx.api.rename_system(session.system_id, &name).await?;
            session.system_name = name.trim().to_string();
            ctx.save_session(&session).await?;
            ctx.out.done("system renamed")
        }
        SystemsCommand::Year { year } => {
            let session = ctx.session().await?;
            ctx.api.set_system_year(session.system_id, year).await?;
            ctx.out.done(&format!("year set to {year}"))
        }
        SystemsCommand::Delete { yes } => {
            if !yes {
                return Err(CliError::Usage(
                    "deleting a system removes all of its data; pass --yes to confirm".to_string(),
                ));
            }
            let session = ctx.session().await?;
            ctx.api.delete_system(session.system_id).await?;
            ctx.clear_session().await?;
            ctx.out.done(&format!("deleted system {:?}", session.system_name))
        }
    }
}

pub async fn login(ctx: &mut Context, args: LoginArgs) -> CliResult {
    let systems = ctx.api.systems().await?;
    let system = resolve(&systems, &args.system, "system")?;
    let users = ctx.api.users(system.id).await?;
    let user = resolve(&users, &args.user, "user")?;
    if !user.is_enabled {
        return Err(CliError::Usage(format!("user {:?} is disabled", user.name)));
    }

    let token = ctx.api.login(system.id, user.id, &args.password).await?;
    let session = Session {
        api_url: ctx.api.client().base_url().to_string(),
        system_id: system.id,
        system_name: system.name.clone(),
        user_id: user.id,
        username: user.name.clone(),
        token,
    };
    ctx.save_session(&session).await?;
    ctx.out
        .done(&format!("logged in to {} as {}", session.system_name, session.username))
}

pub async fn logout(ctx: &mut Context) -> CliResult {
    // 会话文件损坏时同样清除。
    let had_session = ctx.stored_session().await.map_or(true, |session| session.is_some());
    ctx.clear_session().await?;
    ctx.out
        .done(if had_session { "logged out" } else { "not logged in" })
}

#[derive(Debug, Serialize)]
struct WhoAmI {
    system_id: i64,
    system_name: String,
    user_id: i64,
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
}

pub async fn me(ctx: &mut Context, command: Option<MeCommand>) -> CliResult {
    let mut session = ctx.session().await?;
    match command.unwrap_or(MeCommand::Show) {
        MeCommand::Show => {
            let username = ctx.api.my_name().await?;
            let expires_at = session.expires_at().map(|at| api_contract::datetime::format(&at));
            let mut table = Table::new(["SYSTEM", "USER", "EXPIRES"]);
            table.row([
                format!("{} (#{})", session.system_name, session.system_id),
                format!("{} (#{})", username, session.user_id),
                or_dash(expires_at.as_deref()),
            ]);
            let who = WhoAmI {
                system_id: session.system_id,
                system_name: session.system_name,
                user_id: session.user_id,
                username,
                expires_at,
            };
            ctx.out.emit(&who, table)
        }
        MeCommand::Rename { name } => {
            ctx.api.update_my_name(&name).await?;
            session.username = name.trim().to_string();
            ctx.save_session(&session).await?;
            ctx.out.done("username changed")
        }
        MeCommand::Password { old, new, confirm } => {
            ctx.api.change_password(&old, &new, &confirm).await?;
            ctx.out.done("password changed")
        }
    }
}
