//! 用户与角色管理。

use super::{Context, find, resolve};
use crate::cli::{PermissionArgs, RolesCommand, UsersCommand};
use crate::error::{CliError, CliResult};
use crate::output::Table;
use api_contract::{CreateUserRequest, RoleDto, UpdateUserRequest, UserDto};
use domain::permissions::describe;
use domain::{PermissionDiff, PermissionMap, PermissionMatrix, Role};

pub async fn users(ctx: &mut Context, command: UsersCommand) -> CliResult {
    let session = ctx.session().await?;
    let system_id = session.system_id;
    match command {
        UsersCommand::List => {
            let users = ctx.api.users(system_id).await?;
            let roles = ctx.api.roles(system_id).await?;
            let mut table = Table::new(["ID", "NAME", "ROLE", "ENABLED"]);
            for user in &users {
                let role = roles
                    .iter()
                    .find(|role| role.id == user.role_id)
                    .map(|role| role.name.clone())
                    .unwrap_or_else(|| format!("#{}", user.role_id));
                table.row([
                    user.id.to_string(),
                    user.name.clone(),
                    role,
                    if user.is_enabled { "yes" } else { "no" }.to_string(),
                ]);
            }
            let dtos: Vec<UserDto> = users.iter().map(UserDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        UsersCommand::Add {
            name,
            password,
            confirm,
            role,
            disabled,
        } => {
            let roles = ctx.api.roles(system_id).await?;
            let role = resolve(&roles, &role, "role")?;
            let request = CreateUserRequest {
                name,
                password,
                role_id: role.id,
                is_enabled: !disabled,
            };
            ctx.api.create_user(system_id, &request, &confirm).await?;
            ctx.out.done(&format!("created user {:?}", request.name.trim()))
        }
        UsersCommand::Update {
            id,
            name,
            role,
            enable,
            disable,
        } => {
            let users = ctx.api.users(system_id).await?;
            let user = resolve(&users, &id.to_string(), "user")?;
            let role_id = match role {
                Some(role) => {
                    let roles = ctx.api.roles(system_id).await?;
                    resolve(&roles, &role, "role")?.id
                }
                None => user.role_id,
            };
            let request = UpdateUserRequest {
                name: name.unwrap_or_else(|| user.name.clone()),
                role_id,
                is_enabled: if enable {
                    true
                } else if disable {
                    false
                } else {
                    user.is_enabled
                },
            };
            ctx.api.update_user(user.id, &request).await?;
            ctx.out.done(&format!("updated user #{}", user.id))
        }
        UsersCommand::Delete { id } => {
            if id == session.user_id {
                return Err(CliError::Usage(
                    "cannot delete the logged-in user".to_string(),
                ));
            }
            ctx.api.delete_user(id).await?;
            ctx.out.done(&format!("deleted user #{id}"))
        }
    }
}

pub async fn roles(ctx: &mut Context, command: RolesCommand) -> CliResult {
    let system_id = ctx.session().await?.system_id;
    match command {
        RolesCommand::List => {
            let roles = ctx.api.roles(system_id).await?;
            let mut table = Table::new(["ID", "NAME", "RESOURCES"]);
            for role in &roles {
                let map = PermissionMap::from_permissions(&role.permissions);
                table.row([role.id.to_string(), role.name.clone(), map.len().to_string()]);
            }
            let dtos: Vec<RoleDto> = roles.iter().map(RoleDto::from).collect();
            ctx.out.emit(&dtos, table)
        }
        RolesCommand::Show { role } => {
            let roles = ctx.api.roles(system_id).await?;
            let role = resolve(&roles, &role, "role")?;
            let resources = ctx.api.resources().await?;
            let actions = ctx.api.actions().await?;
            let matrix = PermissionMatrix::from_role(role, &resources, &actions);

            let mut table = Table::new(
                std::iter::once("RESOURCE".to_string())
                    .chain(actions.iter().map(|action| action.name.to_uppercase())),
            );
            for row in matrix.rows() {
                let resource = resources
                    .iter()
                    .find(|resource| resource.id == row.resource_id)
                    .map(|resource| resource.name.clone())
                    .unwrap_or_else(|| format!("#{}", row.resource_id));
                let cells = row
                    .actions
                    .iter()
                    .map(|(_, permitted)| if *permitted { "x" } else { "." }.to_string());
                table.row(std::iter::once(resource).chain(cells));
            }
            if !ctx.out.is_json() {
                println!("{} (#{})", role.name, role.id);
                // 目录外的权限不会出现在表格里，单独列出。
                let map = PermissionMap::from_permissions(&role.permissions);
                let outside = describe(&map, &resources, &actions)
                    .into_iter()
                    .filter(|line| line.resource.starts_with('#'))
                    .collect::<Vec<_>>();
                for line in outside {
                    println!("  also {}: {}", line.resource, line.actions.join(", "));
                }
            }
            ctx.out.emit(&RoleDto::from(role), table)
        }
        RolesCommand::Add { name } => {
            ctx.api.create_role(system_id, &name).await?;
            ctx.out.done(&format!("created role {:?}", name.trim()))
        }
        RolesCommand::Rename { role, name } => {
            let roles = ctx.api.roles(system_id).await?;
            let role = resolve(&roles, &role, "role")?;
            ctx.api
                .update_role(role.id, &name, &PermissionDiff::default())
                .await?;
            ctx.out.done(&format!("renamed role #{}", role.id))
        }
        RolesCommand::Grant(args) => change_permissions(ctx, system_id, args, true).await,
        RolesCommand::Revoke(args) => change_permissions(ctx, system_id, args, false).await,
        RolesCommand::Delete { role } => {
            let roles = ctx.api.roles(system_id).await?;
            let role = resolve(&roles, &role, "role")?;
            ctx.api.delete_role(role.id).await?;
            ctx.out.done(&format!("deleted role {:?}", role.name))
        }
    }
}

/// 在权限矩阵上切换开关，只提交差量。
async fn change_permissions(
    ctx: &mut Context,
    system_id: i64,
    args: PermissionArgs,
    permitted: bool,
) -> CliResult {
    let roles = ctx.api.roles(system_id).await?;
    let role: &Role = resolve(&roles, &args.role, "role")?;
    let resources = ctx.api.resources().await?;
    let actions = ctx.api.actions().await?;
    let resource = resolve(&resources, &args.resource, "resource")?;

    let mut matrix = PermissionMatrix::from_role(role, &resources, &actions);
    for key in &args.actions {
        let action = find(&actions, key).ok_or_else(|| CliError::not_found("action", key))?;
        matrix.set(resource.id, action.id, permitted);
    }
    let diff = matrix.diff_against(role);
    if diff.is_empty() {
        return ctx.out.done("no changes");
    }
    tracing::debug!(
        role_id = role.id,
        inserts = diff.inserts.len(),
        deletes = diff.deletes.len(),
        "updating role permissions"
    );
    ctx.api.update_role(role.id, &role.name, &diff).await?;
    ctx.out.done(&format!("updated permissions of role {:?}", role.name))
}
