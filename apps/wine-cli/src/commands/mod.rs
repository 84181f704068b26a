//! 子命令实现。

mod admin;
mod backups;
mod catalog;
mod inventory;
mod reports;
mod session;

use crate::cli::{Args, Command};
use crate::error::{CliError, CliResult};
use crate::output::Output;
use chrono::Utc;
use domain::{Action, Feature, Material, Operation, Resource, Role, System, Tank, User, Work};
use wine_auth::{AuthError, FileSessionStore, Session, SessionStore};
use wine_client::{ApiClient, WineApi};
use wine_config::ClientConfig;

/// 单次命令的执行上下文。
pub struct Context {
    pub api: WineApi,
    pub out: Output,
    store: Box<dyn SessionStore>,
}

impl Context {
    pub fn new(config: &ClientConfig, json: bool) -> CliResult<Self> {
        let client = ApiClient::new(&config.api_url)?;
        let store = FileSessionStore::new(config.session_path()?);
        Ok(Self {
            api: WineApi::new(client),
            out: Output::new(json),
            store: Box::new(store),
        })
    }

    #[cfg(test)]
    pub fn with_store(api: WineApi, store: Box<dyn SessionStore>) -> Self {
        Self {
            api,
            out: Output::new(true),
            store,
        }
    }

    /// 读取会话并把 token 装到客户端上。
    pub async fn session(&mut self) -> CliResult<Session> {
        let session = self.store.load().await?.ok_or(AuthError::NotLoggedIn)?;
        session.ensure_usable(self.api.client().base_url(), Utc::now())?;
        self.api.client_mut().set_token(session.token.clone());
        Ok(session)
    }

    pub async fn save_session(&self, session: &Session) -> CliResult {
        Ok(self.store.save(session).await?)
    }

    pub async fn clear_session(&mut self) -> CliResult {
        self.api.client_mut().clear_token();
        Ok(self.store.clear().await?)
    }

    pub async fn stored_session(&self) -> CliResult<Option<Session>> {
        Ok(self.store.load().await?)
    }
}

pub async fn run(args: Args, config: ClientConfig) -> CliResult {
    let mut ctx = Context::new(&config, args.json || config.json_output)?;
    tracing::debug!(api_url = %config.api_url, "running command");
    match args.command {
        Command::Systems(command) => session::systems(&mut ctx, command).await,
        Command::Login(login) => session::login(&mut ctx, login).await,
        Command::Logout => session::logout(&mut ctx).await,
        Command::Me { command } => session::me(&mut ctx, command).await,
        Command::Users(command) => admin::users(&mut ctx, command).await,
        Command::Roles(command) => admin::roles(&mut ctx, command).await,
        Command::Catalog(command) => catalog::catalog(&mut ctx, command).await,
        Command::Materials(command) => inventory::materials(&mut ctx, command).await,
        Command::Tanks(command) => inventory::tanks(&mut ctx, command).await,
        Command::Sensors(command) => inventory::sensors(&mut ctx, command).await,
        Command::Reports(command) => reports::reports(&mut ctx, command).await,
        Command::Backups(command) => backups::backups(&mut ctx, command).await,
    }
}

/// 可以按 id 或名称引用的实体。
pub trait Named {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(System, User, Role, Resource, Action, Material, Tank, Work, Operation, Feature);

/// 数字按 id 匹配，否则按名称（不区分大小写）匹配。
pub fn find<'a, T: Named>(items: &'a [T], key: &str) -> Option<&'a T> {
    let key = key.trim();
    match key.parse::<i64>() {
        Ok(id) => items.iter().find(|item| item.id() == id),
        Err(_) => items
            .iter()
            .find(|item| item.name().eq_ignore_ascii_case(key)),
    }
}

pub fn resolve<'a, T: Named>(items: &'a [T], key: &str, kind: &str) -> CliResult<&'a T> {
    find(items, key).ok_or_else(|| CliError::not_found(kind, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn materials() -> Vec<Material> {
        vec![
            Material {
                id: 1,
                name: "Tempranillo".to_string(),
                note: String::new(),
            },
            Material {
                id: 2,
                name: "Garnacha".to_string(),
                note: String::new(),
            },
        ]
    }

    #[test]
    fn find_by_id_or_name() {
        let materials = materials();
        assert_eq!(find(&materials, "2").map(|m| m.id), Some(2));
        assert_eq!(find(&materials, " tempranillo ").map(|m| m.id), Some(1));
        assert!(find(&materials, "3").is_none());
        assert!(matches!(
            resolve(&materials, "Viura", "material"),
            Err(CliError::NotFound(_))
        ));
    }
}
