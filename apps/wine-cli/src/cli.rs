//! 命令行参数定义。

use chrono::{DateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};

/// WineSystem 命令行客户端
#[derive(Parser, Debug)]
#[command(name = "wine")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Server base URL (overrides WINE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List, create and manage systems
    #[command(subcommand)]
    Systems(SystemsCommand),
    /// Log in to a system as one of its users
    Login(LoginArgs),
    /// Forget the saved session
    Logout,
    /// Show or change the logged-in user
    Me {
        #[command(subcommand)]
        command: Option<MeCommand>,
    },
    /// Manage users of the current system
    #[command(subcommand)]
    Users(UsersCommand),
    /// Manage roles and their permissions
    #[command(subcommand)]
    Roles(RolesCommand),
    /// Browse the shared reference catalogs
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Manage materials
    #[command(subcommand)]
    Materials(MaterialsCommand),
    /// Manage tanks
    #[command(subcommand)]
    Tanks(TanksCommand),
    /// Manage sensors
    #[command(subcommand)]
    Sensors(SensorsCommand),
    /// Browse and record production reports
    #[command(subcommand)]
    Reports(ReportsCommand),
    /// Manage server backups
    #[command(subcommand)]
    Backups(BackupsCommand),
}

#[derive(Subcommand, Debug)]
pub enum SystemsCommand {
    /// List all systems
    List,
    /// Show one system (defaults to the logged-in one)
    Show { id: Option<i64> },
    /// Create a system together with its owner account
    Create {
        #[arg(long)]
        name: String,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        owner: String,
        #[arg(long, env = "WINE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat the password
        #[arg(long)]
        confirm: String,
    },
    /// Rename the logged-in system
    Rename { name: String },
    /// Change the vintage year of the logged-in system
    Year { year: i32 },
    /// Delete the logged-in system and log out
    Delete {
        /// Required to actually delete
        #[arg(long)]
        yes: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct LoginArgs {
    /// System id or name
    #[arg(long)]
    pub system: String,
    /// User id or name
    #[arg(long)]
    pub user: String,
    #[arg(long, env = "WINE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum MeCommand {
    /// Show the session and the server-side username
    Show,
    /// Change the username
    Rename { name: String },
    /// Change the password
    Password {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
        /// Role id or name
        #[arg(long)]
        role: String,
        /// Create the account disabled
        #[arg(long)]
        disabled: bool,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Role id or name
        #[arg(long)]
        role: Option<String>,
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum RolesCommand {
    List,
    /// Show a role with its permission grid
    Show { role: String },
    Add { name: String },
    Rename { role: String, name: String },
    /// Permit actions on a resource
    Grant(PermissionArgs),
    /// Withdraw actions on a resource
    Revoke(PermissionArgs),
    Delete { role: String },
}

#[derive(ClapArgs, Debug)]
pub struct PermissionArgs {
    /// Role id or name
    pub role: String,
    /// Resource id or name
    #[arg(long)]
    pub resource: String,
    /// Action ids or names
    #[arg(long = "action", required = true, num_args = 1..)]
    pub actions: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    Works,
    Operations {
        /// Only operations of this work (id or name)
        #[arg(long)]
        work: Option<String>,
    },
    Features,
    Resources,
    Actions,
}

#[derive(Subcommand, Debug)]
pub enum MaterialsCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum TanksCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "")]
        note: String,
        /// Material id or name held by the tank
        #[arg(long)]
        material: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long, conflicts_with = "empty")]
        material: Option<String>,
        /// Clear the material
        #[arg(long)]
        empty: bool,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum SensorsCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        position: String,
        /// Tank id or name
        #[arg(long)]
        tank: Option<String>,
        /// Installation date (ISO-8601), defaults to now
        #[arg(long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long, conflicts_with = "detach")]
        tank: Option<String>,
        /// Detach from its tank
        #[arg(long)]
        detach: bool,
        #[arg(long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    List {
        /// Only reports of this work (id or name)
        #[arg(long)]
        work: Option<String>,
    },
    /// Show what a report for a work/operation needs
    Plan {
        #[arg(long)]
        work: String,
        #[arg(long)]
        operation: Option<String>,
    },
    Add(ReportArgs),
    Update {
        id: i64,
        /// Attribute the report to another user (id or name)
        #[arg(long)]
        user: Option<String>,
        #[command(flatten)]
        report: ReportArgs,
    },
    Delete { id: i64 },
}

#[derive(ClapArgs, Debug)]
pub struct ReportArgs {
    /// Work id or name
    #[arg(long)]
    pub work: String,
    /// Operation id or name
    #[arg(long)]
    pub operation: String,
    /// Material or tank id or name, depending on the operation
    #[arg(long)]
    pub kind: String,
    /// Feature id or name
    #[arg(long)]
    pub feature: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub value: Option<f64>,
    #[arg(long)]
    pub note: Option<String>,
    /// Report date (ISO-8601), defaults to now
    #[arg(long, value_parser = parse_date)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum BackupsCommand {
    List,
    Create {
        #[arg(long)]
        note: Option<String>,
    },
    /// Restore the database from a backup file
    Restore { filename: String },
    Delete { filename: String },
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    api_contract::datetime::parse(raw).map_err(|err| err.to_string())
}
