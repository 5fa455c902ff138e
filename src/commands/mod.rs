pub mod assume;
pub mod cdk;
pub mod completions;
pub mod configure;
pub mod identity;
pub mod sso;
pub mod tasks;

use std::path::PathBuf;

pub use assume::{AssumeRoleCommand, LoginCommand, RenewCommand};
pub use cdk::{BootstrapCommand, DeployCommand, DestroyCommand};
pub use completions::CompletionsCommand;
pub use configure::ConfigureCommand;
pub use identity::{IdentityCommand, WhoamiCommand};
pub use sso::{SsoCheckCommand, SsoLoginCommand};
pub use tasks::TasksCommand;

use crate::{config::Settings, process::SystemRunner};

/// State shared by every command of one invocation.
#[derive(Debug)]
pub struct AppContext<R = SystemRunner> {
    pub settings: Settings,
    /// Where `configure` writes its answers
    pub config_path: PathBuf,
    pub runner: R,
}
