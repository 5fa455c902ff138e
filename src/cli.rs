use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::{
    commands::{
        AppContext, AssumeRoleCommand, BootstrapCommand, CompletionsCommand, ConfigureCommand,
        DeployCommand, DestroyCommand, IdentityCommand, LoginCommand, RenewCommand,
        SsoCheckCommand, SsoLoginCommand, TasksCommand, WhoamiCommand,
    },
    config, constants,
    process::{CommandRunner, SystemRunner},
};

#[derive(Debug, Clone, Parser)]
#[command(name = "cdkrole", version, about = "Assume AWS roles via SSO, export credentials for direnv, and run CDK", long_about = None)]
pub struct Cli {
    #[arg(
        short = 'c',
        long,
        global = true,
        help = "Config file (default: $CDKROLE_CONFIG or ./cdkrole.ini)"
    )]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Show the AWS identity behind a profile")]
    Identity(IdentityCommand),
    #[command(about = "Log in to AWS SSO in the browser")]
    SsoLogin(SsoLoginCommand),
    #[command(about = "Check whether the SSO session of a profile is still valid")]
    SsoCheck(SsoCheckCommand),
    #[command(about = "Assume an IAM role and write its temporary credentials for direnv")]
    AssumeRole(AssumeRoleCommand),
    #[command(about = "Renew the temporary credentials of an environment")]
    Renew(RenewCommand),
    #[command(about = "Log in to AWS SSO, then assume the role for an environment")]
    Login(LoginCommand),
    #[command(about = "Show the AWS identity of the current shell")]
    Whoami(WhoamiCommand),
    #[command(about = "Bootstrap the AWS CDK environment")]
    Bootstrap(BootstrapCommand),
    #[command(about = "Deploy CDK stacks without asking for approval")]
    Deploy(DeployCommand),
    #[command(about = "Destroy CDK stacks without asking for confirmation")]
    Destroy(DestroyCommand),
    #[command(about = "List available tasks")]
    Tasks(TasksCommand),
    #[command(about = "Configure default profile, role and directories")]
    Configure(ConfigureCommand),
    #[command(about = "Generate shell completion scripts for cdkrole")]
    Completions(CompletionsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let command = self.command.unwrap_or(Commands::Tasks(TasksCommand {}));

        // These work without (or despite a broken) config file
        match command {
            Commands::Tasks(cmd) => {
                cmd.execute();
                return Ok(());
            }
            Commands::Completions(cmd) => {
                cmd.execute();
                return Ok(());
            }
            command => {
                let config_path = self.config.unwrap_or_else(constants::get_config_path);
                let settings = config::load(&config_path).await?;
                let ctx = AppContext {
                    settings,
                    config_path,
                    runner: SystemRunner,
                };
                command.execute(&ctx).await
            }
        }
    }
}

impl Commands {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        match self {
            Commands::Identity(cmd) => cmd.execute(ctx).await,
            Commands::SsoLogin(cmd) => cmd.execute(ctx).await,
            Commands::SsoCheck(cmd) => cmd.execute(ctx).await,
            Commands::AssumeRole(cmd) => cmd.execute(ctx).await,
            Commands::Renew(cmd) => cmd.execute(ctx).await,
            Commands::Login(cmd) => cmd.execute(ctx).await,
            Commands::Whoami(cmd) => cmd.execute(ctx).await,
            Commands::Bootstrap(cmd) => cmd.execute(ctx).await,
            Commands::Deploy(cmd) => cmd.execute(ctx).await,
            Commands::Destroy(cmd) => cmd.execute(ctx).await,
            Commands::Configure(cmd) => cmd.execute(ctx).await,
            Commands::Tasks(cmd) => {
                cmd.execute();
                Ok(())
            }
            Commands::Completions(cmd) => {
                cmd.execute();
                Ok(())
            }
        }
    }
}
