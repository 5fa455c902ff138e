use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::AppContext;
use crate::{
    aws::{self, RoleArn},
    process::CommandRunner,
};

#[derive(Debug, Clone, Args)]
pub struct AssumeRoleCommand {
    #[arg(short = 'e', long, help = "Environment name; selects the credentials file")]
    pub env: Option<String>,
    #[arg(short = 'p', long, help = "AWS profile used to assume the role")]
    pub profile: Option<String>,
    #[arg(short = 'r', long, help = "AWS IAM role name to assume")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct RenewCommand {
    #[arg(short = 'e', long, help = "Environment whose credentials to renew")]
    pub env: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct LoginCommand {
    #[arg(short = 'e', long, help = "Environment name; selects the credentials file")]
    pub env: Option<String>,
    #[arg(short = 'p', long, help = "AWS SSO profile to log in with")]
    pub profile: Option<String>,
    #[arg(short = 'r', long, help = "AWS IAM role name to assume")]
    pub role: Option<String>,
}

/// Fully resolved parameters of one role assumption
#[derive(Debug, Clone, PartialEq, Eq)]
struct Assumption {
    env: String,
    profile: String,
    role: String,
}

impl Assumption {
    fn resolve<R>(
        ctx: &AppContext<R>,
        env: Option<String>,
        profile: Option<String>,
        role: Option<String>,
    ) -> Self {
        let settings = &ctx.settings;
        let env = env.unwrap_or_else(|| settings.default_env.clone());
        Self {
            profile: profile.unwrap_or_else(|| settings.profile_for(&env).to_string()),
            role: role.unwrap_or_else(|| settings.role_for(&env).to_string()),
            env,
        }
    }
}

impl AssumeRoleCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        let assumption = Assumption::resolve(ctx, self.env, self.profile, self.role);
        assume_and_save(ctx, &assumption).await?;
        Ok(())
    }
}

impl RenewCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        let assumption = Assumption::resolve(ctx, self.env, None, None);
        info!("Renewing credentials for environment: {}", assumption.env);
        assume_and_save(ctx, &assumption).await?;
        Ok(())
    }
}

impl LoginCommand {
    pub async fn execute<R: CommandRunner>(self, ctx: &AppContext<R>) -> Result<()> {
        let assumption = Assumption::resolve(ctx, self.env, self.profile, self.role);

        println!("Logging in to AWS SSO with profile: {}", assumption.profile);
        aws::sso::login(&ctx.runner, &ctx.settings.aws_command, &assumption.profile).await?;

        assume_and_save(ctx, &assumption).await?;
        Ok(())
    }
}

/// Look up the account behind the profile, assume the role in it and write
/// the credentials file. Nothing is written unless every step succeeds.
async fn assume_and_save<R: CommandRunner>(
    ctx: &AppContext<R>,
    assumption: &Assumption,
) -> Result<PathBuf> {
    let Assumption { env, profile, role } = assumption;
    let aws_command = &ctx.settings.aws_command;

    println!("Getting AWS account ID using profile: {profile}");
    let identity = aws::sts::get_caller_identity(&ctx.runner, aws_command, profile)
        .await
        .with_context(|| {
            format!("Could not look up the AWS identity. Try `cdkrole sso-login --profile {profile}`")
        })?;

    let role_arn = RoleArn::new(&identity.account, role);
    println!("Assuming role: {role_arn}");

    let session_name = aws::sts::session_name(env);
    let credentials =
        aws::sts::assume_role(&ctx.runner, aws_command, profile, &role_arn, &session_name)
            .await
            .context("Failed to assume role")?;

    let path = aws::credentials::save_credentials(&ctx.settings.credentials_dir, env, &credentials)
        .await
        .context("Failed to save AWS credentials")?;

    println!("\nWrote temporary credentials to {}", path.display());
    println!(
        "Credentials will expire at: {}",
        credentials.expiration.to_rfc3339()
    );
    println!("Next: 'ENV={env} direnv reload'");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::fixtures::{ASSUME_ROLE_JSON, IDENTITY_JSON, SECOND_ASSUME_ROLE_JSON};
    use crate::config::{EnvironmentSettings, Settings};
    use crate::process::testing::ScriptedRunner;
    use tempfile::TempDir;

    fn context(runner: ScriptedRunner) -> (TempDir, AppContext<ScriptedRunner>) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            default_profile: "my-sso".to_string(),
            default_role: "PersonalWebsiteDeployer".to_string(),
            credentials_dir: dir.path().join(".aws-creds"),
            ..Settings::default()
        };
        let ctx = AppContext {
            settings,
            config_path: dir.path().join("cdkrole.ini"),
            runner,
        };
        (dir, ctx)
    }

    fn assume(env: &str) -> AssumeRoleCommand {
        AssumeRoleCommand {
            env: Some(env.to_string()),
            profile: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn test_assume_role_writes_credentials() {
        let runner = ScriptedRunner::new()
            .reply_ok(IDENTITY_JSON)
            .reply_ok(ASSUME_ROLE_JSON);
        let (_dir, ctx) = context(runner);

        assume("dev").execute(&ctx).await.unwrap();

        let calls = ctx.runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].args.contains(&"get-caller-identity".to_string()));
        assert!(
            calls[1]
                .args
                .contains(&"arn:aws:iam::123456789012:role/PersonalWebsiteDeployer".to_string())
        );
        assert!(calls[1].args.contains(&"dev-session".to_string()));

        let content =
            std::fs::read_to_string(ctx.settings.credentials_dir.join("dev.sh")).unwrap();
        let exports: Vec<&str> = content.lines().collect();
        assert_eq!(
            exports,
            vec![
                "export AWS_ACCESS_KEY_ID=ASIAEXAMPLE",
                "export AWS_SECRET_ACCESS_KEY=secret/key+value",
                "export AWS_SESSION_TOKEN=token==",
                "export AWS_CREDENTIAL_EXPIRATION=2025-06-01T13:00:00Z",
            ]
        );
        assert!(!content.contains("AssumedRole"));
    }

    #[tokio::test]
    async fn test_assume_role_explicit_arguments_win() {
        let runner = ScriptedRunner::new()
            .reply_ok(IDENTITY_JSON)
            .reply_ok(ASSUME_ROLE_JSON);
        let (_dir, ctx) = context(runner);

        AssumeRoleCommand {
            env: Some("qa".to_string()),
            profile: Some("other-sso".to_string()),
            role: Some("Auditor".to_string()),
        }
        .execute(&ctx)
        .await
        .unwrap();

        let calls = ctx.runner.calls();
        assert!(calls[0].args.contains(&"other-sso".to_string()));
        assert!(
            calls[1]
                .args
                .contains(&"arn:aws:iam::123456789012:role/Auditor".to_string())
        );
        assert!(ctx.settings.credentials_dir.join("qa.sh").exists());
    }

    #[tokio::test]
    async fn test_rerun_overwrites_credentials() {
        let runner = ScriptedRunner::new()
            .reply_ok(IDENTITY_JSON)
            .reply_ok(ASSUME_ROLE_JSON)
            .reply_ok(IDENTITY_JSON)
            .reply_ok(SECOND_ASSUME_ROLE_JSON);
        let (_dir, ctx) = context(runner);

        assume("dev").execute(&ctx).await.unwrap();
        assume("dev").execute(&ctx).await.unwrap();

        let content =
            std::fs::read_to_string(ctx.settings.credentials_dir.join("dev.sh")).unwrap();
        assert!(content.contains("export AWS_ACCESS_KEY_ID=ASIASECOND\n"));
        assert!(!content.contains("ASIAEXAMPLE"));
        assert!(!content.contains("token=="));
    }

    #[tokio::test]
    async fn test_identity_failure_writes_nothing() {
        let runner = ScriptedRunner::new().reply_err(255, "Token has expired");
        let (_dir, ctx) = context(runner);

        let err = assume("dev").execute(&ctx).await.unwrap_err();
        assert!(format!("{err:#}").contains("Token has expired"));
        assert!(err.to_string().contains("sso-login"));

        assert_eq!(ctx.runner.calls().len(), 1);
        assert!(!ctx.settings.credentials_dir.exists());
    }

    #[tokio::test]
    async fn test_identity_failure_keeps_existing_file() {
        let runner = ScriptedRunner::new()
            .reply_ok(IDENTITY_JSON)
            .reply_ok(ASSUME_ROLE_JSON)
            .reply_err(255, "Token has expired");
        let (_dir, ctx) = context(runner);

        assume("dev").execute(&ctx).await.unwrap();
        let path = ctx.settings.credentials_dir.join("dev.sh");
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(assume("dev").execute(&ctx).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_assume_failure_writes_nothing() {
        let runner = ScriptedRunner::new()
            .reply_ok(IDENTITY_JSON)
            .reply_err(254, "An error occurred (AccessDenied)");
        let (_dir, ctx) = context(runner);

        let err = assume("dev").execute(&ctx).await.unwrap_err();
        assert!(format!("{err:#}").contains("AccessDenied"));
        assert!(!ctx.settings.credentials_dir.join("dev.sh").exists());
    }

    #[tokio::test]
    async fn test_renew_uses_environment_settings() {
        let runner = ScriptedRunner::new()
            .reply_ok(IDENTITY_JSON)
            .reply_ok(ASSUME_ROLE_JSON);
        let (_dir, mut ctx) = context(runner);
        ctx.settings.environments.insert(
            "prod".to_string(),
            EnvironmentSettings {
                profile: Some("prod-sso".to_string()),
                role: Some("ProdDeployer".to_string()),
            },
        );

        RenewCommand {
            env: Some("prod".to_string()),
        }
        .execute(&ctx)
        .await
        .unwrap();

        let calls = ctx.runner.calls();
        assert!(calls[0].args.contains(&"prod-sso".to_string()));
        assert!(
            calls[1]
                .args
                .contains(&"arn:aws:iam::123456789012:role/ProdDeployer".to_string())
        );
        assert!(calls[1].args.contains(&"prod-session".to_string()));
        assert!(ctx.settings.credentials_dir.join("prod.sh").exists());
    }

    #[tokio::test]
    async fn test_renew_defaults_to_default_env() {
        let runner = ScriptedRunner::new()
            .reply_ok(IDENTITY_JSON)
            .reply_ok(ASSUME_ROLE_JSON);
        let (_dir, ctx) = context(runner);

        RenewCommand { env: None }.execute(&ctx).await.unwrap();
        assert!(ctx.settings.credentials_dir.join("dev.sh").exists());
    }

    #[tokio::test]
    async fn test_login_runs_sso_login_first() {
        let runner = ScriptedRunner::new()
            .reply_ok("")
            .reply_ok(IDENTITY_JSON)
            .reply_ok(ASSUME_ROLE_JSON);
        let (_dir, ctx) = context(runner);

        LoginCommand {
            env: Some("dev".to_string()),
            profile: None,
            role: None,
        }
        .execute(&ctx)
        .await
        .unwrap();

        let calls = ctx.runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].args, vec!["sso", "login", "--profile", "my-sso"]);
        assert!(!calls[0].capture);
        assert!(ctx.settings.credentials_dir.join("dev.sh").exists());
    }

    #[tokio::test]
    async fn test_login_stops_when_sso_login_fails() {
        let runner = ScriptedRunner::new().reply_err(1, "");
        let (_dir, ctx) = context(runner);

        let result = LoginCommand {
            env: None,
            profile: None,
            role: None,
        }
        .execute(&ctx)
        .await;

        assert!(result.is_err());
        assert_eq!(ctx.runner.calls().len(), 1);
        assert!(!ctx.settings.credentials_dir.exists());
    }
}
