use crate::constants::{
    DEFAULT_AWS_COMMAND, DEFAULT_CDK_COMMAND, DEFAULT_CREDENTIALS_DIR, DEFAULT_ENV,
    DEFAULT_INFRA_DIR, DEFAULT_PROFILE, DEFAULT_ROLE, DEFAULTS_SECTION, ENV_SECTION_PREFIX,
};
use anyhow::{Context, Result};
use dialoguer::{Input, theme::ColorfulTheme};
use ini::{Ini, Properties};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::debug;

/// Profile and role overrides for one environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSettings {
    pub profile: Option<String>,
    pub role: Option<String>,
}

/// Read-only settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub default_env: String,
    pub default_profile: String,
    pub default_role: String,
    pub credentials_dir: PathBuf,
    pub infra_dir: PathBuf,
    pub aws_command: String,
    pub cdk_command: String,
    pub environments: BTreeMap<String, EnvironmentSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_env: DEFAULT_ENV.to_string(),
            default_profile: DEFAULT_PROFILE.to_string(),
            default_role: DEFAULT_ROLE.to_string(),
            credentials_dir: PathBuf::from(DEFAULT_CREDENTIALS_DIR),
            infra_dir: PathBuf::from(DEFAULT_INFRA_DIR),
            aws_command: DEFAULT_AWS_COMMAND.to_string(),
            cdk_command: DEFAULT_CDK_COMMAND.to_string(),
            environments: BTreeMap::new(),
        }
    }
}

impl Settings {
    fn from_ini(ini: &Ini) -> Self {
        let mut settings = Self::default();

        if let Some(section) = ini.section(Some(DEFAULTS_SECTION)) {
            let set = |target: &mut String, key: &str| {
                if let Some(value) = section.get(key) {
                    *target = value.to_string();
                }
            };
            set(&mut settings.default_env, "env");
            set(&mut settings.default_profile, "profile");
            set(&mut settings.default_role, "role");
            set(&mut settings.aws_command, "aws_command");
            set(&mut settings.cdk_command, "cdk_command");

            if let Some(dir) = section.get("credentials_dir") {
                settings.credentials_dir = PathBuf::from(dir);
            }
            if let Some(dir) = section.get("infra_dir") {
                settings.infra_dir = PathBuf::from(dir);
            }
        }

        for (name, section) in ini.iter() {
            let Some(env) = name.and_then(|n| n.strip_prefix(ENV_SECTION_PREFIX)) else {
                continue;
            };
            settings
                .environments
                .insert(env.trim().to_string(), EnvironmentSettings::from_ini_section(section));
        }

        settings
    }

    fn save_to_ini(&self, ini: &mut Ini) {
        ini.with_section(Some(DEFAULTS_SECTION))
            .set("env", &self.default_env)
            .set("profile", &self.default_profile)
            .set("role", &self.default_role)
            .set("credentials_dir", self.credentials_dir.to_string_lossy())
            .set("infra_dir", self.infra_dir.to_string_lossy())
            .set("aws_command", &self.aws_command)
            .set("cdk_command", &self.cdk_command);

        for (env, overrides) in &self.environments {
            overrides.save_to_ini(ini, &env_section_name(env));
        }
    }

    /// Environment to act on when none was given on the command line
    pub fn env_or_default<'a>(&'a self, env: Option<&'a str>) -> &'a str {
        env.unwrap_or(&self.default_env)
    }

    /// Profile for `env`: the environment override, else the default
    pub fn profile_for(&self, env: &str) -> &str {
        self.environments
            .get(env)
            .and_then(|e| e.profile.as_deref())
            .unwrap_or(&self.default_profile)
    }

    /// Role name for `env`: the environment override, else the default
    pub fn role_for(&self, env: &str) -> &str {
        self.environments
            .get(env)
            .and_then(|e| e.role.as_deref())
            .unwrap_or(&self.default_role)
    }
}

impl EnvironmentSettings {
    fn from_ini_section(section: &Properties) -> Self {
        Self {
            profile: section.get("profile").map(String::from),
            role: section.get("role").map(String::from),
        }
    }

    fn save_to_ini(&self, ini: &mut Ini, section_name: &str) {
        for (key, value) in [("profile", &self.profile), ("role", &self.role)] {
            match value {
                Some(value) => {
                    ini.with_section(Some(section_name)).set(key, value);
                }
                None => {
                    ini.delete_from(Some(section_name), key);
                }
            }
        }
    }
}

fn env_section_name(env: &str) -> String {
    format!("{ENV_SECTION_PREFIX}{env}")
}

/// Load settings from `path`; a missing file yields the built-in defaults.
pub async fn load(path: &Path) -> Result<Settings> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let ini = Ini::load_from_file(path)
        .with_context(|| format!("Failed to load config file {}", path.display()))?;
    debug!("Loaded config from {}", path.display());

    Ok(Settings::from_ini(&ini))
}

/// Write `settings` to `path`, keeping any sections this tool doesn't own.
pub async fn save(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut ini = if path.exists() {
        Ini::load_from_file(path).unwrap_or_else(|_| Ini::new())
    } else {
        Ini::new()
    };

    settings.save_to_ini(&mut ini);

    ini.write_to_file(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Prompt for settings and save them to `path`.
///
/// Without `env` the shared defaults are edited, otherwise the profile and
/// role overrides of that environment.
pub async fn configure_interactive(path: &Path, env: Option<&str>) -> Result<()> {
    let mut settings = load(path).await?;

    println!("Configuring cdkrole in {}", path.display());
    println!("Press Enter to keep current values, or type new values.");
    println!();

    let theme = ColorfulTheme::default();

    match env {
        Some(env) => {
            let profile = Input::<String>::with_theme(&theme)
                .with_prompt(format!("AWS profile for {env}"))
                .default(settings.profile_for(env).to_string())
                .interact_text()
                .context("Failed to read AWS profile")?;

            let role = Input::<String>::with_theme(&theme)
                .with_prompt(format!("IAM role name for {env}"))
                .default(settings.role_for(env).to_string())
                .interact_text()
                .context("Failed to read IAM role name")?;

            let overrides = EnvironmentSettings {
                profile: (profile != settings.default_profile).then_some(profile),
                role: (role != settings.default_role).then_some(role),
            };
            settings.environments.insert(env.to_string(), overrides);
        }
        None => {
            let prompt = |label: &str, current: String| {
                Input::<String>::with_theme(&theme)
                    .with_prompt(label)
                    .default(current)
                    .interact_text()
                    .with_context(|| format!("Failed to read {label}"))
            };

            settings.default_env = prompt("Default environment", settings.default_env)?;
            settings.default_profile = prompt("Default AWS profile", settings.default_profile)?;
            settings.default_role = prompt("Default IAM role name", settings.default_role)?;
            settings.credentials_dir = prompt(
                "Credentials directory",
                settings.credentials_dir.to_string_lossy().into_owned(),
            )?
            .into();
            settings.infra_dir = prompt(
                "CDK app directory",
                settings.infra_dir.to_string_lossy().into_owned(),
            )?
            .into();
            settings.aws_command = prompt("AWS CLI command", settings.aws_command)?;
            settings.cdk_command = prompt("CDK CLI command", settings.cdk_command)?;
        }
    }

    save(path, &settings).await?;

    println!("\nConfiguration saved successfully.");
    Ok(())
}
