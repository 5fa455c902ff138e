use std::{env, path::PathBuf};

/// Config file name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "cdkrole.ini";

/// Environment variable that points at an alternative config file
pub const CONFIG_FILE_ENV: &str = "CDKROLE_CONFIG";

/// INI section holding the defaults shared by every environment
pub const DEFAULTS_SECTION: &str = "defaults";

/// Prefix of the INI sections holding per-environment overrides
pub const ENV_SECTION_PREFIX: &str = "env ";

/// Environment used when none is given
pub const DEFAULT_ENV: &str = "dev";

/// AWS profile used when none is given
pub const DEFAULT_PROFILE: &str = "default";

/// IAM role name assumed when none is given
pub const DEFAULT_ROLE: &str = "Deployer";

/// Directory holding one `<env>.sh` export file per environment
pub const DEFAULT_CREDENTIALS_DIR: &str = ".aws-creds";

/// Directory of the CDK app
pub const DEFAULT_INFRA_DIR: &str = "infra";

/// AWS CLI program
pub const DEFAULT_AWS_COMMAND: &str = "aws";

/// CDK CLI invocation; the first word is the program
pub const DEFAULT_CDK_COMMAND: &str = "npx cdk";

/// Extension of the credential export files
pub const CREDENTIALS_FILE_EXTENSION: &str = "sh";

/// Environment variable the CDK app reads to pick its environment config
pub const CDK_ENV_VAR: &str = "CDK_ENV";

/// Environment variable the AWS CLI and the CDK read to pick a profile
pub const AWS_PROFILE_VAR: &str = "AWS_PROFILE";

/// Get the config file path
/// Respects CDKROLE_CONFIG environment variable if set
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_FILE_ENV) {
        return PathBuf::from(path);
    }

    PathBuf::from(CONFIG_FILE_NAME)
}
