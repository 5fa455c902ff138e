use anyhow::{Context, Result};
use chrono::SecondsFormat;
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::info;

use super::Credentials;
use crate::constants::CREDENTIALS_FILE_EXTENSION;

/// Get the export file path for `env` inside `credentials_dir`
pub fn credentials_path(credentials_dir: &Path, env: &str) -> PathBuf {
    credentials_dir.join(format!("{env}.{CREDENTIALS_FILE_EXTENSION}"))
}

/// Render credentials as shell `export` statements
pub fn render_exports(creds: &Credentials) -> String {
    let expiration = creds
        .expiration
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    format!(
        "export AWS_ACCESS_KEY_ID={}\n\
         export AWS_SECRET_ACCESS_KEY={}\n\
         export AWS_SESSION_TOKEN={}\n\
         export AWS_CREDENTIAL_EXPIRATION={}\n",
        creds.access_key_id, creds.secret_access_key, creds.session_token, expiration
    )
}

/// Save credentials to `<credentials_dir>/<env>.sh`, replacing whatever the
/// file held before.
///
/// The content is written to a temporary file in the same directory and then
/// renamed over the target, so readers see either the previous file or the
/// complete new one. The file is readable by the owner only.
pub async fn save_credentials(
    credentials_dir: &Path,
    env: &str,
    creds: &Credentials,
) -> Result<PathBuf> {
    fs::create_dir_all(credentials_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", credentials_dir.display()))?;

    let path = credentials_path(credentials_dir, env);

    // NamedTempFile is created with mode 0600 on Unix
    let mut file = tempfile::Builder::new()
        .prefix(&format!(".{env}."))
        .suffix(".tmp")
        .tempfile_in(credentials_dir)
        .with_context(|| {
            format!(
                "Failed to create temporary file in {}",
                credentials_dir.display()
            )
        })?;

    file.write_all(render_exports(creds).as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .context("Failed to write credentials file")?;

    file.persist(&path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write credentials to {}", path.display()))?;

    info!("Credentials for {} saved to {}", env, path.display());
    Ok(path)
}
