//! External process execution.
//!
//! Every capability this tool offers is delegated to the AWS CLI or the CDK
//! CLI. A [`CommandSpec`] describes one invocation and a [`CommandRunner`]
//! executes it, returning the exit code together with any captured output.

use anyhow::{Context, Result};
use std::{fmt, future::Future, path::PathBuf, process::Stdio};
use tokio::process::Command;
use tracing::debug;

/// One invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub current_dir: Option<PathBuf>,
    /// Pipe stdout/stderr back to the caller instead of inheriting the terminal
    pub capture: bool,
}

impl CommandSpec {
    /// Build a captured invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
            capture: true,
        }
    }

    /// Build an invocation from a whitespace separated command line such as
    /// `npx cdk`, where the first word is the program.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut words = command_line.split_whitespace();
        let program = words
            .next()
            .with_context(|| format!("Empty command line: {command_line:?}"))?;
        Ok(Self::new(program).args(words))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Let the child share the terminal, e.g. for the SSO browser prompt.
    pub fn interactive(mut self) -> Self {
        self.capture = false;
        self
    }

    /// Value of an environment variable set on this invocation
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{key}={value} ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        if let Some(dir) = &self.current_dir {
            write!(f, " (in {})", dir.display())?;
        }
        Ok(())
    }
}

/// Result of a finished process.
///
/// `stdout` and `stderr` are empty for interactive invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable failure detail: stderr when present, otherwise the
    /// exit status.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Executes [`CommandSpec`]s.
pub trait CommandRunner {
    /// Run the command to completion.
    ///
    /// Returns `Err` only when the process could not be started; a non-zero
    /// exit is reported through [`ProcessOutput::code`].
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = Result<ProcessOutput>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput> {
        debug!("Running: {}", spec);

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).kill_on_drop(true);
        for (key, value) in &spec.envs {
            command.env(key, value);
        }
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let output = if spec.capture {
            let output = command
                .stdin(Stdio::null())
                .output()
                .await
                .with_context(|| format!("Failed to run `{}`. Is it installed?", spec.program))?;
            ProcessOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        } else {
            let status = command
                .status()
                .await
                .with_context(|| format!("Failed to run `{}`. Is it installed?", spec.program))?;
            ProcessOutput {
                code: status.code(),
                ..ProcessOutput::default()
            }
        };

        debug!("`{}` exited with {:?}", spec.program, output.code);
        Ok(output)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_line_splits_program() {
        let spec = CommandSpec::from_command_line("npx cdk").unwrap();
        assert_eq!(spec.program, "npx");
        assert_eq!(spec.args, vec!["cdk"]);
        assert!(spec.capture);
    }

    #[test]
    fn test_from_command_line_rejects_empty() {
        assert!(CommandSpec::from_command_line("   ").is_err());
    }

    #[test]
    fn test_display() {
        let spec = CommandSpec::new("aws")
            .args(["sts", "get-caller-identity"])
            .arg("my profile")
            .env("AWS_PROFILE", "dev")
            .current_dir("infra");
        assert_eq!(
            spec.to_string(),
            "AWS_PROFILE=dev aws sts get-caller-identity \"my profile\" (in infra)"
        );
    }

    #[test]
    fn test_env_value_last_wins() {
        let spec = CommandSpec::new("cdk").env("A", "1").env("A", "2");
        assert_eq!(spec.env_value("A"), Some("2"));
        assert_eq!(spec.env_value("B"), None);
    }

    #[test]
    fn test_failure_detail() {
        let output = ProcessOutput {
            code: Some(255),
            stdout: String::new(),
            stderr: "  The SSO session has expired\n".to_string(),
        };
        assert!(!output.success());
        assert_eq!(output.failure_detail(), "The SSO session has expired");

        let output = ProcessOutput {
            code: Some(2),
            ..ProcessOutput::default()
        };
        assert_eq!(output.failure_detail(), "exit code 2");

        let output = ProcessOutput::default();
        assert_eq!(output.failure_detail(), "terminated by signal");
    }

    #[tokio::test]
    async fn test_system_runner_missing_program() {
        let spec = CommandSpec::new("cdkrole-definitely-not-a-real-program");
        let err = SystemRunner.run(&spec).await.unwrap_err();
        assert!(err.to_string().contains("Is it installed?"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_output() {
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = SystemRunner.run(&spec).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_scopes_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let before = std::env::current_dir().unwrap();

        let spec = CommandSpec::new("pwd").current_dir(dir.path());
        let output = SystemRunner.run(&spec).await.unwrap();

        assert!(output.success());
        let reported = PathBuf::from(output.stdout.trim()).canonicalize().unwrap();
        assert_eq!(reported, dir.path().canonicalize().unwrap());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
