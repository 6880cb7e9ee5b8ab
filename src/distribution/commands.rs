//! Sequential execution of configured packaging commands.
//!
//! The command list is a `|`-delimited string. Each command is split at its
//! first space into an executable and an argument string, so executable paths
//! containing spaces are not supported. On Windows the argument string is
//! handed to the process untouched; elsewhere it is tokenised with
//! shell-style quoting, with backslashes kept literal so Windows-style paths
//! survive.
//!
//! Commands run one at a time; the next starts only after the previous one
//! has exited. In lenient mode (the default) a non-zero exit status is logged
//! and the sequence continues; in strict mode it stops the sequence.

use crate::distribution::error::{Error, Result};
use std::{
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};

/// Separator between commands in the configured list.
pub const COMMAND_SEPARATOR: char = '|';

/// Suppresses the console window of spawned processes on Windows.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// One configured command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: String,
    executable: String,
    argument_string: String,
    arguments: Vec<String>,
}

impl Command {
    /// Parses `executable arguments...`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedCommand`] if there is no space after the executable,
    /// [`Error::CommandArguments`] if quoting in the arguments is unbalanced.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let Some((executable, arguments)) = text.split_once(' ') else {
            return Err(Error::MalformedCommand(text.to_string()));
        };

        let argument_string = arguments.to_string();
        let arguments = shell_words::split(&literal_backslashes(arguments)).map_err(|e| {
            Error::CommandArguments {
                command: text.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            text: text.to_string(),
            executable: executable.to_string(),
            argument_string,
            arguments,
        })
    }

    /// Command as configured.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Executable name or path.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Argument string as configured, after the executable.
    pub fn argument_string(&self) -> &str {
        &self.argument_string
    }

    /// Tokenised arguments.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// Doubles backslashes outside single quotes so the tokeniser keeps them.
fn literal_backslashes(arguments: &str) -> String {
    let mut escaped = String::with_capacity(arguments.len());
    let (mut single, mut double) = (false, false);
    for c in arguments.chars() {
        match c {
            '\'' if !double => single = !single,
            '"' if !single => double = !double,
            '\\' if !single => escaped.push('\\'),
            _ => {}
        }
        escaped.push(c);
    }
    escaped
}

/// Splits a command list, dropping empty segments.
pub fn parse_commands(list: &str) -> Result<Vec<Command>> {
    list.split(COMMAND_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
        .map(Command::parse)
        .collect()
}

/// Exit status of one executed command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Command as configured
    pub command: String,
    /// Exit status reported by the OS
    pub status: ExitStatus,
}

impl CommandOutcome {
    /// Whether the command exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Runs commands from a working directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    working_dir: PathBuf,
    strict: bool,
}

impl CommandRunner {
    /// Creates a lenient runner that spawns commands in `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            strict: false,
        }
    }

    /// Stops the sequence at the first unsuccessful command when `strict` is set.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Directory commands are spawned in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Parses and runs a `|`-delimited command list in order.
    ///
    /// Every command is parsed before the first one starts, so a malformed
    /// entry anywhere in the list is reported without running any of them,
    /// including the valid commands ahead of it.
    pub async fn run_all(&self, list: &str) -> Result<Vec<CommandOutcome>> {
        let commands = parse_commands(list)?;
        let mut outcomes = Vec::with_capacity(commands.len());

        for command in &commands {
            let outcome = self.run(command).await?;
            if !outcome.success() {
                if self.strict {
                    return Err(Error::CommandStatus {
                        command: outcome.command,
                        code: outcome.status.code(),
                    });
                }
                log::warn!(
                    "Command `{}` exited with {}; continuing",
                    outcome.command,
                    outcome.status
                );
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Runs one command and waits for it to exit.
    pub async fn run(&self, command: &Command) -> Result<CommandOutcome> {
        log::info!("Executing command `{}`", command.text());

        let program = which::which_in(
            command.executable(),
            std::env::var_os("PATH"),
            &self.working_dir,
        )
        .map_err(|e| Error::CommandNotFound {
            executable: command.executable().to_string(),
            reason: e.to_string(),
        })?;
        log::debug!("Resolved {} to {}", command.executable(), program.display());

        let mut process = std::process::Command::new(&program);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            process
                .raw_arg(command.argument_string())
                .creation_flags(CREATE_NO_WINDOW);
        }
        #[cfg(not(windows))]
        process.args(command.arguments());
        process
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = tokio::process::Command::from(process)
            .status()
            .await.map_err(|error| Error::CommandFailed {
            command: command.text().to_string(),
            error,
        })?;

        Ok(CommandOutcome {
            command: command.text().to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_space_and_tokenises_arguments() {
        let command = Command::parse("nuget pack \"My App.nuspec\" -OutputDirectory out").unwrap();
        assert_eq!(command.executable(), "nuget");
        assert_eq!(
            command.arguments(),
            ["pack", "My App.nuspec", "-OutputDirectory", "out"]
        );
    }

    #[test]
    fn backslashes_in_arguments_are_kept() {
        let text = r"signtool sign /f C:\certs\key.pfx bin\Release\Acme.1.0.0.nupkg";
        let command = Command::parse(text).unwrap();
        assert_eq!(
            command.argument_string(),
            r"sign /f C:\certs\key.pfx bin\Release\Acme.1.0.0.nupkg"
        );
        assert_eq!(
            command.arguments(),
            ["sign", "/f", r"C:\certs\key.pfx", r"bin\Release\Acme.1.0.0.nupkg"]
        );
    }

    #[test]
    fn quoted_windows_paths_keep_backslashes() {
        let command =
            Command::parse(r#"nuget pack "C:\Program Files\Acme\Acme.nuspec" 'a\b'"#).unwrap();
        assert_eq!(
            command.arguments(),
            ["pack", r"C:\Program Files\Acme\Acme.nuspec", r"a\b"]
        );
    }

    #[test]
    fn command_without_space_is_malformed() {
        let err = Command::parse("make").unwrap_err();
        assert!(matches!(err, Error::MalformedCommand(ref c) if c == "make"));
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let err = Command::parse("sign \"unterminated").unwrap_err();
        assert!(matches!(err, Error::CommandArguments { .. }));
    }

    #[test]
    fn list_drops_empty_segments() {
        let commands = parse_commands("a 1||  |b 2|").unwrap();
        let texts: Vec<_> = commands.iter().map(Command::text).collect();
        assert_eq!(texts, ["a 1", "b 2"]);
    }

    #[tokio::test]
    async fn malformed_entry_prevents_any_run() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let list = format!("sh -c 'touch {}'|broken", marker.display());

        let err = CommandRunner::new(dir.path()).run_all(&list).await.unwrap_err();

        assert!(matches!(err, Error::MalformedCommand(_)));
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn unknown_executable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandRunner::new(dir.path())
            .run_all("definitely-not-a-real-tool-6f1c --help")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_sequentially_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let list = "sh -c 'sleep 0.2; echo first >> order.log'|sh -c 'echo second >> order.log'";

        let outcomes = CommandRunner::new(dir.path()).run_all(list).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(CommandOutcome::success));
        let log = std::fs::read_to_string(dir.path().join("order.log")).unwrap();
        assert_eq!(log, "first\nsecond\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn lenient_mode_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let list = "sh -c 'exit 3'|sh -c 'touch after'";

        let outcomes = CommandRunner::new(dir.path()).run_all(list).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status.code(), Some(3));
        assert!(outcomes[1].success());
        assert!(dir.path().join("after").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn strict_mode_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let list = "sh -c 'exit 3'|sh -c 'touch after'";

        let err = CommandRunner::new(dir.path())
            .strict(true)
            .run_all(list)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::CommandStatus { code: Some(3), .. }));
        assert!(!dir.path().join("after").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn relative_executable_resolves_against_working_dir() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("pack.sh");
        std::fs::write(&script, "#!/bin/sh\necho \"$1\" > packed.txt\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        CommandRunner::new(dir.path())
            .run_all("./pack.sh Acme.Tools")
            .await
            .unwrap();

        let packed = std::fs::read_to_string(dir.path().join("packed.txt")).unwrap();
        assert_eq!(packed, "Acme.Tools\n");
    }
}
