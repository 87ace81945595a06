//! Executes a hook's configured command once its trigger rule matches.

use tokio::process::Command;
use tracing::{error, info};

use crate::error::{HookError, Result};
use crate::hook::Hook;

/// Runs `execute-command matchedValue` inside the hook's working
/// directory and returns the combined stdout and stderr output.
///
/// A failing or unstartable command is logged and reported as an error;
/// it never takes the daemon down.
pub async fn run_hook_command(hook: &Hook, matched_value: &str) -> Result<String> {
    info!(
        "executing {} with argument {:?} using {:?} as cwd",
        hook.execute_command, matched_value, hook.command_working_directory
    );

    let mut command = Command::new(&hook.execute_command);
    command.arg(matched_value);
    if !hook.command_working_directory.is_empty() {
        command.current_dir(&hook.command_working_directory);
    }

    let output = command.output().await.map_err(|e| {
        let msg = format!("{} failed to start: {}", hook.execute_command, e);
        error!("{}", msg);
        HookError::CommandFailed(msg)
    })?;

    // Combined stdout and stderr, in that order; a successful command may
    // still write diagnostics to stderr.
    let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        info!("command output:\n{}", combined);
        info!("finished handling {}", hook.id);
        Ok(combined)
    } else {
        let msg = format!(
            "{} exited with {}: {}",
            hook.execute_command, output.status, combined
        );
        error!("{}", msg);
        Err(HookError::CommandFailed(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::Hook;

    fn hook_running(command: &str) -> Hook {
        Hook {
            id: "test".to_string(),
            execute_command: command.to_string(),
            command_working_directory: String::new(),
            response_message: String::new(),
            trigger_rule: None,
        }
    }

    #[tokio::test]
    async fn matched_value_is_passed_as_single_argument() {
        let output = run_hook_command(&hook_running("echo"), "tags/v10.1-qa")
            .await
            .expect("echo should succeed");
        assert_eq!(output.trim(), "tags/v10.1-qa");
    }

    #[tokio::test]
    async fn missing_command_is_reported_not_panicked() {
        let result =
            run_hook_command(&hook_running("/no/such/command-bithook"), "develop").await;
        match result {
            Err(HookError::CommandFailed(msg)) => {
                // The spawn failure must carry the command name so the
                // misconfiguration is diagnosable from the log line.
                assert!(msg.contains("/no/such/command-bithook"));
                assert!(msg.contains("failed to start"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn stderr_is_captured_alongside_stdout() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let script_path = std::env::temp_dir().join("bithook-test-echo-both.sh");
        {
            let mut script = std::fs::File::create(&script_path).unwrap();
            writeln!(script, "#!/bin/sh\necho out-line\necho err-line 1>&2").unwrap();
        }
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let output = run_hook_command(
            &hook_running(script_path.to_str().unwrap()),
            "develop",
        )
        .await
        .expect("script should succeed");

        assert!(output.contains("out-line"));
        assert!(output.contains("err-line"));
    }

    #[tokio::test]
    async fn failing_command_surfaces_exit_status() {
        let result = run_hook_command(&hook_running("false"), "develop").await;
        assert!(matches!(result, Err(HookError::CommandFailed(_))));
    }
}
