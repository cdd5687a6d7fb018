//! Command-mode evaluation.

use std::path::Path;

use crate::error::ExecError;
use crate::ports::shell::{CommandExecutor, ShellOutput};
use crate::spec::TestCase;

use super::json::{check_golden, JsonSubject};
use super::outcome::{SkipReason, TestOutcome};
use super::first_missing;

/// Runs `test.command` in `working_dir` and checks its result.
///
/// Golden paths are resolved against `challenge_dir`.
pub async fn evaluate_command(
    shell: &dyn CommandExecutor,
    test: &TestCase,
    working_dir: &Path,
    challenge_dir: &Path,
) -> TestOutcome {
    if test.optional {
        return TestOutcome::skipped(&test.name, SkipReason::Optional);
    }
    let Some(command) = test.command.as_deref() else {
        return TestOutcome::failed(&test.name, "Test has no command");
    };

    let timeout = test.command_timeout();
    let output = match shell.run(command, working_dir, timeout).await {
        Ok(output) => output,
        Err(ExecError::CommandTimeout { .. }) => {
            return TestOutcome::failed(&test.name, format!("Timeout after {}s", timeout.as_secs_f64()));
        }
        Err(e) => return TestOutcome::failed(&test.name, e.to_string()),
    };

    match check_output(test, &output, challenge_dir) {
        Ok(()) => TestOutcome::passed(&test.name),
        Err(reason) => TestOutcome::failed(&test.name, reason),
    }
}

fn check_output(test: &TestCase, output: &ShellOutput, challenge_dir: &Path) -> Result<(), String> {
    if output.exit_code != test.expect_exit_code {
        return Err(format!("Exit code {}, expected {}", output.exit_code, test.expect_exit_code));
    }
    if let Some(missing) = first_missing(&output.stdout, &test.expect_stdout_contains) {
        return Err(format!("Output missing: '{missing}'"));
    }
    if let Some(golden) = &test.expect_stdout_json_matches {
        check_golden(challenge_dir, golden, &output.stdout, JsonSubject::Stdout)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::ports::shell::ShellFuture;

    /// Returns one canned result and counts invocations.
    struct ScriptedShell {
        exit_code: i32,
        stdout: &'static str,
        timeout: bool,
        calls: AtomicUsize,
    }

    impl ScriptedShell {
        fn ok(exit_code: i32, stdout: &'static str) -> Self {
            Self { exit_code, stdout, timeout: false, calls: AtomicUsize::new(0) }
        }

        fn timing_out() -> Self {
            Self { exit_code: 0, stdout: "", timeout: true, calls: AtomicUsize::new(0) }
        }
    }

    impl CommandExecutor for ScriptedShell {
        fn run<'a>(&'a self, command: &'a str, _: &'a Path, timeout: Duration) -> ShellFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.timeout {
                Err(ExecError::CommandTimeout { command: command.to_string(), timeout })
            } else {
                Ok(ShellOutput {
                    exit_code: self.exit_code,
                    stdout: self.stdout.to_string(),
                    stderr: String::new(),
                })
            };
            Box::pin(async move { result })
        }
    }

    fn case(command: &str) -> TestCase {
        TestCase { name: "case".into(), command: Some(command.into()), ..TestCase::default() }
    }

    fn dirs() -> std::path::PathBuf {
        std::env::temp_dir()
    }

    #[tokio::test]
    async fn passes_on_expected_exit_and_output() {
        let shell = ScriptedShell::ok(0, "hello world\n");
        let test = TestCase { expect_stdout_contains: vec!["hello".into()], ..case("echo hello") };

        let outcome = evaluate_command(&shell, &test, &dirs(), &dirs()).await;
        assert_eq!(outcome, TestOutcome::passed("case"));
    }

    #[tokio::test]
    async fn exit_code_mismatch_wins_over_later_checks() {
        let shell = ScriptedShell::ok(2, "");
        let test = TestCase { expect_stdout_contains: vec!["hello".into()], ..case("false") };

        let outcome = evaluate_command(&shell, &test, &dirs(), &dirs()).await;
        assert_eq!(outcome.error.as_deref(), Some("Exit code 2, expected 0"));
    }

    #[tokio::test]
    async fn expected_nonzero_exit_passes() {
        let shell = ScriptedShell::ok(3, "usage");
        let test = TestCase { expect_exit_code: 3, ..case("tool --bad") };

        assert!(evaluate_command(&shell, &test, &dirs(), &dirs()).await.passed);
    }

    #[tokio::test]
    async fn reports_first_missing_substring() {
        let shell = ScriptedShell::ok(0, "alpha gamma");
        let test = TestCase {
            expect_stdout_contains: vec!["alpha".into(), "beta".into(), "delta".into()],
            ..case("list")
        };

        let outcome = evaluate_command(&shell, &test, &dirs(), &dirs()).await;
        assert_eq!(outcome.error.as_deref(), Some("Output missing: 'beta'"));
    }

    #[tokio::test]
    async fn missing_golden_file_fails_not_skips() {
        let shell = ScriptedShell::ok(0, "{}");
        let test = TestCase {
            expect_stdout_json_matches: Some("golden/absent.json".into()),
            ..case("report --json")
        };
        let challenge = dirs().join("vouch_cmd_no_golden");

        let outcome = evaluate_command(&shell, &test, &dirs(), &challenge).await;
        assert!(!outcome.passed && !outcome.skipped);
        assert_eq!(
            outcome.error,
            Some(format!("Golden file not found: {}", challenge.join("golden/absent.json").display()))
        );
    }

    #[tokio::test]
    async fn timeout_is_reported_with_bound() {
        let shell = ScriptedShell::timing_out();
        let test = TestCase { timeout: Some(4.0), ..case("sleep 100") };

        let outcome = evaluate_command(&shell, &test, &dirs(), &dirs()).await;
        assert_eq!(outcome.error.as_deref(), Some("Timeout after 4s"));

        let test = TestCase { timeout: Some(0.5), ..case("sleep 100") };
        let outcome = evaluate_command(&shell, &test, &dirs(), &dirs()).await;
        assert_eq!(outcome.error.as_deref(), Some("Timeout after 0.5s"));
    }

    #[tokio::test]
    async fn optional_test_never_runs() {
        let shell = ScriptedShell::ok(0, "");
        let test = TestCase { optional: true, ..case("rm -rf /") };

        let outcome = evaluate_command(&shell, &test, &dirs(), &dirs()).await;
        assert_eq!(outcome, TestOutcome::skipped("case", SkipReason::Optional));
        assert_eq!(shell.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_without_command_fails() {
        let shell = ScriptedShell::ok(0, "");
        let test = TestCase { name: "empty".into(), ..TestCase::default() };

        let outcome = evaluate_command(&shell, &test, &dirs(), &dirs()).await;
        assert_eq!(outcome.error.as_deref(), Some("Test has no command"));
        assert_eq!(shell.calls.load(Ordering::SeqCst), 0);
    }
}
