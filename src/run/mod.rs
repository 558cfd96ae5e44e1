//! End-to-end run: inspect, prompt, generate, parse, confirm, execute.
//!
//! Every step completes before the next begins. Nothing mutates the
//! repository until the model's reply has been parsed into a valid
//! [`CommitPlan`] and the user has confirmed it (unless auto-confirm is set).

pub mod confirm;

use std::path::PathBuf;

use tracing::debug;

use crate::commit::{CommitPlan, build_prompt, parse_response};
use crate::config::Configuration;
use crate::error::RunError;
use crate::git::{GitRunner, execute, inspect};
use crate::llm::{GenerationBackend, TokenEstimator, estimate_prompt};

pub use confirm::{Prompter, TerminalPrompter};

/// Flags for a single invocation, built once from the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub suggest_branch: bool,
    pub auto_confirm: bool,
    pub push: bool,
    pub extra_info: Option<String>,
    /// Write the exact prompt here before generating.
    pub prompt_output: Option<PathBuf>,
}

impl RunOptions {
    /// Per-run extra info, if non-empty.
    pub fn extra_info(&self) -> Option<&str> {
        self.extra_info.as_deref().filter(|s| !s.is_empty())
    }
}

/// Confirmation points in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Before the prompt is sent to the backend.
    Generate,
    /// Before git commands run.
    Execute,
}

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The plan was committed (and branched/pushed as requested).
    Completed(CommitPlan),
    /// The user declined at a gate. Not an error.
    Declined(Gate),
}

/// The collaborators a run needs.
pub struct Pipeline<'a> {
    pub git: &'a dyn GitRunner,
    pub backend: &'a dyn GenerationBackend,
    pub estimator: &'a dyn TokenEstimator,
    pub prompter: &'a dyn Prompter,
}

impl Pipeline<'_> {
    /// Run the full pipeline once.
    pub async fn run(
        &self,
        options: &RunOptions,
        config: &Configuration,
    ) -> Result<RunOutcome, RunError> {
        config.require_credential()?;

        // Step 1: repository state (status failure stops here)
        let state = inspect(self.git, &config.ignore_files)?;
        debug!(
            "status: {} bytes, staged diff: {} bytes",
            state.status.len(),
            state.diff.len()
        );

        // Step 2: prompt
        let prompt = build_prompt(&state, options, config);

        if let Some(path) = &options.prompt_output {
            std::fs::write(path, &prompt).map_err(|source| RunError::PromptWrite {
                path: path.clone(),
                source,
            })?;
            println!("Prompt written to {}", path.display());
        }

        println!("{}", estimate_prompt(self.estimator, &config.model, &prompt));

        if !self.confirmed(options, "Generate commit message?") {
            return Ok(RunOutcome::Declined(Gate::Generate));
        }

        // Step 3: generate
        let result = self.backend.generate(&prompt, config).await?;
        if let Some(usage) = result.usage {
            println!("Total tokens: {}", usage.total_tokens);
            println!("Prompt tokens: {}", usage.prompt_tokens);
            println!("Completion tokens: {}", usage.completion_tokens);
        }

        // Step 4: parse
        let plan = parse_response(&result.raw_text, options.suggest_branch)?;

        println!("Generated:");
        if let Some(branch) = &plan.branch_name {
            println!("Branch name: {}", branch);
        }
        println!("Commit message: {}", plan.commit_message);

        if !self.confirmed(options, "Execute git commit and checkout?") {
            return Ok(RunOutcome::Declined(Gate::Execute));
        }

        // Step 5: execute
        execute(self.git, &plan, options.push)?;

        Ok(RunOutcome::Completed(plan))
    }

    fn confirmed(&self, options: &RunOptions, question: &str) -> bool {
        options.auto_confirm || self.prompter.confirm(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, GitStep};
    use crate::git::GitOutput;
    use crate::git::runner::MockGitRunner;
    use crate::llm::GenerationResult;
    use crate::llm::client::MockGenerationBackend;
    use mockall::Sequence;

    struct Answer(bool);

    impl Prompter for Answer {
        fn confirm(&self, _question: &str) -> bool {
            self.0
        }
    }

    struct CharsOnly;

    impl TokenEstimator for CharsOnly {
        fn count_tokens(&self, _model: &str, _text: &str) -> Option<usize> {
            None
        }
    }

    fn ok(stdout: &str) -> std::io::Result<GitOutput> {
        Ok(GitOutput {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    fn config() -> Configuration {
        Configuration {
            api_key: "sk-test".to_string(),
            ..Default::default()
        }
    }

    fn expect_inspection(git: &mut MockGitRunner, seq: &mut Sequence) {
        git.expect_run()
            .withf(|a| a[0] == "status")
            .times(1)
            .in_sequence(seq)
            .returning(|_| ok(" M src/parser.rs\n"));
        git.expect_run()
            .withf(|a| a[0] == "diff")
            .times(1)
            .in_sequence(seq)
            .returning(|_| ok("+if input.is_empty() { return None; }\n"));
    }

    fn reply(text: &str) -> Result<GenerationResult, BackendError> {
        Ok(GenerationResult {
            raw_text: text.to_string(),
            usage: None,
        })
    }

    #[tokio::test]
    async fn test_missing_credential_touches_nothing() {
        let git = MockGitRunner::new();
        let backend = MockGenerationBackend::new();
        let pipeline = Pipeline {
            git: &git,
            backend: &backend,
            estimator: &CharsOnly,
            prompter: &Answer(true),
        };

        let err = pipeline
            .run(&RunOptions::default(), &Configuration::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RunError::Config(crate::error::ConfigError::MissingCredential)
        ));
        assert!(err.to_string().contains("--init"));
    }

    #[tokio::test]
    async fn test_decline_before_generation_skips_backend() {
        let mut git = MockGitRunner::new();
        let mut seq = Sequence::new();
        expect_inspection(&mut git, &mut seq);
        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().never();

        let pipeline = Pipeline {
            git: &git,
            backend: &backend,
            estimator: &CharsOnly,
            prompter: &Answer(false),
        };

        let outcome = pipeline.run(&RunOptions::default(), &config()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Declined(Gate::Generate));
    }

    #[tokio::test]
    async fn test_decline_before_execution_skips_git_mutations() {
        let mut git = MockGitRunner::new();
        let mut seq = Sequence::new();
        expect_inspection(&mut git, &mut seq);

        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_, _| reply(r#"{"commit_message": "fix(parser): handle empty input"}"#));

        // First gate says yes, second says no.
        struct YesThenNo(std::cell::Cell<u8>);
        impl Prompter for YesThenNo {
            fn confirm(&self, _question: &str) -> bool {
                let n = self.0.get();
                self.0.set(n + 1);
                n == 0
            }
        }

        let pipeline = Pipeline {
            git: &git,
            backend: &backend,
            estimator: &CharsOnly,
            prompter: &YesThenNo(std::cell::Cell::new(0)),
        };

        let outcome = pipeline.run(&RunOptions::default(), &config()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Declined(Gate::Execute));
    }

    #[tokio::test]
    async fn test_auto_confirm_commits_without_asking() {
        let mut git = MockGitRunner::new();
        let mut seq = Sequence::new();
        expect_inspection(&mut git, &mut seq);
        git.expect_run()
            .withf(|a| a == ["commit", "-m", "fix(parser): handle empty input"])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok(""));

        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .withf(|prompt, config| prompt.contains("# Context") && config.api_key == "sk-test")
            .times(1)
            .returning(|_, _| reply(r#"{"commit_message": "fix(parser): handle empty input"}"#));

        let pipeline = Pipeline {
            git: &git,
            backend: &backend,
            estimator: &CharsOnly,
            // Would decline if it were ever asked.
            prompter: &Answer(false),
        };

        let options = RunOptions {
            auto_confirm: true,
            ..Default::default()
        };
        let outcome = pipeline.run(&options, &config()).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_backend_error_stops_before_git_mutations() {
        let mut git = MockGitRunner::new();
        let mut seq = Sequence::new();
        expect_inspection(&mut git, &mut seq);

        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().times(1).returning(|_, _| {
            Err(BackendError::RateLimited {
                body: "quota".to_string(),
            })
        });

        let pipeline = Pipeline {
            git: &git,
            backend: &backend,
            estimator: &CharsOnly,
            prompter: &Answer(true),
        };

        let err = pipeline.run(&RunOptions::default(), &config()).await.unwrap_err();
        assert!(matches!(err, RunError::Backend(_)));
    }

    #[tokio::test]
    async fn test_command_error_surfaces_failed_step() {
        let mut git = MockGitRunner::new();
        let mut seq = Sequence::new();
        expect_inspection(&mut git, &mut seq);
        git.expect_run()
            .withf(|a| a[0] == "commit")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(GitOutput {
                    success: false,
                    stdout: "nothing added to commit".to_string(),
                    stderr: String::new(),
                })
            });

        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .returning(|_, _| reply(r#"{"commit_message": "chore: tidy"}"#));

        let pipeline = Pipeline {
            git: &git,
            backend: &backend,
            estimator: &CharsOnly,
            prompter: &Answer(true),
        };

        let options = RunOptions {
            push: true,
            ..Default::default()
        };
        match pipeline.run(&options, &config()).await.unwrap_err() {
            RunError::Command(e) => assert_eq!(e.step, GitStep::Commit),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_prompt_written_to_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("prompt.md");

        let mut git = MockGitRunner::new();
        let mut seq = Sequence::new();
        expect_inspection(&mut git, &mut seq);
        let backend = MockGenerationBackend::new();

        let pipeline = Pipeline {
            git: &git,
            backend: &backend,
            estimator: &CharsOnly,
            prompter: &Answer(false),
        };

        let options = RunOptions {
            prompt_output: Some(out.clone()),
            extra_info: Some("Mention the parser".to_string()),
            ..Default::default()
        };
        pipeline.run(&options, &config()).await.unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("# Task"));
        assert!(written.contains("Mention the parser"));
        assert!(written.contains(" M src/parser.rs"));
    }

    #[test]
    fn test_run_options_extra_info_filters_empty() {
        let mut options = RunOptions::default();
        assert_eq!(options.extra_info(), None);
        options.extra_info = Some(String::new());
        assert_eq!(options.extra_info(), None);
        options.extra_info = Some("x".to_string());
        assert_eq!(options.extra_info(), Some("x"));
    }
}
