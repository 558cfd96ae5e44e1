//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Repository, Signature};

use cmmt::config::Configuration;
use cmmt::error::BackendError;
use cmmt::git::{GitOutput, GitRunner};
use cmmt::llm::{GenerationBackend, GenerationResult, TokenEstimator};
use cmmt::run::Prompter;

/// A git runner that records every invocation and answers from a script.
pub struct RecordingGit {
    calls: RefCell<Vec<Vec<String>>>,
    respond: Box<dyn Fn(&[String]) -> GitOutput>,
}

impl RecordingGit {
    /// Every command succeeds; `status` and `diff` return the given text.
    pub fn repository(status: &str, diff: &str) -> Self {
        let status = status.to_string();
        let diff = diff.to_string();
        Self::scripted(move |args| match args.first().map(String::as_str) {
            Some("status") => success(&status),
            Some("diff") => success(&diff),
            _ => success(""),
        })
    }

    /// Every command fails as it would outside a repository.
    pub fn outside_repository() -> Self {
        Self::scripted(|_| GitOutput {
            success: false,
            stdout: String::new(),
            stderr: "fatal: not a git repository (or any of the parent directories): .git"
                .to_string(),
        })
    }

    pub fn scripted(respond: impl Fn(&[String]) -> GitOutput + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// All invocations so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Invocations whose subcommand is not a read-only query.
    pub fn mutations(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c.first().map(String::as_str), Some("status" | "diff")))
            .collect()
    }
}

impl GitRunner for RecordingGit {
    fn run(&self, args: &[String]) -> std::io::Result<GitOutput> {
        self.calls.borrow_mut().push(args.to_vec());
        Ok((self.respond)(args))
    }
}

pub fn success(stdout: &str) -> GitOutput {
    GitOutput {
        success: true,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// A generation backend that returns one canned reply and counts calls.
pub struct ScriptedBackend {
    reply: Mutex<Option<Result<GenerationResult, BackendError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn replying(text: &str) -> Self {
        Self::with(Ok(GenerationResult {
            raw_text: text.to_string(),
            usage: None,
        }))
    }

    pub fn failing(error: BackendError) -> Self {
        Self::with(Err(error))
    }

    fn with(reply: Result<GenerationResult, BackendError>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        prompt: &str,
        _config: &Configuration,
    ) -> Result<GenerationResult, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .lock()
            .unwrap()
            .take()
            .expect("backend called more than once")
    }
}

/// Confirmation that always gives the same answer.
pub struct FixedAnswer(pub bool);

impl Prompter for FixedAnswer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}

/// Estimator that knows no models, so output is deterministic.
pub struct CharCount;

impl TokenEstimator for CharCount {
    fn count_tokens(&self, _model: &str, _text: &str) -> Option<usize> {
        None
    }
}

/// Configuration with a credential set.
pub fn test_config() -> Configuration {
    Configuration {
        api_key: "sk-test".to_string(),
        ..Default::default()
    }
}

/// A scratch git repository with an identity configured.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new repository with one initial commit.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();

        let test_repo = Self { dir, repo };
        test_repo.write("README.md", "# scratch\n");
        test_repo.stage("README.md");
        test_repo.commit_index("init");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).expect("Failed to write file");
    }

    /// Add a file to the index.
    pub fn stage(&self, name: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    fn commit_index(&self, message: &str) {
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let mut index = self.repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit");
    }

    /// Message of the commit HEAD points to.
    pub fn head_message(&self) -> String {
        self.repo
            .head()
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .message()
            .unwrap_or_default()
            .to_string()
    }

    /// Short name of the checked-out branch.
    pub fn current_branch(&self) -> String {
        self.repo
            .head()
            .unwrap()
            .shorthand()
            .unwrap_or_default()
            .to_string()
    }
}
