use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "issue-archive",
    version,
    about = "Archive a GitHub repository's issues to markdown and HTML"
)]
pub struct Cli {
    /// Repository owner (user or organisation)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Path to a TOML config file
    #[arg(long, env = "ISSUE_ARCHIVE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root directory for archived output (files go under <DIR>/<owner>/<repo>)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Skip writing issue_<n>.html
    #[arg(long)]
    pub no_html: bool,

    /// Also write issue_<n>.txt
    #[arg(long)]
    pub text: bool,

    /// How comments are listed
    #[arg(long, value_enum)]
    pub comment_scope: Option<CommentScopeArg>,

    /// What to do when an asset or issue fails
    #[arg(long, value_enum)]
    pub on_error: Option<OnErrorArg>,

    /// Archive pull requests alongside issues
    #[arg(long)]
    pub include_pull_requests: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentScopeArg {
    /// One comment listing per issue (never truncated)
    #[value(name = "per-issue")]
    PerIssue,
    /// One repository-wide comment listing
    Global,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnErrorArg {
    /// Stop at the first failure
    Abort,
    /// Log failures and keep going
    Skip,
}

impl From<CommentScopeArg> for archive_core::CommentScope {
    fn from(arg: CommentScopeArg) -> Self {
        match arg {
            CommentScopeArg::PerIssue => archive_core::CommentScope::PerIssue,
            CommentScopeArg::Global => archive_core::CommentScope::Global,
        }
    }
}

impl From<OnErrorArg> for archive_core::FailurePolicy {
    fn from(arg: OnErrorArg) -> Self {
        match arg {
            OnErrorArg::Abort => archive_core::FailurePolicy::Abort,
            OnErrorArg::Skip => archive_core::FailurePolicy::Skip,
        }
    }
}
