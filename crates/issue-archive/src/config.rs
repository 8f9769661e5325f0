use crate::cli::{Cli, CommentScopeArg, OnErrorArg};
use anyhow::{anyhow, Result};
use archive_core::{ArchiveOptions, RenderOptions};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "issue-archive";

/// Runtime configuration, layered from defaults, config files, environment and CLI
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// GitHub API token (usually from GH_TOKEN)
    pub token: Option<String>,
    pub api_url: String,
    pub output_dir: PathBuf,
    pub per_page: usize,
    pub asset_timeout_secs: u64,
    pub html: bool,
    pub text: bool,
    pub comment_scope: CommentScopeArg,
    pub on_error: OnErrorArg,
    pub include_pull_requests: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            output_dir: PathBuf::from("output"),
            per_page: 100,
            asset_timeout_secs: 5,
            html: true,
            text: false,
            comment_scope: CommentScopeArg::PerIssue,
            on_error: OnErrorArg::Abort,
            include_pull_requests: false,
        }
    }
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let figment = Self::file_layers(config_path.as_deref())?
            .merge(Env::prefixed("ISSUE_ARCHIVE_"))
            .merge(Env::raw().only(&["GH_TOKEN"]).map(|_| "token".into()));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    /// Defaults overlaid with whichever config files exist
    fn file_layers(explicit_path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        Ok(figment)
    }

    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if cli.no_html {
            self.html = false;
        }
        if cli.text {
            self.text = true;
        }
        if let Some(scope) = cli.comment_scope {
            self.comment_scope = scope;
        }
        if let Some(policy) = cli.on_error {
            self.on_error = policy;
        }
        if cli.include_pull_requests {
            self.include_pull_requests = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(anyhow!("must supply GH_TOKEN environment variable"));
        }
        if self.asset_timeout_secs == 0 {
            return Err(anyhow!("asset_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    pub fn asset_timeout(&self) -> Duration {
        Duration::from_secs(self.asset_timeout_secs)
    }

    /// Directory the archive for `owner/repo` is written to
    pub fn repo_output_dir(&self, owner: &str, repo: &str) -> PathBuf {
        self.output_dir.join(owner).join(repo)
    }

    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            comment_scope: self.comment_scope.into(),
            per_page: self.per_page,
            include_pull_requests: self.include_pull_requests,
            render: RenderOptions {
                html: self.html,
                text: self.text,
            },
            on_error: self.on_error.into(),
        }
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join(APP_NAME).join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join(APP_NAME)
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(format!("{}.toml", APP_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_core::{CommentScope, FailurePolicy};
    use clap::Parser;

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.toml");
        std::fs::write(
            &path,
            "output_dir = \"/tmp/archive\"\nhtml = false\ncomment_scope = \"global\"\non_error = \"skip\"\n",
        )
        .unwrap();

        let config: Config = Config::file_layers(Some(&path)).unwrap().extract().unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/archive"));
        assert!(!config.html);
        assert_eq!(config.comment_scope, CommentScopeArg::Global);
        assert_eq!(config.on_error, OnErrorArg::Skip);
        assert_eq!(config.per_page, 100);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::file_layers(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn cli_flags_win() {
        let mut config = Config::default();
        let cli = Cli::parse_from([
            "issue-archive",
            "acme",
            "widgets",
            "--output-dir",
            "elsewhere",
            "--text",
            "--on-error",
            "skip",
        ]);
        config.merge_with_cli(&cli);

        assert_eq!(config.repo_output_dir("acme", "widgets"), PathBuf::from("elsewhere/acme/widgets"));
        let options = config.archive_options();
        assert!(options.render.text);
        assert!(options.render.html);
        assert_eq!(options.on_error, FailurePolicy::Skip);
        assert_eq!(options.comment_scope, CommentScope::PerIssue);
    }

    #[test]
    fn validate_requires_token() {
        let mut config = Config::default();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "must supply GH_TOKEN environment variable");

        config.token = Some("ghp_x".to_string());
        assert!(config.validate().is_ok());
    }
}
