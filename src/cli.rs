use crate::config::Config;
use crate::pipeline::guard::StatementPolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Message to answer once; without it the HTTP server is started
    pub message: Option<String>,

    /// Caller identity attached to the one-shot message
    #[arg(short, long, default_value = "")]
    pub user_id: String,

    /// Configuration file (default: ~/.crystal-chat/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Log filter, e.g. `info` or `crystal_chat=debug`
    #[arg(short, long)]
    pub log: Option<String>,

    /// How generated statements are checked before execution
    #[arg(short, long, value_enum)]
    pub policy: Option<StatementPolicy>,
}

impl Args {
    /// Flags take precedence over the file and the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(level) = &self.log {
            config.log.level = level.clone();
        }
        if let Some(policy) = self.policy {
            config.statement_policy = policy;
        }
    }
}
