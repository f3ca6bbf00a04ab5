use crate::cli::Args;
use crate::config::Config;
use crate::core::error::Result;
use crate::core::executor::PgGateway;
use crate::display;
use crate::pipeline::formatter::Formatter;
use crate::pipeline::guard::{StatementGuard, StatementPolicy};
use crate::pipeline::{Dispatcher, Turn};
use crate::providers::openai_style::OpenAIStyleClient;
use crate::providers::ChatMessage;
use crate::server::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Application {
    pub args: Args,
    pub config: Config,
}

impl Application {
    pub fn new(args: Args, config: Config) -> Self {
        Self { args, config }
    }

    /// Wire the pipeline from configuration. Completion settings are
    /// validated before anything else is touched.
    pub async fn dispatcher(&self) -> Result<Dispatcher> {
        let settings = self.config.completion.validate()?;
        let client = OpenAIStyleClient::new(&settings)?;
        info!(model = %settings.model, max_tokens = settings.max_tokens, "completion client ready");

        let gateway = PgGateway::connect(
            self.config.database.url()?,
            self.config.database.max_connections,
        )
        .await?;

        if self.config.statement_policy == StatementPolicy::Permissive {
            warn!("generated statements are executed without validation (statement_policy: permissive)");
        }

        Ok(Dispatcher::new(Arc::new(client), Arc::new(gateway))
            .with_guard(StatementGuard::new(self.config.statement_policy))
            .with_formatter(Formatter::new(self.config.formatter.escape_html)))
    }

    pub async fn run(&self) -> Result<()> {
        let dispatcher = self.dispatcher().await?;

        match self.args.message.as_deref() {
            Some(message) => {
                display::display_request(message, &self.args.user_id);
                let conversation = [ChatMessage::user(message, self.args.user_id.as_str())];
                if let Some(turn) = Turn::from_conversation(&conversation) {
                    let response = dispatcher.dispatch(&turn).await;
                    display::display_response(&response);
                }
                Ok(())
            }
            None => {
                let state = Arc::new(AppState { dispatcher });
                server::serve(&self.config.server.bind, state).await
            }
        }
    }
}
