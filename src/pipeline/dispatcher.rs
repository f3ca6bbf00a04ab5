use super::classifier::Classifier;
use super::formatter::{
    APOLOGY, Formatter, MUTATION_FAILURE, MUTATION_SUCCESS, REFUSAL, RETRIEVAL_FAILURE,
};
use super::generator::{StatementGenerator, Variant};
use super::guard::{StatementGuard, StatementKind};
use super::{Category, Turn};
use crate::core::error::Result;
use crate::core::executor::ExecutionGateway;
use crate::providers::CompletionClient;
use std::sync::Arc;
use tracing::{debug, error};

/// Runs one request through classification, generation, execution and
/// formatting.
///
/// ```text
/// Classifying ─┬─ action     ─> Mutating   ─┐
///              ├─ retrieve   ─> Retrieving ─┤
///              ├─ general    ─> Answering  ─┼─> Done
///              └─ (anything) ─> Refusing   ─┘
/// ```
///
/// Every stage is awaited in turn; nothing is retried.
#[derive(Clone)]
pub struct Dispatcher {
    classifier: Classifier,
    generator: StatementGenerator,
    gateway: Arc<dyn ExecutionGateway>,
    guard: StatementGuard,
    formatter: Formatter,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn CompletionClient>, gateway: Arc<dyn ExecutionGateway>) -> Self {
        Self {
            classifier: Classifier::new(client.clone()),
            generator: StatementGenerator::new(client),
            gateway,
            guard: StatementGuard::default(),
            formatter: Formatter::default(),
        }
    }

    pub fn with_guard(mut self, guard: StatementGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Always produces a response. Failures not handled by a path are
    /// logged and answered with a fixed apology.
    pub async fn dispatch(&self, turn: &Turn<'_>) -> String {
        match self.run(turn).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "error processing user request");
                APOLOGY.to_string()
            }
        }
    }

    async fn run(&self, turn: &Turn<'_>) -> Result<String> {
        let category = self.classifier.classify(turn).await?;
        debug!(%category, "dispatching");

        match category {
            Category::Action => self.mutate(turn).await,
            Category::Retrieve => self.retrieve(turn).await,
            Category::General => self.generator.generate(Variant::Conversation, turn).await,
            Category::Irrelevant => Ok(REFUSAL.to_string()),
        }
    }

    async fn mutate(&self, turn: &Turn<'_>) -> Result<String> {
        let generated = self.generator.generate(Variant::Mutation, turn).await?;
        let statement = self.guard.check(StatementKind::Mutation, &generated)?;

        match self.gateway.execute(&statement).await {
            Ok(_) => Ok(MUTATION_SUCCESS.to_string()),
            Err(e) => {
                error!(error = %e, "error executing action query");
                Ok(MUTATION_FAILURE.to_string())
            }
        }
    }

    async fn retrieve(&self, turn: &Turn<'_>) -> Result<String> {
        let generated = self.generator.generate(Variant::Retrieval, turn).await?;
        let statement = self.guard.check(StatementKind::Query, &generated)?;

        match self.gateway.execute(&statement).await {
            Ok(rows) => {
                debug!(rows = rows.len(), "select query returned");
                Ok(self.formatter.products(&rows))
            }
            Err(e) => {
                error!(error = %e, "error executing select query");
                Ok(RETRIEVAL_FAILURE.to_string())
            }
        }
    }
}
