#![allow(dead_code)]

use async_trait::async_trait;
use crystal_chat::core::error::{ChatError, Result};
use crystal_chat::core::executor::{ExecutionGateway, Record};
use crystal_chat::providers::{ChatMessage, CompletionClient};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Completion client that answers from a fixed script and records every
/// conversation it was sent.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Upstream("script exhausted".to_string())))
    }
}

/// Gateway that returns canned rows (or an error) and records statements.
pub struct MockGateway {
    outcome: Mutex<Option<Result<Vec<Record>>>>,
    statements: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn rows(rows: Vec<Value>) -> Self {
        let records = rows
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                other => panic!("row must be an object, got {other}"),
            })
            .collect();
        Self {
            outcome: Mutex::new(Some(Ok(records))),
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::rows(Vec::new())
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            outcome: Mutex::new(Some(Err(ChatError::Execution(detail.to_string())))),
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutionGateway for MockGateway {
    async fn execute(&self, statement: &str) -> Result<Vec<Record>> {
        self.statements.lock().unwrap().push(statement.to_string());
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ChatError::Execution("executed twice".to_string())))
    }
}
