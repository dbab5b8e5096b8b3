use anyhow::{anyhow, Result};

use crate::domain::GenerationResult;

use super::super::Container;

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(&self, message: String) -> Result<String> {
        let use_case = self.container.chat_relay_use_case();

        match use_case.execute(&message).await? {
            GenerationResult::Success { text } => Ok(text),
            GenerationResult::Failure { reason, .. } => Err(anyhow!("Server error: {}", reason)),
        }
    }
}
