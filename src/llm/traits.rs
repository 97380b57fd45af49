use async_trait::async_trait;

/// Chat-completion capability the planner and the fallback tool depend on.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openai-compatible").
    fn name(&self) -> &str;

    async fn chat(&self, message: &str) -> anyhow::Result<String> {
        self.chat_with_system(None, message).await
    }

    async fn chat_with_system(
        &self,
        system_prompt: Option<&str>,
        message: &str,
    ) -> anyhow::Result<String>;
}
