use async_trait::async_trait;

/// Maps free-form complaint text to a single category label.
///
/// Never fails: any provider, configuration or transport problem yields the
/// fallback label `Other` so the admin view is never blocked by the model.
#[async_trait]
pub trait Categorizer: Send + Sync {
    async fn categorize(&self, text: &str) -> String;
}
