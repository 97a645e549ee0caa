// Per-viewer visibility settings lookup
use crate::domain::visibility::VisibilityPolicy;
use async_trait::async_trait;

#[async_trait]
pub trait VisibilityRepository: Send + Sync {
    /// The viewer's policy, or None when the viewer has no stored settings
    async fn policy_for(&self, viewer_id: &str) -> anyhow::Result<Option<VisibilityPolicy>>;
}
