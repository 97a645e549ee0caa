// Visibility settings loaded from configuration
use crate::application::visibility_repository::VisibilityRepository;
use crate::domain::visibility::{VisibilityFlags, VisibilityPolicy};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ConfigVisibilityRepository {
    policies: HashMap<String, VisibilityPolicy>,
}

impl ConfigVisibilityRepository {
    pub fn new(viewers: HashMap<String, VisibilityFlags>) -> Self {
        Self {
            policies: viewers
                .into_iter()
                .map(|(id, flags)| (id, VisibilityPolicy::from(flags)))
                .collect(),
        }
    }
}

#[async_trait]
impl VisibilityRepository for ConfigVisibilityRepository {
    async fn policy_for(&self, viewer_id: &str) -> Result<Option<VisibilityPolicy>> {
        Ok(self.policies.get(viewer_id).cloned())
    }
}
