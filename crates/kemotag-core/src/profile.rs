//! Profile lookup collaborator
//!
//! Profiles live in the remote backend; the offline store only keeps ids and
//! display snapshots of them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub display_name: String,
    pub x_username: String,
}

/// Resolves a profile by id, usually over the network.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn profile(&self, id: &str) -> Option<ProfileRecord>;
}
