use crate::domain::model::{DrawRequest, Invitation, Roster};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait RosterStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Roster>> + Send;
    fn save(&self, roster: &Roster) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn roster_path(&self) -> &str;
    fn group_size(&self) -> usize;
    fn use_sections(&self) -> bool;
    fn seed(&self) -> Option<u64>;
    fn outbox_path(&self) -> &str;

    fn draw_request(&self) -> DrawRequest {
        DrawRequest {
            group_size: self.group_size(),
            use_sections: self.use_sections(),
            seed: self.seed(),
        }
    }
}

/// Delivers a finished invitation. Returns a human-readable receipt
/// (e.g. the path of the written message).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, invitation: &Invitation) -> Result<String>;
}
