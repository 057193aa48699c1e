#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A subscription kind outside the general-kind catalogue.
    #[error("Invalid subscription kind: {0}")]
    InvalidSubscriptionKind(String),
}
