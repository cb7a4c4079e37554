pub mod repository;
pub mod notifier;

pub use notifier::Notifier;
pub use repository::RuleStore;

/// Error type returned by external collaborators.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;
