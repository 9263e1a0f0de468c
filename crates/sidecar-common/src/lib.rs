pub mod errors;
pub mod events;
pub mod id;

pub use errors::{ConfigError, PlatformError, SidecarError};
pub use events::{Event, EventBus, ShutdownReason};
pub use id::{SessionId, SessionIdGenerator, WindowId, SESSION_ID_PREFIX};

pub type Result<T> = std::result::Result<T, SidecarError>;
