use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Session Stopped Error: {message} {location}")]
    ActorStopped {
        message: String,
        location: ErrorLocation,
    },
}
