use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmarkError {
    #[error("Invalid YouTube URL: {url}")]
    InvalidUrl { url: String },

    #[error("Video {video_id} was previously added")]
    DuplicateVideoId { video_id: String },

    #[error("No bookmark with ID {id}")]
    NotFound { id: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BookmarkError>;
