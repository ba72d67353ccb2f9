pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed SVG markup: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown component: {id}")]
    UnknownComponent { id: String },

    #[error("Unknown connection: {id}")]
    UnknownConnection { id: String },

    #[error("Invalid connection {source_id} -> {target_id}: {reason}")]
    InvalidConnection {
        source_id: String,
        target_id: String,
        reason: &'static str,
    },
}
