use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TreegateError {
    #[error("not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    #[error("no node at path: {path}")]
    PathNotFound { path: String },

    #[error("ancestor \"{ancestor}\" is not granted to {principal}")]
    ParentBlocked { ancestor: String, principal: String },

    #[error("malformed path: {path}: {reason}")]
    InconsistentPrefix { path: String, reason: String },

    #[error("unknown entity kind: {kind}")]
    UnknownEntityKind { kind: String },

    #[error("sibling segment already taken: {path}")]
    DuplicateSegment { path: String },

    #[error("products cannot have children: {path}")]
    ProductNotLeaf { path: String },

    #[error("propagation failed at {path}: {reason}")]
    PropagationFailed { path: String, reason: String },

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TreegateError>;
