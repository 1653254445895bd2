use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two kinds of catalog entity a grant can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Category,
    Product,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Category => write!(f, "category"),
            EntityKind::Product => write!(f, "product"),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = crate::error::TreegateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(EntityKind::Category),
            "product" => Ok(EntityKind::Product),
            _ => Err(crate::error::TreegateError::UnknownEntityKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// A catalog node: a category or a product, positioned by its
/// materialized path (e.g. `/categories/photo/cameras`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stable id, unique within its kind.
    pub id: String,

    pub kind: EntityKind,

    /// Display name; the path segment is derived from it via [`slugify`].
    pub name: String,

    /// Slash-delimited materialized path. Invariant: exactly the parent's
    /// path plus one segment.
    pub path: String,
}

/// A unique key identifying a grant. Grants are unique on
/// (entity kind, entity id, principal id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantKey {
    pub entity_kind: EntityKind,
    pub entity_id: String,

    /// The user or group the grant allows. Absence of a grant is the deny
    /// state; there are no explicit deny records.
    pub principal_id: String,
}

/// An allow record binding one entity to one principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grant {
    pub id: u64,

    pub key: GrantKey,

    /// When this grant was created.
    pub created_at: DateTime<Utc>,
}

impl Grant {
    pub fn new(id: u64, entity_kind: EntityKind, entity_id: &str, principal_id: &str) -> Self {
        Self {
            id,
            key: GrantKey {
                entity_kind,
                entity_id: entity_id.to_string(),
                principal_id: principal_id.to_string(),
            },
            created_at: Utc::now(),
        }
    }
}

/// Derive a URL-safe path segment from a display name: lowercase,
/// non-alphanumerics collapsed to single hyphens, trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
