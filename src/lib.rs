//! treegate: hierarchical, path-scoped access control for catalog trees.
//!
//! Categories and products live on materialized paths
//! (`/categories/photo/cameras`). A grant is a pure allow record binding
//! one entity to one principal (user or group); absence is the deny
//! state. Effective visibility ANDs grants down the ancestor chain and
//! ORs across the principal's own id and its groups. Grants are pushed
//! down a subtree by explicit propagation, never by runtime inheritance.

pub mod access;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod grants;
pub mod principals;
pub mod search;
pub mod storage;
pub mod tree;

pub use error::{Result, TreegateError};
