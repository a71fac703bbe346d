//! Product categories addressed by hierarchical slug paths.
//!
//! Every category has its own slug segment; the externally visible slug is
//! the full path from the root (`electronics/audio/headphones`). A path index
//! resolves full paths and sibling names in one lookup each and orders the
//! whole tree by materialized sort keys.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/categories` | No | Create category at a full path |
//! | GET | `/api/categories` | No | List categories in pre-order (`?tree=true` nests) |
//! | GET | `/api/categories/{*path}` | No | Find category by full path |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod path;
pub mod path_index;
pub mod routes;
pub mod services;
pub mod sort_key;
pub mod store;

pub use error::CategoryError;
pub use services::CategoryService;
