//! Render world errors

use super::entity::Entity;
use crate::foundation::object_pool::PoolError;
use thiserror::Error;

/// Errors reported by [`RenderWorld`](super::RenderWorld)
///
/// Every error leaves the world exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// Entity handle is stale or was never issued by this world
    #[error("invalid entity {0:?}")]
    InvalidEntity(Entity),

    /// Parent handle is stale or was never issued by this world
    #[error("invalid parent {0:?}")]
    InvalidParent(Entity),

    /// Attaching would make an entity its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    HierarchyCycle {
        /// Entity being attached
        child: Entity,
        /// Requested parent, which is the child or one of its descendants
        parent: Entity,
    },

    /// Lower-level pool failure
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Result alias for render world operations
pub type WorldResult<T> = Result<T, WorldError>;
