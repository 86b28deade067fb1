//! Scene management system
//!
//! Handle-based scene graph that turns a hierarchy of entities into a flat,
//! sorted draw list each frame. Following Game Engine Architecture Chapter
//! 11.2.7 - Scene Graphs.
//!
//! ## Architecture
//!
//! ```text
//! Game code (spawn / destroy / set_* / attach / detach)
//!      ↓
//! RenderWorld (dirty roots + draw-list flag)
//!      ↓  draw_items()
//! Renderer (sorted DrawItems)
//! ```
//!
//! The Render World:
//! - Stores entities in a generational pool addressed by [`Entity`] handles
//! - Links parents and children intrusively over the pool's index space
//! - Recomputes world matrices only under dirty subtree roots
//! - Rebuilds and sorts the draw list only when membership or keys change

mod draw_list;
mod entity;
mod error;
mod hierarchy;
mod render_world;

#[cfg(test)]
mod tests;

pub use draw_list::{sort_key, DrawItem, DrawList, UNDRAWABLE_SORT_KEY};
pub use entity::{Entity, EntityData, EntityProperties};
pub use error::{WorldError, WorldResult};
pub use hierarchy::{Children, Node, SceneHierarchy};
pub use render_world::{ChildEntities, RenderWorld};
