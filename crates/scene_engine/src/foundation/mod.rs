//! Foundation module - Core utilities and types
//!
//! This module provides the building blocks the scene layer sits on:
//! - Math types and the local [`math::Transform`]
//! - The generational [`object_pool::ObjectPool`]
//! - The insertion-ordered [`dirty_set::DirtySet`]
//! - Logging bootstrap

pub mod math;
pub mod object_pool;
pub mod dirty_set;
pub mod logging;
