//! Render world - entity storage, hierarchy and per-frame draw output
//!
//! The world owns three structures over one index space:
//!
//! ```text
//! ObjectPool<EntityData>   payload (transform, world matrix, mesh, material)
//! SceneHierarchy           parent / child / sibling links
//! DrawList                 sorted draw items + entity -> draw slot map
//! ```
//!
//! Mutations only record what went stale. Transform edits record a dirty
//! root (the topmost ancestor whose subtree must be recomputed); mesh,
//! material and membership edits flag the draw list. [`RenderWorld::draw_items`]
//! settles both lazily once per frame.
//!
//! The world is single-threaded and not reentrant: the slice returned by
//! `draw_items` borrows the world, so it cannot outlive the next mutation.

use super::draw_list::{DrawItem, DrawList};
use super::entity::{Entity, EntityData, EntityProperties};
use super::error::{WorldError, WorldResult};
use super::hierarchy::{Children, SceneHierarchy};
use crate::config::RenderWorldConfig;
use crate::foundation::dirty_set::DirtySet;
use crate::foundation::math::{Mat4, Transform};
use crate::foundation::object_pool::ObjectPool;
use crate::render::{Material, Mesh};

/// Scene graph producing a sorted draw list every frame
#[derive(Debug)]
pub struct RenderWorld {
    config: RenderWorldConfig,
    pool: ObjectPool<EntityData>,
    hierarchy: SceneHierarchy,
    dirty_roots: DirtySet,
    draw_list: DrawList,
    walk_stack: Vec<(u32, Mat4)>,
}

impl RenderWorld {
    /// Create a world with the default configuration
    pub fn new() -> Self {
        Self::with_config(RenderWorldConfig::default())
    }

    /// Create a world with custom configuration
    pub fn with_config(config: RenderWorldConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            pool: ObjectPool::with_capacity(capacity),
            hierarchy: SceneHierarchy::new(),
            dirty_roots: DirtySet::with_capacity(capacity),
            draw_list: DrawList::with_capacity(capacity),
            walk_stack: Vec::new(),
            config,
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &RenderWorldConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Create an entity, optionally under `parent`
    ///
    /// A stale `parent` is logged and the entity becomes a root instead.
    /// The world matrix stays identity until transforms are next resolved.
    pub fn spawn(
        &mut self,
        transform: Transform,
        mesh: Mesh,
        material: Material,
        parent: Option<Entity>,
    ) -> Entity {
        let entity = self.pool.emplace(EntityData::new(transform, mesh, material));
        self.grow_index_space();

        let parent = parent.filter(|&parent| {
            let valid = self.pool.valid(parent);
            if !valid {
                log::warn!("spawn: parent {parent:?} is not alive, spawning {entity:?} as a root");
            }
            valid
        });

        self.hierarchy.attach(entity.index(), parent.map(Entity::index));
        self.mark_transform_dirty(entity.index());
        self.draw_list.mark_dirty();

        log::trace!("Spawned {entity:?} under {parent:?}");
        entity
    }

    /// Destroy an entity, orphaning its direct children to roots
    ///
    /// Children are not destroyed; each becomes a root whose world matrix
    /// is recomputed without the destroyed parent.
    pub fn destroy(&mut self, entity: Entity) -> WorldResult<()> {
        self.check(entity)?;
        let index = entity.index();

        // Orphans become roots, so recording them directly is the walk-up result
        for child in self.hierarchy.children(index) {
            self.dirty_roots.insert(child);
        }

        self.draw_list.unmap(index);
        self.hierarchy.on_destroy(index);
        self.dirty_roots.erase(index);
        self.pool.destroy(entity)?;
        self.draw_list.mark_dirty();

        log::trace!("Destroyed {entity:?}");
        Ok(())
    }

    /// Destroy every entity; outstanding handles all become invalid
    pub fn clear(&mut self) {
        self.pool.clear();
        self.hierarchy.clear();
        self.dirty_roots.clear();
        self.draw_list.clear();
    }

    // ---------------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------------

    /// Replace an entity's local transform
    ///
    /// Sort order does not depend on transforms, so the draw list is only
    /// patched in place when transforms resolve.
    pub fn set_transform(&mut self, entity: Entity, transform: Transform) -> WorldResult<()> {
        self.data_mut(entity)?.local_transform = transform;
        self.mark_transform_dirty(entity.index());
        Ok(())
    }

    /// Replace an entity's mesh
    pub fn set_mesh(&mut self, entity: Entity, mesh: Mesh) -> WorldResult<()> {
        self.data_mut(entity)?.mesh = mesh;
        self.draw_list.mark_dirty();
        Ok(())
    }

    /// Replace an entity's material
    pub fn set_material(&mut self, entity: Entity, material: Material) -> WorldResult<()> {
        self.data_mut(entity)?.material = material;
        self.draw_list.mark_dirty();
        Ok(())
    }

    /// Edit transform, mesh and material in one call
    ///
    /// Only the state tied to fields that actually changed is invalidated.
    pub fn modify<F>(&mut self, entity: Entity, edit: F) -> WorldResult<()>
    where
        F: FnOnce(&mut EntityProperties),
    {
        let data = self.data_mut(entity)?;
        let before = data.properties();
        let mut after = before;
        edit(&mut after);

        data.local_transform = after.transform;
        data.mesh = after.mesh;
        data.material = after.material;

        if after.transform != before.transform {
            self.mark_transform_dirty(entity.index());
        }
        if after.mesh != before.mesh || after.material != before.material {
            self.draw_list.mark_dirty();
        }
        Ok(())
    }

    /// Re-parent `child` under `parent`
    ///
    /// With cycle detection enabled (the default), parenting an entity under
    /// itself or one of its descendants fails with
    /// [`WorldError::HierarchyCycle`]. With it disabled, avoiding cycles is
    /// the caller's job.
    pub fn attach(&mut self, child: Entity, parent: Entity) -> WorldResult<()> {
        self.check(child)?;
        if !self.pool.valid(parent) {
            log::warn!("attach: parent {parent:?} is not alive");
            return Err(WorldError::InvalidParent(parent));
        }
        if self.config.detect_cycles && self.hierarchy.is_ancestor(child.index(), parent.index()) {
            log::warn!("attach: {child:?} under {parent:?} would create a cycle");
            return Err(WorldError::HierarchyCycle { child, parent });
        }

        self.hierarchy.attach(child.index(), Some(parent.index()));
        self.mark_transform_dirty(child.index());
        Ok(())
    }

    /// Detach `child` from its parent, making it a root
    pub fn detach(&mut self, child: Entity) -> WorldResult<()> {
        self.check(child)?;
        self.hierarchy.detach(child.index());
        self.mark_transform_dirty(child.index());
        Ok(())
    }

    /// Force a full recompute: every root becomes a dirty transform root and
    /// the draw list is rebuilt on the next frame
    pub fn invalidate_all(&mut self) {
        for (entity, _) in self.pool.iter() {
            if self.hierarchy.is_root(entity.index()) {
                self.dirty_roots.insert(entity.index());
            }
        }
        self.draw_list.mark_dirty();
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Whether `entity` is alive in this world
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.pool.valid(entity)
    }

    /// Number of live entities
    pub const fn len(&self) -> usize {
        self.pool.len()
    }

    /// True when no entity is alive
    pub const fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Parent of `entity`, or `None` for roots
    pub fn parent_of(&self, entity: Entity) -> WorldResult<Option<Entity>> {
        self.check(entity)?;
        Ok(self
            .hierarchy
            .parent(entity.index())
            .and_then(|parent| self.pool.handle_at(parent)))
    }

    /// Direct children of `entity`, most recently attached first
    pub fn children(&self, entity: Entity) -> WorldResult<ChildEntities<'_>> {
        self.check(entity)?;
        Ok(ChildEntities {
            children: self.hierarchy.children(entity.index()),
            pool: &self.pool,
        })
    }

    /// True when `child` is a direct child of `parent`
    pub fn is_child_of(&self, parent: Entity, child: Entity) -> bool {
        self.pool.valid(parent)
            && self.pool.valid(child)
            && self.hierarchy.parent(child.index()) == Some(parent.index())
    }

    /// Live entities without a parent, in index order
    pub fn roots(&self) -> impl Iterator<Item = Entity> + '_ {
        self.pool
            .iter()
            .map(|(entity, _)| entity)
            .filter(|entity| self.hierarchy.is_root(entity.index()))
    }

    /// Local transform of `entity`
    pub fn local_transform(&self, entity: Entity) -> WorldResult<Transform> {
        Ok(self.data(entity)?.local_transform)
    }

    /// Mesh of `entity`
    pub fn mesh(&self, entity: Entity) -> WorldResult<Mesh> {
        Ok(self.data(entity)?.mesh)
    }

    /// Material of `entity`
    pub fn material(&self, entity: Entity) -> WorldResult<Material> {
        Ok(self.data(entity)?.material)
    }

    /// World matrix of `entity`, resolving pending transforms first
    pub fn world_matrix(&mut self, entity: Entity) -> WorldResult<Mat4> {
        self.check(entity)?;
        self.update_transforms();
        Ok(self.data(entity)?.world_matrix)
    }

    /// Number of subtrees waiting for a transform recompute
    pub fn dirty_root_count(&self) -> usize {
        self.dirty_roots.len()
    }

    /// Whether the next [`RenderWorld::draw_items`] call rebuilds the list
    pub const fn is_draw_list_dirty(&self) -> bool {
        self.draw_list.is_dirty()
    }

    // ---------------------------------------------------------------------
    // Frame output
    // ---------------------------------------------------------------------

    /// Resolve transforms, rebuild the draw list if needed and return it
    ///
    /// Items are sorted by ascending sort key (shader, then material, then
    /// mesh hash), ties broken by entity index.
    pub fn draw_items(&mut self) -> &[DrawItem] {
        self.update_transforms();

        if self.draw_list.is_dirty() {
            self.draw_list.rebuild(&self.pool);
            if self.config.log_rebuilds {
                log::debug!(
                    "Rebuilt draw list: {} items over {} slots",
                    self.draw_list.items().len(),
                    self.pool.capacity()
                );
            }
        }

        self.draw_list.items()
    }

    /// Recompute world matrices for every pending dirty root
    ///
    /// Each subtree is walked pre-order with an explicit stack, writing
    /// `parent_world * local` into the pool and patching the matching draw
    /// item in place.
    pub fn update_transforms(&mut self) {
        if self.dirty_roots.is_empty() {
            return;
        }

        let roots = self.dirty_roots.take_items();
        let mut stack = std::mem::take(&mut self.walk_stack);
        let budget = self.pool.capacity();
        let mut updated = 0usize;

        for &root in &roots {
            if !self.pool.alive_at(root) {
                continue;
            }

            let parent_world = self
                .hierarchy
                .parent(root)
                .and_then(|parent| self.pool.at_index(parent))
                .map_or_else(Mat4::identity, |parent| parent.world_matrix);

            stack.clear();
            stack.push((root, parent_world));
            let mut visited = 0usize;

            while let Some((index, parent_world)) = stack.pop() {
                visited += 1;
                if visited > budget {
                    log::error!("Transform walk from {root} exceeded {budget} nodes; hierarchy has a cycle");
                    stack.clear();
                    break;
                }

                let Some(data) = self.pool.at_index_mut(index) else {
                    continue;
                };
                let world = parent_world * data.local_transform.to_matrix();
                data.world_matrix = world;
                self.draw_list.sync_transform(index, &world);

                stack.extend(self.hierarchy.children(index).map(|child| (child, world)));
            }

            updated += visited;
        }

        log::trace!("Resolved {} dirty roots ({updated} nodes)", roots.len());

        self.dirty_roots.recycle(roots);
        self.walk_stack = stack;
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Record the topmost ancestor of `index` that is not already covered by
    /// a pending dirty root
    fn mark_transform_dirty(&mut self, index: u32) {
        let mut current = index;
        for _ in 0..=self.hierarchy.len() {
            if self.dirty_roots.contains(current) {
                return;
            }
            match self.hierarchy.parent(current) {
                Some(parent) if self.pool.alive_at(parent) => current = parent,
                _ => {
                    self.dirty_roots.insert(current);
                    return;
                }
            }
        }

        log::error!("Dirty walk from {index} did not reach a root; hierarchy has a cycle");
        self.dirty_roots.insert(index);
    }

    fn grow_index_space(&mut self) {
        let capacity = self.pool.capacity();
        self.hierarchy.resize(capacity);
        self.draw_list.resize(capacity);
        self.dirty_roots.ensure_capacity(capacity);
    }

    fn check(&self, entity: Entity) -> WorldResult<()> {
        if self.pool.valid(entity) {
            Ok(())
        } else {
            log::warn!("Rejected stale entity handle {entity:?}");
            Err(WorldError::InvalidEntity(entity))
        }
    }

    fn data(&self, entity: Entity) -> WorldResult<&EntityData> {
        self.check(entity)?;
        Ok(self.pool.get(entity)?)
    }

    fn data_mut(&mut self, entity: Entity) -> WorldResult<&mut EntityData> {
        self.check(entity)?;
        Ok(self.pool.get_mut(entity)?)
    }
}

impl Default for RenderWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over an entity's direct children as handles
#[derive(Debug, Clone)]
pub struct ChildEntities<'a> {
    children: Children<'a>,
    pool: &'a ObjectPool<EntityData>,
}

impl Iterator for ChildEntities<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        self.children
            .by_ref()
            .find_map(|index| self.pool.handle_at(index))
    }
}
