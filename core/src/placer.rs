//! Prop placement along tile sides
//!
//! For each side of a freshly spawned tile the placer rolls how many props
//! to attempt, picks that many distinct attachment points from the ones the
//! template declares, skips some of them by chance, and fills the rest with
//! pooled or freshly instantiated props, each with a little random yaw for
//! variety. Placement is driven by a seedable PCG stream so a run can be
//! reproduced exactly.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::catalog::{PropCatalog, Side, TileTemplate};
use crate::config::TrackConfig;
use crate::pool::TemplatePools;
use crate::store::{Handle, Store};
use crate::tile::TileHandle;

/// Handle to a prop instance in the prop store
pub type PropHandle = Handle<Prop>;

/// Extra random yaw applied to every placed prop, in degrees either way
const YAW_JITTER_DEGREES: f32 = 10.0;

/// One roadside prop instance
pub struct Prop {
    template: usize,
    position: Vec3,
    rotation: Quat,
    owner: Option<TileHandle>,
    active: bool,
}

impl Prop {
    fn new(template: usize, position: Vec3, rotation: Quat, owner: TileHandle) -> Self {
        Self {
            template,
            position,
            rotation,
            owner: Some(owner),
            active: true,
        }
    }

    /// Cold instance for pool warm-up: inactive, unowned, unplaced
    pub(crate) fn inactive(template: usize) -> Self {
        Self {
            template,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            owner: None,
            active: false,
        }
    }

    /// Index of the catalog template this prop was instantiated from
    pub fn template(&self) -> usize {
        self.template
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// The tile this prop currently belongs to (non-owning); `None` while
    /// pooled
    pub fn owner(&self) -> Option<TileHandle> {
        self.owner
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn reset(&mut self, position: Vec3, rotation: Quat, owner: TileHandle) {
        self.position = position;
        self.rotation = rotation;
        self.owner = Some(owner);
        self.active = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Places props on tile sides from a deterministic random stream
pub struct PropPlacer {
    rng: Pcg32,
}

impl PropPlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Populate one side of a tile, returning the props actually placed
    ///
    /// The rolled count is independent of how many points the template
    /// declares; when the template declares fewer, only the declared points
    /// are used. An empty result is valid and expected with an empty prop
    /// catalog or a skip chance of 1.
    pub fn place_side(
        &mut self,
        config: &TrackConfig,
        catalog: &PropCatalog,
        template: &TileTemplate,
        side: Side,
        tile: TileHandle,
        tile_origin: f32,
        props: &mut Store<Prop>,
        pools: &mut TemplatePools<Prop>,
    ) -> Vec<PropHandle> {
        if catalog.is_empty() {
            return Vec::new();
        }

        let declared = template.points(side);
        if declared.is_empty() {
            log::warn!(
                "tile template '{}' declares no {} attachment points",
                template.name,
                side.as_str()
            );
            return Vec::new();
        }

        let rolled =
            self.rng
                .random_range(config.min_props_per_side..=config.max_props_per_side) as usize;
        let count = rolled.min(declared.len());

        let mut placed = Vec::with_capacity(count);
        for point_index in rand::seq::index::sample(&mut self.rng, declared.len(), count) {
            if self.rng.random::<f32>() < config.prop_skip_chance {
                continue;
            }

            let point = &declared[point_index];
            let position = Vec3::new(tile_origin, 0.0, 0.0) + point.position;
            let jitter = self
                .rng
                .random_range(-YAW_JITTER_DEGREES..=YAW_JITTER_DEGREES);
            let rotation = point.rotation * Quat::from_rotation_y(jitter.to_radians());

            let template_index = self.rng.random_range(0..catalog.len());
            placed.push(spawn_prop(
                template_index,
                position,
                rotation,
                tile,
                props,
                pools,
            ));
        }
        placed
    }
}

/// Reuse a pooled prop of the chosen template, or instantiate fresh
fn spawn_prop(
    template: usize,
    position: Vec3,
    rotation: Quat,
    owner: TileHandle,
    props: &mut Store<Prop>,
    pools: &mut TemplatePools<Prop>,
) -> PropHandle {
    while let Some(handle) = pools.acquire(template) {
        match props.get_mut(handle) {
            Some(prop) => {
                prop.reset(position, rotation, owner);
                return handle;
            }
            // Destroyed externally while pooled; drop the handle and retry
            None => continue,
        }
    }
    props.insert(Prop::new(template, position, rotation, owner))
}
