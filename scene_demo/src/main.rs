//! Orbit demo
//!
//! Builds a small solar system (sun, planets, moons), spins it for a number
//! of frames and logs what the render world hands to the renderer. Halfway
//! through, one planet is destroyed to show its moons being orphaned.

use rand::Rng;
use scene_engine::foundation::{logging, math::translation_of};
use scene_engine::prelude::*;
use std::f32::consts::TAU;

const PLANET_COUNT: usize = 4;
const MOONS_PER_PLANET: usize = 2;
const FRAMES: u32 = 8;
const FRAME_TIME: f32 = 1.0 / 60.0;

struct Body {
    entity: Entity,
    orbit_radius: f32,
    angular_speed: f32,
}

struct OrbitDemo {
    world: RenderWorld,
    sun: Entity,
    planets: Vec<Body>,
    moons: Vec<Body>,
    elapsed: f32,
}

impl OrbitDemo {
    fn new(config: RenderWorldConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mut rng = rand::thread_rng();
        let mut library = MaterialLibrary::new();

        let lit = library.register_shader(Shader::new("lit.vert", "lit.frag"));
        let unlit = library.register_shader(Shader::new("unlit.vert", "unlit.frag"));
        let mut materials = Vec::new();
        for (index, shader) in [lit, lit, unlit].into_iter().enumerate() {
            let name = format!("body_{index}");
            materials.push(library.create_material(shader, Some(&name))?);
        }
        log::info!(
            "Material library: {} shaders, {} materials",
            library.shader_count(),
            library.material_count()
        );

        let sphere = Mesh::new(MeshId(1), 0, 482, 0, 2880);
        let small_sphere = Mesh::new(MeshId(2), 482, 130, 2880, 720);

        let mut world = RenderWorld::with_config(config);
        let sun = world.spawn(
            Transform::identity().with_uniform_scale(2.0),
            sphere,
            materials[2],
            None,
        );

        let mut planets = Vec::with_capacity(PLANET_COUNT);
        let mut moons = Vec::with_capacity(PLANET_COUNT * MOONS_PER_PLANET);

        for i in 0..PLANET_COUNT {
            let orbit_radius = 4.0 + 3.0 * i as f32;
            let material = materials[rng.gen_range(0..2)];
            let planet = world.spawn(
                Transform::from_position(Vec3::new(orbit_radius, 0.0, 0.0)),
                sphere,
                material,
                Some(sun),
            );
            planets.push(Body {
                entity: planet,
                orbit_radius,
                angular_speed: rng.gen_range(0.5..2.0),
            });

            for m in 0..MOONS_PER_PLANET {
                let orbit_radius = 0.8 + 0.4 * m as f32;
                let moon = world.spawn(
                    Transform::from_position(Vec3::new(orbit_radius, 0.0, 0.0))
                        .with_uniform_scale(0.25),
                    small_sphere,
                    materials[rng.gen_range(0..materials.len())],
                    Some(planet),
                );
                moons.push(Body {
                    entity: moon,
                    orbit_radius,
                    angular_speed: rng.gen_range(2.0..6.0),
                });
            }
        }

        log::info!("Spawned {} entities", world.len());

        Ok(Self {
            world,
            sun,
            planets,
            moons,
            elapsed: 0.0,
        })
    }

    fn update(&mut self, delta_time: f32) -> WorldResult<()> {
        self.elapsed += delta_time;

        self.world.set_transform(
            self.sun,
            Transform::identity()
                .with_uniform_scale(2.0)
                .with_rotation_axis_angle(Vec3::y(), self.elapsed * 0.1),
        )?;

        for body in self.planets.iter().chain(&self.moons) {
            if !self.world.is_valid(body.entity) {
                continue;
            }
            let angle = (self.elapsed * body.angular_speed) % TAU;
            let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * body.orbit_radius;
            self.world.modify(body.entity, |props| {
                props.transform.position = position;
            })?;
        }

        Ok(())
    }

    fn render(&mut self, frame: u32) {
        let items = self.world.draw_items();
        let drawable = items.iter().filter(|item| item.is_drawable()).count();
        let triangles: u32 = items
            .iter()
            .filter(|item| item.is_drawable())
            .map(|item| item.mesh.triangle_count())
            .sum();
        log::info!(
            "Frame {frame}: {} draw items ({drawable} drawable, {triangles} triangles)",
            items.len()
        );

        for item in items {
            log::debug!(
                "  {:?} shader={:?} material={:?} key={:#018x} at {:?}",
                item.entity,
                item.material.shader_id(),
                item.material.material_id(),
                item.sort_key,
                translation_of(&item.world_matrix)
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting orbit demo");

    let config = std::env::args()
        .nth(1)
        .map(RenderWorldConfig::load_from_file)
        .transpose()?
        .unwrap_or_default();
    log::info!("Render world config: {config:?}");

    let mut demo = OrbitDemo::new(config)?;

    for frame in 0..FRAMES {
        if frame == FRAMES / 2 {
            let doomed = demo.planets[0].entity;
            let moons = demo.world.children(doomed)?.count();
            demo.world.destroy(doomed)?;
            log::info!("Destroyed planet {doomed:?}; {moons} moons are now roots");
        }

        demo.update(FRAME_TIME)?;
        demo.render(frame);
    }

    log::info!(
        "Finished with {} entities, {} roots",
        demo.world.len(),
        demo.world.roots().count()
    );
    Ok(())
}
