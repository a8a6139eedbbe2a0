//! Transform hierarchy demo
//!
//! Builds a small sun / planet / moon scene, spins the sun and the planet for
//! a few simulated frames and logs the world position of every body. Pass a
//! `.toml` or `.ron` scene config path as the first argument to override the
//! defaults.

use nalgebra::Unit;
use sim_engine::foundation::logging;
use sim_engine::foundation::math::translation_of;
use sim_engine::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: usize = 90;

/// Angular velocity around +Y in radians per second
#[derive(Debug, Clone, Default)]
struct Spin {
    radians_per_second: f32,
}

impl Component for Spin {}

/// Rotates every spinning transform and dirties its subtree
#[derive(Default)]
struct SpinSystem;

impl System for SpinSystem {
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], delta_time: f32) -> EcsResult<()> {
        for &entity in entities {
            let angle = scene.get_component::<Spin>(entity)?.radians_per_second * delta_time;
            let transform = scene.get_component_mut::<TransformComponent>(entity)?;
            transform.rotation = Quat::from_axis_angle(&Unit::new_normalize(Vec3::y()), angle) * transform.rotation;
            TransformHierarchy::mark_dirty(scene, entity)?;
        }
        Ok(())
    }
}

fn spawn_body(scene: &mut Scene, name: &str, position: Vec3, mesh: u32) -> EcsResult<Entity> {
    let entity = scene.create_entity(name)?;
    scene.add_component(entity, TransformComponent::from_position(position))?;
    scene.add_component(entity, RenderableComponent::new(MeshId(mesh), MaterialId(mesh)))?;
    Ok(entity)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    
    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load_from_file(&path)?,
        None => SceneConfig {
            name: "Hierarchy Demo".to_string(),
            ..SceneConfig::default()
        },
    };
    log::info!("Starting {} (max {} entities)", config.name, config.max_entities);
    
    let mut scene = Scene::with_engine_components(config)?;
    let spin = scene.register_component::<Spin>("Spin")?;
    
    // Spin first so the transform system sees this frame's rotations
    let spin_signature = scene.components().signature_of::<TransformComponent>()? | Signature::EMPTY.with(spin);
    scene.register_system(SpinSystem, spin_signature)?;
    TransformHierarchy::register_systems(&mut scene)?;
    RenderableCollector::register(&mut scene)?;
    
    let sun = spawn_body(&mut scene, "Sun", Vec3::zeros(), 1)?;
    let planet = spawn_body(&mut scene, "Planet", Vec3::new(10.0, 0.0, 0.0), 2)?;
    let moon = spawn_body(&mut scene, "Moon", Vec3::new(2.0, 0.0, 0.0), 3)?;
    TransformHierarchy::add_child(&mut scene, sun, planet)?;
    TransformHierarchy::add_child(&mut scene, planet, moon)?;
    
    scene.add_component(sun, Spin { radians_per_second: 0.5 })?;
    scene.add_component(planet, Spin { radians_per_second: 2.0 })?;
    
    for frame in 0..FRAMES {
        scene.update_all(FRAME_TIME)?;
        
        if frame % 30 == 0 {
            let collector = scene.systems().system::<RenderableCollector>()?;
            for item in collector.items() {
                let position = translation_of(&item.world);
                log::info!(
                    "frame {:3} {:>6}: ({:7.3}, {:7.3}, {:7.3})",
                    frame,
                    scene.entities().name(item.entity)?,
                    position.x,
                    position.y,
                    position.z
                );
            }
        }
    }
    
    let removed = TransformHierarchy::destroy_subtree(&mut scene, planet)?;
    log::info!("Destroyed planet subtree ({} entities), {} left", removed, scene.entities().len());
    
    scene.update_all(FRAME_TIME)?;
    let remaining = scene.systems().system::<RenderableCollector>()?.items().len();
    log::info!("{} renderable(s) after teardown", remaining);
    
    Ok(())
}
