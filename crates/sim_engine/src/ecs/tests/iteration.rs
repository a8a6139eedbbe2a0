//! Systems that change the scene while they are being updated

use crate::ecs::components::TransformComponent;
use crate::ecs::{Component, EcsError, EcsResult, Entity, Signature, System};
use crate::scene::{Scene, SceneConfig};

#[derive(Debug, Clone, Default)]
struct Health(i32);

impl Component for Health {}

#[derive(Debug, Clone, Default)]
struct Burning;

impl Component for Burning {}

/// Destroys every entity whose health dropped to zero
#[derive(Default)]
struct ReaperSystem {
    visited: Vec<Entity>,
}

impl System for ReaperSystem {
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        for &entity in entities {
            // an earlier iteration may already have destroyed this entity
            if !scene.entities().is_alive(entity) {
                continue;
            }
            self.visited.push(entity);
            if scene.get_component::<Health>(entity)?.0 <= 0 {
                scene.destroy_entity(entity)?;
            }
        }
        Ok(())
    }
}

/// Destroys the entity after the one it is visiting
#[derive(Default)]
struct NeighbourKiller {
    visited: Vec<Entity>,
}

impl System for NeighbourKiller {
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        for (index, &entity) in entities.iter().enumerate() {
            if !scene.entities().is_alive(entity) {
                continue;
            }
            self.visited.push(entity);
            if let Some(&next) = entities.get(index + 1) {
                scene.destroy_entity(next)?;
            }
        }
        Ok(())
    }
}

/// Sets everything it sees on fire, which adds it to `BurnSystem`
#[derive(Default)]
struct IgniteSystem;

impl System for IgniteSystem {
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        for &entity in entities {
            if !scene.has_component::<Burning>(entity) {
                scene.add_component(entity, Burning)?;
            }
        }
        Ok(())
    }
}

/// Damages burning entities
#[derive(Default)]
struct BurnSystem {
    seen_per_frame: Vec<usize>,
}

impl System for BurnSystem {
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        self.seen_per_frame.push(entities.len());
        for &entity in entities {
            scene.get_component_mut::<Health>(entity)?.0 -= 1;
        }
        Ok(())
    }
}

/// Always fails
#[derive(Default)]
struct FailingSystem;

impl System for FailingSystem {
    fn update(&mut self, _scene: &mut Scene, _entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        Err(EcsError::ComponentNotFound {
            entity: Entity::NULL,
            component: "Health",
        })
    }
}

/// Counts its invocations
#[derive(Default)]
struct CountingSystem {
    runs: usize,
}

impl System for CountingSystem {
    fn update(&mut self, _scene: &mut Scene, _entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        self.runs += 1;
        Ok(())
    }
}

fn scene() -> (Scene, Signature, Signature) {
    let mut scene = Scene::with_engine_components(SceneConfig::default()).unwrap();
    let health = Signature::EMPTY.with(scene.register_component::<Health>("Health").unwrap());
    let burning = Signature::EMPTY.with(scene.register_component::<Burning>("Burning").unwrap());
    (scene, health, burning)
}

fn spawn(scene: &mut Scene, hp: i32) -> Entity {
    let entity = scene.create_entity(format!("hp {hp}")).unwrap();
    scene.add_component(entity, Health(hp)).unwrap();
    entity
}

#[test]
fn test_system_can_destroy_the_entity_it_visits() {
    let (mut scene, health, _) = scene();
    let dead = spawn(&mut scene, 0);
    let alive = spawn(&mut scene, 5);
    let also_dead = spawn(&mut scene, -2);
    scene.register_system(ReaperSystem::default(), health).unwrap();
    
    scene.update_all(0.016).unwrap();
    
    let reaper = scene.systems().system::<ReaperSystem>().unwrap();
    assert_eq!(reaper.visited, vec![dead, alive, also_dead]);
    assert!(!scene.entities().is_alive(dead));
    assert!(!scene.entities().is_alive(also_dead));
    assert_eq!(
        scene.systems().entities::<ReaperSystem>().unwrap().iter().copied().collect::<Vec<_>>(),
        vec![alive]
    );
    assert_eq!(scene.components().store::<Health>().unwrap().len(), 1);
}

#[test]
fn test_entities_destroyed_ahead_of_iteration_are_skipped() {
    let (mut scene, health, _) = scene();
    let spawned: Vec<Entity> = (0..5).map(|hp| spawn(&mut scene, hp)).collect();
    scene.register_system(NeighbourKiller::default(), health).unwrap();
    
    scene.update_all(0.016).unwrap();
    
    let killer = scene.systems().system::<NeighbourKiller>().unwrap();
    assert_eq!(killer.visited, vec![spawned[0], spawned[2], spawned[4]]);
    assert_eq!(scene.entities().len(), 3);
}

#[test]
fn test_later_systems_see_membership_changes_from_earlier_ones() {
    let (mut scene, health, burning) = scene();
    let first = spawn(&mut scene, 3);
    let second = spawn(&mut scene, 3);
    
    scene.register_system(IgniteSystem, health).unwrap();
    scene.register_system(BurnSystem::default(), burning | health).unwrap();
    assert!(scene.systems().entities::<BurnSystem>().unwrap().is_empty());
    
    scene.update_all(0.016).unwrap();
    
    let burn = scene.systems().system::<BurnSystem>().unwrap();
    assert_eq!(burn.seen_per_frame, vec![2]);
    for entity in [first, second] {
        assert_eq!(scene.get_component::<Health>(entity).unwrap().0, 2);
    }
}

#[test]
fn test_update_all_runs_in_registration_order_and_stops_on_error() {
    let (mut scene, health, _) = scene();
    spawn(&mut scene, 1);
    
    scene.register_system(CountingSystem::default(), health).unwrap();
    scene.register_system(FailingSystem, Signature::EMPTY).unwrap();
    scene.register_system(BurnSystem::default(), health).unwrap();
    assert_eq!(scene.systems().len(), 3);
    
    let result = scene.update_all(0.016);
    assert!(matches!(result, Err(EcsError::ComponentNotFound { .. })));
    
    assert_eq!(scene.systems().system::<CountingSystem>().unwrap().runs, 1);
    assert!(scene.systems().system::<BurnSystem>().unwrap().seen_per_frame.is_empty());
    
    // the failing system is back in its slot and fails again next frame
    assert!(scene.update_all(0.016).is_err());
    assert_eq!(scene.systems().system::<CountingSystem>().unwrap().runs, 2);
}

#[test]
fn test_empty_signature_system_sees_every_live_entity() {
    let (mut scene, _, _) = scene();
    let bare = scene.create_entity("bare").unwrap();
    let moved = scene.create_entity("moved").unwrap();
    scene.add_component(moved, TransformComponent::default()).unwrap();
    
    scene.register_system(CountingSystem::default(), Signature::EMPTY).unwrap();
    let members = scene.systems().entities::<CountingSystem>().unwrap();
    assert!(members.contains(&bare));
    assert!(members.contains(&moved));
}

#[test]
fn test_empty_signature_system_sees_entities_created_later() {
    let (mut scene, _, _) = scene();
    let before = scene.create_entity("before").unwrap();
    scene.register_system(CountingSystem::default(), Signature::EMPTY).unwrap();
    
    let after = scene.create_entity("after").unwrap();
    let restored = scene.create_entity_with_id(Entity::from_raw(9), "restored").unwrap();
    
    let members: Vec<Entity> = scene.systems().entities::<CountingSystem>().unwrap().iter().copied().collect();
    assert_eq!(members, vec![before, after, restored]);
    
    scene.destroy_entity(after).unwrap();
    assert!(!scene.systems().entities::<CountingSystem>().unwrap().contains(&after));
}
