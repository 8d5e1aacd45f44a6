use std::sync::{Arc, Mutex};
use std::time::Duration;

use tile_core::{
    Area, ConfigError, EngineConfig, EntityId, Exit, ExitKind, Facing, Geometry, HeldDirections, MoveMode,
    Player, ScriptRef, SoundId, SoundTable, Tile, TileCoord, TileDimensions, VirtCoord,
};
use tile_runtime::{AudioSink, RuntimeConfig, RuntimeError, StaticAreaSource, World};

fn flat(name: &str) -> Area {
    Area::new(name, Geometry::flat(10, 10, TileDimensions::default()))
}

fn door_to(area: &str, x: i32, y: i32) -> Tile {
    Tile::new().with_exit(ExitKind::Normal, Exit::new(area, VirtCoord::new(x, y, 0.0)))
}

/// Field with a cave door at (3,2) and a dead door at (2,3).
fn source() -> StaticAreaSource {
    let field = flat("field")
        .with_tile(TileCoord::new(3, 2, 0), door_to("cave", 1, 1))
        .unwrap()
        .with_tile(TileCoord::new(2, 3, 0), door_to("nowhere", 0, 0))
        .unwrap();
    StaticAreaSource::new().with_area(field).with_area(flat("cave"))
}

fn world(config: EngineConfig) -> World {
    let mut world = World::new(config, source());
    world.focus("field", VirtCoord::new(2, 2, 0.0)).unwrap();
    world
}

fn occupancy(world: &World, area: &str, x: i32, y: i32) -> u32 {
    world.area(area).unwrap().occupancy(TileCoord::new(x, y, 0))
}

#[test]
fn focus_places_player_and_claims_its_tile() {
    let world = world(EngineConfig::new());
    assert_eq!(world.focus_name(), Some("field"));
    assert_eq!(world.player_tile(), Some(TileCoord::new(2, 2, 0)));
    assert_eq!(occupancy(&world, "field", 2, 2), 1);
}

#[test]
fn held_key_walks_across_tile_boundaries() {
    let config = EngineConfig {
        reference_time_ms: 1024.0,
        ..EngineConfig::new()
    };
    let mut world = world(config);
    world.focus("field", VirtCoord::new(5, 5, 0.0)).unwrap();

    assert!(world.press(Facing::RIGHT).unwrap());
    world.tick(Duration::from_millis(384)).unwrap();

    assert_eq!(world.player().pixel_coords().x, 5.0 * 32.0 + 48.0);
    assert!(world.player().is_moving());
    assert_eq!(occupancy(&world, "field", 7, 5), 1);
    assert_eq!(world.focused_area().unwrap().total_occupancy(), 1);

    world.release(Facing::RIGHT).unwrap();
    world.tick(Duration::from_secs(1)).unwrap();
    assert!(!world.player().is_moving());
    assert_eq!(world.player_tile(), Some(TileCoord::new(7, 5, 0)));
}

#[test]
fn door_moves_focus_to_target_area() {
    let mut world = world(EngineConfig::new().with_move_mode(MoveMode::Turn));

    assert!(world.press(Facing::RIGHT).unwrap());

    assert_eq!(world.focus_name(), Some("cave"));
    assert_eq!(world.player_tile(), Some(TileCoord::new(1, 1, 0)));
    assert_eq!(world.area("field").unwrap().total_occupancy(), 0);
    assert_eq!(occupancy(&world, "cave", 1, 1), 1);
}

#[test]
fn missing_target_area_rolls_the_move_back() {
    let mut world = world(EngineConfig::new());

    assert!(world.press(Facing::DOWN).unwrap());
    world.tick(Duration::from_secs(1)).unwrap();

    assert_eq!(world.focus_name(), Some("field"));
    assert!(!world.player().is_moving());
    assert_eq!(world.player_tile(), Some(TileCoord::new(2, 2, 0)));
    assert_eq!(occupancy(&world, "field", 2, 3), 0);
    assert_eq!(occupancy(&world, "field", 2, 2), 1);
}

#[test]
fn npcs_block_tiles_until_despawned() {
    let mut world = world(EngineConfig::new().with_move_mode(MoveMode::Turn));
    let deleted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&deleted);

    let id = world
        .spawn_npc("field", TileCoord::new(1, 2, 0), |mut npc| {
            npc.set_script(
                "on_delete",
                ScriptRef::from_fn(move |ctx| sink.lock().unwrap().push(ctx.entity)),
            );
            npc
        })
        .unwrap();

    assert!(!world.press(Facing::LEFT).unwrap());
    world.release(Facing::LEFT).unwrap();
    assert_eq!(occupancy(&world, "field", 1, 2), 1);

    world.despawn_npc(id).unwrap();
    assert_eq!(*deleted.lock().unwrap(), vec![id]);
    assert_eq!(occupancy(&world, "field", 1, 2), 0);
    assert!(world.press(Facing::LEFT).unwrap());
    assert_eq!(world.player_tile(), Some(TileCoord::new(1, 2, 0)));

    assert!(matches!(
        world.despawn_npc(id),
        Err(RuntimeError::NpcNotFound { .. })
    ));
}

#[test]
fn npc_taking_a_door_changes_area_without_moving_focus() {
    let mut world = world(EngineConfig::new().with_move_mode(MoveMode::Turn));
    let id = world
        .spawn_npc("field", TileCoord::new(4, 2, 0), |npc| npc)
        .unwrap();

    assert!(world.move_npc(id, Facing::LEFT).unwrap());

    assert_eq!(world.focus_name(), Some("field"));
    assert!(world.npcs_in("field").is_empty());
    assert_eq!(world.npcs_in("cave").len(), 1);
    assert_eq!(occupancy(&world, "cave", 1, 1), 1);
    assert_eq!(occupancy(&world, "field", 3, 2), 0);
    assert_eq!(occupancy(&world, "field", 4, 2), 0);
}

#[test]
fn turn_fires_on_turn_for_every_entity_in_focus() {
    let mut world = world(EngineConfig::new().with_move_mode(MoveMode::Turn));
    let turns = Arc::new(Mutex::new(0));

    for x in [6, 7] {
        let counter = Arc::clone(&turns);
        world
            .spawn_npc("field", TileCoord::new(x, 7, 0), move |mut npc| {
                npc.set_script(
                    "on_turn",
                    ScriptRef::from_fn(move |_| *counter.lock().unwrap() += 1),
                );
                npc
            })
            .unwrap();
    }
    world
        .spawn_npc("cave", TileCoord::new(0, 0, 0), |mut npc| {
            npc.set_script("on_turn", ScriptRef::from_fn(|_| panic!("cave is not focused")));
            npc
        })
        .unwrap();

    world.turn().unwrap();
    world.turn().unwrap();
    assert_eq!(*turns.lock().unwrap(), 4);
}

struct RecordingAudio(Arc<Mutex<Vec<(EntityId, SoundId)>>>);

impl AudioSink for RecordingAudio {
    fn play(&mut self, entity: EntityId, sound: &SoundId) {
        self.0.lock().unwrap().push((entity, sound.clone()));
    }
}

#[test]
fn step_sound_reaches_the_audio_sink() {
    let played = Arc::new(Mutex::new(Vec::new()));
    let player = Player::new(EntityId::PLAYER, HeldDirections::new())
        .with_sounds(SoundTable::new().with("step", SoundId::new("grass.ogg")));
    let mut world = World::new(EngineConfig::new(), source())
        .with_player(player)
        .unwrap()
        .with_audio(RecordingAudio(Arc::clone(&played)));
    world.focus("field", VirtCoord::new(5, 5, 0.0)).unwrap();

    world.press(Facing::UP).unwrap();
    assert_eq!(
        *played.lock().unwrap(),
        vec![(EntityId::PLAYER, SoundId::new("grass.ogg"))]
    );
}

#[test]
fn unfocused_world_refuses_updates() {
    let mut world = World::new(EngineConfig::new(), source());
    assert!(matches!(
        world.tick(Duration::from_millis(16)),
        Err(RuntimeError::NoFocus)
    ));
    assert!(matches!(
        world.focus("nowhere", VirtCoord::new(0, 0, 0.0)),
        Err(RuntimeError::Transition(_))
    ));
    assert_eq!(world.focus_name(), None);
}

#[test]
fn replacing_player_in_focused_world_moves_the_claim() {
    let world = world(EngineConfig::new().with_move_mode(MoveMode::Turn));
    let replacement = Player::new(EntityId::PLAYER, HeldDirections::new());
    let mut world = world.with_player(replacement).unwrap();

    assert_eq!(world.player_tile(), Some(TileCoord::new(2, 2, 0)));
    assert_eq!(world.player().occupied_tile(), Some(TileCoord::new(2, 2, 0)));
    assert_eq!(world.area("field").unwrap().total_occupancy(), 1);

    assert!(world.press(Facing::UP).unwrap());
    assert_eq!(occupancy(&world, "field", 2, 2), 0);
    assert_eq!(world.area("field").unwrap().total_occupancy(), 1);
}

#[test]
fn replacement_player_with_foreign_claim_is_refused() {
    let mut elsewhere = flat("cellar");
    let mut replacement = Player::new(EntityId::PLAYER, HeldDirections::new());
    replacement
        .set_tile_coords(&mut elsewhere, TileCoord::new(0, 0, 0))
        .unwrap();

    let result = world(EngineConfig::new()).with_player(replacement);
    assert!(matches!(
        result,
        Err(RuntimeError::Placement(tile_core::MoveError::ForeignClaim { .. }))
    ));
}

#[test]
fn zero_speed_config_is_refused() {
    let config = RuntimeConfig {
        engine: EngineConfig::new().with_base_speed(0.0),
        start_area: "field".to_owned(),
        ..RuntimeConfig::default()
    };
    let result = World::from_config(&config, source());
    assert!(matches!(
        result,
        Err(RuntimeError::Config(ConfigError::NonPositive {
            field: "base_speed",
            ..
        }))
    ));
}
