use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tile_core::{Facing, MoveMode, TileCoord};
use tile_runtime::{
    AreaRegistry, AreaSource, ConfigLoader, FileAreaSource, RuntimeError, World,
};

const START: &str = r#"
    (
        width: 5,
        height: 5,
        tiles: [
            (x: 2, y: 3, exits: [(slot: Normal, area: "cellar", to: (x: 1, y: 0, z: 0.0))]),
            (x: 3, y: 2, exits: [(slot: Normal, area: "attic", to: (x: 0, y: 0, z: 0.0))]),
            (x: 1, y: 2, flags: "NOWALK"),
        ],
    )
"#;

const CELLAR: &str = "(width: 3, height: 3)";

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Areas plus a `game.toml` pointing at them.
fn content_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "start.ron", START);
    write(dir.path(), "cellar.ron", CELLAR);
    write(dir.path(), "attic.ron", "(width: 3, height: ");
    let config = format!(
        "start_area = \"start\"\n\
         start_coord = {{ x = 2, y = 2, z = 0.0 }}\n\
         area_dir = \"{}\"\n\
         \n\
         [engine]\n\
         move_mode = \"turn\"\n",
        dir.path().display()
    );
    write(dir.path(), "game.toml", &config);
    dir
}

fn start_world(dir: &TempDir) -> World {
    let config = ConfigLoader::load(&dir.path().join("game.toml")).unwrap();
    assert_eq!(config.engine.move_mode, MoveMode::Turn);
    World::from_config(&config, FileAreaSource::new(&config.area_dir)).unwrap()
}

#[test]
fn config_file_selects_start_area() {
    let dir = content_dir();
    let world = start_world(&dir);

    assert_eq!(world.focus_name(), Some("start"));
    assert_eq!(world.player_tile(), Some(TileCoord::new(2, 2, 0)));
}

#[test]
fn walls_from_file_block_movement() {
    let dir = content_dir();
    let mut world = start_world(&dir);

    assert!(!world.press(Facing::LEFT).unwrap());
    assert_eq!(world.player_tile(), Some(TileCoord::new(2, 2, 0)));
}

#[test]
fn door_lazily_loads_its_target() {
    let dir = content_dir();
    let mut world = start_world(&dir);
    assert!(world.area("cellar").is_none());

    assert!(world.press(Facing::DOWN).unwrap());

    assert_eq!(world.focus_name(), Some("cellar"));
    assert_eq!(world.player_tile(), Some(TileCoord::new(1, 0, 0)));
    assert_eq!(world.area("start").unwrap().total_occupancy(), 0);
}

#[test]
fn broken_target_file_rolls_back() {
    let dir = content_dir();
    let mut world = start_world(&dir);

    assert!(world.press(Facing::RIGHT).unwrap());

    assert_eq!(world.focus_name(), Some("start"));
    assert_eq!(world.player_tile(), Some(TileCoord::new(2, 2, 0)));
    let start = world.area("start").unwrap();
    assert_eq!(start.occupancy(TileCoord::new(3, 2, 0)), 0);
    assert_eq!(start.occupancy(TileCoord::new(2, 2, 0)), 1);
}

#[test]
fn file_source_distinguishes_missing_from_broken() {
    let dir = content_dir();
    let source = FileAreaSource::new(dir.path());

    assert!(matches!(
        source.load("basement"),
        Err(tile_core::TransitionError::AreaNotFound { .. })
    ));
    assert!(matches!(
        source.load("attic"),
        Err(tile_core::TransitionError::AreaLoad { .. })
    ));

    let mut registry = AreaRegistry::new(source);
    registry.ensure_loaded("cellar").unwrap();
    assert_eq!(registry.get("cellar").unwrap().geometry().dimensions().width, 3);
}

#[test]
fn missing_start_area_fails_startup() {
    let dir = content_dir();
    let mut config = ConfigLoader::load(&dir.path().join("game.toml")).unwrap();
    config.start_area = "lobby".to_owned();

    let result = World::from_config(&config, FileAreaSource::new(dir.path()));
    assert!(matches!(result, Err(RuntimeError::Transition(_))));
}
