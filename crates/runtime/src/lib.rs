//! Host runtime for the tile movement core.
//!
//! This crate owns what `tile-core` deliberately leaves out: area storage and
//! lazy loading, the set of live entities, the focused area, the simulation
//! clock, sound output, configuration files and log setup.
//!
//! Modules are organized by responsibility:
//! - [`world`] drives updates and applies area transfers
//! - [`areas`] caches areas and loads them from RON files or memory
//! - [`config`] reads [`RuntimeConfig`] from TOML
//! - [`logging`] installs the tracing subscriber
pub mod areas;
pub mod audio;
pub mod config;
pub mod logging;
pub mod world;

mod error;

pub use areas::{
    AreaLoader, AreaRegistry, AreaSource, FileAreaSource, LoadResult, StaticAreaSource,
};
pub use audio::{AudioSink, NullAudio};
pub use config::{ConfigLoader, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use logging::init_tracing;
pub use world::World;
