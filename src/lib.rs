//! Bacteria Zapper: click growing bacteria before they take over the field.
//!
//! The game core (`bacterium` through `game_loop`) is plain Rust over
//! `bevy::math` types. `plugin` runs it inside a Bevy app without rendering,
//! and `app` adds the camera, visuals, input and score window on top.

pub mod app;
pub mod bacterium;
pub mod camera;
pub mod config;
pub mod factory;
pub mod game_loop;
pub mod growth;
pub mod input;
pub mod picking;
pub mod plugin;
pub mod score;
pub mod session;
pub mod ui;
pub mod visuals;
