//! uplua-lib: core types and logic for up.lua
//!
//! This crate provides everything behind the `up` workspace generator:
//! - `Registry`: immutable snapshot of declared source modules and jar libraries
//! - `MavenCoords`: parsed third-party artifact coordinates
//! - `GoalsPathVar`: the `root // path:goal` addressing model
//! - `generate`: the artifact generators (build targets, path aliases,
//!   symlink farm, IDE descriptors)

pub mod addr;
pub mod consts;
pub mod coords;
pub mod eval;
pub mod fetch;
pub mod generate;
pub mod lua;
pub mod registry;
