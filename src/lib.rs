//! Stable assignment of students to projects with deferred acceptance.
//!
//! Students rank projects; projects rank the students whose grade reaches
//! their minimum, best grade first. Either side can propose, in input
//! order or in a seeded random order. See [`engine::Engine`].

pub mod checks;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod loaders;
pub mod model;
pub mod stats;
