//! # Sable Core
//!
//! Core runtime library for the Sable engine.
//!
//! This crate provides the foundational types shared by gameplay code and the
//! engine subsystems:
//! - **Scene**: entity storage on top of `hecs` with transform and name components
//! - **Math**: glam re-exports and the engine's Euler-angle conventions
//! - **Time**: clamped frame deltas and fixed-step substep scheduling

pub mod math;
pub mod scene;
pub mod time;

pub use hecs::Entity;
pub use scene::{NameComponent, Scene, TransformComponent};
pub use time::{FixedTimeStep, FrameClock, StepAccumulator};
