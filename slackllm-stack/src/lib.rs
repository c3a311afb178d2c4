//! Deployment-template synthesizer for the Slackllm chat bot
//!
//! This crate models the bot's cloud stack (compute function,
//! user-preferences table, execution identity, public endpoint) as one
//! typed configuration and synthesizes the provisioning artifact the
//! engine applies. Synthesis is synchronous and side-effect free, and
//! a given configuration always serializes to the same bytes.

/// Code-asset planning for the function package
pub mod assets;

/// Deploy-time parameter surface
pub mod parameters;

/// Typed resource properties
pub mod resources;

/// Stack configuration and synthesis
pub mod stack;

/// Provisioning artifact document model
pub mod template;

pub use parameters::StackParameters;
pub use stack::{StackConfig, SynthesizedStack, TemplateRevision};
