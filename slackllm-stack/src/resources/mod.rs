//! Typed properties for the resource families the stack declares

pub mod dynamodb;
pub mod iam;
pub mod lambda;
