//! islands-lib: build/assemble/launch pipeline for the Islands workspace.
//!
//! The workspace is made of independently built Maven modules (ModularKit,
//! CoffeeLoader, Islands). This crate provides:
//! - `config`: the immutable launcher configuration
//! - `process`: running a module's build command
//! - `artifact`: locating the artifact a build produced
//! - `assemble`: staging artifacts into the runtime output directory
//! - `pipeline`: sequencing build, assemble and launch
//! - `status`: read-only reports over configuration and artifacts

pub mod artifact;
pub mod assemble;
pub mod config;
pub mod consts;
pub mod java;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod status;

#[cfg(test)]
pub(crate) mod testutil;
