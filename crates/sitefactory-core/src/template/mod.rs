//! Template descriptors and component resolution
//!
//! This module provides:
//! - Manifest types (`TemplateDescriptor`, `ComponentDescriptor`, `ComponentStatus`)
//! - Loading of a template's `components.yml`
//! - The inclusion rules deciding which components take part in a build

pub mod manifest;
pub mod registry;

pub use manifest::{
    ComponentDescriptor, ComponentStatus, ComponentsManifest, GeneratorRequirements,
    TemplateDescriptor, TemplateMeta, MANIFEST_FILE,
};
pub use registry::{resolve, ExclusionReason, Resolution};
