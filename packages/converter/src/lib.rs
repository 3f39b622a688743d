//! Drives a component conversion end to end: locates its source files,
//! runs the parser and resolvers, applies customizations, writes the
//! generated template, definition and review document, and keeps the
//! alias registry current.

mod config;
mod converter;
mod custom;
mod customization;
mod error;
mod progress;
mod registry;

pub use config::{Config, ProjectPaths, DEFAULT_CONFIG_NAME};
pub use converter::{
    component_from_source, ConversionSummary, ConvertOptions, Converter, NestedOutcome,
};
pub use custom::{AttributeSpec, ConditionalChild, CustomDefinition, WrapperDefinition};
pub use customization::{
    AppliedCustomization, AttributeAddition, AttributeOverride, Customization,
    CustomizationLoader, Notes, PassThroughSpec, ValueSource, TOKENS_FILE,
};
pub use error::{ConvertError, ConvertResult};
pub use progress::{Progress, Silent};
pub use registry::{AliasEntry, AliasRegistry};
