//! Jinja code generation for converted components: the template itself,
//! the component definition JSON and the markdown review report.

mod class_builder;
mod context;
mod definition;
mod error;
mod expr;
mod names;
mod report;
mod template;

pub use class_builder::{condition_for, ClassBuilder};
pub use context::{CompileOptions, Context};
pub use definition::{
    compute_hash, AttributeDefinition, BaseComponentRef, ComponentDefinition, DefinitionGenerator,
    DefinitionInput, NestedComponentEntry,
};
pub use error::{CompileError, CompileResult};
pub use expr::{quote, template_literal, translate, CONTENT_VAR};
pub use names::{is_reserved, NameMap};
pub use report::{automation_percentage, review_document, title_case};
pub use template::{
    compile_to_jinja, default_value, format_value, Compilation, ConditionalAttribute,
    PassThroughAttribute, RootElement, RootTag, TemplateInput,
};
