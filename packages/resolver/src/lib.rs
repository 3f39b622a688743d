//! Resolution of everything a component refers to outside its own file:
//! wrapped design-system base components, sibling components it renders,
//! and which sibling an array attribute's items describe.

pub mod base;
pub mod dist;
pub mod error;
pub mod nested;
pub mod shape;

pub use base::{BaseComponentResolver, BaseLookup, BaseResolution, Wrapper, UTRECHT_LIBRARY};
pub use dist::{detect_component, DetectedComponent, DetectedElement};
pub use error::{ResolverError, ResolverResult};
pub use nested::{NestedComponentDetector, NestedComponentRef};
pub use shape::{analyze_arrays, best_match, ArrayShapeMapping, ItemKind, ShapeMatch};
