pub mod ast;
pub mod classes;
pub mod content;
pub mod defaults;
pub mod error;
pub mod imports;
pub mod interface;
pub mod jsx;
pub mod literal;
pub mod scan;
pub mod source;
pub mod visitor;

pub use ast::*;
pub use classes::{
    extract_switches, switch_class_mappings, AttrExtractor, ClassExtraction, ClsxExtractor,
    NoBaseClasses, PropClassLookup,
};
pub use content::{ContentExtraction, ContentExtractor};
pub use error::{ParseError, ParseResult};
pub use interface::TypeScope;
pub use jsx::{JsxElement, JsxNode};
pub use source::{parse_component, SourceModel};
pub use visitor::{walk_all, walk_content, ContentVisitor, ContentVisitorMut};
