use crate::ast::*;

/// Visitor for walking content trees immutably
///
/// The default implementation walks every child. Override `visit_content`
/// to act on nodes, calling `walk_content_children` to keep descending.
pub trait ContentVisitor: Sized {
    fn visit_content(&mut self, element: &ContentElement) {
        walk_content_children(self, element);
    }
}

/// Mutable visitor for rewriting content trees in place
pub trait ContentVisitorMut: Sized {
    fn visit_content_mut(&mut self, element: &mut ContentElement) {
        walk_content_children_mut(self, element);
    }
}

pub fn walk_content_children<V: ContentVisitor>(visitor: &mut V, element: &ContentElement) {
    match element {
        ContentElement::Literal { .. }
        | ContentElement::Fallback { .. }
        | ContentElement::ContentCall { .. }
        | ContentElement::Unsupported { .. } => {
            // Leaf nodes
        }
        ContentElement::Reference { resolved, .. } => {
            if let Some(inner) = resolved {
                visitor.visit_content(inner);
            }
        }
        ContentElement::Element(html) => {
            for child in &html.children {
                visitor.visit_content(child);
            }
        }
        ContentElement::Component(usage) => {
            for child in &usage.children {
                visitor.visit_content(child);
            }
        }
        ContentElement::ConditionalComponent { component, .. } => {
            for child in &component.children {
                visitor.visit_content(child);
            }
        }
        ContentElement::Conditional { body, .. } => {
            for child in body {
                visitor.visit_content(child);
            }
        }
        ContentElement::Ternary {
            when_true,
            when_false,
            ..
        } => {
            visitor.visit_content(when_true);
            visitor.visit_content(when_false);
        }
        ContentElement::Branches { branches } => {
            for branch in branches {
                for child in &branch.body {
                    visitor.visit_content(child);
                }
            }
        }
        ContentElement::ArrayMap(map) => {
            for child in &map.body {
                visitor.visit_content(child);
            }
        }
    }
}

pub fn walk_content_children_mut<V: ContentVisitorMut>(visitor: &mut V, element: &mut ContentElement) {
    match element {
        ContentElement::Literal { .. }
        | ContentElement::Fallback { .. }
        | ContentElement::ContentCall { .. }
        | ContentElement::Unsupported { .. } => {
            // Leaf nodes
        }
        ContentElement::Reference { resolved, .. } => {
            if let Some(inner) = resolved {
                visitor.visit_content_mut(inner);
            }
        }
        ContentElement::Element(html) => {
            for child in &mut html.children {
                visitor.visit_content_mut(child);
            }
        }
        ContentElement::Component(usage) => {
            for child in &mut usage.children {
                visitor.visit_content_mut(child);
            }
        }
        ContentElement::ConditionalComponent { component, .. } => {
            for child in &mut component.children {
                visitor.visit_content_mut(child);
            }
        }
        ContentElement::Conditional { body, .. } => {
            for child in body {
                visitor.visit_content_mut(child);
            }
        }
        ContentElement::Ternary {
            when_true,
            when_false,
            ..
        } => {
            visitor.visit_content_mut(when_true);
            visitor.visit_content_mut(when_false);
        }
        ContentElement::Branches { branches } => {
            for branch in branches {
                for child in &mut branch.body {
                    visitor.visit_content_mut(child);
                }
            }
        }
        ContentElement::ArrayMap(map) => {
            for child in &mut map.body {
                visitor.visit_content_mut(child);
            }
        }
    }
}

struct FnVisitor<F>(F);

impl<F: FnMut(&ContentElement)> ContentVisitor for FnVisitor<F> {
    fn visit_content(&mut self, element: &ContentElement) {
        (self.0)(element);
        walk_content_children(self, element);
    }
}

/// Call `f` on `element` and every descendant, pre-order.
pub fn walk_content(element: &ContentElement, f: &mut impl FnMut(&ContentElement)) {
    FnVisitor(f).visit_content(element);
}

/// [`walk_content`] over a list of roots.
pub fn walk_all(elements: &[ContentElement], mut f: impl FnMut(&ContentElement)) {
    for element in elements {
        walk_content(element, &mut f);
    }
}
