use crate::layout::TextColor;

/// Borrowed view of the chain of containers enclosing an element.
///
/// Scopes are created top-down while parsing and rendering, each one borrowing its
/// parent, so an element can consult its ancestors without owning them.
#[derive(Debug, Clone, Copy)]
pub struct ContainerScope<'a> {
    parent: Option<&'a ContainerScope<'a>>,
    forbidden: &'a [String],
    text_color: TextColor,
}

impl ContainerScope<'static> {
    /// Scope above the root container: allows everything, default text color.
    pub fn root() -> Self {
        ContainerScope {
            parent: None,
            forbidden: &[],
            text_color: TextColor::Default,
        }
    }
}

impl<'a> ContainerScope<'a> {
    /// Scope of a container nested directly in `self`.
    pub fn child<'b>(&'b self, forbidden: &'b [String], text_color: TextColor) -> ContainerScope<'b> {
        ContainerScope {
            parent: Some(self),
            forbidden,
            text_color,
        }
    }

    /// A type is allowed only when no container in the chain forbids it.
    pub fn is_allowed_item_type(&self, element_type: &str) -> bool {
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.forbidden.iter().any(|name| name == element_type) {
                return false;
            }
            current = scope.parent;
        }
        true
    }

    /// Explicit color if set, else inherited, else dark at the root.
    pub fn text_color(&self) -> TextColor {
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.text_color != TextColor::Default {
                return scope.text_color;
            }
            current = scope.parent;
        }
        TextColor::Dark
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent;
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent;
        }
        depth
    }
}

/// Mutable bookkeeping carried through a single parse.
#[derive(Debug, Default)]
pub struct ParseContext {
    next_group_id: usize,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out action group ids in document order.
    pub fn next_group_id(&mut self) -> usize {
        let id = self.next_group_id;
        self.next_group_id += 1;
        id
    }

    pub fn group_count(&self) -> usize {
        self.next_group_id
    }
}
