//! Generic node containers

use super::extras::{Extras, HasExtras};

/// An ordered sequence of nodes with optional enclosing markers
///
/// `when` entries use `{`/`}`; annotation sets use `[`/`]` only when the
/// source had them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeList<T> {
    pub elements: Vec<T>,
    pub prefix: Option<&'static str>,
    pub suffix: Option<&'static str>,
    pub extras: Extras,
}

impl<T> NodeList<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self {
            elements,
            prefix: None,
            suffix: None,
            extras: Extras::default(),
        }
    }

    pub fn enclosed(elements: Vec<T>, prefix: &'static str, suffix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            suffix: Some(suffix),
            ..Self::new(elements)
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }
}

/// Nodes separated by commas, with an optional trailing comma
///
/// The markers are fixed text such as `(`/`)` for argument lists, `<`/`>` for
/// type arguments or a lone `:` prefix for supertype lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommaSeparatedNodeList<T> {
    pub elements: Vec<T>,
    pub trailing_comma: bool,
    pub prefix: Option<&'static str>,
    pub suffix: Option<&'static str>,
    pub extras: Extras,
}

impl<T> CommaSeparatedNodeList<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self {
            elements,
            trailing_comma: false,
            prefix: None,
            suffix: None,
            extras: Extras::default(),
        }
    }

    pub fn enclosed(elements: Vec<T>, prefix: &'static str, suffix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            suffix: Some(suffix),
            ..Self::new(elements)
        }
    }

    pub fn prefixed(elements: Vec<T>, prefix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            ..Self::new(elements)
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T> HasExtras for NodeList<T> {
    fn extras(&self) -> &Extras {
        &self.extras
    }

    fn extras_mut(&mut self) -> &mut Extras {
        &mut self.extras
    }
}

impl<T> HasExtras for CommaSeparatedNodeList<T> {
    fn extras(&self) -> &Extras {
        &self.extras
    }

    fn extras_mut(&mut self) -> &mut Extras {
        &mut self.extras
    }
}

impl<'a, T> IntoIterator for &'a NodeList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<'a, T> IntoIterator for &'a CommaSeparatedNodeList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
