//! Scene Module
//!
//! Headless model of the card's page: a set of optional elements carrying
//! classes, inline styles, attributes and text. Every mutation reports
//! whether the element existed, and an absent element is never an error.

mod capabilities;
mod element;

use std::collections::BTreeMap;

use serde::Serialize;

pub use capabilities::Capabilities;
pub use element::{Element, ElementId};

/// The elements present on the page
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    elements: BTreeMap<ElementId, Element>,
}

impl Scene {
    /// A page with no card markup at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A page with every element in its initial state
    pub fn full() -> Self {
        Self::with_elements(ElementId::ALL)
    }

    /// A page containing only the given elements
    pub fn with_elements(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let mut scene = Self::empty();
        for id in ids {
            scene.insert(id);
        }
        scene
    }

    /// Remove an element, builder style
    pub fn without(mut self, id: ElementId) -> Self {
        self.elements.remove(&id);
        self
    }

    /// Add an element in its initial markup state.
    pub fn insert(&mut self, id: ElementId) {
        let mut element = Element::default();
        match id {
            ElementId::OpenControl => {
                element
                    .attributes
                    .insert("aria-expanded".to_string(), "false".to_string());
            }
            ElementId::CardStage => {
                element
                    .styles
                    .insert("display".to_string(), "none".to_string());
            }
            _ => {}
        }
        self.elements.insert(id, element);
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|el| el.has_class(class))
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.style(property))
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id).and_then(|el| el.attribute(name))
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|el| el.text.as_str())
    }

    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|el| el.disabled)
    }

    // ------------------------------------------------------------------------
    // Mutations (all return false when the element is absent)
    // ------------------------------------------------------------------------

    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        self.with(id, |el| {
            el.classes.insert(class.to_string());
        })
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        self.with(id, |el| {
            el.classes.remove(class);
        })
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) -> bool {
        self.with(id, |el| {
            el.styles.insert(property.to_string(), value.to_string());
        })
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) -> bool {
        self.with(id, |el| {
            el.attributes.insert(name.to_string(), value.to_string());
        })
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        self.with(id, |el| el.text = text.to_string())
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) -> bool {
        self.with(id, |el| el.disabled = disabled)
    }

    fn with(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                f(el);
                true
            }
            None => false,
        }
    }
}
