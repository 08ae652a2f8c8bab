use std::collections::HashMap;

use super::{ThemeTarget, TOGGLE_ELEMENT_ID};

/// A minimal element: visible text plus an accessible label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub text_content: String,
    pub aria_label: Option<String>,
}

/// In-memory document: root attributes and elements addressed by id
#[derive(Debug, Clone, Default)]
pub struct Document {
    root_attributes: HashMap<String, String>,
    elements: HashMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document containing an empty `#theme-toggle` element
    pub fn with_toggle() -> Self {
        let mut document = Self::new();
        document.insert_element(TOGGLE_ELEMENT_ID, Element::default());
        document
    }

    pub fn insert_element(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn remove_root_attribute(&mut self, name: &str) -> Option<String> {
        self.root_attributes.remove(name)
    }
}

impl ThemeTarget for Document {
    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root_attributes.get(name).cloned()
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes
            .insert(name.to_string(), value.to_string());
    }

    fn update_toggle(&mut self, icon: &str, label: &str) {
        if let Some(toggle) = self.elements.get_mut(TOGGLE_ELEMENT_ID) {
            toggle.text_content = icon.to_string();
            toggle.aria_label = Some(label.to_string());
        }
    }
}
