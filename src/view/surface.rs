//! Display surface the pipeline renders into

use std::collections::BTreeMap;

/// Visible content area plus the document attributes that style it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    html: String,
    attributes: BTreeMap<String, String>,
    revealed: bool,
    renders: u64,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible content; the new content starts hidden
    pub fn attach(&mut self, html: String) {
        self.html = html;
        self.revealed = false;
        self.renders += 1;
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Rewrite the attached content in place
    pub fn update_html(&mut self, html: String) {
        self.html = html;
    }

    /// Fade the attached content in
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Number of times content has been attached
    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
