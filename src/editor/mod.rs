//! Dual-view profile editor.
//!
//! The structured tabs and the raw text view edit the same `ConfigDocument`.
//! Exactly one of them is the writer at a time:
//!
//! - On a structured tab the document is the truth. Every edit rewrites the
//!   raw text from it.
//! - On the raw view, typed text is provisional. It reaches the document
//!   through `apply_raw`, through leaving the raw view, or through save.
//!   Unparsable text blocks leaving the view instead of being dropped.
//!
//! Nothing here performs I/O; `session::ProfileSession` pairs an editor with
//! the profile gateway.

pub mod session;
pub mod tabs;

use serde_json::Value;

use crate::document::raw::{parse_raw_text, to_raw_text};
use crate::document::{ConfigDocument, FieldPath, IntermediatePolicy};
use crate::errors::{DocumentError, EditorError};
use crate::profile::ProfileSnapshot;

pub use session::ProfileSession;
pub use tabs::{FieldKind, FieldSpec, SECTIONS, SectionSpec, TABS, TabSpec};

/// Which editing surface is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Structured(&'static str),
    Raw,
}

impl Default for View {
    fn default() -> Self {
        View::Structured(TABS[0].id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileEditor {
    category: Option<String>,
    document: ConfigDocument,
    raw_text: String,
    view: View,
    raw_dirty: bool,
    policy: IntermediatePolicy,
}

impl ProfileEditor {
    pub fn new() -> Self {
        let document = ConfigDocument::new();
        Self {
            raw_text: to_raw_text(&document),
            document,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: IntermediatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn has_pending_raw_edits(&self) -> bool {
        self.raw_dirty
    }

    /// Replace everything with a freshly loaded profile.
    pub fn load(&mut self, snapshot: ProfileSnapshot) {
        self.category = snapshot.category;
        self.replace_document(snapshot.config);
    }

    /// Adopt the document the server stored after a save.
    pub fn commit_saved(&mut self, stored: ConfigDocument) {
        self.replace_document(stored);
    }

    /// Adopt the stored form of one section after a section save. Other
    /// sections keep their local state.
    pub fn commit_section(&mut self, section: &SectionSpec, stored: &ConfigDocument) {
        let next = self.document.with_top_level_from(stored, section.keys);
        self.replace_document(next);
    }

    /// The document a section save sends. Pending raw edits must be applied
    /// or discarded first.
    pub fn prepare_section_save(&self) -> Result<ConfigDocument, EditorError> {
        if self.raw_dirty {
            return Err(EditorError::PendingRawEdits);
        }
        Ok(self.document.clone())
    }

    fn replace_document(&mut self, document: ConfigDocument) {
        self.raw_text = to_raw_text(&document);
        self.document = document;
        self.raw_dirty = false;
    }

    /// Display text of one structured field.
    pub fn field_value(&self, key: &str) -> Result<String, EditorError> {
        let spec = tabs::field(key).ok_or_else(|| DocumentError::UnknownField(key.to_string()))?;
        Ok(spec.read(&self.document))
    }

    /// `(label, display text)` for every field of a tab.
    pub fn tab_values(&self, tab_id: &str) -> Result<Vec<(&'static str, String)>, EditorError> {
        let tab = tabs::tab(tab_id).ok_or_else(|| DocumentError::UnknownField(tab_id.to_string()))?;
        Ok(tab
            .fields
            .iter()
            .map(|field| (field.label, field.read(&self.document)))
            .collect())
    }

    /// Structured edit of a known field from operator text.
    pub fn set_field(&mut self, key: &str, text: &str) -> Result<(), EditorError> {
        let spec = tabs::field(key).ok_or_else(|| DocumentError::UnknownField(key.to_string()))?;
        let path = spec.field_path()?;
        self.set_path(&path, spec.coerce(text))
    }

    /// Structured edit of an arbitrary path.
    pub fn set_path(&mut self, path: &FieldPath, value: Value) -> Result<(), EditorError> {
        if self.raw_dirty {
            return Err(EditorError::PendingRawEdits);
        }
        let next = self.document.try_with_value_at(path, value, self.policy)?;
        self.replace_document(next);
        Ok(())
    }

    /// Type into the raw view. The text is not parsed yet.
    pub fn edit_raw(&mut self, text: impl Into<String>) {
        self.view = View::Raw;
        self.raw_text = text.into();
        self.raw_dirty = true;
    }

    /// Parse the raw text now and make it the document.
    pub fn apply_raw(&mut self) -> Result<(), EditorError> {
        if !self.raw_dirty {
            return Ok(());
        }
        let parsed = parse_raw_text(&self.raw_text)?;
        self.replace_document(parsed);
        Ok(())
    }

    /// Drop pending raw edits and show the document again.
    pub fn discard_raw_edits(&mut self) {
        self.raw_text = to_raw_text(&self.document);
        self.raw_dirty = false;
    }

    /// Change the active view.
    ///
    /// Leaving the raw view applies pending edits; if they do not parse, the
    /// view stays on raw and the error is returned.
    pub fn switch_to(&mut self, view: View) -> Result<(), EditorError> {
        if let View::Structured(id) = view {
            if tabs::tab(id).is_none() {
                return Err(DocumentError::UnknownField(id.to_string()).into());
            }
        }
        if self.view == View::Raw && view != View::Raw {
            self.apply_raw()?;
        }
        self.view = view;
        Ok(())
    }

    /// The document to send on save. Does not change editor state.
    pub fn prepare_save(&self) -> Result<ConfigDocument, EditorError> {
        match self.view {
            View::Raw if self.raw_dirty => Ok(parse_raw_text(&self.raw_text)?),
            _ => Ok(self.document.clone()),
        }
    }
}
