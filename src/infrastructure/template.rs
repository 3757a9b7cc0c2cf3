//! Template Rendering
//!
//! Renders Jinja-style templates with `minijinja` and parses the result as a
//! JSON document.

use std::path::Path;

use minijinja::Environment;
use serde::Serialize;
use serde_json::Value;

use crate::error::TemplateError;

/// A rendered JSON document
#[derive(Debug, Clone, PartialEq)]
pub struct Document(Value);

impl Document {
    /// Document produced when the template does not exist
    pub fn empty() -> Self {
        Self(Value::Object(Default::default()))
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Pretty JSON with 4-space indentation and a trailing newline
    pub fn to_pretty_json(&self) -> String {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        // Serializing a `Value` into memory cannot fail.
        if self.0.serialize(&mut serializer).is_err() {
            return "{}\n".to_string();
        }
        let mut text = String::from_utf8_lossy(&out).into_owned();
        text.push('\n');
        text
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Render template source against `vars`
pub fn render_str<S: Serialize>(source: &str, vars: S) -> Result<String, TemplateError> {
    let env = Environment::new();
    Ok(env.render_str(source, vars)?)
}

/// Render a template file into a JSON document
///
/// A missing template is not an error: it yields [`Document::empty`], which
/// callers treat as "nothing to configure".
pub fn render<S: Serialize>(template: &Path, vars: S) -> Result<Document, TemplateError> {
    if !template.is_file() {
        tracing::debug!(template = %template.display(), "template not found; rendering empty document");
        return Ok(Document::empty());
    }

    let source = std::fs::read_to_string(template).map_err(|source| TemplateError::Read {
        path: template.to_path_buf(),
        source,
    })?;

    let rendered = render_str(&source, vars)?;
    let value = serde_json::from_str(&rendered).map_err(|source| TemplateError::Parse {
        path: template.to_path_buf(),
        source,
    })?;

    Ok(Document(value))
}
