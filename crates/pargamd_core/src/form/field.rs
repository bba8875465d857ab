//! A single bound form field and its constraint check.

use serde_json::Value;

/// Input type of a field; drives validation and value coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Number { min: Option<f64>, max: Option<f64> },
    Select { options: Vec<String> },
    Checkbox,
}

/// Current value of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// 1-based wizard step whose section contains this field.
    pub section: usize,
    pub required: bool,
    value: FieldValue,
    invalid: bool,
}

impl Field {
    fn new(name: &str, label: &str, section: usize, kind: FieldKind) -> Self {
        let value = match kind {
            FieldKind::Checkbox => FieldValue::Checked(false),
            _ => FieldValue::Text(String::new()),
        };
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            section,
            required: false,
            value,
            invalid: false,
        }
    }

    pub fn text(name: &str, label: &str, section: usize) -> Self {
        Self::new(name, label, section, FieldKind::Text)
    }

    pub fn email(name: &str, label: &str, section: usize) -> Self {
        Self::new(name, label, section, FieldKind::Email)
    }

    pub fn number(
        name: &str,
        label: &str,
        section: usize,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        Self::new(name, label, section, FieldKind::Number { min, max })
    }

    pub fn select(name: &str, label: &str, section: usize, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(name, label, section, FieldKind::Select { options })
    }

    pub fn checkbox(name: &str, label: &str, section: usize) -> Self {
        Self::new(name, label, section, FieldKind::Checkbox)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_text(value);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.set_checked(checked);
        self
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self.kind, FieldKind::Checkbox)
    }

    /// Text value; `None` for checkboxes.
    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(s) => Some(s),
            FieldValue::Checked(_) => None,
        }
    }

    /// Checked state; `None` for non-checkboxes.
    pub fn is_checked(&self) -> Option<bool> {
        match self.value {
            FieldValue::Checked(c) => Some(c),
            FieldValue::Text(_) => None,
        }
    }

    /// Set a text value. Ignored on checkboxes.
    pub fn set_text(&mut self, value: &str) -> bool {
        if self.is_checkbox() {
            return false;
        }
        self.value = FieldValue::Text(value.to_string());
        true
    }

    /// Set the checked state. Ignored on non-checkboxes.
    pub fn set_checked(&mut self, checked: bool) -> bool {
        if !self.is_checkbox() {
            return false;
        }
        self.value = FieldValue::Checked(checked);
        true
    }

    /// Write a value received from a saved configuration.
    ///
    /// Checkboxes take the truthiness of the value, other fields its
    /// literal text.
    pub fn assign(&mut self, value: &Value) {
        if self.is_checkbox() {
            self.value = FieldValue::Checked(is_truthy(value));
        } else {
            self.value = FieldValue::Text(literal_text(value));
        }
    }

    /// Whether the last validation marked this field invalid.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Run the constraint check and update the invalid marker.
    pub fn validate(&mut self) -> bool {
        let valid = self.check_validity();
        self.invalid = !valid;
        valid
    }

    /// Constraint check in the manner of an HTML input.
    pub fn check_validity(&self) -> bool {
        match (&self.kind, &self.value) {
            (FieldKind::Checkbox, FieldValue::Checked(checked)) => !self.required || *checked,
            (_, FieldValue::Text(text)) if text.is_empty() => !self.required,
            (FieldKind::Text, FieldValue::Text(_)) => true,
            (FieldKind::Email, FieldValue::Text(text)) => is_email(text),
            (FieldKind::Number { min, max }, FieldValue::Text(text)) => {
                match text.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => {
                        min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m)
                    }
                    _ => false,
                }
            }
            (FieldKind::Select { options }, FieldValue::Text(text)) => {
                options.iter().any(|o| o == text)
            }
            _ => false,
        }
    }

    /// Value as it appears in a form snapshot.
    pub fn to_json(&self) -> Value {
        match &self.value {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Checked(c) => Value::Bool(*c),
        }
    }
}

fn is_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    match text.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Truthiness in the manner of the browser's checkbox assignment.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn literal_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
