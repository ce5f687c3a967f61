//! Client-side form validation.
//!
//! A [`Schema`] is an ordered list of field rules. Validation walks every field,
//! keeps the first violation found for each one, and reports them together so a
//! form can show all of its problems at once. Any reported error blocks the
//! submission before a request is built.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use super::draft::FormDraft;
use super::value::FieldValue;
use crate::config::UploadConfig;

lazy_static! {
    /// Digits only (prices, quantities, phone numbers, pincodes)
    pub static ref NUMERIC: Regex = Regex::new(r"^[0-9]+$").unwrap();

    /// Letters and digits only (slugs, coupon codes)
    pub static ref ALPHANUMERIC: Regex = Regex::new(r"^[a-zA-Z0-9]+$").unwrap();

    /// Something@something.tld with no whitespace
    pub static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Field name to the message shown under it.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Free text that must hold digits; only changes the type-error wording
    Number,
    File,
}

#[derive(Debug, Clone)]
pub enum Rule {
    Pattern { regex: &'static Regex, message: String },
    Email(String),
    Url(String),
    OneOf { allowed: Vec<&'static str>, message: String },
    Length { min: Option<usize>, max: Option<usize>, message: String },
    SameAs { other: &'static str, message: String },
    FileSize { max_bytes: u64, message: String },
    FileType { allowed: Vec<String>, message: String },
}

impl Rule {
    fn check(&self, value: &FieldValue, draft: &FormDraft) -> Result<(), String> {
        match self {
            Rule::Pattern { regex, message } => text_check(value, message, |s| regex.is_match(s)),
            Rule::Email(message) => text_check(value, message, |s| EMAIL.is_match(s)),
            Rule::Url(message) => text_check(value, message, is_web_url),
            Rule::OneOf { allowed, message } => {
                text_check(value, message, |s| allowed.contains(&s))
            }
            Rule::Length { min, max, message } => text_check(value, message, |s| {
                let len = s.chars().count();
                min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
            }),
            Rule::SameAs { other, message } => {
                let theirs = draft.text(other).unwrap_or_default();
                text_check(value, message, |s| s == theirs)
            }
            Rule::FileSize { max_bytes, message } => match value.as_upload() {
                Some(upload) if upload.size() <= *max_bytes => Ok(()),
                _ => Err(message.clone()),
            },
            Rule::FileType { allowed, message } => match value.as_upload() {
                Some(upload) if allowed.iter().any(|m| m.eq_ignore_ascii_case(&upload.content_type)) => {
                    Ok(())
                }
                _ => Err(message.clone()),
            },
        }
    }
}

fn text_check(value: &FieldValue, message: &str, ok: impl Fn(&str) -> bool) -> Result<(), String> {
    match value.as_text() {
        Some(s) if ok(s) => Ok(()),
        _ => Err(message.to_string()),
    }
}

fn is_web_url(s: &str) -> bool {
    match reqwest::Url::parse(s) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().map_or(false, |h| h.contains('.') || h == "localhost")
        }
        Err(_) => false,
    }
}

/// Validation rules for one form field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: Option<String>,
    pub default: Option<&'static str>,
    pub rules: Vec<Rule>,
}

impl FieldRule {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: None,
            default: None,
            rules: Vec::new(),
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn file(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::File)
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn matches(mut self, regex: &'static Regex, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Email(message.into()));
        self
    }

    pub fn url(mut self, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Url(message.into()));
        self
    }

    pub fn one_of(mut self, allowed: &[&'static str], message: impl Into<String>) -> Self {
        self.rules.push(Rule::OneOf {
            allowed: allowed.to_vec(),
            message: message.into(),
        });
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>, message: impl Into<String>) -> Self {
        self.rules.push(Rule::Length {
            min,
            max,
            message: message.into(),
        });
        self
    }

    pub fn same_as(mut self, other: &'static str, message: impl Into<String>) -> Self {
        self.rules.push(Rule::SameAs {
            other,
            message: message.into(),
        });
        self
    }

    /// Required image upload bounded by the configured size and MIME allow-list.
    pub fn image(mut self, limits: &UploadConfig) -> Self {
        self.required = Some("File is required".to_string());
        self.rules.push(Rule::FileSize {
            max_bytes: limits.max_file_bytes,
            message: format!(
                "File size should be less than {}",
                human_size(limits.max_file_bytes)
            ),
        });
        self.rules.push(Rule::FileType {
            allowed: limits.allowed_mime_types.clone(),
            message: "Please select a valid image".to_string(),
        });
        self
    }

    fn type_error(&self) -> String {
        match self.kind {
            FieldKind::Text => format!("{} must contain characters only", self.label),
            FieldKind::Number => format!("{} must contain number only", self.label),
            FieldKind::File => "Please select a valid image".to_string(),
        }
    }

    /// First violation for this field, if any.
    pub fn check(&self, draft: &FormDraft) -> Option<String> {
        let value = draft.value(self.name);

        if let Some(v) = value {
            let wrong_kind = match self.kind {
                FieldKind::File => !v.is_file() && !v.is_blank(),
                FieldKind::Text | FieldKind::Number => v.is_file(),
            };
            if wrong_kind {
                return Some(self.type_error());
            }
        }

        let value = match value {
            Some(v) if !v.is_blank() => v,
            // Nullable fields accept nothing at all
            _ => return self.required.clone(),
        };

        self.rules
            .iter()
            .find_map(|rule| rule.check(value, draft).err())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn has_file_fields(&self) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::File)
    }

    pub fn validate(&self, draft: &FormDraft) -> Result<(), FieldErrors> {
        let errors: FieldErrors = self
            .fields
            .iter()
            .filter_map(|field| field.check(draft).map(|msg| (field.name.to_string(), msg)))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Decimal size for messages: "3MB", "2.5MB", "500KB", "800B".
fn human_size(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        let tenths = bytes / 100_000;
        match tenths % 10 {
            0 => format!("{}MB", tenths / 10),
            d => format!("{}.{}MB", tenths / 10, d),
        }
    } else if bytes >= 1_000 {
        format!("{}KB", bytes / 1_000)
    } else {
        format!("{}B", bytes)
    }
}
