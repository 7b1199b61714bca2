//! Semantic validation rules.
//!
//! A schema maps property names to lists of [`Rule`]s. Rules run after
//! structural construction succeeded and only see present values; absent
//! properties are the concern of the required check.

use chrono::NaiveDate;
use federation_types::{DiasporaId, Guid};

use crate::error::Violation;
use crate::value::Value;

/// Separator of diaspora IDs inside a list-valued string property.
pub const ID_LIST_SEPARATOR: char = ';';

/// A single validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The string has non-whitespace content, or the list has elements.
    NotEmpty,
    Guid,
    DiasporaId,
    /// `;`-separated diaspora IDs, between `min` and `max` of them.
    DiasporaIdList { min: usize, max: usize },
    /// Character count between `min` and `max`.
    Length { min: usize, max: usize },
    /// An integer, or a decimal string, inside `[min, max]`.
    Numeric { min: f64, max: f64 },
    /// At most `max` distinct `#tags` in the text.
    TagCount { max: usize },
    /// A calendar date `YYYY-MM-DD`.
    Birthday,
    /// An absolute http(s) URL.
    Url,
    OneOf(&'static [&'static str]),
    /// Number of nested entities between `min` and `max`.
    ListLength { min: usize, max: usize },
}

impl Rule {
    /// Stable key reported in [`Violation::rule`].
    pub fn key(&self) -> &'static str {
        match self {
            Self::NotEmpty => "not_empty",
            Self::Guid => "guid",
            Self::DiasporaId => "diaspora_id",
            Self::DiasporaIdList { .. } => "diaspora_id_list",
            Self::Length { .. } => "length",
            Self::Numeric { .. } => "numeric",
            Self::TagCount { .. } => "tag_count",
            Self::Birthday => "birthday",
            Self::Url => "url",
            Self::OneOf(_) => "one_of",
            Self::ListLength { .. } => "list_length",
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::DiasporaIdList { min, max }
            | Self::Length { min, max }
            | Self::ListLength { min, max } => {
                vec![("minimum", min.to_string()), ("maximum", max.to_string())]
            }
            Self::Numeric { min, max } => {
                vec![("minimum", min.to_string()), ("maximum", max.to_string())]
            }
            Self::TagCount { max } => vec![("maximum", max.to_string())],
            Self::OneOf(options) => vec![("options", options.join(","))],
            _ => Vec::new(),
        }
    }

    /// Checks a present value.
    pub fn check(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::NotEmpty, Value::String(s)) => !s.trim().is_empty(),
            (Self::NotEmpty, Value::List(items)) => !items.is_empty(),
            (Self::NotEmpty, _) => true,
            (Self::Guid, Value::String(s)) => Guid::is_valid(s),
            (Self::DiasporaId, Value::String(s)) => DiasporaId::is_valid(s),
            (Self::DiasporaIdList { min, max }, Value::String(s)) => {
                let ids: Vec<&str> = s
                    .split(ID_LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .collect();
                (*min..=*max).contains(&ids.len()) && ids.iter().all(|id| DiasporaId::is_valid(id))
            }
            (Self::Length { min, max }, Value::String(s)) => {
                (*min..=*max).contains(&s.chars().count())
            }
            (Self::Numeric { min, max }, Value::Integer(i)) => in_range(*i as f64, *min, *max),
            (Self::Numeric { min, max }, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .is_ok_and(|n| in_range(n, *min, *max)),
            (Self::TagCount { max }, Value::String(s)) => count_tags(s) <= *max,
            (Self::Birthday, Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            (Self::Url, Value::String(s)) => is_url(s),
            (Self::OneOf(options), Value::String(s)) => options.contains(&s.as_str()),
            (Self::ListLength { min, max }, Value::List(items)) => {
                (*min..=*max).contains(&items.len())
            }
            _ => false,
        }
    }

    pub(crate) fn violation(&self, property: &str, value: &Value) -> Violation {
        Violation::new(property, value.to_wire_string(), self.key()).with_params(self.params())
    }
}

fn in_range(n: f64, min: f64, max: f64) -> bool {
    n.is_finite() && n >= min && n <= max
}

fn count_tags(text: &str) -> usize {
    let mut tags: Vec<String> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|word| word.strip_prefix('#'))
        .map(|tag| tag.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_' && c != '-'))
        .filter(|tag| !tag.is_empty())
        .map(str::to_lowercase)
        .collect();
    tags.sort();
    tags.dedup();
    tags.len()
}

fn is_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
