//! Minimal element selectors
//!
//! Supports the three forms the widgets need: `tag`, `.class` and
//! `tag.class`.

use crate::document::Node;
use crate::error::{CoreError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    class: Option<String>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let invalid = || CoreError::InvalidSelector(input.to_string());
        if input.is_empty() || input.contains(char::is_whitespace) {
            return Err(invalid());
        }

        let (tag, class) = match input.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (input, None),
        };
        if class.is_some_and(|c| c.is_empty() || c.contains('.')) {
            return Err(invalid());
        }
        let tag = (!tag.is_empty()).then(|| tag.to_string());
        if tag.is_none() && class.is_none() {
            return Err(invalid());
        }

        Ok(Self {
            tag,
            class: class.map(str::to_string),
        })
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self {
            tag: None,
            class: Some(class.into()),
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            class: None,
        }
    }

    pub fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if node.kind().tag() != tag {
                return false;
            }
        }
        match &self.class {
            Some(class) => node.has_class(class),
            None => true,
        }
    }
}

impl std::str::FromStr for Selector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
