//! Path template parsing and substitution.
//!
//! A template is made of literal text and `/:name` placeholders, where `name` is one or more
//! ascii letters or hyphens. Anything else, including a bare `/:`, is literal text.

use crate::value::{is_truthy, stringify};
use crate::{ParamMap, RouteError};
use std::collections::HashSet;
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A parsed path template, borrowing from its source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

/// Result of a successful substitution: the resolved url and the unconsumed parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    url: String,
    remainder: ParamMap,
}

/// Substitutes every placeholder of `template` with the matching value of `params`.
///
/// Placeholders are resolved left to right and the first one without a truthy value fails the
/// whole call with [`RouteError::MissingPathParameter`]; no partial url is ever returned.
/// `params` is left untouched, the returned [`Substitution`] owns the remainder.
pub fn substitute(template: &str, params: &ParamMap) -> Result<Substitution, RouteError> {
    PathTemplate::parse(template).substitute(params)
}

impl<'a> PathTemplate<'a> {
    pub fn parse(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut index = 0;

        while index + 1 < bytes.len() {
            if bytes[index] == b'/' && bytes[index + 1] == b':' {
                let name_start = index + 2;
                let name_len =
                    bytes[name_start..].iter().take_while(|b| b.is_ascii_alphabetic() || **b == b'-').count();

                if name_len > 0 {
                    if literal_start < index {
                        segments.push(Segment::Literal(&source[literal_start..index]));
                    }
                    let name_end = name_start + name_len;
                    segments.push(Segment::Placeholder(&source[name_start..name_end]));
                    literal_start = name_end;
                    index = name_end;
                    continue;
                }
            }
            index += 1;
        }

        if literal_start < source.len() {
            segments.push(Segment::Literal(&source[literal_start..]));
        }

        Self { source, segments }
    }

    /// The template this was parsed from
    pub fn as_str(&self) -> &'a str {
        self.source
    }

    /// Placeholder names in order of appearance, repeats included.
    pub fn placeholders(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(*name),
            Segment::Literal(_) => None,
        })
    }

    #[inline]
    pub fn has_placeholders(&self) -> bool {
        self.placeholders().next().is_some()
    }

    /// Substitutes the placeholders with values from `params`.
    ///
    /// A name used by several placeholders takes the same value at every occurrence and is
    /// removed from the remainder once.
    pub fn substitute(&self, params: &ParamMap) -> Result<Substitution, RouteError> {
        let mut url = String::with_capacity(self.source.len());
        let mut consumed = HashSet::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => url.push_str(literal),
                Segment::Placeholder(name) => {
                    let value = params
                        .get(*name)
                        .filter(|value| is_truthy(value))
                        .ok_or_else(|| RouteError::missing_path_parameter(*name))?;
                    url.push('/');
                    url.push_str(&urlencoding::encode(&stringify(value)));
                    consumed.insert(*name);
                }
            }
        }

        let remainder = params
            .iter()
            .filter(|(key, _)| !consumed.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<ParamMap>();

        trace!(template = self.source, url = %url, remaining = remainder.len(), "substituted path params");
        Ok(Substitution { url, remainder })
    }

    /// Rewrites the template into matchit syntax: `/:name` becomes `/{name}` and literal braces
    /// are escaped.
    pub fn to_router_path(&self) -> String {
        let mut path = String::with_capacity(self.source.len() + 2);
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    for c in literal.chars() {
                        match c {
                            '{' => path.push_str("{{"),
                            '}' => path.push_str("}}"),
                            _ => path.push(c),
                        }
                    }
                }
                Segment::Placeholder(name) => {
                    path.push_str("/{");
                    path.push_str(name);
                    path.push('}');
                }
            }
        }
        path
    }
}

impl fmt::Display for PathTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}

impl Substitution {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parameters the template never referenced
    pub fn remainder(&self) -> &ParamMap {
        &self.remainder
    }

    pub fn into_parts(self) -> (String, ParamMap) {
        (self.url, self.remainder)
    }
}
