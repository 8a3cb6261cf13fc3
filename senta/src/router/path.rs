use regex::Regex;

use super::{Params, apply_params};
use crate::error::SentaError;

/// Reduce a file-path-shaped route identifier to the canonical pattern grammar.
///
/// `[...name]` segments become `*`, `[name]` segments become `:name`, and every
/// other segment is kept verbatim. Backslashes are treated as separators.
///
/// ```rust
/// use senta::router::transform_filename;
///
/// assert_eq!(transform_filename("api/[user]"), "api/:user");
/// assert_eq!(transform_filename("api\\[...rest]"), "api/*");
/// ```
pub fn transform_filename(filename: &str) -> String {
    filename
        .replace('\\', "/")
        .split('/')
        .map(|part| {
            if part.starts_with("[...") && part.ends_with(']') {
                "*".to_string()
            } else if part.len() >= 2 && part.starts_with('[') && part.ends_with(']') {
                format!(":{}", &part[1..part.len() - 1])
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Output of the pattern pass: ordered parameter names plus the matcher
#[derive(Debug, Clone)]
pub struct CompiledPath {
    pub params: Vec<String>,
    pub pattern: Regex,
}

/// Compile a canonical pattern (`/api/:user`, `/files/*`, `/items/:id?`) into a
/// case-insensitive matcher.
///
/// A strict matcher (`loose == false`) must consume the whole path, allowing one
/// trailing slash. A loose matcher only needs the path to start with the pattern
/// followed by a separator or the end of the string.
pub fn path_to_regex(path: &str, loose: bool) -> Result<CompiledPath, SentaError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);

    let mut pattern = String::new();
    let mut params = Vec::new();

    for segment in trimmed.split('/') {
        let segment = segment.trim();

        if segment == "*" {
            pattern.push_str("/(.*)");
            params.push("*".to_string());
        } else if let Some(name) = segment.strip_prefix(':') {
            let name = match name.strip_suffix('?') {
                Some(optional) => {
                    pattern.push_str("(?:/([^/]+?))?");
                    optional
                }
                None => {
                    pattern.push_str("/([^/]+?)");
                    name
                }
            };

            // `:user.json` captures `user` and requires the literal `.json` after it
            match name.find('.') {
                Some(dot) => {
                    params.push(name[..dot].to_string());
                    pattern.push_str(&regex::escape(&name[dot..]));
                }
                None => params.push(name.to_string()),
            }
        } else {
            pattern.push('/');
            pattern.push_str(&regex::escape(segment));
        }
    }

    let tail = if loose { "(?:/|$)" } else { "/?$" };
    let source = format!("(?i)^{pattern}{tail}");

    let pattern = Regex::new(&source).map_err(|source| SentaError::Pattern {
        pattern: path.to_string(),
        source,
    })?;

    Ok(CompiledPath { params, pattern })
}

/// A route pattern compiled once at registration time
#[derive(Debug, Clone)]
pub struct RoutePattern {
    path: String,
    pattern: Regex,
    params: Vec<String>,
    loose: bool,
}

impl RoutePattern {
    pub fn compile(path: &str, loose: bool) -> Result<Self, SentaError> {
        let CompiledPath { params, pattern } = path_to_regex(path, loose)?;

        Ok(Self {
            path: path.to_string(),
            pattern,
            params,
            loose,
        })
    }

    /// Compile a file-path-shaped identifier such as `api/[user]`
    pub fn from_filename(filename: &str, loose: bool) -> Result<Self, SentaError> {
        Self::compile(&transform_filename(filename), loose)
    }

    /// The pattern string this matcher was compiled from
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Parameter names in occurrence order, duplicates included
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_loose(&self) -> bool {
        self.loose
    }

    pub fn matches(&self, pathname: &str) -> bool {
        self.pattern.is_match(pathname)
    }

    pub fn extract(&self, pathname: &str) -> Result<Params, SentaError> {
        apply_params(pathname, &self.pattern, &self.params)
    }
}
