use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::SentaError;

/// Extracted route parameters. `None` marks a parameter that did not capture
/// anything, which keeps an omitted optional segment distinct from a value.
pub type Params = FxHashMap<String, Option<String>>;

/// Apply a compiled matcher to `pathname` and bind each capture to its name.
///
/// Returns [`SentaError::NoMatch`] when the matcher rejects the path instead of
/// producing a partially filled mapping. Later duplicates of a name overwrite
/// earlier ones.
pub fn apply_params(pathname: &str, pattern: &Regex, params: &[String]) -> Result<Params, SentaError> {
    let captures = pattern.captures(pathname).ok_or_else(|| SentaError::NoMatch {
        pattern: pattern.as_str().to_string(),
        path: pathname.to_string(),
    })?;

    let mut output = Params::default();
    for (index, name) in params.iter().enumerate() {
        let value = captures
            .get(index + 1)
            .map(|capture| capture.as_str())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        output.insert(name.clone(), value);
    }

    Ok(output)
}
