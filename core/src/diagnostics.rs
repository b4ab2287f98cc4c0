use once_cell::sync::Lazy;
use regex::Regex;

use crate::index::SymbolIndex;

// CS0103 and CS0246 as reported by the C# compiler / language service.
static MISSING_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"The name '(\w+)' does not exist in the current context").expect("missing name regex")
});
static MISSING_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"The type or namespace name '(\w+)' could not be found").expect("missing type regex")
});

/// Name of the unresolved symbol a diagnostic message complains about, if any.
pub fn missing_symbol_name(message: &str) -> Option<&str> {
    [&*MISSING_NAME, &*MISSING_TYPE]
        .into_iter()
        .find_map(|re| re.captures(message).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

/// Unresolved names that the index can provide, first occurrence order, no duplicates.
pub fn missing_symbols<'a, I>(messages: I, index: &SymbolIndex) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in messages.into_iter().filter_map(missing_symbol_name) {
        if index.contains(name) && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}
