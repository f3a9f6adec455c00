//! Textual import rewriting.
//!
//! Imports are rewritten with plain substring replacement, not by parsing.
//! Forms that do not match the literal patterns (parenthesized multi-line
//! lists of submodules, `importlib` calls, names inside strings) keep the
//! old module names.

use super::plan::RenameMap;

/// Apply every rename to `text`.
///
/// Pairs are applied longest old name first, so `pkg.sub.helper_a` is
/// rewritten before `pkg` can match the front of it.
pub fn rewrite_imports(text: &str, renames: &RenameMap) -> String {
    substitution_order(renames)
        .into_iter()
        .fold(text.to_string(), |text, (old_name, new_name)| {
            rewrite_module_reference(&text, old_name, new_name)
        })
}

/// The four literal substitutions for one module, in order.
pub fn rewrite_module_reference(text: &str, old_name: &str, new_name: &str) -> String {
    text.replace(
        &format!("\nfrom {} import ", old_name),
        &format!("\nfrom {} import ", new_name),
    )
    .replace(
        &format!("\nimport {}", old_name),
        &format!("\nimport {}", new_name),
    )
    .replace(
        &format!("import {}", old_name),
        &format!("import {}", new_name),
    )
    .replace(
        &format!("from {} import ", old_name),
        &format!("from {} import ", new_name),
    )
}

fn substitution_order(renames: &RenameMap) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = renames
        .iter()
        .map(|(old, new)| (old.as_str(), new.as_str()))
        .collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
    pairs
}
