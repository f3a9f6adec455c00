//! Import statement extraction for Python sources.
//!
//! Uses the tree-sitter Python grammar and walks the whole tree, so imports
//! nested in functions, classes, conditionals and `try` blocks are found
//! just like top-level ones.

use crate::errors::{Error, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// A single imported module reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatement {
    /// `import a.b` or `import a.b as c`; one entry per imported name
    Import { module: String, line: usize },
    /// `from a.b import x, y`, `from ..a import x`, `from . import x`,
    /// `from a import *` (names holds `"*"`)
    From {
        module: String,
        level: usize,
        names: Vec<String>,
        line: usize,
    },
}

impl ImportStatement {
    pub fn line(&self) -> usize {
        match self {
            Self::Import { line, .. } | Self::From { line, .. } => *line,
        }
    }
}

/// Parse Python source into a tree-sitter tree
pub fn parse_source(content: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: format!("Failed to set tree-sitter language: {}", e),
        })?;

    parser.parse(content, None).ok_or_else(|| Error::Parse {
        path: path.to_path_buf(),
        message: "Failed to parse source code".to_string(),
    })
}

/// Extract every import statement from Python source.
///
/// Trees with syntax errors are still walked; whatever statements the
/// grammar could recover are returned.
pub fn extract_imports(content: &str, path: &Path) -> Result<Vec<ImportStatement>> {
    let tree = parse_source(content, path)?;
    if tree.root_node().has_error() {
        tracing::debug!("Syntax errors in {}, scanning recovered tree", path.display());
    }

    let mut imports = Vec::new();
    extract_imports_recursive(&tree.root_node(), content, &mut imports);
    Ok(imports)
}

fn extract_imports_recursive(node: &Node, source: &str, imports: &mut Vec<ImportStatement>) {
    match node.kind() {
        "import_statement" => {
            let line = node_line(node);
            imports.extend(imported_names(node, source).into_iter().map(|module| {
                ImportStatement::Import { module, line }
            }));
            return;
        }
        "import_from_statement" => {
            if let Some(statement) = extract_from_import(node, source) {
                imports.push(statement);
            }
            return;
        }
        "future_import_statement" => {
            imports.push(ImportStatement::From {
                module: "__future__".to_string(),
                level: 0,
                names: imported_names(node, source),
                line: node_line(node),
            });
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        extract_imports_recursive(&child, source, imports);
    }
}

fn extract_from_import(node: &Node, source: &str) -> Option<ImportStatement> {
    let module_node = node.child_by_field_name("module_name")?;
    let (module, level) = match module_node.kind() {
        "relative_import" => relative_module(&module_node, source),
        _ => (dotted_text(&module_node, source), 0),
    };

    let mut names = imported_names(node, source);
    let mut cursor = node.walk();
    if node
        .children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import")
    {
        names.push("*".to_string());
    }

    Some(ImportStatement::From {
        module,
        level,
        names,
        line: node_line(node),
    })
}

/// `..pkg.mod` -> ("pkg.mod", 2)
fn relative_module(node: &Node, source: &str) -> (String, usize) {
    let mut level = 0;
    let mut module = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_prefix" => {
                level = node_text(&child, source).matches('.').count();
            }
            "dotted_name" => module = dotted_text(&child, source),
            _ => {}
        }
    }
    (module, level)
}

/// Names bound by the `name` fields of an import, with aliases dropped.
fn imported_names(node: &Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    node.children_by_field_name("name", &mut cursor)
        .filter_map(|child| match child.kind() {
            "aliased_import" => child
                .child_by_field_name("name")
                .map(|name| dotted_text(&name, source)),
            _ => Some(dotted_text(&child, source)),
        })
        .collect()
}

/// Text of a dotted name with any whitespace around the dots removed
fn dotted_text(node: &Node, source: &str) -> String {
    node_text(node, source).split_whitespace().collect()
}

/// Get text for a tree-sitter node
fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn extract(source: &str) -> Vec<ImportStatement> {
        extract_imports(source, Path::new("test.py")).unwrap()
    }

    fn from(module: &str, level: usize, names: &[&str], line: usize) -> ImportStatement {
        ImportStatement::From {
            module: module.to_string(),
            level,
            names: names.iter().map(|n| n.to_string()).collect(),
            line,
        }
    }

    #[test]
    fn test_plain_and_aliased_imports() {
        let imports = extract(indoc! {"
            import os
            import os.path as osp, json
        "});
        assert_eq!(
            imports,
            vec![
                ImportStatement::Import { module: "os".into(), line: 1 },
                ImportStatement::Import { module: "os.path".into(), line: 2 },
                ImportStatement::Import { module: "json".into(), line: 2 },
            ]
        );
    }

    #[test]
    fn test_from_imports() {
        let imports = extract(indoc! {"
            from pkg.sub import helper_a, thing as other
            from pkg.util import (
                helper_b,
            )
            from collections import *
        "});
        assert_eq!(
            imports,
            vec![
                from("pkg.sub", 0, &["helper_a", "thing"], 1),
                from("pkg.util", 0, &["helper_b"], 2),
                from("collections", 0, &["*"], 5),
            ]
        );
    }

    #[test]
    fn test_relative_imports() {
        let imports = extract(indoc! {"
            from . import sibling
            from ..util import helper_b
            from .helper_a import run
        "});
        assert_eq!(
            imports,
            vec![
                from("", 1, &["sibling"], 1),
                from("util", 2, &["helper_b"], 2),
                from("helper_a", 1, &["run"], 3),
            ]
        );
    }

    #[test]
    fn test_future_import() {
        let imports = extract("from __future__ import annotations\n");
        assert_eq!(imports, vec![from("__future__", 0, &["annotations"], 1)]);
    }

    #[test]
    fn test_nested_imports_are_found() {
        let imports = extract(indoc! {"
            def load():
                import heavy.module
                return heavy

            try:
                import fast_json as json
            except ImportError:
                import json

            class Plugin:
                from pkg import registry
        "});
        let modules: Vec<_> = imports
            .iter()
            .map(|statement| match statement {
                ImportStatement::Import { module, .. } => module.clone(),
                ImportStatement::From { module, .. } => module.clone(),
            })
            .collect();
        assert_eq!(modules, vec!["heavy.module", "fast_json", "json", "pkg"]);
    }

    #[test]
    fn test_dynamic_imports_are_not_reported() {
        let imports = extract(indoc! {"
            import importlib
            mod = importlib.import_module('pkg.hidden')
            other = __import__('pkg.other')
        "});
        assert_eq!(
            imports,
            vec![ImportStatement::Import { module: "importlib".into(), line: 1 }]
        );
    }

    #[test]
    fn test_imports_survive_syntax_errors() {
        let imports = extract("import good\ndef broken(:\n    pass\n");
        assert!(imports.contains(&ImportStatement::Import {
            module: "good".into(),
            line: 1
        }));
    }
}
