//! Serializable tree snapshots
//!
//!     [TreeSnapshot] is a plain owned copy of a tree, built by one canonical walk.
//!     The JSON and YAML formatters serialize it with serde rather than walking the
//!     arena themselves.

use crate::cst::ast::{Document, ElementId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    /// Element class, e.g. `Statement::Include` or `Token::Symbol`
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Brace pair of a structure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub braces: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    pub fn from_document(doc: &Document) -> Self {
        Self::from_element(doc, doc.root())
    }

    pub fn from_element(doc: &Document, id: ElementId) -> Self {
        let (line, column) = doc
            .location(id)
            .map(|loc| (loc.line, loc.column))
            .unwrap_or((0, 0));
        let attr = doc.attribute(id);
        Self {
            class: doc.class(id).name().to_string(),
            content: doc.token(id).map(|token| token.content.clone()),
            braces: doc.braces(id).map(str::to_string),
            attribute: (!attr.is_none()).then(|| attr.to_string()),
            line,
            column,
            children: doc
                .children(id)
                .iter()
                .map(|&child| Self::from_element(doc, child))
                .collect(),
        }
    }

    /// Number of elements in the snapshot, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeSnapshot::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse;

    #[test]
    fn test_snapshot_json() {
        let doc = parse("$x->[0];").unwrap();
        let snapshot = TreeSnapshot::from_document(&doc);
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        insta::assert_snapshot!(json, @r###"
        {
          "class": "Document",
          "line": 1,
          "column": 1,
          "children": [
            {
              "class": "Statement",
              "line": 1,
              "column": 1,
              "children": [
                {
                  "class": "Token::Symbol",
                  "content": "$x",
                  "line": 1,
                  "column": 1
                },
                {
                  "class": "Token::Operator",
                  "content": "->",
                  "attribute": "dereference",
                  "line": 1,
                  "column": 3
                },
                {
                  "class": "Structure::Subscript",
                  "braces": "[]",
                  "line": 1,
                  "column": 5,
                  "children": [
                    {
                      "class": "Statement::Expression",
                      "line": 1,
                      "column": 6,
                      "children": [
                        {
                          "class": "Token::Number",
                          "content": "0",
                          "line": 1,
                          "column": 6
                        }
                      ]
                    }
                  ]
                },
                {
                  "class": "Token::Structure",
                  "content": ";",
                  "line": 1,
                  "column": 8
                }
              ]
            }
          ]
        }
        "###);
    }

    #[test]
    fn test_empty_document() {
        let doc = parse("").unwrap();
        let snapshot = TreeSnapshot::from_document(&doc);
        assert_eq!(snapshot.count(), 1);
        assert_eq!((snapshot.line, snapshot.column), (0, 0));
    }

    #[test]
    fn test_count_excludes_brace_tokens() {
        let doc = parse("f(1, 2);").unwrap();
        let snapshot = TreeSnapshot::from_document(&doc);
        // Document, Statement, `f`, List, Expression, `1`, `,`, ` `, `2`, `;`
        assert_eq!(snapshot.count(), 10);
    }
}
