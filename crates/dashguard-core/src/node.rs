//! Typed document tree.
//!
//! Templates use provider tags (`!Ref`, `!Sub`, `!GetAtt`, ...) that a plain YAML
//! mapping cannot express. `serde_yaml` hands them over as [`serde_yaml::Value::Tagged`];
//! this module folds both the tag form and the long `Fn::X:` / `Ref:` form into a
//! single [`Node::Intrinsic`] so callers never care how the author spelled it.

use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<Node>),
    /// Entries in declaration order.
    Mapping(Vec<(String, Node)>),
    /// An intrinsic function call. `function` has no `!` or `Fn::` prefix
    /// (`Ref`, `Sub`, `GetAtt`, `If`, ...).
    Intrinsic {
        function: String,
        argument: Box<Node>,
    },
}

pub(crate) static EMPTY_MAPPING: Node = Node::Mapping(Vec::new());

impl Node {
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, Node)]> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Returns `(function, argument)` when this node is an intrinsic call.
    pub fn intrinsic(&self) -> Option<(&str, &Node)> {
        match self {
            Node::Intrinsic { function, argument } => Some((function.as_str(), argument)),
            _ => None,
        }
    }

    pub fn is_intrinsic(&self, name: &str) -> bool {
        self.intrinsic().is_some_and(|(function, _)| function == name)
    }

    /// Finds `name` anywhere in the subtree, including this node.
    pub fn contains_intrinsic(&self, name: &str) -> bool {
        if self.is_intrinsic(name) {
            return true;
        }
        match self {
            Node::Sequence(items) => items.iter().any(|n| n.contains_intrinsic(name)),
            Node::Mapping(entries) => entries.iter().any(|(_, n)| n.contains_intrinsic(name)),
            Node::Intrinsic { argument, .. } => argument.contains_intrinsic(name),
            _ => false,
        }
    }

    /// Treats a scalar or a sequence uniformly as a list of items.
    pub fn items(&self) -> Vec<&Node> {
        match self {
            Node::Sequence(items) => items.iter().collect(),
            Node::Null => Vec::new(),
            other => vec![other],
        }
    }

    /// Renders scalars and intrinsics as text.
    ///
    /// `!Sub` keeps its template string, `!Ref X` becomes `${X}` and `!GetAtt A.B`
    /// becomes `${A.B}`, so substitution-aware callers see one text form.
    pub fn render(&self) -> String {
        match self {
            Node::Null => String::new(),
            Node::Bool(b) => b.to_string(),
            Node::Number(n) => format_number(*n),
            Node::String(s) => s.clone(),
            Node::Sequence(items) => items
                .iter()
                .map(Node::render)
                .collect::<Vec<_>>()
                .join(","),
            Node::Mapping(entries) => entries
                .iter()
                .map(|(k, v)| format!("{k}={}", v.render()))
                .collect::<Vec<_>>()
                .join(","),
            Node::Intrinsic { function, argument } => match (function.as_str(), &**argument) {
                ("Sub", Node::String(s)) => s.clone(),
                ("Sub", Node::Sequence(parts)) => {
                    parts.first().map(Node::render).unwrap_or_default()
                }
                ("Ref", arg) => format!("${{{}}}", arg.render()),
                ("GetAtt", Node::Sequence(parts)) => format!(
                    "${{{}}}",
                    parts.iter().map(Node::render).collect::<Vec<_>>().join(".")
                ),
                ("GetAtt", arg) => format!("${{{}}}", arg.render()),
                (function, arg) => format!("!{function} {}", arg.render()),
            },
        }
    }
}

/// Integral values print without a fractional part (`5`, not `5.0`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => format!("{other:?}"),
    }
}

fn long_form_function(key: &str) -> Option<String> {
    if key == "Ref" {
        return Some(key.to_string());
    }
    key.strip_prefix("Fn::").map(str::to_string)
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => Node::String(s),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => {
                let mut entries: Vec<(String, Node)> = map
                    .into_iter()
                    .map(|(k, v)| (key_text(k), Node::from(v)))
                    .collect();
                // Only single-key `Ref:` and `Fn::*:` mappings are calls.
                if entries.len() == 1 {
                    if let Some(function) = long_form_function(&entries[0].0) {
                        let (_, argument) = entries.remove(0);
                        return Node::Intrinsic {
                            function,
                            argument: Box::new(argument),
                        };
                    }
                }
                Node::Mapping(entries)
            }
            Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                Node::Intrinsic {
                    function: tag.trim_start_matches('!').to_string(),
                    argument: Box::new(Node::from(tagged.value)),
                }
            }
        }
    }
}
