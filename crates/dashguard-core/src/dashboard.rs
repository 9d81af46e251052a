//! Dashboard body extraction.
//!
//! The dashboard definition is a JSON document embedded in the template, usually as
//! a `!Sub` string. Placeholders are resolved textually before JSON parsing so the
//! body only has to be valid JSON after substitution. The configured table wins over
//! literal `!Sub` variables; `Number` parameters fall back to their template
//! `Default` so bare numeric placeholders still parse. Other placeholders are left in
//! place; inside JSON strings they are harmless and the log query checks rely on
//! seeing them.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::TemplateError;
use crate::node::Node;
use crate::template::Template;

pub const DASHBOARD_TYPE: &str = "AWS::CloudWatch::Dashboard";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(!?)([^}]*)\}").expect("placeholder pattern"));

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Logical name of the resource the body came from, if known.
    pub resource: Option<String>,
    pub body: Value,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    Metric,
    Log,
    Other(String),
}

impl WidgetKind {
    fn parse(tag: &str) -> Self {
        match tag {
            "metric" => Self::Metric,
            "log" => Self::Log,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Metric => "metric",
            Self::Log => "log",
            Self::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub index: usize,
    pub kind: WidgetKind,
    pub title: Option<String>,
    pub region: Option<String>,
    pub metrics: Vec<MetricRow>,
    pub query: Option<String>,
}

impl Widget {
    /// Location string used in findings, e.g. `widgets[2] "Model Invocations"`.
    pub fn location(&self) -> String {
        match &self.title {
            Some(title) => format!("widgets[{}] \"{title}\"", self.index),
            None => format!("widgets[{}]", self.index),
        }
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn metric_specs(&self) -> impl Iterator<Item = &MetricSpec> {
        self.metrics.iter().filter_map(|row| match row {
            MetricRow::Metric(spec) => Some(spec),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricRow {
    Metric(MetricSpec),
    Expression {
        id: Option<String>,
        expression: String,
    },
    /// A row in a shape we do not model; kept as raw JSON text.
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricSpec {
    pub namespace: String,
    pub name: String,
    pub dimensions: Vec<(String, String)>,
    /// Per-metric region override.
    pub region: Option<String>,
    pub stat: Option<String>,
    pub id: Option<String>,
}

impl MetricSpec {
    pub fn dimension(&self, key: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Dashboard {
    /// Extracts and parses the first dashboard resource's body.
    ///
    /// `table` maps placeholder names to literal values. In text-only mode the body
    /// is located by its `DashboardBody:` marker and brace matching.
    pub fn extract(
        template: &Template,
        table: &BTreeMap<String, String>,
    ) -> Result<Self, TemplateError> {
        let (resource, text, vars) = if template.is_text_only() {
            (None, body_from_text(template.source())?, BTreeMap::new())
        } else {
            let resources = template.resources()?;
            let dashboard = resources
                .iter()
                .find(|r| r.is_type(DASHBOARD_TYPE))
                .ok_or_else(|| TemplateError::section_not_found(DASHBOARD_TYPE))?;
            let body = dashboard.property("DashboardBody").ok_or_else(|| {
                TemplateError::section_not_found(format!(
                    "Resources.{}.Properties.DashboardBody",
                    dashboard.name
                ))
            })?;
            let (text, vars) = body_text(body)?;
            (Some(dashboard.name.clone()), text, vars)
        };

        let defaults = numeric_defaults(template);
        let resolved = substitute(&text, |name| {
            table
                .get(name)
                .or_else(|| vars.get(name))
                .or_else(|| defaults.get(name))
                .cloned()
        });
        let mut dashboard = Self::from_json(&resolved)?;
        dashboard.resource = resource;
        tracing::debug!(
            widgets = dashboard.widgets.len(),
            "extracted dashboard body"
        );
        Ok(dashboard)
    }

    /// Parses a dashboard body that is already plain JSON (e.g. fetched from the service).
    pub fn from_json(text: &str) -> Result<Self, TemplateError> {
        let body: Value = serde_json::from_str(text).map_err(|e| {
            TemplateError::InvalidDashboard(format!("not valid JSON after substitution: {e}"))
        })?;
        Self::from_value(body)
    }

    pub fn from_value(body: Value) -> Result<Self, TemplateError> {
        let entries = body
            .get("widgets")
            .and_then(Value::as_array)
            .ok_or_else(|| TemplateError::InvalidDashboard("missing \"widgets\" array".into()))?;

        let widgets = entries
            .iter()
            .enumerate()
            .map(|(index, w)| parse_widget(index, w))
            .collect();

        Ok(Self {
            resource: None,
            widgets,
            body,
        })
    }

    pub fn metric_widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| w.kind == WidgetKind::Metric)
    }

    pub fn log_widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| w.kind == WidgetKind::Log)
    }
}

/// Rewrites `${Name}` using `lookup`; unknown names stay, `${!Name}` becomes `${Name}`.
pub fn substitute(text: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            let name = &caps[2];
            if !caps[1].is_empty() {
                return format!("${{{name}}}");
            }
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Literal defaults of `Type: Number` parameters, by name.
fn numeric_defaults(template: &Template) -> BTreeMap<String, String> {
    template
        .section_or_empty("Parameters")
        .as_mapping()
        .unwrap_or_default()
        .iter()
        .filter(|(_, body)| body.get("Type").and_then(Node::as_str) == Some("Number"))
        .filter_map(|(name, body)| match body.get("Default")? {
            default @ (Node::Number(_) | Node::String(_)) => Some((name.clone(), default.render())),
            _ => None,
        })
        .collect()
}

fn body_text(body: &Node) -> Result<(String, BTreeMap<String, String>), TemplateError> {
    match body {
        Node::String(s) => Ok((s.clone(), BTreeMap::new())),
        Node::Intrinsic { function, argument } if function == "Sub" => match &**argument {
            Node::String(s) => Ok((s.clone(), BTreeMap::new())),
            Node::Sequence(parts) => {
                let text = parts.first().and_then(Node::as_str).ok_or_else(|| {
                    TemplateError::InvalidDashboard("!Sub list without a template string".into())
                })?;
                let vars = parts
                    .get(1)
                    .and_then(Node::as_mapping)
                    .unwrap_or_default()
                    .iter()
                    .filter(|(_, v)| matches!(v, Node::String(_) | Node::Number(_) | Node::Bool(_)))
                    .map(|(k, v)| (k.clone(), v.render()))
                    .collect();
                Ok((text.to_string(), vars))
            }
            other => Err(TemplateError::InvalidDashboard(format!(
                "unsupported !Sub argument: {}",
                other.render()
            ))),
        },
        Node::Intrinsic { function, argument } if function == "Join" => {
            let parts = argument.as_sequence().unwrap_or_default();
            let separator = parts.first().map(Node::render).unwrap_or_default();
            let pieces: Vec<String> = parts
                .get(1)
                .map(|p| p.items().into_iter().map(Node::render).collect())
                .unwrap_or_default();
            Ok((pieces.join(&separator), BTreeMap::new()))
        }
        other => Err(TemplateError::InvalidDashboard(format!(
            "unsupported DashboardBody value: {}",
            other.render()
        ))),
    }
}

/// Finds the JSON object following `DashboardBody:` by brace matching.
fn body_from_text(source: &str) -> Result<String, TemplateError> {
    let marker = source
        .find("DashboardBody:")
        .ok_or_else(|| TemplateError::section_not_found("DashboardBody"))?;
    let rest = &source[marker..];
    let start = rest
        .find('{')
        .ok_or_else(|| TemplateError::InvalidDashboard("no JSON object after DashboardBody".into()))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in rest[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(rest[start..=start + offset].to_string());
                }
            }
            _ => {}
        }
    }
    Err(TemplateError::InvalidDashboard(
        "unbalanced braces in DashboardBody".into(),
    ))
}

fn parse_widget(index: usize, widget: &Value) -> Widget {
    let properties = widget.get("properties");
    let prop_str = |key: &str| {
        properties
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let mut previous: Vec<String> = Vec::new();
    let metrics = properties
        .and_then(|p| p.get("metrics"))
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| parse_metric_row(row, &mut previous))
                .collect()
        })
        .unwrap_or_default();

    Widget {
        index,
        kind: WidgetKind::parse(widget.get("type").and_then(Value::as_str).unwrap_or_default()),
        title: prop_str("title"),
        region: prop_str("region"),
        metrics,
        query: prop_str("query"),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_metric_row(row: &Value, previous: &mut Vec<String>) -> MetricRow {
    match row {
        Value::Array(items) => {
            if let Some(expression) = items
                .first()
                .and_then(|first| first.get("expression"))
                .and_then(Value::as_str)
            {
                return MetricRow::Expression {
                    id: items[0].get("id").and_then(Value::as_str).map(str::to_string),
                    expression: expression.to_string(),
                };
            }

            let tokens: Vec<String> = items.iter().map_while(scalar_text).collect();
            let options = items.get(tokens.len()).filter(|v| v.is_object());
            let tokens = resolve_shorthand(&tokens, previous);
            if tokens.len() < 2 {
                return MetricRow::Unrecognized(row.to_string());
            }
            *previous = tokens.clone();

            let option = |key: &str| {
                options
                    .and_then(|o| o.get(key))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            };
            MetricRow::Metric(MetricSpec {
                namespace: tokens[0].clone(),
                name: tokens[1].clone(),
                dimensions: tokens[2..]
                    .chunks(2)
                    .map(|pair| (pair[0].clone(), pair.get(1).cloned().unwrap_or_default()))
                    .collect(),
                region: option("region"),
                stat: option("stat"),
                id: option("id"),
            })
        }
        Value::Object(_) => {
            if let Some(expression) = row.get("expression").and_then(Value::as_str) {
                return MetricRow::Expression {
                    id: row.get("id").and_then(Value::as_str).map(str::to_string),
                    expression: expression.to_string(),
                };
            }
            match row.get("MetricStat") {
                Some(stat) => MetricRow::Metric(parse_metric_stat(row, stat)),
                None => MetricRow::Unrecognized(row.to_string()),
            }
        }
        other => MetricRow::Unrecognized(other.to_string()),
    }
}

fn parse_metric_stat(row: &Value, stat: &Value) -> MetricSpec {
    let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
    let metric = stat.get("Metric");
    MetricSpec {
        namespace: text(metric.and_then(|m| m.get("Namespace"))).unwrap_or_default(),
        name: text(metric.and_then(|m| m.get("MetricName"))).unwrap_or_default(),
        dimensions: metric
            .and_then(|m| m.get("Dimensions"))
            .and_then(Value::as_array)
            .map(|dims| {
                dims.iter()
                    .map(|d| {
                        (
                            text(d.get("Name")).unwrap_or_default(),
                            d.get("Value").and_then(scalar_text).unwrap_or_default(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default(),
        region: text(stat.get("Region")).or_else(|| text(row.get("Region"))),
        stat: text(stat.get("Stat")),
        id: text(row.get("Id")),
    }
}

/// Expands `"."` (same token as the previous row) and `"..."` (the previous row's
/// tokens up to the ones given explicitly after it).
fn resolve_shorthand(tokens: &[String], previous: &[String]) -> Vec<String> {
    let expanded: Vec<String> = match tokens.iter().position(|t| t == "...") {
        Some(at) => {
            let suffix = &tokens[at + 1..];
            let end = previous.len().saturating_sub(suffix.len()).max(at);
            let middle = previous.get(at..end).unwrap_or_default();
            tokens[..at]
                .iter()
                .chain(middle)
                .chain(suffix)
                .cloned()
                .collect()
        }
        None => tokens.to_vec(),
    };
    expanded
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            if t == "." {
                previous.get(i).cloned().unwrap_or(t)
            } else {
                t
            }
        })
        .collect()
}
