use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{ActionAlias, ActionAliasError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    NoOp,
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Before/after state of a single resource as reported by the plan tool.
///
/// Only `actions` is interpreted; the state payloads are carried through so the
/// rendered tree can hand them back to whoever displays node details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_unknown: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_sensitive: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_sensitive: Option<Value>,
}

impl ResourceChange {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            before: None,
            after: None,
            after_unknown: None,
            before_sensitive: None,
            after_sensitive: None,
        }
    }

    pub fn action_alias(&self) -> Result<ActionAlias, ActionAliasError> {
        ActionAlias::from_actions(&self.actions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    pub change: ResourceChange,
}

impl ChangeRecord {
    pub fn new(address: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            address: address.into(),
            module_address: None,
            mode: None,
            resource_type: None,
            name: None,
            provider_name: None,
            index: None,
            change: ResourceChange::new(actions),
        }
    }

    pub fn action_alias(&self) -> Result<ActionAlias, ActionAliasError> {
        self.change.action_alias()
    }
}

/// Top-level object written by the plan tool; only the change list is read.
///
/// Plans without changes leave `resource_changes` out entirely.
#[derive(Debug, Deserialize)]
struct PlanEnvelope {
    #[serde(default)]
    resource_changes: Vec<ChangeRecord>,
}

/// Reads change records from a JSON or YAML file.
///
/// The file may hold a bare list of records or an object with a
/// `resource_changes` list.
pub fn load_change_records(path: &Path) -> Result<Vec<ChangeRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read change records file `{}`", path.display()))?;

    let records = if is_yaml_path(path) {
        serde_yaml::from_str::<Value>(&raw).map_err(anyhow::Error::from)
    } else {
        serde_json::from_str::<Value>(&raw).map_err(anyhow::Error::from)
    }
    .and_then(records_from_document)
    .with_context(|| format!("failed to parse change records file `{}`", path.display()))?;

    Ok(records)
}

fn records_from_document(document: Value) -> Result<Vec<ChangeRecord>> {
    match document {
        Value::Array(_) => {
            serde_json::from_value(document).context("invalid change record list")
        }
        Value::Object(_) => {
            let envelope = serde_json::from_value::<PlanEnvelope>(document)
                .context("invalid `resource_changes` list")?;
            Ok(envelope.resource_changes)
        }
        other => bail!(
            "expected a list of change records or a plan object, found {}",
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
