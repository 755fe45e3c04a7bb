//! Projection of raw Clockify payloads onto stable field sets.
//!
//! Each entity has a table of output fields. A field is copied from the
//! first source key present on the raw object; fields with no source
//! present are left out rather than defaulted.

use crate::error::Error;
use serde::de::{Error as _, Unexpected};
use serde_json::{Map, Value};

/// One output field and the upstream keys it may be read from.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub sources: &'static [&'static str],
}

impl Field {
    const fn same(name: &'static str) -> Self {
        Self {
            name,
            sources: &[],
        }
    }

    const fn aliased(name: &'static str, sources: &'static [&'static str]) -> Self {
        Self { name, sources }
    }

    fn read<'a>(&self, raw: &'a Map<String, Value>) -> Option<&'a Value> {
        if self.sources.is_empty() {
            return raw.get(self.name);
        }
        self.sources.iter().find_map(|key| raw.get(*key))
    }
}

/// Fields returned for the authenticated user.
pub const CURRENT_USER: &[Field] = &[
    Field::same("id"),
    Field::same("name"),
    Field::same("email"),
    Field::same("activeWorkspace"),
    Field::same("profilePicture"),
    Field::same("memberships"),
];

/// Fields returned for workspace members and member profiles.
pub const MEMBER: &[Field] = &[
    Field::same("id"),
    Field::same("name"),
    Field::same("email"),
    Field::same("status"),
    Field::same("activeWorkspace"),
    Field::same("profilePicture"),
    Field::same("memberships"),
];

pub const WORKSPACE: &[Field] = &[
    Field::same("id"),
    Field::same("name"),
    Field::same("imageUrl"),
];

pub const CLIENT: &[Field] = &[
    Field::same("id"),
    Field::same("name"),
    Field::same("address"),
    Field::same("email"),
    Field::same("note"),
    Field::same("archived"),
    Field::same("currencyCode"),
    Field::same("currencyId"),
];

pub const PROJECT: &[Field] = &[
    Field::same("id"),
    Field::same("name"),
    Field::same("note"),
    Field::same("public"),
    Field::same("duration"),
    Field::same("color"),
    Field::same("memberships"),
];

pub const TASK: &[Field] = &[
    Field::same("id"),
    Field::same("name"),
    Field::same("status"),
    Field::same("duration"),
    Field::same("assigneeId"),
    Field::same("assigneeIds"),
    Field::same("billable"),
    Field::same("budgetEstimate"),
    Field::same("costRate"),
    Field::same("estimate"),
    Field::same("hourlyRate"),
    Field::same("projectId"),
    Field::same("userGroupIds"),
];

/// Time entries returned by create and duplicate.
pub const TIME_ENTRY: &[Field] = &[
    Field::same("id"),
    Field::same("description"),
    Field::same("projectId"),
    Field::same("taskId"),
    Field::same("billable"),
    Field::same("timeInterval"),
    Field::same("userId"),
    Field::same("workspaceId"),
    Field::same("tagIds"),
    Field::same("costRate"),
    Field::same("hourlyRate"),
    Field::same("customFieldValues"),
    Field::same("isLocked"),
    Field::same("kioskId"),
    Field::same("type"),
];

/// Time entries returned by the list endpoint, which names the tag list
/// `tags`; it is reported as `tagIds`.
pub const TIME_ENTRY_LIST: &[Field] = &[
    Field::same("id"),
    Field::same("description"),
    Field::same("projectId"),
    Field::same("taskId"),
    Field::same("billable"),
    Field::same("timeInterval"),
    Field::same("userId"),
    Field::same("workspaceId"),
    Field::aliased("tagIds", &["tags"]),
    Field::same("costRate"),
    Field::same("hourlyRate"),
    Field::same("customFieldValues"),
    Field::same("isLocked"),
    Field::same("kioskId"),
    Field::same("type"),
];

/// Project `raw` onto `fields`, element-wise when `raw` is an array.
///
/// Anything that is neither an object nor an array of objects is returned
/// as is.
pub fn shape(raw: Value, fields: &[Field]) -> Value {
    match raw {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| shape_one(item, fields))
                .collect(),
        ),
        other => shape_one(other, fields),
    }
}

/// Accept `raw` only when it is a list, as list endpoints promise.
pub fn expect_list(raw: Value) -> Result<Value, Error> {
    let unexpected = match &raw {
        Value::Array(_) => return Ok(raw),
        Value::Null => Unexpected::Other("null"),
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Object(_) => Unexpected::Map,
    };
    Err(serde_json::Error::invalid_type(unexpected, &"an array").into())
}

fn shape_one(raw: Value, fields: &[Field]) -> Value {
    let Value::Object(raw) = raw else {
        return raw;
    };
    let mut out = Map::with_capacity(fields.len());
    for field in fields {
        if let Some(value) = field.read(&raw) {
            out.insert(field.name.to_string(), value.clone());
        }
    }
    Value::Object(out)
}
