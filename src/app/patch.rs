//! Patch documents applied to the user update shape.
//!
//! Two encodings are accepted: a JSON Patch operation list
//! ([RFC 6902](https://www.rfc-editor.org/rfc/rfc6902)) restricted to
//! `add`, `replace`, `remove` and `test`, or a plain JSON object whose members
//! replace the matching fields (`null` removes them).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    app::resource::user::UpdateUser,
    base::resource_id,
    domain::datatype::JsonPointer,
    error::resource::{ValidationErrorKind, ValidationFieldError},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchDocument {
    Operations(Vec<PatchOperation>),
    Merge(Map<String, Value>),
}

resource_id!(PatchDocument, "user::PatchDocument");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

resource_id!(PatchOperation, "user::PatchOperation");

impl PatchOperation {
    pub fn replace(path: &str, value: Value) -> Self {
        Self {
            op: "replace".into(),
            path: path.into(),
            value: Some(value),
            from: None,
        }
    }

    pub fn remove(path: &str) -> Self {
        Self {
            op: "remove".into(),
            path: path.into(),
            value: None,
            from: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserField {
    Name,
    Age,
    Gender,
}

impl UserField {
    fn from_member(member: &str) -> Option<Self> {
        match member.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "age" => Some(Self::Age),
            "gender" => Some(Self::Gender),
            _ => None,
        }
    }

    fn get(self, target: &UpdateUser) -> Value {
        match self {
            Self::Name => target.name.clone().map_or(Value::Null, Value::from),
            Self::Age => target.age.map_or(Value::Null, Value::from),
            Self::Gender => target.gender.clone().map_or(Value::Null, Value::from),
        }
    }

    /// Writes `value` into the field, `None` when its JSON type does not fit.
    fn set(self, target: &mut UpdateUser, value: Value) -> Option<()> {
        match (self, value) {
            (Self::Name, Value::Null) => target.name = None,
            (Self::Name, Value::String(name)) => target.name = Some(name),
            (Self::Age, Value::Null) => target.age = None,
            (Self::Age, Value::Number(age)) => target.age = Some(age.as_i64()?),
            (Self::Gender, Value::Null) => target.gender = None,
            (Self::Gender, Value::String(gender)) => target.gender = Some(gender),
            _ => return None,
        }
        Some(())
    }
}

impl PatchDocument {
    pub fn into_operations(self) -> Vec<PatchOperation> {
        match self {
            PatchDocument::Operations(ops) => ops,
            PatchDocument::Merge(members) => members
                .into_iter()
                .map(|(member, value)| {
                    let path = JsonPointer::root().push(&member).to_string();
                    match value {
                        Value::Null => PatchOperation::remove(&path),
                        value => PatchOperation::replace(&path, value),
                    }
                })
                .collect(),
        }
    }

    /// Applies every operation in order, collecting the ones that could not be applied.
    ///
    /// Failed operations leave `target` as it was before them.
    pub fn apply_to(self, target: &mut UpdateUser) -> Vec<ValidationFieldError> {
        self.into_operations()
            .into_iter()
            .enumerate()
            .filter_map(|(index, op)| apply_operation(index, op, target).err())
            .collect()
    }
}

fn apply_operation(
    index: usize,
    op: PatchOperation,
    target: &mut UpdateUser,
) -> Result<(), ValidationFieldError> {
    let op_path = |member: &str| {
        JsonPointer::root()
            .push(&index.to_string())
            .push(member)
            .to_string()
    };
    let op_error = |member: &str, value: String, kind: ValidationErrorKind| {
        ValidationFieldError::from_resource::<PatchOperation>(value, op_path(member), vec![kind])
    };

    let pointer: JsonPointer = op.path.parse().map_err(|_| {
        op_error("path", op.path.clone(), ValidationErrorKind::Invalid)
    })?;
    let field = pointer
        .as_member()
        .and_then(UserField::from_member)
        .ok_or_else(|| {
            op_error(
                "path",
                op.path.clone(),
                ValidationErrorKind::PropertyName(pointer.to_string()),
            )
        })?;

    match op.op.as_str() {
        "add" | "replace" => {
            let value = op
                .value
                .ok_or_else(|| op_error("value", String::new(), ValidationErrorKind::Required))?;
            let display = value.to_string();
            field
                .set(target, value)
                .ok_or_else(|| op_error("value", display, ValidationErrorKind::InvalidType))
        }
        "remove" => {
            field.set(target, Value::Null);
            Ok(())
        }
        "test" => {
            let expected = op.value.unwrap_or(Value::Null);
            if field.get(target) == expected {
                Ok(())
            } else {
                Err(op_error(
                    "value",
                    expected.to_string(),
                    ValidationErrorKind::Invalid,
                ))
            }
        }
        unknown => Err(op_error(
            "op",
            unknown.into(),
            ValidationErrorKind::UnknownVariant(unknown.into()),
        )),
    }
}
