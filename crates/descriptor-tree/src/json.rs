//! JSON bridge.
//!
//! Scalars are imported through literal inference, so a JSON number keeps
//! the exact text it was written with (`serde_json` is built with
//! `arbitrary_precision`) and is exported verbatim again.

use std::str::FromStr;

use serde_json::{Map, Number, Value};

use crate::descriptor::Descriptor;
use crate::error::{DescriptorError, Result};
use crate::node::{ObjectType, ValueType};
use crate::scan;

impl Descriptor {
    /// Creates a new tree holding `value`.
    pub fn from_json(value: &Value) -> Descriptor {
        let descriptor = Descriptor::new();
        descriptor.import_json(value);
        descriptor
    }

    /// Parses JSON text into a new tree.
    pub fn from_json_str(text: &str) -> Result<Descriptor> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Descriptor::from_json(&value))
    }

    /// Replaces this node's content with `value`. The node keeps its name.
    pub fn import_json(&self, value: &Value) {
        match value {
            Value::Null => self.clear(),
            Value::Bool(b) => {
                self.set_from_str(if *b { "true" } else { "false" });
            }
            Value::Number(n) => {
                self.set_from_str(&n.to_string());
            }
            Value::String(s) => {
                self.set_str(s);
            }
            Value::Array(items) => {
                self.clear();
                self.set_type(ObjectType::Array);
                for item in items {
                    self.add("").import_json(item);
                }
            }
            Value::Object(members) => {
                self.clear();
                self.set_type(ObjectType::Object);
                for (name, member) in members {
                    self.add(name).import_json(member);
                }
            }
        }
    }

    /// Exports the subtree rooted at this node.
    ///
    /// Member names repeated inside one object keep the first member only.
    /// A `Value` that was never written (`add("x")` with no `set_*`)
    /// exports as `null`, so it comes back as a `Null` node.
    pub fn to_json(&self) -> Result<Value> {
        match self.object_type() {
            ObjectType::Null => Ok(Value::Null),
            ObjectType::Array => self
                .members()
                .iter()
                .map(Descriptor::to_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            ObjectType::Object => {
                let mut map = Map::new();
                for member in self.members() {
                    let value = member.to_json()?;
                    map.entry(member.name()).or_insert(value);
                }
                Ok(Value::Object(map))
            }
            ObjectType::Value => {
                let text = self.value_text().unwrap_or_default();
                scalar_to_json(&text, self.value_type())
            }
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json()?)?)
    }
}

fn scalar_to_json(text: &str, value_type: ValueType) -> Result<Value> {
    match value_type {
        ValueType::None => Ok(Value::Null),
        ValueType::String => Ok(Value::String(text.to_string())),
        ValueType::Bool => Ok(Value::Bool(scan::read_bool(text))),
        ValueType::Int => Ok(Value::Number(
            Number::from_str(text).unwrap_or_else(|_| Number::from(scan::read_int(text))),
        )),
        ValueType::Float => {
            if let Ok(number) = Number::from_str(text) {
                return Ok(Value::Number(number));
            }
            // Rust float syntax covers `NaN` and `inf`, which JSON cannot hold.
            let value = text
                .parse::<f64>()
                .unwrap_or_else(|_| scan::read_float(text));
            Number::from_f64(value)
                .map(Value::Number)
                .ok_or_else(|| DescriptorError::NonFiniteFloat(text.to_string()))
        }
    }
}
