//! Declarative operator definitions.
//!
//! An [`OpDef`] describes the positional inputs, outputs and attributes of an
//! operator type. The graph backend resolves every node against its
//! definition: inferring list lengths and type attributes from the inputs,
//! checking supplied attributes and computing the output slot layout.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::{AttrType, AttrValue, DataType};

mod builtin;

/// Upper bound on the number of slots a single list argument may occupy.
pub const MAX_LIST_LENGTH: usize = 1 << 16;

/// Positional input or output argument.
///
/// Exactly one of `data_type`, `type_attr` or `type_list_attr` determines the
/// element type(s). `number_attr` turns a `data_type`/`type_attr` argument into
/// a homogeneous list whose length is the value of that integer attribute.
/// `is_ref` marks a mutable reference to a stateful buffer such as a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_attr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_attr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_list_attr: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ref: bool,
}

impl ArgDef {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: None,
            type_attr: None,
            number_attr: None,
            type_list_attr: None,
            is_ref: false,
        }
    }

    pub fn reference(mut self) -> Self {
        self.is_ref = true;
        self
    }

    pub fn fixed(name: &str, data_type: DataType) -> Self {
        Self {
            data_type: Some(data_type),
            ..Self::named(name)
        }
    }

    pub fn typed(name: &str, type_attr: &str) -> Self {
        Self {
            type_attr: Some(type_attr.to_string()),
            ..Self::named(name)
        }
    }

    pub fn fixed_list(name: &str, data_type: DataType, number_attr: &str) -> Self {
        Self {
            data_type: Some(data_type),
            number_attr: Some(number_attr.to_string()),
            ..Self::named(name)
        }
    }

    pub fn typed_list(name: &str, type_attr: &str, number_attr: &str) -> Self {
        Self {
            type_attr: Some(type_attr.to_string()),
            number_attr: Some(number_attr.to_string()),
            ..Self::named(name)
        }
    }

    pub fn type_list(name: &str, type_list_attr: &str) -> Self {
        Self {
            type_list_attr: Some(type_list_attr.to_string()),
            ..Self::named(name)
        }
    }

    pub fn is_list(&self) -> bool {
        self.number_attr.is_some() || self.type_list_attr.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrDef {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    /// Value the engine applies when the attribute is not set. Attributes
    /// without a default are required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AttrValue>,
    /// `StringList` for string attributes, `TypeList` for type attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<AttrValue>,
    /// Lower bound for ints, minimum length for lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    /// For tensor attributes: the type attribute the tensor's dtype must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tensor_type_attr: Option<String>,
}

impl AttrDef {
    pub fn new(name: &str, attr_type: AttrType) -> Self {
        Self {
            name: name.to_string(),
            attr_type,
            default: None,
            allowed_values: None,
            minimum: None,
            tensor_type_attr: None,
        }
    }

    pub fn tensor_type(mut self, type_attr: &str) -> Self {
        self.tensor_type_attr = Some(type_attr.to_string());
        self
    }

    pub fn default_value(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn allowed_strings(mut self, values: &[&str]) -> Self {
        self.allowed_values = Some(AttrValue::StringList(
            values.iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    pub fn allowed_types(mut self, types: Vec<DataType>) -> Self {
        self.allowed_values = Some(AttrValue::TypeList(types));
        self
    }

    pub fn minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    fn check(&self, operation: &str, value: &AttrValue) -> Result<(), GraphError> {
        let invalid = |reason: String| GraphError::InvalidAttrValue {
            operation: operation.to_string(),
            attr: self.name.clone(),
            reason,
        };
        if let Some(minimum) = self.minimum {
            let measured = match value {
                AttrValue::Int(v) => Some(*v),
                other => other.list_len().map(|len| len as i64),
            };
            if let Some(measured) = measured
                && measured < minimum
            {
                return Err(invalid(format!("{} is below the minimum of {}", measured, minimum)));
            }
        }
        match value {
            AttrValue::Tensor(tensor) => tensor
                .check_content()
                .map_err(|err| invalid(err.to_string()))?,
            AttrValue::TensorList(tensors) => {
                for tensor in tensors {
                    tensor.check_content().map_err(|err| invalid(err.to_string()))?;
                }
            }
            _ => {}
        }
        match (&self.allowed_values, value) {
            (Some(AttrValue::StringList(allowed)), AttrValue::String(v)) => {
                if !allowed.iter().any(|a| a == v) {
                    return Err(invalid(format!("`{}` is not one of {:?}", v, allowed)));
                }
            }
            (Some(AttrValue::TypeList(allowed)), AttrValue::Type(v)) => {
                if !allowed.contains(v) {
                    return Err(invalid(format!("{} is not an allowed type", v)));
                }
            }
            (Some(AttrValue::TypeList(allowed)), AttrValue::TypeList(values)) => {
                if let Some(bad) = values.iter().find(|v| !allowed.contains(v)) {
                    return Err(invalid(format!("{} is not an allowed type", bad)));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpDef {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<ArgDef>,
    #[serde(default)]
    pub outputs: Vec<ArgDef>,
    #[serde(default)]
    pub attrs: Vec<AttrDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Element types of the operands fed into one positional input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTypes {
    Single(DataType),
    List(Vec<DataType>),
}

/// Contiguous run of slots occupied by one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgLayout {
    pub name: String,
    pub start: usize,
    pub len: usize,
}

/// Result of checking a node against its definition.
#[derive(Debug, Clone)]
pub struct ResolvedOp {
    /// Supplied attributes plus those inferred from inputs. Defaults are not
    /// materialized.
    pub attrs: BTreeMap<String, AttrValue>,
    pub inputs: Vec<ArgLayout>,
    pub outputs: Vec<ArgLayout>,
    pub output_types: Vec<DataType>,
    /// Per output slot: whether it is a reference to a mutable buffer.
    pub output_refs: Vec<bool>,
}

impl OpDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            attrs: Vec::new(),
            summary: None,
        }
    }

    pub fn input(mut self, arg: ArgDef) -> Self {
        self.inputs.push(arg);
        self
    }

    pub fn output(mut self, arg: ArgDef) -> Self {
        self.outputs.push(arg);
        self
    }

    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn attr_def(&self, name: &str) -> Option<&AttrDef> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    /// Resolve a node of this type named `operation`.
    pub fn resolve(
        &self,
        operation: &str,
        inputs: &[InputTypes],
        mut attrs: BTreeMap<String, AttrValue>,
    ) -> Result<ResolvedOp, GraphError> {
        if inputs.len() != self.inputs.len() {
            return Err(GraphError::InputCountMismatch {
                operation: operation.to_string(),
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }

        for (name, value) in &attrs {
            let def = self
                .attr_def(name)
                .ok_or_else(|| GraphError::UnknownAttribute {
                    operation: operation.to_string(),
                    attr: name.clone(),
                })?;
            if def.attr_type != value.attr_type() {
                return Err(GraphError::AttrTypeMismatch {
                    operation: operation.to_string(),
                    attr: name.clone(),
                    expected: def.attr_type,
                    actual: value.attr_type(),
                });
            }
        }

        let mut input_layout = Vec::with_capacity(inputs.len());
        let mut next_slot = 0;
        for (arg, input) in self.inputs.iter().zip(inputs) {
            let len = self.bind_input(operation, arg, input, &mut attrs)?;
            input_layout.push(ArgLayout {
                name: arg.name.clone(),
                start: next_slot,
                len,
            });
            next_slot += len;
        }

        for (name, value) in &attrs {
            if let Some(def) = self.attr_def(name) {
                def.check(operation, value)?;
            }
        }
        self.check_tensor_types(operation, &attrs)?;
        for def in &self.attrs {
            if def.default.is_none() && !attrs.contains_key(&def.name) {
                return Err(GraphError::MissingAttribute {
                    operation: operation.to_string(),
                    attr: def.name.clone(),
                });
            }
        }

        let mut output_layout = Vec::with_capacity(self.outputs.len());
        let mut output_types = Vec::new();
        let mut output_refs = Vec::new();
        for arg in &self.outputs {
            let types = self.output_types(operation, arg, &attrs)?;
            output_layout.push(ArgLayout {
                name: arg.name.clone(),
                start: output_types.len(),
                len: types.len(),
            });
            output_refs.resize(output_refs.len() + types.len(), arg.is_ref);
            output_types.extend(types);
        }

        Ok(ResolvedOp {
            attrs,
            inputs: input_layout,
            outputs: output_layout,
            output_types,
            output_refs,
        })
    }

    fn check_tensor_types(
        &self,
        operation: &str,
        attrs: &BTreeMap<String, AttrValue>,
    ) -> Result<(), GraphError> {
        for def in &self.attrs {
            let Some(type_attr) = &def.tensor_type_attr else {
                continue;
            };
            let Some(AttrValue::Tensor(tensor)) = attrs.get(&def.name) else {
                continue;
            };
            if let Some(expected) = self.attr_or_default(type_attr, attrs).and_then(AttrValue::as_type)
                && expected != tensor.data_type
            {
                return Err(GraphError::InvalidAttrValue {
                    operation: operation.to_string(),
                    attr: def.name.clone(),
                    reason: format!(
                        "{} tensor does not match `{}` = {}",
                        tensor.data_type, type_attr, expected
                    ),
                });
            }
        }
        Ok(())
    }

    fn bind_input(
        &self,
        operation: &str,
        arg: &ArgDef,
        input: &InputTypes,
        attrs: &mut BTreeMap<String, AttrValue>,
    ) -> Result<usize, GraphError> {
        let types: &[DataType] = match (arg.is_list(), input) {
            (false, InputTypes::Single(dt)) => std::slice::from_ref(dt),
            (true, InputTypes::List(types)) => types,
            _ => {
                return Err(GraphError::InputKindMismatch {
                    operation: operation.to_string(),
                    arg: arg.name.clone(),
                    expects_list: arg.is_list(),
                });
            }
        };

        if let Some(list_attr) = &arg.type_list_attr {
            bind_attr(operation, list_attr, AttrValue::TypeList(types.to_vec()), attrs)?;
            return Ok(types.len());
        }
        if let Some(number_attr) = &arg.number_attr {
            bind_attr(operation, number_attr, AttrValue::Int(types.len() as i64), attrs)?;
        }
        for &actual in types {
            if let Some(expected) = arg.data_type
                && expected != actual
            {
                return Err(GraphError::InputTypeMismatch {
                    operation: operation.to_string(),
                    arg: arg.name.clone(),
                    expected,
                    actual,
                });
            }
            if let Some(type_attr) = &arg.type_attr {
                match attrs.get(type_attr).and_then(AttrValue::as_type) {
                    Some(expected) if expected != actual => {
                        return Err(GraphError::InputTypeMismatch {
                            operation: operation.to_string(),
                            arg: arg.name.clone(),
                            expected,
                            actual,
                        });
                    }
                    Some(_) => {}
                    None => {
                        attrs.insert(type_attr.clone(), AttrValue::Type(actual));
                    }
                }
            }
        }
        Ok(types.len())
    }

    fn attr_or_default<'a>(
        &'a self,
        name: &str,
        attrs: &'a BTreeMap<String, AttrValue>,
    ) -> Option<&'a AttrValue> {
        attrs
            .get(name)
            .or_else(|| self.attr_def(name).and_then(|def| def.default.as_ref()))
    }

    fn output_types(
        &self,
        operation: &str,
        arg: &ArgDef,
        attrs: &BTreeMap<String, AttrValue>,
    ) -> Result<Vec<DataType>, GraphError> {
        let missing = |attr: &str| GraphError::MissingAttribute {
            operation: operation.to_string(),
            attr: attr.to_string(),
        };

        if let Some(list_attr) = &arg.type_list_attr {
            let types = self
                .attr_or_default(list_attr, attrs)
                .and_then(AttrValue::as_type_list)
                .ok_or_else(|| missing(list_attr))?;
            return Ok(types.to_vec());
        }

        let element = match (&arg.data_type, &arg.type_attr) {
            (Some(dt), _) => *dt,
            (None, Some(type_attr)) => self
                .attr_or_default(type_attr, attrs)
                .and_then(AttrValue::as_type)
                .ok_or_else(|| missing(type_attr))?,
            (None, None) => {
                return Err(GraphError::InvalidAttrValue {
                    operation: operation.to_string(),
                    attr: arg.name.clone(),
                    reason: "argument declares no element type".to_string(),
                });
            }
        };

        let count = match &arg.number_attr {
            None => 1,
            Some(number_attr) => {
                let value = self
                    .attr_or_default(number_attr, attrs)
                    .and_then(AttrValue::as_int)
                    .ok_or_else(|| missing(number_attr))?;
                let invalid = |reason: String| GraphError::InvalidAttrValue {
                    operation: operation.to_string(),
                    attr: number_attr.clone(),
                    reason,
                };
                let count = usize::try_from(value)
                    .map_err(|_| invalid(format!("list length {} is negative", value)))?;
                if count > MAX_LIST_LENGTH {
                    return Err(invalid(format!(
                        "list length {} exceeds the limit of {}",
                        count, MAX_LIST_LENGTH
                    )));
                }
                count
            }
        };
        Ok(vec![element; count])
    }
}

fn bind_attr(
    operation: &str,
    name: &str,
    inferred: AttrValue,
    attrs: &mut BTreeMap<String, AttrValue>,
) -> Result<(), GraphError> {
    match attrs.get(name) {
        Some(existing) if *existing != inferred => Err(GraphError::InvalidAttrValue {
            operation: operation.to_string(),
            attr: name.to_string(),
            reason: format!("set to {:?} but inputs imply {:?}", existing, inferred),
        }),
        Some(_) => Ok(()),
        None => {
            attrs.insert(name.to_string(), inferred);
            Ok(())
        }
    }
}

/// Table of known operator types.
#[derive(Debug, Clone, Default)]
pub struct OpRegistry {
    ops: HashMap<String, OpDef>,
}

impl OpRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding every operator that has a typed wrapper in [`crate::ops`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for def in builtin::op_defs() {
            registry.ops.insert(def.name.clone(), def);
        }
        registry
    }

    pub fn register(&mut self, def: OpDef) -> Result<(), GraphError> {
        if self.ops.contains_key(&def.name) {
            return Err(GraphError::DuplicateOpDef { op_type: def.name });
        }
        tracing::debug!(op_type = %def.name, "registered operator definition");
        self.ops.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn lookup(&self, op_type: &str) -> Option<&OpDef> {
        self.ops.get(op_type)
    }

    pub fn get(&self, op_type: &str) -> Result<&OpDef, GraphError> {
        self.lookup(op_type)
            .ok_or_else(|| GraphError::UnknownOperation {
                op_type: op_type.to_string(),
            })
    }

    pub fn available_ops(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.ops.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Tensor;

    fn concat_def() -> OpDef {
        OpDef::new("Concat")
            .input(ArgDef::fixed("concat_dim", DataType::Int32))
            .input(ArgDef::typed_list("values", "T", "N"))
            .output(ArgDef::typed("output", "T"))
            .attr(AttrDef::new("N", AttrType::Int).minimum(2))
            .attr(AttrDef::new("T", AttrType::Type))
    }

    fn split_def() -> OpDef {
        OpDef::new("Split")
            .input(ArgDef::typed("value", "T"))
            .output(ArgDef::typed_list("output", "T", "num_split"))
            .attr(AttrDef::new("num_split", AttrType::Int).minimum(1))
            .attr(AttrDef::new("T", AttrType::Type))
            .attr(
                AttrDef::new("mode", AttrType::String)
                    .default_value("fast")
                    .allowed_strings(&["fast", "exact"]),
            )
    }

    #[test]
    fn infers_list_length_and_type() {
        let resolved = concat_def()
            .resolve(
                "concat",
                &[
                    InputTypes::Single(DataType::Int32),
                    InputTypes::List(vec![DataType::Float; 3]),
                ],
                BTreeMap::new(),
            )
            .unwrap();
        assert_eq!(resolved.attrs.get("N"), Some(&AttrValue::Int(3)));
        assert_eq!(resolved.attrs.get("T"), Some(&AttrValue::Type(DataType::Float)));
        assert_eq!(resolved.inputs[1].start, 1);
        assert_eq!(resolved.inputs[1].len, 3);
        assert_eq!(resolved.output_types, vec![DataType::Float]);
    }

    #[test]
    fn rejects_mixed_list_types() {
        let err = concat_def()
            .resolve(
                "concat",
                &[
                    InputTypes::Single(DataType::Int32),
                    InputTypes::List(vec![DataType::Float, DataType::Double]),
                ],
                BTreeMap::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::InputTypeMismatch {
                expected: DataType::Float,
                actual: DataType::Double,
                ..
            }
        ));
    }

    #[test]
    fn enforces_minimum_list_length() {
        let err = concat_def()
            .resolve(
                "concat",
                &[
                    InputTypes::Single(DataType::Int32),
                    InputTypes::List(vec![DataType::Float]),
                ],
                BTreeMap::new(),
            )
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidAttrValue { attr, .. } if attr == "N"));
    }

    #[test]
    fn rejects_single_operand_for_list_argument() {
        let err = concat_def()
            .resolve(
                "concat",
                &[
                    InputTypes::Single(DataType::Int32),
                    InputTypes::Single(DataType::Float),
                ],
                BTreeMap::new(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::InputKindMismatch {
                expects_list: true,
                ..
            }
        ));
    }

    #[test]
    fn output_list_length_comes_from_attribute() {
        let mut attrs = BTreeMap::new();
        attrs.insert("num_split".to_string(), AttrValue::Int(4));
        let resolved = split_def()
            .resolve("split", &[InputTypes::Single(DataType::Int64)], attrs)
            .unwrap();
        assert_eq!(resolved.outputs[0].len, 4);
        assert_eq!(resolved.output_types, vec![DataType::Int64; 4]);
        assert!(!resolved.attrs.contains_key("mode"));
    }

    #[test]
    fn rejects_oversized_output_list() {
        let mut attrs = BTreeMap::new();
        attrs.insert("num_split".to_string(), AttrValue::Int(i64::MAX));
        let err = split_def()
            .resolve("split", &[InputTypes::Single(DataType::Float)], attrs.clone())
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidAttrValue { attr, .. } if attr == "num_split"));

        attrs.insert("num_split".to_string(), AttrValue::Int(MAX_LIST_LENGTH as i64));
        let resolved = split_def()
            .resolve("split", &[InputTypes::Single(DataType::Float)], attrs)
            .unwrap();
        assert_eq!(resolved.output_types.len(), MAX_LIST_LENGTH);
    }

    #[test]
    fn checks_tensor_payload_and_dtype() {
        let def = OpDef::new("Const")
            .output(ArgDef::typed("output", "dtype"))
            .attr(AttrDef::new("value", AttrType::Tensor).tensor_type("dtype"))
            .attr(AttrDef::new("dtype", AttrType::Type));

        let mut attrs = BTreeMap::new();
        attrs.insert("dtype".to_string(), AttrValue::Type(DataType::Float));
        attrs.insert(
            "value".to_string(),
            AttrValue::Tensor(Tensor {
                data_type: DataType::Float,
                shape: vec![4],
                content: vec![0, 0],
            }),
        );
        let err = def.resolve("c", &[], attrs.clone()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidAttrValue { attr, .. } if attr == "value"));

        attrs.insert("value".to_string(), AttrValue::Tensor(Tensor::scalar(7i32)));
        let err = def.resolve("c", &[], attrs.clone()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidAttrValue { ref reason, .. } if reason.contains("dtype")
        ));

        attrs.insert("dtype".to_string(), AttrValue::Type(DataType::Int32));
        let resolved = def.resolve("c", &[], attrs).unwrap();
        assert_eq!(resolved.output_types, vec![DataType::Int32]);
        assert_eq!(resolved.output_refs, vec![false]);
    }

    #[test]
    fn checks_declared_attributes() {
        let mut attrs = BTreeMap::new();
        attrs.insert("num_split".to_string(), AttrValue::Int(2));
        attrs.insert("mode".to_string(), AttrValue::String("slow".into()));
        let err = split_def()
            .resolve("split", &[InputTypes::Single(DataType::Float)], attrs.clone())
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidAttrValue { attr, .. } if attr == "mode"));

        attrs.insert("mode".to_string(), AttrValue::Int(1));
        let err = split_def()
            .resolve("split", &[InputTypes::Single(DataType::Float)], attrs.clone())
            .unwrap_err();
        assert!(matches!(err, GraphError::AttrTypeMismatch { .. }));

        attrs.remove("mode");
        attrs.insert("bogus".to_string(), AttrValue::Bool(true));
        let err = split_def()
            .resolve("split", &[InputTypes::Single(DataType::Float)], attrs)
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownAttribute { attr, .. } if attr == "bogus"));
    }

    #[test]
    fn reports_missing_required_attribute() {
        let err = split_def()
            .resolve("split", &[InputTypes::Single(DataType::Float)], BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, GraphError::MissingAttribute { attr, .. } if attr == "num_split"));
    }

    #[test]
    fn registry_rejects_duplicates_and_sorts_names() {
        let mut registry = OpRegistry::empty();
        registry.register(split_def()).unwrap();
        registry.register(concat_def()).unwrap();
        assert!(matches!(
            registry.register(concat_def()),
            Err(GraphError::DuplicateOpDef { .. })
        ));
        assert_eq!(registry.available_ops(), vec!["Concat", "Split"]);
        assert!(matches!(
            registry.get("Nope"),
            Err(GraphError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn default_registry_definitions_are_consistent() {
        let registry = OpRegistry::with_defaults();
        assert!(registry.len() > 40);
        for name in registry.available_ops() {
            let def = registry.lookup(name).unwrap();
            for arg in def.inputs.iter().chain(&def.outputs) {
                for attr in [&arg.type_attr, &arg.number_attr, &arg.type_list_attr]
                    .into_iter()
                    .flatten()
                {
                    assert!(
                        def.attr_def(attr).is_some(),
                        "{}.{} references undeclared attr {}",
                        name,
                        arg.name,
                        attr
                    );
                }
            }
            for attr in &def.attrs {
                if let Some(default) = &attr.default {
                    assert_eq!(default.attr_type(), attr.attr_type, "{}.{}", name, attr.name);
                }
            }
        }
    }

    #[test]
    fn op_defs_load_from_json() {
        let json = serde_json::json!({
            "name": "Custom",
            "inputs": [{"name": "x", "type_attr": "T"}],
            "outputs": [{"name": "y", "data_type": "float"}],
            "attrs": [
                {"name": "T", "type": "type"},
                {"name": "scale", "type": "float", "default": {"kind": "float", "value": 1.0}}
            ]
        });
        let def: OpDef = serde_json::from_value(json).unwrap();
        assert_eq!(def.inputs[0].type_attr.as_deref(), Some("T"));
        assert_eq!(def.attr_def("scale").unwrap().default, Some(AttrValue::Float(1.0)));
    }
}
