//! Shared descriptor model for Stencil.
//!
//! Upstream extraction (attribute scanning, syntax-tree walking, type/default
//! resolution) is out of scope for the core: an extractor hands over fully
//! normalized [`MethodDescriptor`]s in the shape below, one per method that
//! carries the generation marker. The serde derives define the JSON wire
//! format used when descriptors cross a process boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single declared parameter, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Declared type text, verbatim from the source.
    #[serde(rename = "type")]
    pub ty: String,
    /// Default-value literal text, verbatim. `None` marks a required parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Parameter {
    pub fn required(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        ty: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: Some(default.into()),
        }
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// A normalized method descriptor as handed over by the upstream extractor.
///
/// Parameters must form a prefix of required parameters followed by a suffix
/// of optional ones; [`MethodDescriptor::partition`] is the single place that
/// invariant is checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    pub return_type: String,
    pub enclosing_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl MethodDescriptor {
    /// Split the parameters into the required prefix and the optional suffix.
    ///
    /// A required parameter after the first optional one violates the
    /// descriptor contract and is rejected rather than mis-partitioned.
    pub fn partition(&self) -> Result<(&[Parameter], &[Parameter]), DescriptorError> {
        let split = self
            .parameters
            .iter()
            .position(Parameter::is_optional)
            .unwrap_or(self.parameters.len());

        if let Some(offset) = self.parameters[split..]
            .iter()
            .position(|p| !p.is_optional())
        {
            let index = split + offset;
            return Err(DescriptorError::RequiredAfterOptional {
                method: self.qualified_name(),
                name: self.parameters[index].name.clone(),
                index,
            });
        }

        Ok(self.parameters.split_at(split))
    }

    /// Fully qualified display name used in reports and logs.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}.{}", self.enclosing_type, self.name),
            None => format!("{}.{}", self.enclosing_type, self.name),
        }
    }
}

/// Top-level wire document: the full set of descriptors for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSet {
    pub methods: Vec<MethodDescriptor>,
}

/// A fully resolved overload candidate, ready for rendering.
///
/// `signature_params` is the reduced parameter list in original declaration
/// order; `call_args` always has one slot per *original* parameter, holding
/// either the kept parameter's name or the elided parameter's default literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Emission {
    pub signature_params: Vec<Parameter>,
    pub call_args: Vec<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error(
        "parameter `{name}` (position {index}) of `{method}` is required but follows an optional parameter"
    )]
    RequiredAfterOptional {
        method: String,
        name: String,
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn quux() -> MethodDescriptor {
        MethodDescriptor {
            name: "Quux".into(),
            return_type: "void".into(),
            enclosing_type: "MyClass".into(),
            namespace: None,
            parameters: vec![
                Parameter::required("a", "int"),
                Parameter::optional("b", "int", "1"),
                Parameter::optional("c", "int", "2"),
            ],
        }
    }

    #[test]
    fn partitions_required_prefix_and_optional_suffix() {
        let method = quux();
        let (required, optional) = method.partition().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].name, "a");
        assert_eq!(optional.len(), 2);
        assert!(optional.iter().all(Parameter::is_optional));
    }

    #[test]
    fn all_required_and_all_optional_are_both_valid() {
        let mut method = quux();
        method.parameters = vec![
            Parameter::required("a", "int"),
            Parameter::required("b", "int"),
        ];
        let (required, optional) = method.partition().unwrap();
        assert_eq!((required.len(), optional.len()), (2, 0));

        method.parameters = vec![
            Parameter::optional("a", "int", "1"),
            Parameter::optional("b", "int", "2"),
        ];
        let (required, optional) = method.partition().unwrap();
        assert_eq!((required.len(), optional.len()), (0, 2));
    }

    #[test]
    fn rejects_required_parameter_after_optional() {
        let mut method = quux();
        method.parameters = vec![
            Parameter::required("a", "int"),
            Parameter::optional("b", "int", "1"),
            Parameter::required("c", "int"),
        ];

        let err = method.partition().unwrap_err();
        assert_eq!(
            err,
            DescriptorError::RequiredAfterOptional {
                method: "MyClass.Quux".into(),
                name: "c".into(),
                index: 2,
            }
        );
    }

    #[test]
    fn qualified_name_includes_namespace_when_present() {
        let mut method = quux();
        assert_eq!(method.qualified_name(), "MyClass.Quux");

        method.namespace = Some("My.App".into());
        assert_eq!(method.qualified_name(), "My.App.MyClass.Quux");
    }

    #[test]
    fn wire_format_round_trips_through_json() {
        let text = r#"{
            "methods": [{
                "name": "Foo",
                "returnType": "void",
                "enclosingType": "MyClass",
                "namespace": "My.App",
                "parameters": [
                    { "name": "x", "type": "int" },
                    { "name": "y", "type": "string", "default": "\"x\"" }
                ]
            }]
        }"#;

        let set: DescriptorSet = serde_json::from_str(text).unwrap();
        assert_eq!(set.methods.len(), 1);

        let method = &set.methods[0];
        assert_eq!(method.return_type, "void");
        assert_eq!(method.parameters[0].default, None);
        assert_eq!(method.parameters[1].default.as_deref(), Some("\"x\""));

        let rendered = serde_json::to_string(&set).unwrap();
        let reparsed: DescriptorSet = serde_json::from_str(&rendered).unwrap();
        assert_eq!(reparsed, set);
    }
}
