use stencil_model::{Emission, MethodDescriptor};

/// Render one overload as a forwarding stub inside its enclosing type.
///
/// The stub is a single expression-bodied member that forwards to the
/// original method at full arity:
///
/// ```text
/// namespace My.App {
/// partial class Widget {
///     public void Foo(int x) => Foo(x, "x", false);
/// }
/// }
/// ```
///
/// The namespace wrapper is present only when the descriptor carries one.
pub fn render(method: &MethodDescriptor, emission: &Emission) -> String {
    let params = emission
        .signature_params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ");
    let args = emission.call_args.join(", ");

    let mut out = String::new();
    if let Some(ns) = &method.namespace {
        out.push_str(&format!("namespace {ns} {{\n"));
    }
    out.push_str(&format!("partial class {} {{\n", method.enclosing_type));
    out.push_str(&format!(
        "    public {} {}({params}) => {}({args});\n",
        method.return_type, method.name, method.name
    ));
    out.push_str("}\n");
    if method.namespace.is_some() {
        out.push_str("}\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stencil_model::Parameter;

    use super::*;

    #[test]
    fn renders_forwarding_stub_without_namespace() {
        let method = MethodDescriptor {
            name: "Foo".into(),
            return_type: "void".into(),
            enclosing_type: "MyClass".into(),
            namespace: None,
            parameters: vec![
                Parameter::required("x", "int"),
                Parameter::optional("y", "string", "\"x\""),
            ],
        };
        let emission = Emission {
            signature_params: vec![Parameter::required("x", "int")],
            call_args: vec!["x".into(), "\"x\"".into()],
        };

        assert_eq!(
            render(&method, &emission),
            "partial class MyClass {\n    public void Foo(int x) => Foo(x, \"x\");\n}\n"
        );
    }

    #[test]
    fn renders_namespace_wrapper_when_present() {
        let method = MethodDescriptor {
            name: "Frob".into(),
            return_type: "int".into(),
            enclosing_type: "Widget".into(),
            namespace: Some("My.App".into()),
            parameters: Vec::new(),
        };
        let emission = Emission {
            signature_params: Vec::new(),
            call_args: vec!["1".into(), "2".into()],
        };

        let text = render(&method, &emission);
        assert_eq!(
            text,
            "namespace My.App {\npartial class Widget {\n    public int Frob() => Frob(1, 2);\n}\n}\n"
        );
    }

    #[test]
    fn zero_parameter_signature_renders_empty_parens() {
        let method = MethodDescriptor {
            name: "Baz".into(),
            return_type: "void".into(),
            enclosing_type: "MyClass".into(),
            namespace: None,
            parameters: Vec::new(),
        };
        let emission = Emission {
            signature_params: Vec::new(),
            call_args: vec!["null".into(), "42".into()],
        };

        assert_eq!(
            render(&method, &emission),
            "partial class MyClass {\n    public void Baz() => Baz(null, 42);\n}\n"
        );
    }
}
