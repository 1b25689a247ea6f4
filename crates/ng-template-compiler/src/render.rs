//! Template text rendering.

use crate::ast::*;

/// Render template nodes to text.
pub fn render(nodes: &[NgNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, &mut out);
    }
    out
}

fn render_node(node: &NgNode, out: &mut String) {
    match node {
        NgNode::Element(el) => render_element(el, out),
        NgNode::Container(children) => {
            out.push_str("<ng-container>");
            for child in children {
                render_node(child, out);
            }
            out.push_str("</ng-container>");
        }
        NgNode::Text(text) => out.push_str(text),
        NgNode::Interpolation(expr) => {
            out.push_str("{{ ");
            out.push_str(expr);
            out.push_str(" }}");
        }
        NgNode::Verbatim(code) => {
            out.push('{');
            out.push_str(code);
            out.push('}');
        }
        NgNode::Comment(content) => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
    }
}

fn render_element(el: &NgElement, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for attr in &el.attrs {
        out.push(' ');
        render_attribute(attr, out);
    }

    if el.self_closing {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &el.children {
        render_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn render_attribute(attr: &NgAttribute, out: &mut String) {
    match &attr.value {
        NgAttrValue::None => out.push_str(&attr.name),
        NgAttrValue::Quoted { value, quote } => {
            out.push_str(&attr.name);
            out.push('=');
            out.push(*quote);
            out.push_str(value);
            out.push(*quote);
        }
        NgAttrValue::Verbatim(code) => {
            out.push_str(&attr.name);
            out.push_str("={");
            out.push_str(code);
            out.push('}');
        }
        NgAttrValue::Spread(code) => {
            out.push_str("{...");
            out.push_str(code);
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_element_tree() {
        let tree = NgNode::Element(NgElement {
            tag: "ul".into(),
            attrs: vec![NgAttribute::quoted("class", "list")],
            children: vec![NgNode::Element(NgElement {
                tag: "li".into(),
                attrs: vec![NgAttribute::quoted("*ngFor", "let t of todos")],
                children: vec![NgNode::Interpolation("t".into())],
                self_closing: false,
            })],
            self_closing: false,
        });
        assert_eq!(
            render(&[tree]),
            r#"<ul class="list"><li *ngFor="let t of todos">{{ t }}</li></ul>"#
        );
    }

    #[test]
    fn test_render_leaf_nodes() {
        let nodes = vec![
            NgNode::Container(vec![NgNode::Text("a".into())]),
            NgNode::Verbatim("x + 1".into()),
            NgNode::Comment(" note ".into()),
            NgNode::Element(NgElement {
                tag: "br".into(),
                attrs: vec![],
                children: vec![],
                self_closing: true,
            }),
        ];
        assert_eq!(
            render(&nodes),
            "<ng-container>a</ng-container>{x + 1}<!-- note --><br />"
        );
    }

    #[test]
    fn test_render_attribute_kinds() {
        let el = NgElement {
            tag: "button".into(),
            attrs: vec![
                NgAttribute {
                    name: "disabled".into(),
                    value: NgAttrValue::None,
                },
                NgAttribute {
                    name: "title".into(),
                    value: NgAttrValue::Quoted {
                        value: "hi".into(),
                        quote: '\'',
                    },
                },
                NgAttribute {
                    name: "style".into(),
                    value: NgAttrValue::Verbatim("{ color: c }".into()),
                },
                NgAttribute {
                    name: "...".into(),
                    value: NgAttrValue::Spread("rest".into()),
                },
            ],
            children: vec![],
            self_closing: false,
        };
        assert_eq!(
            render(&[NgNode::Element(el)]),
            "<button disabled title='hi' style={{ color: c }} {...rest}></button>"
        );
    }
}
