//! JSX markup tree to Angular template tree.

use crate::ast::*;
use crate::error::{TemplateWarning, TranslateError};
use crate::transforms::*;
use crate::TranslateOptions;
use jsx_parser::{AttrValue, Attribute, Element, ExpressionNode, MarkupNode, StateVar};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Translation state for one fragment.
pub(crate) struct Translator<'a> {
    /// setter name -> state name
    setters: FxHashMap<&'a str, &'a str>,
    options: &'a TranslateOptions,
    pub(crate) warnings: Vec<TemplateWarning>,
}

impl<'a> Translator<'a> {
    pub(crate) fn new(states: &'a [StateVar], options: &'a TranslateOptions) -> Self {
        Self {
            setters: jsx_parser::setter_lookup(states),
            options,
            warnings: Vec::new(),
        }
    }

    /// Translate one node. `base` is added to node spans to make them file
    /// offsets; it is non-zero inside re-parsed `.map` bodies.
    pub(crate) fn translate(&mut self, node: &MarkupNode, base: u32) -> Result<NgNode, TranslateError> {
        match node {
            MarkupNode::Element(el) => Ok(NgNode::Element(self.translate_element(el, base)?)),
            MarkupNode::Fragment(fragment) => Ok(NgNode::Container(
                self.translate_children(&fragment.children, base)?,
            )),
            MarkupNode::Text(text) => Ok(NgNode::Text(text.content.clone())),
            MarkupNode::Comment(comment) => Ok(NgNode::Comment(comment.content.clone())),
            MarkupNode::Expression(expr) => self.translate_expression(expr, base),
        }
    }

    fn translate_children(
        &mut self,
        children: &[MarkupNode],
        base: u32,
    ) -> Result<Vec<NgNode>, TranslateError> {
        children
            .iter()
            .map(|child| self.translate(child, base))
            .collect()
    }

    fn translate_expression(
        &mut self,
        expr: &ExpressionNode,
        base: u32,
    ) -> Result<NgNode, TranslateError> {
        // The code starts right after the opening brace.
        let code_base = base + expr.span.start + 1;

        if let Some(map) = parse_map_expression(&expr.code) {
            tracing::debug!(collection = map.collection, item = map.item, "list rendering");
            return Ok(NgNode::Element(self.translate_list(map, code_base)?));
        }

        if let Some(expr) = interpolation(&expr.code) {
            return Ok(NgNode::Interpolation(expr));
        }

        self.warnings.push(TemplateWarning::unsupported_expression(
            &expr.code,
            expr.span.offset_by(base),
        ));
        Ok(NgNode::Verbatim(expr.code.clone()))
    }

    fn translate_list(&mut self, map: MapExpression<'_>, base: u32) -> Result<NgElement, TranslateError> {
        let mut el = self.translate_element(&map.element, base)?;

        let mut directive = format!("let {} of {}", map.item, map.collection);
        if let Some(index) = map.index {
            directive.push_str(&format!("; let {index} = index"));
        }
        el.attrs.insert(0, NgAttribute::quoted("*ngFor", directive));
        trim_edges(&mut el.children);

        Ok(el)
    }

    fn translate_element(&mut self, el: &Element, base: u32) -> Result<NgElement, TranslateError> {
        let setters = &self.setters;
        if let Some(input) = controlled_input(el, |name| {
            setters.contains_key(name) || looks_like_setter(name)
        }) {
            return self.translate_controlled_input(el, input, base);
        }

        let mut attrs = Vec::with_capacity(el.attrs.len());
        for attr in &el.attrs {
            if let Some(attr) = self.translate_attribute(attr, base) {
                attrs.push(attr);
            }
        }

        Ok(NgElement {
            tag: el.tag.clone(),
            attrs,
            children: self.translate_children(&el.children, base)?,
            self_closing: el.self_closing,
        })
    }

    fn translate_controlled_input(
        &mut self,
        el: &Element,
        input: ControlledInput<'_>,
        base: u32,
    ) -> Result<NgElement, TranslateError> {
        let state = self.resolve_state(input.setter, el, base)?;
        tracing::debug!(setter = input.setter, state = %state, "two-way binding");

        let mut attrs = Vec::with_capacity(el.attrs.len() + 1);
        for attr in &el.attrs {
            match attr.name.as_str() {
                "value" => attrs.push(NgAttribute::quoted("[(ngModel)]", state.clone())),
                "onChange" => {}
                _ => {
                    if let Some(attr) = self.translate_attribute(attr, base) {
                        attrs.push(attr);
                    }
                }
            }
        }
        if el.attr("type").is_none() {
            attrs.push(NgAttribute::quoted("type", "text"));
        }

        Ok(NgElement {
            tag: el.tag.clone(),
            attrs,
            children: Vec::new(),
            self_closing: true,
        })
    }

    /// The state bound to a setter, falling back to the setter naming
    /// convention unless strict mapping is on.
    fn resolve_state(&mut self, setter: &str, el: &Element, base: u32) -> Result<String, TranslateError> {
        if let Some(state) = self.setters.get(setter) {
            return Ok(state.to_string());
        }

        let span = el.span.offset_by(base);
        if self.options.strict_state_mapping {
            return Err(TranslateError::unmapped_setter(setter, span));
        }

        let state = heuristic_state_name(setter).unwrap_or_else(|| setter.to_string());
        tracing::debug!(setter, state = %state, "guessed state name for two-way binding");
        self.warnings
            .push(TemplateWarning::heuristic_state_name(setter, &state, span));
        Ok(state)
    }

    fn translate_attribute(&mut self, attr: &Attribute, base: u32) -> Option<NgAttribute> {
        if attr.name == "key" {
            return None;
        }

        let name: SmolStr = rename_attribute(&attr.name).into();
        let value = match &attr.value {
            AttrValue::None => NgAttrValue::None,
            AttrValue::Str { value, quote } => NgAttrValue::Quoted {
                value: value.clone(),
                quote: *quote,
            },
            AttrValue::Expr(code) => {
                if let Some(call) = click_binding(&attr.name, code) {
                    return Some(NgAttribute::quoted("(click)", call));
                }
                if let Some(expr) = interpolation(code) {
                    return Some(NgAttribute::quoted(name, format!("{{{{ {expr} }}}}")));
                }
                self.warnings.push(TemplateWarning::unsupported_expression(
                    code,
                    attr.span.offset_by(base),
                ));
                NgAttrValue::Verbatim(code.clone())
            }
            AttrValue::Spread(code) => {
                self.warnings.push(TemplateWarning::unsupported_expression(
                    &format!("...{code}"),
                    attr.span.offset_by(base),
                ));
                NgAttrValue::Spread(code.clone())
            }
        };

        Some(NgAttribute { name, value })
    }
}

/// Trim leading whitespace of the first text child and trailing whitespace
/// of the last one, dropping them when nothing is left.
fn trim_edges(children: &mut Vec<NgNode>) {
    if let Some(NgNode::Text(text)) = children.first_mut() {
        *text = text.trim_start().to_string();
        if text.is_empty() {
            children.remove(0);
        }
    }
    if let Some(NgNode::Text(text)) = children.last_mut() {
        *text = text.trim_end().to_string();
        if text.is_empty() {
            children.pop();
        }
    }
}
