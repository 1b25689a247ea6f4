//! Angular component class generation.
//!
//! This crate turns a [`ComponentModel`] extracted from a React function
//! component into the source of an Angular component class: one field per
//! `useState` declaration and one method per event handler, with setter
//! calls rewritten to field assignments.

pub mod builder;
pub mod helpers;
pub mod infer;
pub mod rewrite;

use builder::CodeBuilder;
use jsx_parser::ComponentModel;

pub use helpers::{class_name, hyphenate, selector_name, ArtifactNames, DEFAULT_SELECTOR_PREFIX};
pub use infer::{infer_field_type, FieldType};
pub use rewrite::{reindent, rewrite_handler_body};

/// Options for code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Prefix of the component selector (`app` gives `app-todo-list`).
    pub selector_prefix: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            selector_prefix: DEFAULT_SELECTOR_PREFIX.to_string(),
        }
    }
}

/// Generate the component class source for a model.
///
/// The result has no trailing newline.
pub fn generate_component(model: &ComponentModel, options: &CodegenOptions) -> String {
    let identifier = model.identifier.as_str();
    let names = ArtifactNames::new(identifier);
    let mut builder = CodeBuilder::new();

    generate_header(&mut builder, identifier, &names, options);

    for state in &model.states {
        let ty = infer_field_type(&state.initializer);
        builder.line(format!(
            "  {}: {} = {};",
            state.name,
            ty,
            state.initializer.trim()
        ));
    }

    if !model.states.is_empty() {
        builder.blank();
    }

    for handler in model.handlers.values() {
        tracing::debug!(handler = %handler.name, "generating method");
        builder.line(format!("  {}() {{", handler.name));
        let body = reindent(&rewrite_handler_body(&handler.body, &model.states));
        for line in body.lines() {
            builder.indented(4, line);
        }
        builder.line("  }");
        builder.blank();
    }

    builder.trim_trailing_blank();
    builder.line("}");
    builder.finish()
}

fn generate_header(
    builder: &mut CodeBuilder,
    identifier: &str,
    names: &ArtifactNames,
    options: &CodegenOptions,
) {
    builder.line("import { Component } from '@angular/core';");
    builder.blank();
    builder.line("@Component({");
    builder.line(format!(
        "  selector: '{}',",
        selector_name(&options.selector_prefix, identifier)
    ));
    builder.line(format!("  templateUrl: './{}',", names.template_file));
    builder.line(format!("  styleUrls: ['./{}']", names.stylesheet_file));
    builder.line("})");
    builder.line(format!("export class {} {{", class_name(identifier)));
}
