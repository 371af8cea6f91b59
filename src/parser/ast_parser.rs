//! AST-based specifier extraction using oxc_parser.

use crate::parser::SourceParser;
use crate::types::{ConfuscanError, RawSpecifier, Result, SpecifierKind};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast::visit::walk;
use oxc_ast::Visit;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::Path;
use tracing::{debug, trace};

/// Syntax-tree extractor for import specifiers.
///
/// Yields specifier text exactly as written; classification into registry
/// package names happens later in [`normalize_specifier`](crate::parser::normalize_specifier).
#[derive(Debug, Clone, Copy, Default)]
pub struct AstParser;

impl AstParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for AstParser {
    fn parse(&self, source: &str, path: &Path) -> Result<Vec<RawSpecifier>> {
        let allocator = Allocator::default();
        let source_type = source_type_for(path);

        let parser_result = Parser::new(&allocator, source, source_type).parse();

        if parser_result.panicked {
            return Err(ConfuscanError::AstParseError(format!(
                "unrecoverable syntax in {}",
                path.display()
            )));
        }

        // Recoverable errors are common in minified or generated code
        if !parser_result.errors.is_empty() {
            trace!(
                "Parse had {} recoverable errors for {}, continuing...",
                parser_result.errors.len(),
                path.display()
            );
        }

        let mut visitor = SpecifierVisitor::new();
        visitor.visit_program(&parser_result.program);

        debug!(
            "Extracted {} specifiers from {}",
            visitor.specifiers.len(),
            path.display()
        );

        Ok(visitor.specifiers)
    }
}

/// Pick the dialect from the file extension, always in module mode.
fn source_type_for(path: &Path) -> SourceType {
    let source_type = SourceType::from_path(path)
        .unwrap_or_default()
        .with_module(true);

    // JSX stays off for .ts files where angle-bracket casts would misparse
    if source_type.is_typescript() {
        source_type
    } else {
        source_type.with_jsx(true)
    }
}

/// Visitor collecting specifier text from the four import constructs.
struct SpecifierVisitor {
    specifiers: Vec<RawSpecifier>,
}

impl SpecifierVisitor {
    fn new() -> Self {
        Self {
            specifiers: Vec::new(),
        }
    }

    fn push(&mut self, text: &str, kind: SpecifierKind) {
        self.specifiers.push(RawSpecifier {
            text: text.to_string(),
            kind,
        });
    }
}

impl<'a> Visit<'a> for SpecifierVisitor {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        self.push(decl.source.value.as_str(), SpecifierKind::StaticImport);
        walk::walk_import_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.push(decl.source.value.as_str(), SpecifierKind::ReExport);
        walk::walk_export_all_declaration(self, decl);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        // Only re-exports carry a source
        if let Some(ref source) = decl.source {
            self.push(source.value.as_str(), SpecifierKind::ReExport);
        }
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_call_expression(&mut self, expr: &CallExpression<'a>) {
        // require('pkg') with exactly one string-literal argument
        if let Expression::Identifier(id) = &expr.callee {
            if id.name == "require" && expr.arguments.len() == 1 {
                if let Some(Argument::StringLiteral(lit)) = expr.arguments.first() {
                    self.push(lit.value.as_str(), SpecifierKind::Require);
                }
            }
        }

        walk::walk_call_expression(self, expr);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        // Dynamic import('pkg'); computed sources cannot be resolved statically
        if let Expression::StringLiteral(lit) = &expr.source {
            self.push(lit.value.as_str(), SpecifierKind::DynamicImport);
        }
        walk::walk_import_expression(self, expr);
    }
}
