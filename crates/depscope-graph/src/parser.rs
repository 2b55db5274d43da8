//! Module parsing: import sites and the descriptor comment.
//!
//! The oxc AST lives in a per-call arena, so nothing borrowed from it leaves
//! this module. Callers get an owned [`ParsedModule`].

use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ExportAllDeclaration, ExportNamedDeclaration, Expression, ImportDeclaration, ImportExpression,
};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::descriptor::{Descriptor, extract_descriptor};
use crate::loader::LoadedSource;

/// Dialect the parser is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// JavaScript modules, JSX enabled
    JavaScript,
    TypeScript,
    Tsx,
}

impl Syntax {
    /// Pick the dialect from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ts" | "mts" | "cts") => Syntax::TypeScript,
            Some("tsx") => Syntax::Tsx,
            _ => Syntax::JavaScript,
        }
    }

    /// Pick the dialect from a component `<script lang="...">` value.
    pub fn from_lang(lang: &str) -> Self {
        match lang {
            "ts" => Syntax::TypeScript,
            "tsx" => Syntax::Tsx,
            _ => Syntax::JavaScript,
        }
    }

    fn source_type(self) -> SourceType {
        match self {
            Syntax::JavaScript => SourceType::jsx(),
            Syntax::TypeScript => SourceType::ts(),
            Syntax::Tsx => SourceType::tsx(),
        }
    }
}

/// How an import site was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import ... from '...'` or `import '...'`
    Static,
    /// `import('...')` with a literal argument
    Dynamic,
    /// `export ... from '...'`
    ReExport,
}

/// One import specifier found in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub specifier: String,
    pub kind: ImportKind,
}

/// Everything the walker needs from a parsed module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModule {
    /// Import sites in source order
    pub imports: Vec<ImportSite>,
    pub descriptor: Descriptor,
}

/// The parser rejected a module.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to parse '{}': {message}", path.display())]
pub struct ParseFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Reported errors kept in a [`ParseFailure`] message.
const MAX_REPORTED_ERRORS: usize = 3;

/// Parse module text, collecting import sites and the descriptor.
///
/// Any syntax error fails the whole module; a partially recovered AST could
/// hide or invent edges.
pub fn parse_module(
    path: &Path,
    source: &LoadedSource,
    marker: &str,
) -> Result<ParsedModule, ParseFailure> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &source.text, source.syntax.source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let mut message = ret
            .errors
            .iter()
            .take(MAX_REPORTED_ERRORS)
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        if message.is_empty() {
            message = "unrecoverable syntax error".to_string();
        }
        return Err(ParseFailure {
            path: path.to_path_buf(),
            message,
        });
    }

    let text = source.text.as_str();
    let block_comments = ret
        .program
        .comments
        .iter()
        .filter(|comment| comment.is_block())
        .filter_map(|comment| {
            let span = comment.content_span();
            text.get(span.start as usize..span.end as usize)
        });
    let descriptor = extract_descriptor(block_comments, marker);

    let mut collector = ImportCollector::default();
    collector.visit_program(&ret.program);

    Ok(ParsedModule {
        imports: collector.imports,
        descriptor,
    })
}

#[derive(Default)]
struct ImportCollector {
    imports: Vec<ImportSite>,
}

impl ImportCollector {
    fn push(&mut self, specifier: &str, kind: ImportKind) {
        self.imports.push(ImportSite {
            specifier: specifier.to_string(),
            kind,
        });
    }
}

/// Literal argument of `import(...)`: a string or a template without substitutions.
fn literal_specifier<'s>(expr: &'s Expression<'_>) -> Option<&'s str> {
    match expr {
        Expression::StringLiteral(lit) => Some(lit.value.as_str()),
        Expression::TemplateLiteral(tpl) if tpl.expressions.is_empty() => tpl
            .quasis
            .first()
            .and_then(|quasi| quasi.value.cooked.as_ref())
            .map(|cooked| cooked.as_str()),
        _ => None,
    }
}

impl<'a> Visit<'a> for ImportCollector {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        self.push(decl.source.value.as_str(), ImportKind::Static);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Some(specifier) = literal_specifier(&expr.source) {
            self.push(specifier, ImportKind::Dynamic);
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &decl.source {
            self.push(source.value.as_str(), ImportKind::ReExport);
        }
        // Exported declarations can hold dynamic imports
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.push(decl.source.value.as_str(), ImportKind::ReExport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DEFAULT_MARKER;

    fn parse(text: &str, syntax: Syntax) -> Result<ParsedModule, ParseFailure> {
        let source = LoadedSource {
            text: text.to_string(),
            syntax,
        };
        parse_module(Path::new("test.js"), &source, DEFAULT_MARKER)
    }

    fn specifiers(module: &ParsedModule, kind: ImportKind) -> Vec<&str> {
        module
            .imports
            .iter()
            .filter(|site| site.kind == kind)
            .map(|site| site.specifier.as_str())
            .collect()
    }

    #[test]
    fn test_static_imports() {
        let module = parse(
            "import a from './a'\nimport { b } from './b'\nimport './side-effect'\nimport * as c from 'vue'",
            Syntax::JavaScript,
        )
        .unwrap();
        assert_eq!(
            specifiers(&module, ImportKind::Static),
            vec!["./a", "./b", "./side-effect", "vue"]
        );
    }

    #[test]
    fn test_dynamic_imports() {
        let module = parse(
            r#"
const routes = [{ component: () => import('./views/List.vue') }]
const tpl = import(`./tpl`)
const computed = import('./pages/' + name)
"#,
            Syntax::JavaScript,
        )
        .unwrap();
        assert_eq!(
            specifiers(&module, ImportKind::Dynamic),
            vec!["./views/List.vue", "./tpl"]
        );
    }

    #[test]
    fn test_reexports() {
        let module = parse(
            "export { a } from './a'\nexport * from './b'\nexport const lazy = () => import('./c')",
            Syntax::JavaScript,
        )
        .unwrap();
        assert_eq!(specifiers(&module, ImportKind::ReExport), vec!["./a", "./b"]);
        assert_eq!(specifiers(&module, ImportKind::Dynamic), vec!["./c"]);
    }

    #[test]
    fn test_jsx_in_js() {
        let module = parse(
            "import Button from './Button'\nexport default () => <Button />",
            Syntax::JavaScript,
        )
        .unwrap();
        assert_eq!(module.imports.len(), 1);
    }

    #[test]
    fn test_typescript() {
        let module = parse(
            "import type { T } from './types'\nconst x = <number>y\nexport type U = T",
            Syntax::TypeScript,
        )
        .unwrap();
        assert_eq!(specifiers(&module, ImportKind::Static), vec!["./types"]);
    }

    #[test]
    fn test_descriptor() {
        let module = parse(
            "// @Description: line comments do not count\n/**\n * @Description: orders\n * @Author: lin\n */\nimport a from './a'",
            Syntax::JavaScript,
        )
        .unwrap();
        assert_eq!(module.descriptor.len(), 2);
        assert_eq!(module.descriptor["Description"], "orders");
    }

    #[test]
    fn test_syntax_error() {
        let err = parse("import from from from", Syntax::JavaScript).unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_empty_source() {
        let module = parse("", Syntax::JavaScript).unwrap();
        assert!(module.imports.is_empty());
        assert!(module.descriptor.is_empty());
    }

    #[test]
    fn test_syntax_from_path() {
        assert_eq!(Syntax::from_path(Path::new("a.mts")), Syntax::TypeScript);
        assert_eq!(Syntax::from_path(Path::new("a.tsx")), Syntax::Tsx);
        assert_eq!(Syntax::from_path(Path::new("a.cjs")), Syntax::JavaScript);
    }
}
