//! Canonical nodes for primitive and keyword types.
//!
//! Each built-in name maps to exactly one type statement that belongs to
//! no tree, so resolution results can be compared by handle.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::arena::CodeModel;
use super::expression::ExprKind;
use super::ids::{ExprId, StatementId};
use super::statement::{Statement, StatementKind, TypeDef};
use crate::syntax::{Accessibility, Language, LiteralKind, TypeKind};

/// Union of the C++, C# and Java primitive and keyword type names.
const BUILTIN_NAMES: &[&str] = &[
    // shared
    "void", "char", "short", "int", "long", "float", "double", "byte",
    // C++
    "bool", "wchar_t", "char8_t", "char16_t", "char32_t", "signed", "unsigned",
    "signed char", "unsigned char", "short int", "unsigned short", "unsigned short int",
    "unsigned int", "long int", "unsigned long", "unsigned long int", "long long",
    "long long int", "unsigned long long", "unsigned long long int", "long double",
    // C#
    "sbyte", "ushort", "uint", "ulong", "nint", "nuint", "decimal", "string", "object",
    "dynamic",
    // Java
    "boolean",
];

/// Registry of built-in type statements, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct BuiltInTypes {
    by_name: FxHashMap<SmolStr, StatementId>,
}

impl BuiltInTypes {
    /// Allocate one canonical type statement per built-in name.
    pub(crate) fn populate(model: &mut CodeModel) -> Self {
        let mut by_name = FxHashMap::default();
        for &name in BUILTIN_NAMES {
            let id = model.alloc_statement(Statement::new(
                StatementKind::Type(TypeDef {
                    name: SmolStr::new(name),
                    kind: TypeKind::BuiltIn,
                    parent_type_names: Vec::new(),
                    accessibility: Accessibility::Public,
                    is_partial: false,
                    prefix: None,
                }),
                Language::Any,
            ));
            by_name.insert(SmolStr::new(name), id);
        }
        Self { by_name }
    }

    /// The canonical node for a built-in name.
    pub fn get(&self, name: &str) -> Option<StatementId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl CodeModel {
    /// The built-in node a type use denotes, if any.
    ///
    /// Only unprefixed type uses can name a built-in; `std::string` is
    /// a user-visible type, not C#'s `string`.
    pub fn builtin_for(&self, type_use: ExprId) -> Option<StatementId> {
        match &self.expression(type_use).kind {
            ExprKind::Type { name, .. } if name.prefix.is_none() => self.builtins().get(&name.name),
            _ => None,
        }
    }

    /// The built-in type of a literal, in the given source language.
    pub fn literal_type(
        &self,
        kind: LiteralKind,
        text: &str,
        language: Language,
    ) -> Option<StatementId> {
        let name = match kind {
            LiteralKind::Boolean if language == Language::Java => "boolean",
            LiteralKind::Boolean => "bool",
            LiteralKind::Character => "char",
            LiteralKind::Number => number_type(text),
            LiteralKind::String if language == Language::CSharp => "string",
            LiteralKind::String | LiteralKind::Null | LiteralKind::Other => return None,
        };
        self.builtins().get(name)
    }
}

fn number_type(text: &str) -> &'static str {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("0x") {
        return if lower.ends_with('l') { "long" } else { "int" };
    }
    if lower.ends_with('f') {
        "float"
    } else if lower.ends_with('m') {
        "decimal"
    } else if lower.contains('.') || lower.contains('e') || lower.ends_with('d') {
        "double"
    } else if lower.ends_with('l') {
        "long"
    } else {
        "int"
    }
}
