//! Source languages and the small enums shared by every front-end.

use std::fmt;

/// The language a file unit was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CPlusPlus,
    CSharp,
    Java,
    /// Language-neutral nodes such as built-in types.
    Any,
}

impl Language {
    /// Guess the language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "c" | "cc" | "cpp" | "cxx" | "h" | "hh" | "hpp" | "hxx" => Some(Language::CPlusPlus),
            "cs" => Some(Language::CSharp),
            "java" => Some(Language::Java),
            _ => None,
        }
    }

    /// Guess the language from a file path.
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// The keyword naming the direct parent type, if the language has one.
    pub fn base_keyword(self) -> Option<&'static str> {
        match self {
            Language::CSharp => Some("base"),
            Language::Java => Some("super"),
            Language::CPlusPlus | Language::Any => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::CPlusPlus => "C++",
            Language::CSharp => "C#",
            Language::Java => "Java",
            Language::Any => "any",
        };
        f.write_str(name)
    }
}

/// Declared accessibility of a member or type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accessibility {
    #[default]
    None,
    Public,
    Protected,
    Private,
    Internal,
    ProtectedInternal,
}

/// The flavour of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Union,
    Enum,
    /// Canonical primitive registered in [`BuiltInTypes`](crate::model::BuiltInTypes).
    BuiltIn,
}

/// The lexical category of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Boolean,
    Character,
    Number,
    String,
    Null,
    Other,
}
