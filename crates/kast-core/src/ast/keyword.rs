//! Reserved words, modifiers and operator tokens

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw token text with no matching [`KeywordKind`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown keyword: '{0}'")]
pub struct UnknownKeyword(pub String);

macro_rules! keyword_kinds {
    ($($name:ident => $text:literal),* $(,)?) => {
        /// One variant per fixed token text
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum KeywordKind {
            $($name),*
        }

        impl KeywordKind {
            pub const ALL: &'static [KeywordKind] = &[$(KeywordKind::$name),*];

            /// The exact source text of this keyword
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(KeywordKind::$name => $text),*
                }
            }
        }

        impl FromStr for KeywordKind {
            type Err = UnknownKeyword;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                match text {
                    $($text => Ok(KeywordKind::$name),)*
                    _ => Err(UnknownKeyword(text.to_string())),
                }
            }
        }
    };
}

keyword_kinds! {
    // Hard keywords
    As => "as",
    AsSafe => "as?",
    Break => "break",
    Class => "class",
    Continue => "continue",
    Do => "do",
    Else => "else",
    For => "for",
    Fun => "fun",
    If => "if",
    In => "in",
    NotIn => "!in",
    Interface => "interface",
    Is => "is",
    NotIs => "!is",
    Object => "object",
    Package => "package",
    Return => "return",
    Super => "super",
    This => "this",
    Throw => "throw",
    Try => "try",
    Typealias => "typealias",
    Typeof => "typeof",
    Val => "val",
    Var => "var",
    When => "when",
    While => "while",

    // Modifiers
    Public => "public",
    Private => "private",
    Protected => "protected",
    Internal => "internal",
    Abstract => "abstract",
    Final => "final",
    Open => "open",
    Sealed => "sealed",
    Data => "data",
    Enum => "enum",
    Annotation => "annotation",
    Inner => "inner",
    Value => "value",
    Companion => "companion",
    Lateinit => "lateinit",
    Override => "override",
    Const => "const",
    Inline => "inline",
    Noinline => "noinline",
    Crossinline => "crossinline",
    Tailrec => "tailrec",
    Operator => "operator",
    Infix => "infix",
    External => "external",
    Suspend => "suspend",
    Expect => "expect",
    Actual => "actual",
    Vararg => "vararg",
    Out => "out",
    Reified => "reified",

    // Annotation use-site targets
    File => "file",
    Field => "field",
    Property => "property",
    Get => "get",
    Set => "set",
    Receiver => "receiver",
    Param => "param",
    Setparam => "setparam",
    Delegate => "delegate",

    // Operators
    Plus => "+",
    Minus => "-",
    Mul => "*",
    Div => "/",
    Mod => "%",
    Incr => "++",
    Decr => "--",
    Excl => "!",
    ExclExcl => "!!",
    Assign => "=",
    PlusAssign => "+=",
    MinusAssign => "-=",
    MulAssign => "*=",
    DivAssign => "/=",
    ModAssign => "%=",
    EqEq => "==",
    NotEq => "!=",
    EqEqEq => "===",
    NotEqEq => "!==",
    Lt => "<",
    Gt => ">",
    LtEq => "<=",
    GtEq => ">=",
    AndAnd => "&&",
    OrOr => "||",
    Elvis => "?:",
    Range => "..",
    RangeUntil => "..<",
    Dot => ".",
    SafeDot => "?.",
}

impl KeywordKind {
    /// Keywords made of letters, which need spacing from neighbouring words
    pub fn is_word(self) -> bool {
        self.as_str()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '!')
            && self.as_str().chars().last().is_some_and(|c| c.is_ascii_alphabetic() || c == '?')
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
