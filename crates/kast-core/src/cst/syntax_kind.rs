//! Syntax kind enumeration for the Kotlin CST
//!
//! This module defines all possible node and token types in the concrete
//! syntax tree produced by the front-end. It includes:
//! - Trivia (whitespace, newlines, comments, shebang)
//! - Hard keywords (soft keywords are lexed as identifiers)
//! - Punctuation and operators
//! - String template pieces
//! - Structural nodes (declarations, expressions, types)

use std::fmt;

macro_rules! syntax_kinds {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        /// Syntax kind for Kotlin language elements
        ///
        /// Discriminants are dense and start at zero, which lets
        /// [`KtSyntaxKind::from_raw`] index [`KtSyntaxKind::ALL`] directly.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum KtSyntaxKind {
            $($(#[$meta])* $name),*
        }

        impl KtSyntaxKind {
            /// Every kind, ordered by discriminant
            pub const ALL: &'static [KtSyntaxKind] = &[$(KtSyntaxKind::$name),*];
        }
    };
}

syntax_kinds! {
    // ==================
    // Trivia
    // ==================
    /// Spaces and tabs
    Whitespace,
    /// `\n`, `\r\n` or `\r`
    Newline,
    /// `// ...`
    LineComment,
    /// `/* ... */`, possibly nested
    BlockComment,
    /// `#!...` on the first line
    Shebang,

    // ==================
    // Literals & identifiers
    // ==================
    Ident,
    IntLiteral,
    FloatLiteral,
    CharLiteral,

    // ==================
    // String template pieces
    // ==================
    /// `"` or `"""`
    OpenQuote,
    /// `"` or `"""`
    ClosingQuote,
    RegularStringPart,
    /// `\n`, `\$`, `\uXXXX`, ...
    EscapeSequence,
    /// `$` directly followed by an identifier or `this`
    ShortTemplateEntryStart,
    /// `${`
    LongTemplateEntryStart,
    /// `}` closing a `${`
    LongTemplateEntryEnd,

    // ==================
    // Hard keywords
    // ==================
    AsKw,
    /// `as?`
    AsSafeKw,
    BreakKw,
    ClassKw,
    ContinueKw,
    DoKw,
    ElseKw,
    FalseKw,
    ForKw,
    FunKw,
    IfKw,
    InKw,
    /// `!in`
    NotInKw,
    InterfaceKw,
    IsKw,
    /// `!is`
    NotIsKw,
    NullKw,
    ObjectKw,
    PackageKw,
    ReturnKw,
    SuperKw,
    ThisKw,
    ThrowKw,
    TrueKw,
    TryKw,
    TypealiasKw,
    TypeofKw,
    ValKw,
    VarKw,
    WhenKw,
    WhileKw,
    /// A soft keyword the parser recognised in keyword position
    SoftKw,

    // ==================
    // Punctuation
    // ==================
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    /// `?.`
    SafeDot,
    Colon,
    /// `::`
    ColonColon,
    Semicolon,
    At,
    Question,
    /// `->`
    Arrow,
    Hash,

    // ==================
    // Operators
    // ==================
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Excl,
    /// `!!`
    ExclExcl,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    EqEq,
    ExclEq,
    EqEqEq,
    ExclEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    /// `?:`
    Elvis,
    /// `..`
    Range,
    /// `..<`
    RangeUntil,

    // ==================
    // Special tokens
    // ==================
    /// Unrecognised input
    ErrorToken,
    /// End of input; never stored in the tree
    Eof,

    // ==================
    // Roots & directives
    // ==================
    KtFile,
    Script,
    FileAnnotationList,
    PackageDirective,
    ImportList,
    ImportDirective,
    ImportAlias,

    // ==================
    // Declarations
    // ==================
    Class,
    ObjectDeclaration,
    PrimaryConstructor,
    SuperTypeList,
    SuperTypeCallEntry,
    DelegatedSuperTypeEntry,
    SuperTypeEntry,
    ClassBody,
    EnumEntry,
    ClassInitializer,
    Fun,
    Property,
    PropertyAccessor,
    PropertyDelegate,
    DestructuringDeclaration,
    DestructuringDeclarationEntry,
    Typealias,
    SecondaryConstructor,
    ConstructorDelegationCall,
    ValueParameterList,
    ValueParameter,
    TypeParameterList,
    TypeParameter,
    TypeConstraintList,
    TypeConstraint,
    ContractEffectList,
    ContractEffect,

    // ==================
    // Modifiers & annotations
    // ==================
    ModifierList,
    AnnotationSet,
    AnnotationEntry,
    ConstructorCallee,

    // ==================
    // Types
    // ==================
    TypeReference,
    UserType,
    NullableType,
    FunctionType,
    FunctionTypeReceiver,
    FunctionTypeParameter,
    ContextReceiverList,
    DynamicType,
    ParenthesizedType,
    TypeArgumentList,
    TypeProjection,

    // ==================
    // Expressions
    // ==================
    BinaryExpression,
    DotQualifiedExpression,
    SafeAccessExpression,
    OperationReference,
    PrefixExpression,
    PostfixExpression,
    IsExpression,
    BinaryWithType,
    CallableReferenceExpression,
    ClassLiteralExpression,
    Parenthesized,
    StringTemplate,
    LiteralStringTemplateEntry,
    ShortStringTemplateEntry,
    LongStringTemplateEntry,
    EscapeStringTemplateEntry,
    BooleanConstant,
    CharacterConstant,
    IntegerConstant,
    FloatConstant,
    NullConstant,
    LambdaExpression,
    LambdaParameterList,
    LambdaBody,
    ThisExpression,
    SuperExpression,
    LabelQualifier,
    When,
    WhenEntry,
    WhenConditionExpression,
    WhenConditionInRange,
    WhenConditionIsPattern,
    ObjectLiteral,
    Throw,
    Return,
    Continue,
    Break,
    CollectionLiteralExpression,
    ReferenceExpression,
    LabeledExpression,
    AnnotatedExpression,
    CallExpression,
    ValueArgumentList,
    ValueArgument,
    LambdaArgument,
    ArrayAccessExpression,
    Indices,
    AnonymousFunction,
    Block,
    If,
    Try,
    Catch,
    Finally,
    For,
    While,
    DoWhile,

    /// Node wrapping tokens the parser could not place
    Error,
}

impl KtSyntaxKind {
    /// Map a raw rowan kind back to a syntax kind
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Check if this is trivia in the front-end sense
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment | Self::Shebang
        )
    }

    /// Check if this token becomes an `Extra` in the AST
    ///
    /// Semicolons separate statements in the CST but carry no meaning in the
    /// node model, so they are kept as trivia there.
    pub const fn is_extra(self) -> bool {
        self.is_trivia() || matches!(self, Self::Semicolon)
    }

    /// Check if this is a comment
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment | Self::Shebang)
    }

    /// Check if this is a hard keyword
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= (Self::AsKw as u16) && (self as u16) <= (Self::SoftKw as u16)
    }

    /// Check if this is a token kind (as opposed to a node kind)
    pub const fn is_token(self) -> bool {
        (self as u16) <= (Self::Eof as u16)
    }

    /// Check if this is a node kind
    pub const fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Fixed text for punctuation, operator and hard keyword tokens
    pub const fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            Self::AsKw => "as",
            Self::AsSafeKw => "as?",
            Self::BreakKw => "break",
            Self::ClassKw => "class",
            Self::ContinueKw => "continue",
            Self::DoKw => "do",
            Self::ElseKw => "else",
            Self::FalseKw => "false",
            Self::ForKw => "for",
            Self::FunKw => "fun",
            Self::IfKw => "if",
            Self::InKw => "in",
            Self::NotInKw => "!in",
            Self::InterfaceKw => "interface",
            Self::IsKw => "is",
            Self::NotIsKw => "!is",
            Self::NullKw => "null",
            Self::ObjectKw => "object",
            Self::PackageKw => "package",
            Self::ReturnKw => "return",
            Self::SuperKw => "super",
            Self::ThisKw => "this",
            Self::ThrowKw => "throw",
            Self::TrueKw => "true",
            Self::TryKw => "try",
            Self::TypealiasKw => "typealias",
            Self::TypeofKw => "typeof",
            Self::ValKw => "val",
            Self::VarKw => "var",
            Self::WhenKw => "when",
            Self::WhileKw => "while",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::SafeDot => "?.",
            Self::Colon => ":",
            Self::ColonColon => "::",
            Self::Semicolon => ";",
            Self::At => "@",
            Self::Question => "?",
            Self::Arrow => "->",
            Self::Hash => "#",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Excl => "!",
            Self::ExclExcl => "!!",
            Self::Eq => "=",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::PercentEq => "%=",
            Self::EqEq => "==",
            Self::ExclEq => "!=",
            Self::EqEqEq => "===",
            Self::ExclEqEq => "!==",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Elvis => "?:",
            Self::Range => "..",
            Self::RangeUntil => "..<",
            _ => return None,
        };
        Some(text)
    }

    /// Look up a hard keyword by its text
    pub fn hard_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "as" => Self::AsKw,
            "break" => Self::BreakKw,
            "class" => Self::ClassKw,
            "continue" => Self::ContinueKw,
            "do" => Self::DoKw,
            "else" => Self::ElseKw,
            "false" => Self::FalseKw,
            "for" => Self::ForKw,
            "fun" => Self::FunKw,
            "if" => Self::IfKw,
            "in" => Self::InKw,
            "interface" => Self::InterfaceKw,
            "is" => Self::IsKw,
            "null" => Self::NullKw,
            "object" => Self::ObjectKw,
            "package" => Self::PackageKw,
            "return" => Self::ReturnKw,
            "super" => Self::SuperKw,
            "this" => Self::ThisKw,
            "throw" => Self::ThrowKw,
            "true" => Self::TrueKw,
            "try" => Self::TryKw,
            "typealias" => Self::TypealiasKw,
            "typeof" => Self::TypeofKw,
            "val" => Self::ValKw,
            "var" => Self::VarKw,
            "when" => Self::WhenKw,
            "while" => Self::WhileKw,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for KtSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fixed_text() {
            Some(text) => write!(f, "'{text}'"),
            None => write!(f, "{self:?}"),
        }
    }
}

impl From<KtSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: KtSyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_are_dense() {
        for (index, kind) in KtSyntaxKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index, "{kind:?} out of order");
            assert_eq!(KtSyntaxKind::from_raw(index as u16), Some(*kind));
        }
        assert_eq!(KtSyntaxKind::from_raw(u16::MAX), None);
    }

    #[test]
    fn test_trivia_classification() {
        assert!(KtSyntaxKind::Whitespace.is_trivia());
        assert!(KtSyntaxKind::LineComment.is_trivia());
        assert!(!KtSyntaxKind::Semicolon.is_trivia());
        assert!(KtSyntaxKind::Semicolon.is_extra());
        assert!(!KtSyntaxKind::Ident.is_extra());
    }

    #[test]
    fn test_keyword_classification() {
        assert!(KtSyntaxKind::FunKw.is_keyword());
        assert!(KtSyntaxKind::SoftKw.is_keyword());
        assert!(!KtSyntaxKind::Ident.is_keyword());
        assert!(!KtSyntaxKind::LParen.is_keyword());
    }

    #[test]
    fn test_token_node_split() {
        assert!(KtSyntaxKind::ErrorToken.is_token());
        assert!(KtSyntaxKind::KtFile.is_node());
        assert!(KtSyntaxKind::Error.is_node());
    }

    #[test]
    fn test_hard_keyword_texts_agree() {
        for kind in KtSyntaxKind::ALL.iter().filter(|k| k.is_keyword()) {
            if let Some(text) = kind.fixed_text()
                && !text.starts_with('!')
                && text != "as?"
            {
                assert_eq!(KtSyntaxKind::hard_keyword(text), Some(*kind));
            }
        }
    }
}
