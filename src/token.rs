/*
 * Copyright (c) 2026-present, the Ladybird developers.
 *
 * SPDX-License-Identifier: BSD-2-Clause
 */

//! Token types and Token struct for the lexer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Invalid,
    Number,
    String,
    Punctuation,
    Operator,
    Keyword,
    ControlKeyword,
    Identifier,
}

/// Generates the `TokenType` enum with `category()` and `name()` methods.
/// Each entry maps a variant to its `TokenCategory`. The name is derived
/// automatically via `stringify!`.
macro_rules! define_tokens {
    ( $( $variant:ident => $category:ident ),* $(,)? ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum TokenType {
            $( $variant, )*
        }

        impl TokenType {
            pub fn category(self) -> TokenCategory {
                match self {
                    $( TokenType::$variant => TokenCategory::$category, )*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( TokenType::$variant => stringify!($variant), )*
                }
            }
        }
    };
}

define_tokens! {
    Ampersand                   => Operator,
    AmpersandEquals             => Operator,
    Arrow                       => Operator,
    Asterisk                    => Operator,
    AsteriskEquals              => Operator,
    Async                       => Keyword,
    Await                       => Keyword,
    BigIntLiteral               => Number,
    BoolLiteral                 => Keyword,
    BracketClose                => Punctuation,
    BracketOpen                 => Punctuation,
    Break                       => ControlKeyword,
    Caret                       => Operator,
    CaretEquals                 => Operator,
    Case                        => ControlKeyword,
    Catch                       => ControlKeyword,
    Class                       => Keyword,
    Colon                       => Punctuation,
    Comma                       => Punctuation,
    Const                       => Keyword,
    Continue                    => ControlKeyword,
    CurlyClose                  => Punctuation,
    CurlyOpen                   => Punctuation,
    Debugger                    => Keyword,
    Default                     => ControlKeyword,
    Delete                      => Keyword,
    Do                          => ControlKeyword,
    DoubleAmpersand             => Operator,
    DoubleAmpersandEquals       => Operator,
    DoubleAsterisk              => Operator,
    DoubleAsteriskEquals        => Operator,
    DoublePipe                  => Operator,
    DoublePipeEquals            => Operator,
    DoubleQuestionMark          => Operator,
    DoubleQuestionMarkEquals    => Operator,
    Else                        => ControlKeyword,
    Eof                         => Invalid,
    Equals                      => Operator,
    EqualsEquals                => Operator,
    EqualsEqualsEquals          => Operator,
    ExclamationMark             => Operator,
    ExclamationMarkEquals       => Operator,
    ExclamationMarkEqualsEquals => Operator,
    Export                      => Keyword,
    Extends                     => Keyword,
    Finally                     => ControlKeyword,
    For                         => ControlKeyword,
    Function                    => Keyword,
    GreaterThan                 => Operator,
    GreaterThanEquals           => Operator,
    Identifier                  => Identifier,
    If                          => ControlKeyword,
    Import                      => Keyword,
    In                          => Keyword,
    Instanceof                  => Keyword,
    Invalid                     => Invalid,
    LessThan                    => Operator,
    LessThanEquals              => Operator,
    Let                         => Keyword,
    Minus                       => Operator,
    MinusEquals                 => Operator,
    MinusMinus                  => Operator,
    New                         => Keyword,
    NullLiteral                 => Keyword,
    NumericLiteral              => Number,
    ParenClose                  => Punctuation,
    ParenOpen                   => Punctuation,
    Percent                     => Operator,
    PercentEquals               => Operator,
    Period                      => Operator,
    Pipe                        => Operator,
    PipeEquals                  => Operator,
    Plus                        => Operator,
    PlusEquals                  => Operator,
    PlusPlus                    => Operator,
    PrivateIdentifier           => Identifier,
    QuestionMark                => Operator,
    QuestionMarkPeriod          => Operator,
    RegexLiteral                => String,
    Return                      => ControlKeyword,
    Semicolon                   => Punctuation,
    ShiftLeft                   => Operator,
    ShiftLeftEquals             => Operator,
    ShiftRight                  => Operator,
    ShiftRightEquals            => Operator,
    Slash                       => Operator,
    SlashEquals                 => Operator,
    Static                      => Keyword,
    StringLiteral               => String,
    Super                       => Keyword,
    Switch                      => ControlKeyword,
    TemplateLiteralStart        => String,
    This                        => Keyword,
    Throw                       => ControlKeyword,
    Tilde                       => Operator,
    TripleDot                   => Operator,
    Try                         => ControlKeyword,
    Typeof                      => Keyword,
    UnsignedShiftRight          => Operator,
    UnsignedShiftRightEquals    => Operator,
    Var                         => Keyword,
    Void                        => Keyword,
    While                       => ControlKeyword,
    With                        => ControlKeyword,
    Yield                       => ControlKeyword,
}

impl TokenType {
    /// True for tokens usable as a property name after `.` — identifiers
    /// and all keywords (`obj.this`, `obj.catch` are valid member accesses).
    pub fn is_identifier_name(self) -> bool {
        self != TokenType::PrivateIdentifier
            && matches!(
                self.category(),
                TokenCategory::Identifier | TokenCategory::Keyword | TokenCategory::ControlKeyword
            )
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    /// Identifier name, cooked string value, raw numeric text, or regex
    /// body depending on the token type. Empty for punctuators.
    pub value: String,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
    /// A line terminator occurred in the trivia before this token
    /// (drives automatic semicolon insertion).
    pub had_line_terminator: bool,
    /// Error message for Invalid tokens.
    pub message: Option<String>,
}

impl Token {
    pub fn new(token_type: TokenType) -> Self {
        Token {
            token_type,
            value: String::new(),
            line: 0,
            column: 0,
            offset: 0,
            had_line_terminator: false,
            message: None,
        }
    }
}
