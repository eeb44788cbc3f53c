//! Tokenizer for calculator expressions.

use super::CalcError;

/// Functions the calculator knows. Arguments to the trigonometric
/// functions are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Square root, written `√`.
    Sqrt,
    /// Base-10 logarithm.
    Log,
    /// Natural logarithm.
    Ln,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
}

impl Func {
    /// How the function is written in an expression.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "√",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
        }
    }

    /// Apply the function to `x`.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sqrt => x.sqrt(),
            Self::Log => x.log10(),
            Self::Ln => x.ln(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word {
            "log" => Some(Self::Log),
            "ln" => Some(Self::Ln),
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            _ => None,
        }
    }
}

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal. `integer` is set when it was written as a bare
    /// digit run (no point, no exponent), the only form `!` accepts.
    Number {
        /// Parsed value.
        value: f64,
        /// Whether the literal is a plain digit run.
        integer: bool,
    },
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^` or `**`
    Caret,
    /// `!`
    Bang,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// A function name.
    Func(Func),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number { value, .. } => write!(f, "number {value}"),
            Self::Plus => write!(f, "'+'"),
            Self::Minus => write!(f, "'-'"),
            Self::Star => write!(f, "'*'"),
            Self::Slash => write!(f, "'/'"),
            Self::Percent => write!(f, "'%'"),
            Self::Caret => write!(f, "'^'"),
            Self::Bang => write!(f, "'!'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::Func(func) => write!(f, "function {}", func.name()),
        }
    }
}

/// A token and the character offset it starts at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Character offset in the input.
    pub pos: usize,
}

/// Split `input` into tokens. Whitespace is skipped.
///
/// # Errors
///
/// Returns [`CalcError::UnexpectedChar`] for characters outside the
/// grammar, [`CalcError::UnknownName`] for words that are not function
/// names and [`CalcError::BadNumber`] for malformed literals.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let pos = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (token, len) = lex_number(&chars[i..], pos)?;
            tokens.push(Spanned { token, pos });
            i += len;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let len = chars[i..]
                .iter()
                .take_while(|ch| ch.is_ascii_alphabetic())
                .count();
            let word: String = chars[i..i + len].iter().collect();
            let func = Func::from_word(&word).ok_or(CalcError::UnknownName { word, pos })?;
            tokens.push(Spanned {
                token: Token::Func(func),
                pos,
            });
            i += len;
            continue;
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::Caret
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Caret,
            '!' => Token::Bang,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '√' => Token::Func(Func::Sqrt),
            other => return Err(CalcError::UnexpectedChar { ch: other, pos }),
        };
        tokens.push(Spanned { token, pos });
        i += 1;
    }

    Ok(tokens)
}

/// Lex a numeric literal at the start of `chars`, returning the token
/// and the number of characters consumed.
fn lex_number(chars: &[char], pos: usize) -> Result<(Token, usize), CalcError> {
    let digits = |from: usize| {
        chars[from..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count()
    };

    let int_len = digits(0);
    let mut len = int_len;
    let mut integer = true;

    if chars.get(len) == Some(&'.') {
        integer = false;
        len += 1;
        let frac_len = digits(len);
        if int_len == 0 && frac_len == 0 {
            return Err(CalcError::BadNumber { text: ".".into(), pos });
        }
        len += frac_len;
    }

    if matches!(chars.get(len), Some('e' | 'E')) {
        let mut exp_end = len + 1;
        if matches!(chars.get(exp_end), Some('+' | '-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits == 0 {
            let text: String = chars[..exp_end].iter().collect();
            return Err(CalcError::BadNumber { text, pos });
        }
        integer = false;
        len = exp_end + exp_digits;
    }

    // A literal running straight into a word ("3in") is malformed.
    if chars.get(len).is_some_and(char::is_ascii_alphabetic) {
        let end = len
            + chars[len..]
                .iter()
                .take_while(|c| c.is_ascii_alphanumeric())
                .count();
        let text: String = chars[..end].iter().collect();
        return Err(CalcError::BadNumber { text, pos });
    }

    let text: String = chars[..len].iter().collect();
    let value = text
        .parse::<f64>()
        .map_err(|_| CalcError::BadNumber { text, pos })?;
    Ok((Token::Number { value, integer }, len))
}
