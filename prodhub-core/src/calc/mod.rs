//! Scientific calculator: key-driven input accumulation and expression
//! evaluation.
//!
//! Evaluation is a three-stage pipeline, [`lexer::tokenize`] →
//! [`parser::parse`] → [`eval::eval`], wrapped by [`evaluate`]. The
//! [`Calculator`] state machine builds the expression text one key at a
//! time and shows either that text, the last result, or the sticky
//! [`ERROR_DISPLAY`] marker.

pub mod eval;
pub mod format;
pub mod lexer;
pub mod parser;

pub use eval::factorial;
pub use format::format_number;
pub use lexer::Func;

/// Shown after a failed evaluation until the next input.
pub const ERROR_DISPLAY: &str = "Error";

/// Shown on a cleared calculator.
pub const ZERO_DISPLAY: &str = "0";

/// Errors that can occur while evaluating an expression.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum CalcError {
    /// Nothing to evaluate.
    #[error("empty expression")]
    Empty,

    /// A character outside the expression grammar.
    #[error("unexpected character {ch:?} at {pos}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Character offset.
        pos: usize,
    },

    /// A word that is not a known function.
    #[error("unknown name {word:?} at {pos}")]
    UnknownName {
        /// The word.
        word: String,
        /// Character offset.
        pos: usize,
    },

    /// A malformed numeric literal.
    #[error("malformed number {text:?} at {pos}")]
    BadNumber {
        /// Literal text as far as it was read.
        text: String,
        /// Character offset.
        pos: usize,
    },

    /// A token where it cannot appear.
    #[error("unexpected {found} at {pos}")]
    UnexpectedToken {
        /// Description of the token.
        found: String,
        /// Character offset.
        pos: usize,
    },

    /// `++` or `--` written without a space between the signs.
    #[error("'{sign}{sign}' is not an operator (at {pos})")]
    DoubledSign {
        /// The repeated sign.
        sign: char,
        /// Offset of the second sign.
        pos: usize,
    },

    /// Input ended mid-expression.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// `!` after something other than a whole-number literal.
    #[error("factorial needs a whole-number literal (at {pos})")]
    FactorialOperand {
        /// Offset of the operand.
        pos: usize,
    },

    /// A signed operand on the left of `^`.
    #[error("parenthesize a signed base before '^' (at {pos})")]
    UnaryBeforePower {
        /// Offset of the `^`.
        pos: usize,
    },

    /// The result is NaN or infinite.
    #[error("result is not a finite number")]
    NotFinite,
}

/// Evaluate expression text to a finite number.
///
/// # Errors
///
/// Returns a syntax [`CalcError`] for malformed input and
/// [`CalcError::NotFinite`] when the result is NaN or infinite.
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let tokens = lexer::tokenize(input)?;
    let expr = parser::parse(&tokens)?;
    let value = eval::eval(&expr);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite)
    }
}

/// Operator keys. They append their symbol without validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `^`
    Pow,
    /// `(`
    Open,
    /// `)`
    Close,
    /// `!`
    Factorial,
}

impl Operator {
    /// Text appended to the expression.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Rem => '%',
            Self::Pow => '^',
            Self::Open => '(',
            Self::Close => ')',
            Self::Factorial => '!',
        }
    }
}

/// Constant keys. They insert the constant's decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number.
    E,
}

impl Constant {
    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    /// Key label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pi => "π",
            Self::E => "e",
        }
    }
}

/// A calculator key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A digit `0`–`9`.
    Digit(u8),
    /// The decimal point.
    Point,
    /// An operator.
    Operator(Operator),
    /// A function opener such as `sin(`.
    Function(Func),
    /// π or e.
    Constant(Constant),
    /// Evaluate.
    Equals,
    /// Remove the last character.
    Delete,
    /// Reset to zero.
    ClearAll,
}

/// Calculator display and accumulated expression.
///
/// The two strings move in lockstep, except that a cleared calculator
/// shows `"0"` over an empty expression and a failed evaluation shows
/// `"Error"` over an empty expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    display: String,
    expression: String,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// A cleared calculator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            display: ZERO_DISPLAY.to_string(),
            expression: String::new(),
        }
    }

    /// Text to show.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Expression accumulated so far.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether the last evaluation failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    /// Apply one key press.
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => {
                let digit = char::from(b'0' + d.min(9));
                self.input(&digit.to_string());
            }
            Key::Point => self.input("."),
            Key::Constant(c) => self.input(&format_number(c.value())),
            Key::Operator(op) => self.operator(op),
            Key::Function(func) => self.function(func),
            Key::Equals => self.equals(),
            Key::Delete => self.delete_last(),
            Key::ClearAll => self.clear(),
        }
    }

    /// Apply a sequence of key presses.
    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) {
        for key in keys {
            self.press(key);
        }
    }

    fn input(&mut self, value: &str) {
        if self.is_error() || (self.display == ZERO_DISPLAY && value != ".") {
            self.replace(value);
        } else {
            self.append(value);
        }
    }

    fn operator(&mut self, op: Operator) {
        let symbol = op.symbol().to_string();
        if self.is_error() {
            self.replace(&symbol);
        } else {
            self.append(&symbol);
        }
    }

    fn function(&mut self, func: Func) {
        let opener = format!("{}(", func.name());
        if self.is_error() || self.display == ZERO_DISPLAY || self.display.is_empty() {
            self.replace(&opener);
        } else {
            self.append(&opener);
        }
    }

    fn equals(&mut self) {
        if self.is_error() {
            return;
        }
        let source = if self.expression.is_empty() {
            self.display.as_str()
        } else {
            self.expression.as_str()
        };
        match evaluate(source) {
            Ok(value) => {
                let rendered = format_number(value);
                self.replace(&rendered);
            }
            Err(err) => {
                tracing::debug!(expression = %source, error = %err, "evaluation failed");
                self.display = ERROR_DISPLAY.to_string();
                self.expression.clear();
            }
        }
    }

    fn delete_last(&mut self) {
        if self.is_error() || self.display.chars().count() <= 1 {
            self.clear();
            return;
        }
        self.display.pop();
        self.expression.pop();
    }

    fn clear(&mut self) {
        self.display = ZERO_DISPLAY.to_string();
        self.expression.clear();
    }

    fn replace(&mut self, text: &str) {
        self.display = text.to_string();
        self.expression = text.to_string();
    }

    fn append(&mut self, text: &str) {
        // A cleared calculator shows "0" over an empty expression.
        if self.expression.is_empty() {
            self.expression.clone_from(&self.display);
        }
        self.display.push_str(text);
        self.expression.push_str(text);
    }
}
