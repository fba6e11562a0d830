use memchr::memchr2;

/// One lexical token. String tokens carry a span of the raw (still escaped)
/// contents between the quotes; numbers carry their decoded payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token {
    Eof,
    Invalid,
    Int(i64),
    Float(f64),
    Str { start: usize, len: usize },
    True,
    False,
    Null,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Colon,
    Comma,
}

impl Token {
    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Token::Eof => "end of file",
            Token::Invalid => "invalid token",
            Token::Int(_) => "int",
            Token::Float(_) => "float",
            Token::Str { .. } => "string",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::LeftBracket => "left bracket",
            Token::RightBracket => "right bracket",
            Token::LeftBrace => "left brace",
            Token::RightBrace => "right brace",
            Token::Colon => "colon",
            Token::Comma => "comma",
        }
    }
}

/// Byte class driving the scanner's dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Class {
    Invalid,
    Skip,
    Punct,
    Str,
    Num,
    False,
    True,
    Null,
}

/// 256-entry classification table. ASCII control bytes and whitespace are
/// skipped; everything at or above 0x80 is invalid at token position.
static DISPATCH: [Class; 256] = build_dispatch();

const fn build_dispatch() -> [Class; 256] {
    let mut table = [Class::Invalid; 256];

    let mut byte = 0x01;
    while byte <= 0x20 {
        table[byte] = Class::Skip;
        byte += 1;
    }
    table[0x7f] = Class::Skip;

    table[b'[' as usize] = Class::Punct;
    table[b']' as usize] = Class::Punct;
    table[b'{' as usize] = Class::Punct;
    table[b'}' as usize] = Class::Punct;
    table[b':' as usize] = Class::Punct;
    table[b',' as usize] = Class::Punct;

    table[b'"' as usize] = Class::Str;
    table[b'-' as usize] = Class::Num;
    let mut digit = b'0' as usize;
    while digit <= b'9' as usize {
        table[digit] = Class::Num;
        digit += 1;
    }

    table[b'f' as usize] = Class::False;
    table[b't' as usize] = Class::True;
    table[b'n' as usize] = Class::Null;

    table
}

fn punct(byte: u8) -> Token {
    match byte {
        b'[' => Token::LeftBracket,
        b']' => Token::RightBracket,
        b'{' => Token::LeftBrace,
        b'}' => Token::RightBrace,
        b':' => Token::Colon,
        _ => Token::Comma,
    }
}

/// Single-token-lookahead scanner over the input buffer.
pub(crate) struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    token: Token,
    token_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut lexer = Lexer {
            input,
            pos: 0,
            token: Token::Invalid,
            token_start: 0,
        };
        lexer.advance();
        lexer
    }

    /// The current lookahead token.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Byte offset at which the current token starts.
    pub fn token_offset(&self) -> usize {
        self.token_start
    }

    /// Consume the current token and scan the next one.
    pub fn advance(&mut self) {
        self.token = self.scan();
    }

    fn scan(&mut self) -> Token {
        loop {
            let Some(&byte) = self.input.get(self.pos) else {
                self.token_start = self.pos;
                return Token::Eof;
            };

            match DISPATCH[byte as usize] {
                Class::Skip => {
                    self.pos += 1;
                }
                Class::Invalid => {
                    self.token_start = self.pos;
                    return Token::Invalid;
                }
                Class::Punct => {
                    self.token_start = self.pos;
                    self.pos += 1;
                    return punct(byte);
                }
                Class::Str => {
                    self.token_start = self.pos;
                    return self.scan_string();
                }
                Class::Num => {
                    self.token_start = self.pos;
                    return self.scan_number();
                }
                Class::False => {
                    self.token_start = self.pos;
                    return self.scan_keyword(b"false", Token::False);
                }
                Class::True => {
                    self.token_start = self.pos;
                    return self.scan_keyword(b"true", Token::True);
                }
                Class::Null => {
                    self.token_start = self.pos;
                    return self.scan_keyword(b"null", Token::Null);
                }
            }
        }
    }

    /// Scan past the opening quote to the matching closing quote. A quote
    /// preceded by an unconsumed backslash does not terminate the string;
    /// end of input before the terminator yields an invalid token.
    fn scan_string(&mut self) -> Token {
        self.pos += 1;
        let start = self.pos;

        let mut cursor = start;
        loop {
            let Some(found) = memchr2(b'"', b'\\', &self.input[cursor..]) else {
                self.pos = self.input.len();
                return Token::Invalid;
            };
            let at = cursor + found;
            if self.input[at] == b'"' {
                self.pos = at + 1;
                return Token::Str {
                    start,
                    len: at - start,
                };
            }
            // Backslash: the next byte is escaped, whatever it is.
            cursor = at + 2;
            if cursor > self.input.len() {
                self.pos = self.input.len();
                return Token::Invalid;
            }
        }
    }

    fn scan_number(&mut self) -> Token {
        let negative = self.input[self.pos] == b'-';
        if negative {
            self.pos += 1;
        }

        // All mantissa digits accumulate into one integer; the decimal point
        // only shifts the scale. Out-of-range literals wrap rather than
        // erroring.
        let mut digits: i64 = 0;
        while let Some(d) = self.peek_digit() {
            digits = digits.wrapping_mul(10).wrapping_add(d as i64);
            self.pos += 1;
        }

        let mut is_float = false;
        let mut scale: i32 = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            is_float = true;
            while let Some(d) = self.peek_digit() {
                digits = digits.wrapping_mul(10).wrapping_add(d as i64);
                scale -= 1;
                self.pos += 1;
            }
        }

        let mut exponent: i32 = 0;
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            is_float = true;
            let exp_negative = match self.peek() {
                Some(b'-') => {
                    self.pos += 1;
                    true
                }
                Some(b'+') => {
                    self.pos += 1;
                    false
                }
                _ => false,
            };
            while let Some(d) = self.peek_digit() {
                exponent = exponent.saturating_mul(10).saturating_add(d as i32);
                self.pos += 1;
            }
            if exp_negative {
                exponent = -exponent;
            }
        }

        if is_float {
            let power = scale.saturating_add(exponent);
            // Dividing by the positive power keeps a single rounding step,
            // so short decimals come out exactly.
            let mut f = if power < 0 {
                digits as f64 / ten_pow(-power)
            } else {
                digits as f64 * ten_pow(power)
            };
            if negative {
                f = -f;
            }
            Token::Float(f)
        } else {
            let n = if negative {
                digits.wrapping_neg()
            } else {
                digits
            };
            Token::Int(n)
        }
    }

    fn scan_keyword(&mut self, spelling: &'static [u8], token: Token) -> Token {
        let end = self.pos + spelling.len();
        if self.input.len() >= end && &self.input[self.pos..end] == spelling {
            self.pos = end;
            token
        } else {
            Token::Invalid
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_digit(&self) -> Option<u8> {
        match self.peek() {
            Some(byte @ b'0'..=b'9') => Some(byte - b'0'),
            _ => None,
        }
    }
}

/// 10^exponent for a non-negative exponent, clamped past the double range
/// and built from capped multiplication steps so no intermediate overflows.
fn ten_pow(mut exponent: i32) -> f64 {
    if exponent > 325 {
        exponent = 325;
    }

    let mut result = 1.0f64;
    while exponent > 100 {
        result *= 1e100;
        exponent -= 100;
    }
    while exponent > 22 {
        result *= 1e22;
        exponent -= 22;
    }

    // 10^0..10^22 are exactly representable.
    static POWERS: [f64; 23] = [
        1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
        1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
    ];
    result * POWERS[exponent as usize]
}
