use crate::arena::Arena;
use crate::constants::MAX_DEPTH;
use crate::decode::lexer::{Lexer, Token};
use crate::error::Error;
use crate::types::Value;
use crate::Result;

/// Recursive-descent parser building the final value tree directly in the
/// caller's arena; there is no intermediate AST.
pub(crate) struct Parser<'a> {
    arena: &'a mut Arena,
    input: &'a [u8],
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a mut Arena, input: &'a [u8]) -> Self {
        Parser {
            arena,
            input,
            lexer: Lexer::new(input),
        }
    }

    /// One value production per JSON value kind. Consumes the current token
    /// and leaves the lexer past the parsed value; trailing input is never
    /// read.
    pub fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimit);
        }

        match self.lexer.token() {
            Token::Int(n) => {
                self.lexer.advance();
                Ok(Value::Int(n))
            }
            Token::Float(f) => {
                self.lexer.advance();
                Ok(Value::Float(f))
            }
            Token::Str { start, len } => {
                let input = self.input;
                let value = self.arena.new_string_escaped(&input[start..start + len]);
                self.lexer.advance();
                Ok(value)
            }
            Token::True => {
                self.lexer.advance();
                Ok(Value::Bool(true))
            }
            Token::False => {
                self.lexer.advance();
                Ok(Value::Bool(false))
            }
            Token::Null => {
                self.lexer.advance();
                Ok(Value::Null)
            }
            Token::LeftBracket => self.parse_array(depth),
            Token::LeftBrace => self.parse_object(depth),
            token => Err(Error::Unexpected {
                found: token.name(),
                offset: self.lexer.token_offset(),
            }),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value> {
        let mut array = Value::new_array();

        self.lexer.advance();
        if self.lexer.token() == Token::RightBracket {
            self.lexer.advance();
            return Ok(array);
        }

        loop {
            let value = self.parse_value(depth + 1)?;
            self.arena.array_push(&mut array, value);
            if self.lexer.token() != Token::Comma {
                break;
            }
            self.lexer.advance();
        }

        if self.lexer.token() != Token::RightBracket {
            return Err(self.expected("']' after array"));
        }
        self.lexer.advance();

        Ok(array)
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value> {
        let object = self.arena.new_object();
        let Value::Object(obj) = object else {
            unreachable!()
        };

        self.lexer.advance();
        if self.lexer.token() == Token::RightBrace {
            self.lexer.advance();
            return Ok(object);
        }

        loop {
            let Token::Str { start, len } = self.lexer.token() else {
                return Err(self.expected("object key"));
            };
            // Keys are copied out of the source buffer as-is, escapes and
            // all, so lookups and output see the source spelling.
            let input = self.input;
            let key = self.arena.alloc_str(&input[start..start + len]);
            self.lexer.advance();

            if self.lexer.token() != Token::Colon {
                return Err(self.expected("':'"));
            }
            self.lexer.advance();

            let value = self.parse_value(depth + 1)?;
            self.arena.object_insert_ref(obj, key, value);

            if self.lexer.token() != Token::Comma {
                break;
            }
            self.lexer.advance();
        }

        if self.lexer.token() != Token::RightBrace {
            return Err(self.expected("'}' after object"));
        }
        self.lexer.advance();

        Ok(object)
    }

    fn expected(&self, what: &'static str) -> Error {
        Error::Expected {
            expected: what,
            found: self.lexer.token().name(),
            offset: self.lexer.token_offset(),
        }
    }
}
