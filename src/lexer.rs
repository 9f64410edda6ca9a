use super::token::{Token, TokenType};

/// Anything the parser can pull tokens from.
///
/// Implementations must keep returning an `Eof` token once the input is
/// exhausted, no matter how often they are called.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    // current position in input (points to current char)
    read_position: usize,
    // current reading position in input (after current char)
    ch: u8,                  // current char under examination
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        let mut l = Lexer {
            input,
            position: 0,
            read_position: 0,
            ch: 0,
        };
        l.read_char();
        l
    }

    fn read_char(&mut self) {
        self.ch = self.input.as_bytes().get(self.read_position).copied().unwrap_or(0);
        self.position = self.read_position;
        if self.read_position < self.input.len() {
            self.read_position += 1;
        }
    }

    fn peek_char(&self) -> u8 {
        self.input.as_bytes().get(self.read_position).copied().unwrap_or(0)
    }

    fn read_identifier(&mut self) -> &'a str {
        let position = self.position;
        while is_letter(self.ch) {
            self.read_char();
        }
        &self.input[position..self.position]
    }

    fn read_number(&mut self) -> &'a str {
        let position = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        &self.input[position..self.position]
    }

    fn read_string(&mut self) -> &'a str {
        let position = self.position + 1;
        loop {
            self.read_char();
            if self.ch == b'"' || self.ch == 0 {
                break;
            }
        }
        &self.input[position..self.position]
    }

    // Consumes one whole char so a multi-byte sequence yields a single token.
    fn read_illegal(&mut self) -> String {
        let c = self.input[self.position..].chars().next().unwrap_or('\u{fffd}');
        self.read_position = self.position + c.len_utf8();
        c.to_string()
    }

    fn read_two_char(&mut self, second: u8, double: TokenType, single: TokenType) -> Token {
        if self.peek_char() == second {
            let first = self.ch as char;
            self.read_char();
            Token::new(double, format!("{}{}", first, self.ch as char))
        } else {
            Token::new(single, (self.ch as char).to_string())
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let tok = match self.ch {
            b'=' => self.read_two_char(b'=', TokenType::Eq, TokenType::Assign),
            b'!' => self.read_two_char(b'=', TokenType::NotEq, TokenType::Bang),
            b';' => Token::new(TokenType::Semicolon, ";"),
            b'(' => Token::new(TokenType::LParen, "("),
            b')' => Token::new(TokenType::RParen, ")"),
            b',' => Token::new(TokenType::Comma, ","),
            b'+' => Token::new(TokenType::Plus, "+"),
            b'-' => Token::new(TokenType::Minus, "-"),
            b'/' => Token::new(TokenType::Slash, "/"),
            b'*' => Token::new(TokenType::Asterisk, "*"),
            b'<' => Token::new(TokenType::Lt, "<"),
            b'>' => Token::new(TokenType::Gt, ">"),
            b'{' => Token::new(TokenType::LBrace, "{"),
            b'}' => Token::new(TokenType::RBrace, "}"),
            b'"' => Token::new(TokenType::String, self.read_string()),
            0 => return Token::eof(),
            ch if is_letter(ch) => {
                let literal = self.read_identifier();
                return Token::new(TokenType::lookup_ident(literal), literal);
            }
            ch if ch.is_ascii_digit() => {
                return Token::new(TokenType::Int, self.read_number());
            }
            ch if ch.is_ascii() => Token::new(TokenType::Illegal, (ch as char).to_string()),
            _ => Token::new(TokenType::Illegal, self.read_illegal()),
        };

        self.read_char();
        tok
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            self.read_char();
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        Lexer::next_token(self)
    }
}

/// A token source over tokens produced elsewhere. An `Eof` is implied after
/// the last one.
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream { tokens: tokens.into_iter() }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(Token::eof)
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

#[cfg(test)]
mod tests {
    use super::{Lexer, TokenSource, TokenStream};
    use crate::token::{Token, TokenType};

    fn assert_tokens(input: &str, tests: &[(TokenType, &str)]) {
        let mut lexer = Lexer::new(input);
        for (i, (expected_type, expected_literal)) in tests.iter().enumerate() {
            let tok = lexer.next_token();

            assert_eq!(tok.token_type, *expected_type, "Test[{}] - TokenType wrong. Expected {:?}, got {:?}", i, expected_type, tok.token_type);
            assert_eq!(tok.literal, *expected_literal, "Test[{}] - Literal wrong. Expected {:?}, got {:?}", i, expected_literal, tok.literal);
        }
    }

    #[test]
    fn test_next_token() {
        assert_tokens("=+(){},;", &[
            (TokenType::Assign, "="),
            (TokenType::Plus, "+"),
            (TokenType::LParen, "("),
            (TokenType::RParen, ")"),
            (TokenType::LBrace, "{"),
            (TokenType::RBrace, "}"),
            (TokenType::Comma, ","),
            (TokenType::Semicolon, ";"),
            (TokenType::Eof, ""),
        ]);
    }

    #[test]
    fn test_next_token_program() {
        let input = r#"let five = 5;
            let add = fn(x, y) {
                x + y;
            };
            let result = add(five, 10);
            !-/*5;
            5 < 10 > 5;
            if (5 < 10) { return true; } else { return false; }
            10 == 10; 10 != 9;
            "foo bar"
        "#;

        assert_tokens(input, &[
            (TokenType::Let, "let"),
            (TokenType::Ident, "five"),
            (TokenType::Assign, "="),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Let, "let"),
            (TokenType::Ident, "add"),
            (TokenType::Assign, "="),
            (TokenType::Function, "fn"),
            (TokenType::LParen, "("),
            (TokenType::Ident, "x"),
            (TokenType::Comma, ","),
            (TokenType::Ident, "y"),
            (TokenType::RParen, ")"),
            (TokenType::LBrace, "{"),
            (TokenType::Ident, "x"),
            (TokenType::Plus, "+"),
            (TokenType::Ident, "y"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Semicolon, ";"),
            (TokenType::Let, "let"),
            (TokenType::Ident, "result"),
            (TokenType::Assign, "="),
            (TokenType::Ident, "add"),
            (TokenType::LParen, "("),
            (TokenType::Ident, "five"),
            (TokenType::Comma, ","),
            (TokenType::Int, "10"),
            (TokenType::RParen, ")"),
            (TokenType::Semicolon, ";"),
            (TokenType::Bang, "!"),
            (TokenType::Minus, "-"),
            (TokenType::Slash, "/"),
            (TokenType::Asterisk, "*"),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Int, "5"),
            (TokenType::Lt, "<"),
            (TokenType::Int, "10"),
            (TokenType::Gt, ">"),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::If, "if"),
            (TokenType::LParen, "("),
            (TokenType::Int, "5"),
            (TokenType::Lt, "<"),
            (TokenType::Int, "10"),
            (TokenType::RParen, ")"),
            (TokenType::LBrace, "{"),
            (TokenType::Return, "return"),
            (TokenType::True, "true"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Else, "else"),
            (TokenType::LBrace, "{"),
            (TokenType::Return, "return"),
            (TokenType::False, "false"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Int, "10"),
            (TokenType::Eq, "=="),
            (TokenType::Int, "10"),
            (TokenType::Semicolon, ";"),
            (TokenType::Int, "10"),
            (TokenType::NotEq, "!="),
            (TokenType::Int, "9"),
            (TokenType::Semicolon, ";"),
            (TokenType::String, "foo bar"),
            (TokenType::Eof, ""),
        ]);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token(), Token::new(TokenType::Ident, "x"));
        for _ in 0..3 {
            assert_eq!(lexer.next_token(), Token::eof());
        }
    }

    #[test]
    fn test_illegal_and_non_ascii() {
        assert_tokens("a @ é \"héllo\" 1", &[
            (TokenType::Ident, "a"),
            (TokenType::Illegal, "@"),
            (TokenType::Illegal, "é"),
            (TokenType::String, "héllo"),
            (TokenType::Int, "1"),
            (TokenType::Eof, ""),
        ]);
    }

    #[test]
    fn test_unterminated_string() {
        assert_tokens("\"abc", &[
            (TokenType::String, "abc"),
            (TokenType::Eof, ""),
        ]);
    }

    #[test]
    fn test_token_stream_appends_eof() {
        let mut stream = TokenStream::new(vec![Token::new(TokenType::Int, "1")]);
        assert_eq!(stream.next_token(), Token::new(TokenType::Int, "1"));
        assert_eq!(stream.next_token(), Token::eof());
        assert_eq!(stream.next_token(), Token::eof());
    }
}
