use std::{fs, io, path::Path};

use regex::Regex;

use super::token::{Token, TokenKind};

lazy_static! {
  static ref IDENTIFIER_REGEX: Regex = new_regex_or_panic("^[A-Za-z_][A-Za-z0-9_]*$");
}

fn new_regex_or_panic(regex_str: &str) -> Regex {
  return match Regex::new(regex_str) {
    Ok(r) => r,
    Err(failure_error) => panic!("{}", failure_error)
  }
}

fn is_blank(some_char: char) -> bool {
  return some_char == ' ' || some_char == '\t' || some_char == '\r';
}

fn ends_unquoted_argument(some_char: char) -> bool {
  match some_char {
    '(' | ')' | '"' | '#' | '\n' => true,
    other => is_blank(other)
  }
}

fn is_bad_character(some_char: char) -> bool {
  return some_char.is_control() && some_char != '\n' && !is_blank(some_char);
}

/*
  Tokenizes CMake list file text. The lexer owns a copy of the text it is bound to,
  so dropping it releases everything it holds.

  Whitespace and '#' line comments are skipped by scan(). scan_with_trivia() returns
  them as CommentOrBlank tokens instead, which is only useful for tooling that wants
  to see the whole file.
*/
pub struct Lexer {
  source: Vec<char>,
  position: usize,
  line: u32
}

impl Lexer {
  pub fn new() -> Self {
    Self {
      source: Vec::new(),
      position: 0,
      line: 1
    }
  }

  pub fn set_file_name(&mut self, file_path: impl AsRef<Path>) -> io::Result<()> {
    let file_contents: String = fs::read_to_string(file_path.as_ref())?;
    self.set_string(&file_contents);
    Ok(())
  }

  pub fn set_string(&mut self, text: &str) {
    self.source = text.chars().collect();
    self.position = 0;
    self.line = 1;
  }

  pub fn current_line(&self) -> u32 {
    self.line
  }

  pub fn scan(&mut self) -> Token {
    loop {
      let token: Token = self.scan_with_trivia();

      if token.kind != TokenKind::CommentOrBlank {
        return token;
      }
    }
  }

  pub fn scan_with_trivia(&mut self) -> Token {
    let start_line: u32 = self.line;

    let next_char: char = match self.peek() {
      Some(c) => c,
      None => return Token::new(TokenKind::Eof, "", start_line)
    };

    match next_char {
      '\n' => {
        self.advance();
        self.line += 1;
        return Token::new(TokenKind::Newline, "\n", start_line);
      },
      '(' => {
        self.advance();
        return Token::new(TokenKind::ParenLeft, "(", start_line);
      },
      ')' => {
        self.advance();
        return Token::new(TokenKind::ParenRight, ")", start_line);
      },
      '"' => return self.scan_quoted_argument(),
      '#' => {
        let comment: String = self.take_while(|c| c != '\n');
        return Token::new(TokenKind::CommentOrBlank, comment, start_line);
      },
      c if is_blank(c) => {
        let blanks: String = self.take_while(is_blank);
        return Token::new(TokenKind::CommentOrBlank, blanks, start_line);
      },
      c if is_bad_character(c) => {
        self.advance();
        return Token::new(TokenKind::BadCharacter, c.to_string(), start_line);
      },
      _ => return self.scan_unquoted_argument()
    }
  }

  fn scan_quoted_argument(&mut self) -> Token {
    let start_line: u32 = self.line;
    let mut content: String = String::new();

    // Opening quote
    self.advance();

    while let Some(current_char) = self.advance() {
      match current_char {
        '"' => return Token::new(TokenKind::ArgumentQuoted, content, start_line),
        '\\' => match self.advance() {
          // Line continuation. Neither the backslash nor the newline are kept.
          Some('\n') => self.line += 1,
          Some(escaped) => {
            content.push('\\');
            content.push(escaped);
          },
          None => {
            content.push('\\');
            break;
          }
        },
        '\n' => {
          self.line += 1;
          content.push('\n');
        },
        other => content.push(other)
      }
    }

    return Token::new(TokenKind::BadQuote, content, start_line);
  }

  fn scan_unquoted_argument(&mut self) -> Token {
    let start_line: u32 = self.line;
    let mut content: String = String::new();

    while let Some(current_char) = self.peek() {
      if ends_unquoted_argument(current_char) || is_bad_character(current_char) {
        break;
      }

      if current_char == '\\' {
        match self.peek_at(1) {
          Some(escaped) if escaped != '\n' => {
            self.advance();
            self.advance();
            content.push('\\');
            content.push(escaped);
            continue;
          },
          _ => {
            if content.is_empty() {
              self.advance();
              return Token::new(TokenKind::BadCharacter, "\\", start_line);
            }
            break;
          }
        }
      }

      self.advance();
      content.push(current_char);
    }

    let kind: TokenKind = if IDENTIFIER_REGEX.is_match(&content)
      { TokenKind::Identifier }
      else { TokenKind::ArgumentUnquoted };

    return Token::new(kind, content, start_line);
  }

  fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
    let mut taken: String = String::new();

    while let Some(current_char) = self.peek() {
      if !predicate(current_char) {
        break;
      }
      taken.push(current_char);
      self.advance();
    }

    return taken;
  }

  fn peek(&self) -> Option<char> {
    self.peek_at(0)
  }

  fn peek_at(&self, offset: usize) -> Option<char> {
    self.source.get(self.position + offset).copied()
  }

  fn advance(&mut self) -> Option<char> {
    let current: Option<char> = self.peek();

    if current.is_some() {
      self.position += 1;
    }

    return current;
  }
}

impl Default for Lexer {
  fn default() -> Self {
    Self::new()
  }
}
