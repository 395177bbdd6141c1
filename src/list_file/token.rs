use enum_iterator::Sequence;

#[derive(Sequence, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Identifier,
  ParenLeft,
  ParenRight,
  ArgumentUnquoted,
  ArgumentQuoted,
  Newline,
  BadCharacter,
  BadQuote,
  CommentOrBlank,
  Eof
}

impl TokenKind {
  // These names show up in parse error messages, so keep them stable.
  pub fn name(&self) -> &'static str {
    match self {
      TokenKind::Identifier => "identifier",
      TokenKind::ParenLeft => "left paren",
      TokenKind::ParenRight => "right paren",
      TokenKind::ArgumentUnquoted => "unquoted argument",
      TokenKind::ArgumentQuoted => "quoted argument",
      TokenKind::Newline => "newline",
      TokenKind::BadCharacter => "bad character",
      TokenKind::BadQuote => "unterminated quoted argument",
      TokenKind::CommentOrBlank => "comment or blank",
      TokenKind::Eof => "end of file"
    }
  }

  pub fn is_argument(&self) -> bool {
    match self {
      TokenKind::Identifier
        | TokenKind::ArgumentUnquoted
        | TokenKind::ArgumentQuoted => true,
      _ => false
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub line: u32
}

impl Token {
  pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
    Self {
      kind,
      text: text.into(),
      line
    }
  }

  pub fn is_eof(&self) -> bool {
    self.kind == TokenKind::Eof
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn every_kind_has_a_distinct_name() {
    let names: HashSet<&str> = enum_iterator::all::<TokenKind>()
      .map(|kind| kind.name())
      .collect();

    assert_eq!(names.len(), enum_iterator::cardinality::<TokenKind>());
  }

  #[test]
  fn only_identifiers_and_arguments_are_argument_kinds() {
    let argument_kinds: Vec<TokenKind> = enum_iterator::all::<TokenKind>()
      .filter(TokenKind::is_argument)
      .collect();

    assert_eq!(
      argument_kinds,
      vec![TokenKind::Identifier, TokenKind::ArgumentUnquoted, TokenKind::ArgumentQuoted]
    );
  }
}
