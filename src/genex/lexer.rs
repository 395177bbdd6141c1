#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenexTokenKind {
  BeginExpression,
  EndExpression,
  ColonSeparator,
  CommaSeparator,
  Text
}

/// A token plus the byte range it covers in the input, so parsers can recover original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenexToken {
  pub kind: GenexTokenKind,
  pub start: usize,
  pub end: usize
}

impl GenexToken {
  pub fn text<'a>(&self, input: &'a str) -> &'a str {
    &input[self.start..self.end]
  }
}

/*
  Separators are produced everywhere, even outside of any $<...>. The parser decides
  whether a ':' ',' or '>' is structure or just text.
*/
pub fn tokenize(input: &str) -> Vec<GenexToken> {
  let mut tokens: Vec<GenexToken> = Vec::new();
  let bytes: &[u8] = input.as_bytes();
  let mut text_start: Option<usize> = None;
  let mut index: usize = 0;

  while index < bytes.len() {
    let separator: Option<(GenexTokenKind, usize)> = match bytes[index] {
      b'$' if bytes.get(index + 1) == Some(&b'<') => Some((GenexTokenKind::BeginExpression, 2)),
      b'>' => Some((GenexTokenKind::EndExpression, 1)),
      b':' => Some((GenexTokenKind::ColonSeparator, 1)),
      b',' => Some((GenexTokenKind::CommaSeparator, 1)),
      _ => None
    };

    match separator {
      Some((kind, length)) => {
        if let Some(start) = text_start.take() {
          tokens.push(GenexToken { kind: GenexTokenKind::Text, start, end: index });
        }

        tokens.push(GenexToken { kind, start: index, end: index + length });
        index += length;
      },
      None => {
        if text_start.is_none() {
          text_start = Some(index);
        }
        index += 1;
      }
    }
  }

  if let Some(start) = text_start {
    tokens.push(GenexToken { kind: GenexTokenKind::Text, start, end: bytes.len() });
  }

  return tokens;
}
