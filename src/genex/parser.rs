use super::lexer::{tokenize, GenexToken, GenexTokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenexNode {
  Text(String),
  Expression(GenexContent)
}

/// One parsed $<...> expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenexContent {
  identifier: Vec<GenexNode>,
  parameters: Vec<Vec<GenexNode>>,
  original_expression: String
}

impl GenexContent {
  pub fn identifier(&self) -> &Vec<GenexNode> {
    &self.identifier
  }

  /// Empty for expressions without a ':' like $<COMMA>.
  pub fn parameters(&self) -> &Vec<Vec<GenexNode>> {
    &self.parameters
  }

  pub fn original_expression(&self) -> &str {
    &self.original_expression
  }
}

pub fn parse_genex(input: &str) -> Vec<GenexNode> {
  let mut parser = GenexParser {
    input,
    tokens: tokenize(input),
    position: 0
  };

  let mut result: Vec<GenexNode> = Vec::new();

  while !parser.at_end() {
    parser.parse_content(&mut result);
  }

  return result;
}

/// True when the string contains anything that could start a generator expression.
pub fn contains_genex(input: &str) -> bool {
  input.contains("$<")
}

fn push_text(nodes: &mut Vec<GenexNode>, text: &str) {
  if let Some(GenexNode::Text(existing)) = nodes.last_mut() {
    existing.push_str(text);
    return;
  }

  nodes.push(GenexNode::Text(text.to_string()));
}

struct GenexParser<'a> {
  input: &'a str,
  tokens: Vec<GenexToken>,
  position: usize
}

impl<'a> GenexParser<'a> {
  fn at_end(&self) -> bool {
    self.position >= self.tokens.len()
  }

  fn current_kind(&self) -> Option<GenexTokenKind> {
    self.tokens.get(self.position).map(|token| token.kind)
  }

  fn take_as_text(&mut self, nodes: &mut Vec<GenexNode>) {
    let text: &str = self.tokens[self.position].text(self.input);
    push_text(nodes, text);
    self.position += 1;
  }

  // Separators reaching this point aren't part of any expression structure.
  fn parse_content(&mut self, result: &mut Vec<GenexNode>) {
    match self.current_kind() {
      Some(GenexTokenKind::BeginExpression) => {
        self.position += 1;
        self.parse_generator_expression(result);
      },
      Some(_) => self.take_as_text(result),
      None => ()
    }
  }

  /*
    Called just after a '$<'. Everything up to the first ':' is the identifier, the rest
    is split on ',' into parameters. Colons after the first are plain text.
    If the input runs out before the matching '>', what was collected so far is kept in
    place as text, with any complete nested expressions left intact.
  */
  fn parse_generator_expression(&mut self, result: &mut Vec<GenexNode>) {
    let expression_start: usize = self.tokens[self.position - 1].start;

    let mut identifier: Vec<GenexNode> = Vec::new();

    loop {
      match self.current_kind() {
        None => return flatten_unterminated(identifier, None, result),
        Some(GenexTokenKind::EndExpression) | Some(GenexTokenKind::ColonSeparator) => break,
        Some(GenexTokenKind::CommaSeparator) => self.take_as_text(&mut identifier),
        Some(_) => self.parse_content(&mut identifier)
      }
    }

    let mut parameters: Vec<Vec<GenexNode>> = Vec::new();

    if self.current_kind() == Some(GenexTokenKind::ColonSeparator) {
      self.position += 1;
      parameters.push(Vec::new());

      loop {
        match self.current_kind() {
          None => return flatten_unterminated(identifier, Some(parameters), result),
          Some(GenexTokenKind::EndExpression) => break,
          Some(GenexTokenKind::CommaSeparator) => {
            self.position += 1;
            parameters.push(Vec::new());
          },
          Some(GenexTokenKind::ColonSeparator) => {
            let text: &str = self.tokens[self.position].text(self.input);
            if let Some(last_parameter) = parameters.last_mut() {
              push_text(last_parameter, text);
            }
            self.position += 1;
          },
          Some(_) => {
            let mut last_parameter: Vec<GenexNode> = parameters.pop().unwrap_or_default();
            self.parse_content(&mut last_parameter);
            parameters.push(last_parameter);
          }
        }
      }
    }

    let expression_end: usize = self.tokens[self.position].end;
    self.position += 1;

    result.push(GenexNode::Expression(GenexContent {
      identifier,
      parameters,
      original_expression: self.input[expression_start..expression_end].to_string()
    }));
  }
}

fn extend_nodes(nodes: &mut Vec<GenexNode>, extra: Vec<GenexNode>) {
  for node in extra {
    match node {
      GenexNode::Text(text) => push_text(nodes, &text),
      expression => nodes.push(expression)
    }
  }
}

fn flatten_unterminated(
  identifier: Vec<GenexNode>,
  parameters: Option<Vec<Vec<GenexNode>>>,
  result: &mut Vec<GenexNode>
) {
  push_text(result, "$<");
  extend_nodes(result, identifier);

  if let Some(parameters) = parameters {
    push_text(result, ":");

    for (index, parameter) in parameters.into_iter().enumerate() {
      if index > 0 {
        push_text(result, ",");
      }
      extend_nodes(result, parameter);
    }
  }
}
