use std::io::Write;

use crate::{
  cli_config::{CLITokensInfo, InputSource},
  list_file::{lexer::Lexer, token::Token, ListFileParseError}
};

use super::{read_stdin, ActionResult};

fn format_token(token: &Token) -> String {
  format!("{:>5}  {:<30} {:?}", token.line, token.kind.name(), token.text)
}

pub fn write_tokens(
  lexer: &mut Lexer,
  include_trivia: bool,
  output: &mut impl Write
) -> ActionResult {
  loop {
    let token: Token = if include_trivia
      { lexer.scan_with_trivia() }
      else { lexer.scan() };

    writeln!(output, "{}", format_token(&token))?;

    if token.is_eof() {
      return Ok(());
    }
  }
}

pub fn print_tokens_action(tokens_info: &CLITokensInfo, output: &mut impl Write) -> ActionResult {
  let mut lexer = Lexer::new();

  match &tokens_info.input {
    InputSource::Stdin => lexer.set_string(&read_stdin()?),
    InputSource::File(file_path) => {
      let file_path_str: String = tokens_info.input.label();

      if !file_path.exists() {
        return Err(ListFileParseError::FileNotFound { file_path: file_path_str }.into());
      }

      if let Err(source) = lexer.set_file_name(file_path) {
        return Err(ListFileParseError::FileOpenError { file_path: file_path_str, source }.into());
      }
    }
  }

  return write_tokens(&mut lexer, tokens_info.include_trivia, output);
}

#[cfg(test)]
mod tests {
  use super::*;

  fn token_lines(source: &str, include_trivia: bool) -> Vec<String> {
    let mut lexer = Lexer::new();
    lexer.set_string(source);

    let mut output: Vec<u8> = Vec::new();
    write_tokens(&mut lexer, include_trivia, &mut output).unwrap();

    return String::from_utf8(output)
      .unwrap()
      .lines()
      .map(|line| line.split_whitespace().collect::<Vec<&str>>().join(" "))
      .collect();
  }

  #[test]
  fn significant_tokens_end_with_eof() {
    let lines = token_lines("set(x 1) # done\n", false);

    assert_eq!(lines.first().map(|line| &line[..]), Some("1 identifier \"set\""));
    assert_eq!(lines.last().map(|line| &line[..]), Some("2 end of file \"\""));
    assert!(lines.iter().all(|line| !line.contains("comment or blank")));
  }

  #[test]
  fn trivia_includes_comments() {
    let lines = token_lines("set(x 1) # done\n", true);
    assert!(lines.iter().any(|line| line.contains("comment or blank")));
  }
}
