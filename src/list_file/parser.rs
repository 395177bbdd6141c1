use std::{fs, path::Path, time::SystemTime};

use super::{
  errors::ListFileParseError,
  lexer::Lexer,
  list_file_types::{ListFile, ListFileArgument, ListFileFunction},
  token::{Token, TokenKind}
};

// A top-level file with at least this many commands and no cmake_minimum_required()
// is assumed to have been written against old CMake behavior.
const LEGACY_POLICY_COMMAND_LIMIT: usize = 30;

// Commands whose behavior doesn't depend on the policy version. A small top-level
// file made only of these doesn't need a cmake_minimum_required() call.
const POLICY_NEUTRAL_COMMANDS: [&'static str; 11] = [
  "project",
  "set",
  "if",
  "endif",
  "else",
  "elseif",
  "add_executable",
  "add_library",
  "target_link_libraries",
  "option",
  "message"
];

const IMPLICIT_PROJECT_NAME: &'static str = "Project";

pub fn parse_file(
  file_path: impl AsRef<Path>,
  is_top_level: bool
) -> Result<ListFile, ListFileParseError> {
  let path: &Path = file_path.as_ref();
  let file_path_str: String = path.to_string_lossy().to_string();

  if !path.exists() {
    return Err(ListFileParseError::FileNotFound {
      file_path: file_path_str
    });
  }

  let mut lexer = Lexer::new();

  if let Err(source) = lexer.set_file_name(path) {
    return Err(ListFileParseError::FileOpenError {
      file_path: file_path_str,
      source
    });
  }

  let modified_time: Option<SystemTime> = fs::metadata(path)
    .and_then(|metadata| metadata.modified())
    .ok();

  let parser = ListFileParser {
    lexer,
    file_path: file_path_str
  };

  return parser.parse_all(modified_time, is_top_level);
}

/// Parses in-memory list file text. `file_path` is only used to label functions and errors.
pub fn parse_string(
  text: &str,
  file_path: impl Into<String>,
  is_top_level: bool
) -> Result<ListFile, ListFileParseError> {
  let mut lexer = Lexer::new();
  lexer.set_string(text);

  let parser = ListFileParser {
    lexer,
    file_path: file_path.into()
  };

  return parser.parse_all(None, is_top_level);
}

struct ListFileParser {
  lexer: Lexer,
  file_path: String
}

impl ListFileParser {
  // Consumes the parser so the lexer is released on every path out of a parse.
  fn parse_all(
    mut self,
    modified_time: Option<SystemTime>,
    is_top_level: bool
  ) -> Result<ListFile, ListFileParseError> {
    let mut list_file = ListFile::new();
    list_file.set_modified_time(modified_time);

    let scan_result = self.parse_functions(&mut list_file);

    if scan_result.is_err() {
      list_file.set_modified_time(None);
    }

    if is_top_level {
      apply_top_level_heuristics(&mut list_file, &self.file_path);
    }

    return scan_result.map(|_| list_file);
  }

  fn parse_functions(&mut self, list_file: &mut ListFile) -> Result<(), ListFileParseError> {
    let mut have_newline: bool = true;

    loop {
      let token: Token = self.lexer.scan();

      match token.kind {
        TokenKind::Eof => return Ok(()),
        TokenKind::Newline => have_newline = true,
        TokenKind::Identifier if have_newline => {
          have_newline = false;

          let mut function = ListFileFunction::new(
            token.text,
            self.file_path.clone(),
            token.line
          );

          self.parse_function_call(&mut function)?;
          list_file.push_function(function);
        },
        TokenKind::Identifier => {
          return Err(ListFileParseError::ExpectedNewline {
            file_path: self.file_path.clone(),
            line: token.line,
            token_text: token.text
          });
        },
        other_kind => {
          return Err(ListFileParseError::ExpectedCommandName {
            file_path: self.file_path.clone(),
            line: token.line,
            token_kind: other_kind.name(),
            token_text: token.text
          });
        }
      }
    }
  }

  /*
    Called right after the command name was consumed. Parentheses nested inside the
    argument list are kept as literal "(" and ")" arguments, and only the closing
    paren at depth 0 ends the call. Regex arguments like 'a(b|c)' depend on this.
  */
  fn parse_function_call(&mut self, function: &mut ListFileFunction) -> Result<(), ListFileParseError> {
    let open_paren: Token = self.lexer.scan();

    if open_paren.kind != TokenKind::ParenLeft {
      return Err(ListFileParseError::MissingOpenParen {
        file_path: self.file_path.clone(),
        line: open_paren.line,
        token_kind: open_paren.kind.name(),
        token_text: open_paren.text
      });
    }

    let mut paren_depth: u32 = 0;
    let mut last_line: u32 = self.lexer.current_line();

    loop {
      let token: Token = self.lexer.scan();

      match token.kind {
        TokenKind::ParenLeft => {
          paren_depth += 1;
          function.push_argument(self.make_argument("(", false, token.line));
        },
        TokenKind::ParenRight => {
          if paren_depth == 0 {
            return Ok(());
          }

          paren_depth -= 1;
          function.push_argument(self.make_argument(")", false, token.line));
        },
        TokenKind::Identifier | TokenKind::ArgumentUnquoted => {
          function.push_argument(self.make_argument(token.text, false, token.line));
        },
        TokenKind::ArgumentQuoted => {
          function.push_argument(self.make_argument(token.text, true, token.line));
        },
        TokenKind::Newline => (),
        TokenKind::Eof => {
          return Err(ListFileParseError::UnterminatedFunctionCall {
            file_path: self.file_path.clone(),
            line: last_line
          });
        },
        other_kind => {
          return Err(ListFileParseError::MalformedArgument {
            file_path: self.file_path.clone(),
            line: token.line,
            token_kind: other_kind.name(),
            token_text: token.text
          });
        }
      }

      last_line = self.lexer.current_line();
    }
  }

  fn make_argument(&self, value: impl Into<String>, was_quoted: bool, line: u32) -> ListFileArgument {
    ListFileArgument::new(value, was_quoted, self.file_path.clone(), line)
  }
}

fn apply_top_level_heuristics(list_file: &mut ListFile, file_path: &str) {
  let lower_case_names: Vec<String> = list_file.functions()
    .iter()
    .map(|function| function.lower_case_name())
    .collect();

  let has_minimum_required: bool = lower_case_names
    .iter()
    .any(|name| name == "cmake_minimum_required");

  if !has_minimum_required {
    let uses_policy_dependent_command: bool = lower_case_names
      .iter()
      .any(|name| !POLICY_NEUTRAL_COMMANDS.iter().any(|neutral| *neutral == name.as_str()));

    list_file.set_needs_legacy_policy(
      lower_case_names.len() >= LEGACY_POLICY_COMMAND_LIMIT || uses_policy_dependent_command
    );
  }

  if !lower_case_names.iter().any(|name| name == "project") {
    let mut implicit_project = ListFileFunction::new("PROJECT", file_path, 0);
    implicit_project.push_argument(ListFileArgument::new(IMPLICIT_PROJECT_NAME, false, file_path, 0));
    list_file.prepend_function(implicit_project);
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use tempfile::{NamedTempFile, TempDir};

  use super::*;

  fn parse_ok(text: &str) -> ListFile {
    match parse_string(text, "CMakeLists.txt", false) {
      Ok(list_file) => list_file,
      Err(error) => panic!("unexpected parse failure: {}", error)
    }
  }

  fn values(function: &ListFileFunction) -> Vec<&str> {
    function.argument_values()
  }

  #[test]
  fn nested_parens_are_kept_in_order() {
    let list_file = parse_ok("name(a (b c) d)\n");

    assert_eq!(list_file.functions().len(), 1);
    assert_eq!(values(&list_file.functions()[0]), vec!["a", "(", "b", "c", ")", "d"]);
  }

  #[test]
  fn only_depth_zero_paren_ends_the_call() {
    let list_file = parse_ok("f(a(b)c)");

    assert_eq!(list_file.functions().len(), 1);
    assert_eq!(list_file.functions()[0].name(), "f");
    assert_eq!(values(&list_file.functions()[0]), vec!["a", "(", "b", ")", "c"]);
  }

  #[test]
  fn quoting_is_preserved() {
    let list_file = parse_ok("f(\"x\" y)");
    let arguments = list_file.functions()[0].arguments();

    assert_eq!(arguments[0].value, "x");
    assert!(arguments[0].was_quoted);
    assert_eq!(arguments[1].value, "y");
    assert!(!arguments[1].was_quoted);
  }

  #[test]
  fn arguments_may_span_lines() {
    let list_file = parse_ok("add_library(mylib\n  a.cpp\n  b.cpp\n)\nmessage(done)\n");
    let functions = list_file.functions();

    assert_eq!(functions.len(), 2);
    assert_eq!(values(&functions[0]), vec!["mylib", "a.cpp", "b.cpp"]);
    assert_eq!(functions[0].arguments()[2].line, 3);
    assert_eq!(functions[1].line(), 5);
  }

  #[test]
  fn unterminated_call_fails() {
    match parse_string("f(a b", "CMakeLists.txt", false) {
      Err(ListFileParseError::UnterminatedFunctionCall { line, .. }) => assert_eq!(line, 1),
      other => panic!("expected an unterminated call error, got {:?}", other)
    }
  }

  #[test]
  fn missing_open_paren_fails() {
    match parse_string("project hello\n", "CMakeLists.txt", false) {
      Err(ListFileParseError::MissingOpenParen { token_text, .. }) => assert_eq!(token_text, "hello"),
      other => panic!("expected a missing paren error, got {:?}", other)
    }
  }

  #[test]
  fn two_commands_on_one_line_fail() {
    match parse_string("f() g()\n", "CMakeLists.txt", false) {
      Err(ListFileParseError::ExpectedNewline { token_text, line, .. }) => {
        assert_eq!(token_text, "g");
        assert_eq!(line, 1);
      },
      other => panic!("expected a newline error, got {:?}", other)
    }
  }

  #[test]
  fn non_identifier_at_top_level_fails() {
    match parse_string("\n\"quoted\"()\n", "CMakeLists.txt", false) {
      Err(ListFileParseError::ExpectedCommandName { token_kind, line, .. }) => {
        assert_eq!(token_kind, TokenKind::ArgumentQuoted.name());
        assert_eq!(line, 2);
      },
      other => panic!("expected a command name error, got {:?}", other)
    }
  }

  #[test]
  fn bad_token_inside_call_fails() {
    let error = parse_string("f(a\n\"open)\n", "dir/CMakeLists.txt", false).unwrap_err();

    match &error {
      ListFileParseError::MalformedArgument { token_kind, line, .. } => {
        assert_eq!(*token_kind, TokenKind::BadQuote.name());
        assert_eq!(*line, 2);
      },
      other => panic!("expected a malformed argument error, got {:?}", other)
    }

    assert_eq!(error.file_path(), "dir/CMakeLists.txt");
    assert!(error.to_string().starts_with("Parse error in cmake code at dir/CMakeLists.txt:2:"));
  }

  #[test]
  fn missing_project_is_injected_first() {
    let list_file = parse_string("set(A 1)\nadd_executable(app main.c)\n", "CMakeLists.txt", true).unwrap();
    let functions = list_file.functions();

    assert_eq!(functions.len(), 3);
    assert_eq!(functions[0].name(), "PROJECT");
    assert_eq!(functions[0].line(), 0);
    assert_eq!(values(&functions[0]), vec!["Project"]);
    assert!(!functions[0].arguments()[0].was_quoted);
    assert_eq!(functions[1].name(), "set");
  }

  #[test]
  fn existing_project_is_found_case_insensitively() {
    let list_file = parse_string("PROJECT(demo)\n", "CMakeLists.txt", true).unwrap();

    assert_eq!(list_file.functions().len(), 1);
    assert_eq!(values(&list_file.functions()[0]), vec!["demo"]);
  }

  #[test]
  fn nested_files_get_no_heuristics() {
    let list_file = parse_ok("install(TARGETS app)\n");

    assert_eq!(list_file.functions().len(), 1);
    assert!(!list_file.needs_legacy_policy());
  }

  #[test]
  fn many_commands_need_legacy_policy() {
    let text: String = "set(A 1)\n".repeat(35);
    let list_file = parse_string(&text, "CMakeLists.txt", true).unwrap();

    assert!(list_file.needs_legacy_policy());
  }

  #[test]
  fn legacy_policy_command_limit_is_inclusive() {
    let below_limit: String = format!("project(p)\n{}", "set(A 1)\n".repeat(28));
    let at_limit: String = format!("project(p)\n{}", "set(A 1)\n".repeat(29));

    assert!(!parse_string(&below_limit, "CMakeLists.txt", true).unwrap().needs_legacy_policy());
    assert!(parse_string(&at_limit, "CMakeLists.txt", true).unwrap().needs_legacy_policy());
  }

  #[test]
  fn few_policy_neutral_commands_dont_need_legacy_policy() {
    let text = "project(p)\nSET(A 1)\nif(A)\nmessage(yes)\nendif()\n";
    let list_file = parse_string(text, "CMakeLists.txt", true).unwrap();

    assert!(!list_file.needs_legacy_policy());
  }

  #[test]
  fn unknown_command_needs_legacy_policy() {
    let text = "project(p)\nset(A 1)\nif(A)\ninclude_directories(inc)\nendif()\n";
    let list_file = parse_string(text, "CMakeLists.txt", true).unwrap();

    assert!(list_file.needs_legacy_policy());
  }

  #[test]
  fn minimum_required_disables_legacy_policy() {
    let mut text: String = String::from("CMake_Minimum_Required(VERSION 3.10)\n");
    text.push_str(&"install(FILES a DESTINATION b)\n".repeat(40));
    let list_file = parse_string(&text, "CMakeLists.txt", true).unwrap();

    assert!(!list_file.needs_legacy_policy());
  }

  #[test]
  fn parse_file_reads_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "cmake_minimum_required(VERSION 3.5)").unwrap();
    writeln!(file, "project(from_disk)").unwrap();

    let list_file = parse_file(file.path(), true).unwrap();

    assert_eq!(list_file.functions().len(), 2);
    assert!(list_file.modified_time().is_some());
    assert_eq!(list_file.functions()[1].file_path(), file.path().to_string_lossy());
  }

  #[test]
  fn parse_file_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("CMakeLists.txt");

    match parse_file(&missing, true) {
      Err(ListFileParseError::FileNotFound { .. }) => (),
      other => panic!("expected a missing file error, got {:?}", other)
    }
  }

  #[test]
  fn parse_file_unreadable_path() {
    let dir = TempDir::new().unwrap();

    match parse_file(dir.path(), false) {
      Err(ListFileParseError::FileOpenError { .. }) => (),
      other => panic!("expected an open error, got {:?}", other)
    }
  }
}
