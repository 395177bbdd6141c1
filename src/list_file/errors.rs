use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListFileParseError {
  #[error("File '{file_path}' does not exist.")]
  FileNotFound {
    file_path: String
  },

  #[error("Unable to open '{file_path}': {source}")]
  FileOpenError {
    file_path: String,
    source: io::Error
  },

  #[error("Parse error in cmake code at {file_path}:{line}:\nParse error.  Function missing opening \"(\".  Instead found {token_kind} with text \"{token_text}\".")]
  MissingOpenParen {
    file_path: String,
    line: u32,
    token_kind: &'static str,
    token_text: String
  },

  #[error("Parse error in cmake code at {file_path}:{line}:\nParse error.  Function missing ending \")\".  End of file reached.")]
  UnterminatedFunctionCall {
    file_path: String,
    line: u32
  },

  #[error("Parse error in cmake code at {file_path}:{line}:\nParse error.  Function missing ending \")\".  Instead found {token_kind} with text \"{token_text}\".")]
  MalformedArgument {
    file_path: String,
    line: u32,
    token_kind: &'static str,
    token_text: String
  },

  #[error("Parse error in cmake code at {file_path}:{line}:\nParse error.  Expected a newline, got identifier with text \"{token_text}\".")]
  ExpectedNewline {
    file_path: String,
    line: u32,
    token_text: String
  },

  #[error("Parse error in cmake code at {file_path}:{line}:\nParse error.  Expected a command name, got {token_kind} with text \"{token_text}\".")]
  ExpectedCommandName {
    file_path: String,
    line: u32,
    token_kind: &'static str,
    token_text: String
  }
}

impl ListFileParseError {
  pub fn file_path(&self) -> &str {
    match self {
      Self::FileNotFound { file_path }
        | Self::FileOpenError { file_path, .. }
        | Self::MissingOpenParen { file_path, .. }
        | Self::UnterminatedFunctionCall { file_path, .. }
        | Self::MalformedArgument { file_path, .. }
        | Self::ExpectedNewline { file_path, .. }
        | Self::ExpectedCommandName { file_path, .. } => file_path
    }
  }

  /// Line the error was found on. I/O errors happen before any line is read.
  pub fn line(&self) -> Option<u32> {
    match self {
      Self::FileNotFound { .. } | Self::FileOpenError { .. } => None,
      Self::MissingOpenParen { line, .. }
        | Self::UnterminatedFunctionCall { line, .. }
        | Self::MalformedArgument { line, .. }
        | Self::ExpectedNewline { line, .. }
        | Self::ExpectedCommandName { line, .. } => Some(*line)
    }
  }
}
