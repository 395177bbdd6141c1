use std::path::PathBuf;

use self::clap_cli_config::{CLIOutputFormat, EvalCommand, ParseCommand, TokensCommand};
pub mod clap_cli_config;

pub const STDIN_LABEL: &'static str = "<stdin>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
  Stdin,
  File(PathBuf)
}

impl InputSource {
  pub fn label(&self) -> String {
    match self {
      InputSource::Stdin => String::from(STDIN_LABEL),
      InputSource::File(file_path) => file_path.to_string_lossy().to_string()
    }
  }
}

impl From<&str> for InputSource {
  fn from(given_path: &str) -> Self {
    if given_path == "-" {
      return InputSource::Stdin;
    }
    return InputSource::File(PathBuf::from(given_path));
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Text,
  Yaml
}

pub struct CLIParseInfo {
  pub input: InputSource,
  pub is_top_level: bool,
  pub format: OutputFormat
}

pub struct CLITokensInfo {
  pub input: InputSource,
  pub include_trivia: bool
}

pub struct CLIEvalInfo {
  pub input: InputSource,
  pub target_name: String,
  pub property_name: String,
  pub targets_yaml: Option<PathBuf>,
  pub quiet: bool
}

impl From<ParseCommand> for CLIParseInfo {
  fn from(command: ParseCommand) -> Self {
    let format: OutputFormat = match command.format {
      CLIOutputFormat::Text => OutputFormat::Text,
      CLIOutputFormat::Yaml => OutputFormat::Yaml
    };

    return CLIParseInfo {
      input: InputSource::from(command.file.as_str()),
      is_top_level: command.top_level,
      format
    }
  }
}

impl From<TokensCommand> for CLITokensInfo {
  fn from(command: TokensCommand) -> Self {
    CLITokensInfo {
      input: InputSource::from(command.file.as_str()),
      include_trivia: command.trivia
    }
  }
}

impl From<EvalCommand> for CLIEvalInfo {
  fn from(command: EvalCommand) -> Self {
    CLIEvalInfo {
      input: InputSource::from(command.file.as_str()),
      target_name: command.target,
      property_name: command.property,
      targets_yaml: command.targets_yaml.map(PathBuf::from),
      quiet: command.quiet
    }
  }
}
