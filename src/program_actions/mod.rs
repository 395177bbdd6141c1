mod evaluate_property;
mod parse_list_file;
mod print_tokens;

pub use evaluate_property::*;
pub use parse_list_file::*;
pub use print_tokens::*;

use std::io::{self, Read};

use thiserror::Error;

use crate::{
  cli_config::InputSource,
  config::ConfigLoadError,
  list_file::{parse_file, parse_string, ListFile, ListFileParseError}
};

#[derive(Error, Debug)]
pub enum ActionError {
  #[error("{0}")]
  Parse(#[from] ListFileParseError),

  #[error("{0}")]
  Config(#[from] ConfigLoadError),

  #[error("Unable to read standard input: {0}")]
  Stdin(io::Error),

  #[error("Unable to write output: {0}")]
  Output(#[from] io::Error),

  #[error("Unable to serialize the parsed list file: {0}")]
  Serialize(#[from] serde_yaml::Error),

  #[error("Evaluating $<TARGET_PROPERTY:{target_name},{property_name}> failed with {error_count} error(s).")]
  Evaluation {
    target_name: String,
    property_name: String,
    error_count: usize
  }
}

pub type ActionResult<T = ()> = Result<T, ActionError>;

fn read_stdin() -> ActionResult<String> {
  let mut text: String = String::new();

  io::stdin()
    .read_to_string(&mut text)
    .map_err(ActionError::Stdin)?;

  return Ok(text);
}

pub(crate) fn load_list_file(input: &InputSource, is_top_level: bool) -> ActionResult<ListFile> {
  let list_file: ListFile = match input {
    InputSource::File(file_path) => parse_file(file_path, is_top_level)?,
    InputSource::Stdin => parse_string(&read_stdin()?, input.label(), is_top_level)?
  };

  return Ok(list_file);
}
