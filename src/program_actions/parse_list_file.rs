use std::io::Write;

use crate::{
  cli_config::{CLIParseInfo, OutputFormat},
  config::ToolConfig,
  list_file::{ListFile, ListFileFunction},
  logger
};

use super::{load_list_file, ActionResult};

fn format_function(function: &ListFileFunction) -> String {
  let arguments: Vec<String> = function.arguments()
    .iter()
    .map(|argument| {
      if argument.was_quoted
        { format!("\"{}\"", argument.value) }
        else { argument.value.clone() }
    })
    .collect();

  return format!(
    "{}:{}: {}({})",
    function.file_path(),
    function.line(),
    function.name(),
    arguments.join(" ")
  );
}

pub fn write_list_file(
  list_file: &ListFile,
  format: OutputFormat,
  output: &mut impl Write
) -> ActionResult {
  match format {
    OutputFormat::Text => {
      for function in list_file.functions() {
        writeln!(output, "{}", format_function(function))?;
      }
    },
    OutputFormat::Yaml => {
      let yaml: String = serde_yaml::to_string(list_file)?;
      write!(output, "{}", yaml)?;
    }
  }

  return Ok(());
}

pub fn parse_list_file_action(
  parse_info: &CLIParseInfo,
  config: &ToolConfig,
  output: &mut impl Write
) -> ActionResult {
  let list_file: ListFile = load_list_file(&parse_info.input, parse_info.is_top_level)?;

  if list_file.needs_legacy_policy() && config.warn_legacy_policy {
    logger::warn(format!(
      "{} has no cmake_minimum_required() call and uses commands which depend on policy settings.",
      parse_info.input.label()
    ));
  }

  return write_list_file(&list_file, parse_info.format, output);
}
