use std::{io, path::Path};

use clap::Parser;

use cmlistfile::{
  cli_config::{
    clap_cli_config::{Opts, SubCommandStruct},
    CLIEvalInfo,
    CLIParseInfo,
    CLITokensInfo
  },
  config::ToolConfig,
  logger,
  program_actions::{evaluate_property_action, parse_list_file_action, print_tokens_action, ActionResult}
};

fn main() {
  let opts: Opts = Opts::parse();

  let config: ToolConfig = match ToolConfig::load(opts.config.as_deref().map(Path::new)) {
    Ok(loaded_config) => loaded_config,
    Err(error) => logger::exit_error_log(error.to_string())
  };

  let stdout = io::stdout();
  let mut output = stdout.lock();

  let result: ActionResult = match opts.subcommand {
    SubCommandStruct::Parse(command) => parse_list_file_action(&CLIParseInfo::from(command), &config, &mut output),
    SubCommandStruct::Tokens(command) => print_tokens_action(&CLITokensInfo::from(command), &mut output),
    SubCommandStruct::Eval(command) => evaluate_property_action(&CLIEvalInfo::from(command), &config, &mut output)
  };

  if let Err(error) = result {
    logger::exit_error_log(error.to_string());
  }
}
