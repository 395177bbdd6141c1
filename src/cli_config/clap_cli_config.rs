use clap::{Subcommand, Args, Parser, ValueEnum};

const SKY: &'static str = "Skylar Cupit";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CLIOutputFormat {
  Text,
  Yaml
}

#[derive(Parser)]
#[command(version, author = SKY, about = "Parse CMake list files and evaluate generator expressions")]
pub struct Opts {
  /// Tool configuration file. Defaults to ./cmlistfile.yaml when that file exists.
  #[arg(long, global = true)]
  pub config: Option<String>,

  #[command(subcommand)]
  pub subcommand: SubCommandStruct
}

#[derive(Subcommand)]
pub enum SubCommandStruct {
  /// Parse a list file and print the commands it contains
  Parse(ParseCommand),

  /// Print the token stream of a list file
  Tokens(TokensCommand),

  /// Evaluate $<TARGET_PROPERTY:target,property> for a target defined in a list file
  Eval(EvalCommand)
}

#[derive(Args)]
pub struct ParseCommand {
  /// List file to read, or '-' for standard input
  #[arg(required = true)]
  pub file: String,

  /// Treat the file as a project's top-level CMakeLists.txt
  #[arg(long)]
  pub top_level: bool,

  #[arg(value_enum, long, default_value = "text")]
  pub format: CLIOutputFormat
}

#[derive(Args)]
pub struct TokensCommand {
  /// List file to read, or '-' for standard input
  #[arg(required = true)]
  pub file: String,

  /// Also print comments and blank runs
  #[arg(long)]
  pub trivia: bool
}

#[derive(Args)]
pub struct EvalCommand {
  /// List file which defines the targets, or '-' for standard input
  #[arg(required = true)]
  pub file: String,

  #[arg(short, long, required = true)]
  pub target: String,

  #[arg(short, long, required = true)]
  pub property: String,

  /// YAML file with extra targets and properties, merged over those from the list file.
  /// Format: targets: { <name>: { <PROPERTY>: <value or list> } }
  #[arg(long = "targets-yaml")]
  pub targets_yaml: Option<String>,

  /// Fail on generator expression errors without printing them
  #[arg(short, long)]
  pub quiet: bool
}
