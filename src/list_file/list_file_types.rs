use std::time::SystemTime;

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ListFileArgument {
  pub value: String,
  pub was_quoted: bool,
  #[serde(skip)]
  pub file_path: String,
  pub line: u32
}

impl ListFileArgument {
  pub fn new(
    value: impl Into<String>,
    was_quoted: bool,
    file_path: impl Into<String>,
    line: u32
  ) -> Self {
    Self {
      value: value.into(),
      was_quoted,
      file_path: file_path.into(),
      line
    }
  }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ListFileFunction {
  name: String,
  #[serde(skip)]
  file_path: String,
  line: u32,
  arguments: Vec<ListFileArgument>
}

impl ListFileFunction {
  pub fn new(
    name: impl Into<String>,
    file_path: impl Into<String>,
    line: u32
  ) -> Self {
    Self {
      name: name.into(),
      file_path: file_path.into(),
      line,
      arguments: Vec::new()
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn lower_case_name(&self) -> String {
    self.name.to_lowercase()
  }

  pub fn file_path(&self) -> &str {
    &self.file_path
  }

  pub fn line(&self) -> u32 {
    self.line
  }

  pub fn arguments(&self) -> &Vec<ListFileArgument> {
    &self.arguments
  }

  pub fn argument_values(&self) -> Vec<&str> {
    return self.arguments
      .iter()
      .map(|arg| &arg.value[..])
      .collect();
  }

  pub(crate) fn push_argument(&mut self, argument: ListFileArgument) {
    self.arguments.push(argument);
  }
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct ListFile {
  functions: Vec<ListFileFunction>,
  // None means the file was never successfully parsed.
  #[serde(skip)]
  modified_time: Option<SystemTime>,
  needs_legacy_policy: bool
}

impl ListFile {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn functions(&self) -> &Vec<ListFileFunction> {
    &self.functions
  }

  pub fn modified_time(&self) -> Option<SystemTime> {
    self.modified_time
  }

  /// True when a top-level file has no cmake_minimum_required() call and uses commands
  /// outside of the small set which behaves the same under every policy version.
  pub fn needs_legacy_policy(&self) -> bool {
    self.needs_legacy_policy
  }

  pub(crate) fn set_modified_time(&mut self, modified_time: Option<SystemTime>) {
    self.modified_time = modified_time;
  }

  pub(crate) fn set_needs_legacy_policy(&mut self, needs_legacy_policy: bool) {
    self.needs_legacy_policy = needs_legacy_policy;
  }

  pub(crate) fn push_function(&mut self, function: ListFileFunction) {
    self.functions.push(function);
  }

  pub(crate) fn prepend_function(&mut self, function: ListFileFunction) {
    self.functions.insert(0, function);
  }
}
