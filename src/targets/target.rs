use std::collections::BTreeMap;

use enum_iterator::Sequence;

use crate::list_file::ListFileBacktrace;

#[derive(Sequence, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
  Executable,
  StaticLibrary,
  SharedLibrary,
  ModuleLibrary,
  ObjectLibrary,
  InterfaceLibrary
}

impl TargetType {
  /// The value CMake stores in a target's TYPE property.
  pub fn type_property(&self) -> &'static str {
    match self {
      TargetType::Executable => "EXECUTABLE",
      TargetType::StaticLibrary => "STATIC_LIBRARY",
      TargetType::SharedLibrary => "SHARED_LIBRARY",
      TargetType::ModuleLibrary => "MODULE_LIBRARY",
      TargetType::ObjectLibrary => "OBJECT_LIBRARY",
      TargetType::InterfaceLibrary => "INTERFACE_LIBRARY"
    }
  }

  pub fn from_type_property(type_str: &str) -> Option<Self> {
    enum_iterator::all::<TargetType>()
      .find(|target_type| target_type.type_property() == type_str)
  }

  /// Maps the optional library type keyword of add_library.
  pub fn from_library_keyword(keyword: &str) -> Option<Self> {
    match keyword {
      "STATIC" => Some(TargetType::StaticLibrary),
      "SHARED" => Some(TargetType::SharedLibrary),
      "MODULE" => Some(TargetType::ModuleLibrary),
      "OBJECT" => Some(TargetType::ObjectLibrary),
      "INTERFACE" => Some(TargetType::InterfaceLibrary),
      _ => None
    }
  }
}

#[derive(Debug, Clone)]
pub struct Target {
  name: String,
  properties: BTreeMap<String, String>,
  backtrace: ListFileBacktrace
}

impl Target {
  pub fn new(
    name: impl Into<String>,
    backtrace: ListFileBacktrace
  ) -> Self {
    Self {
      name: name.into(),
      properties: BTreeMap::new(),
      backtrace
    }
  }

  pub fn with_type(
    name: impl Into<String>,
    target_type: TargetType,
    backtrace: ListFileBacktrace
  ) -> Self {
    let mut target = Self::new(name, backtrace);
    target.set_property("TYPE", target_type.type_property());
    return target;
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn backtrace(&self) -> &ListFileBacktrace {
    &self.backtrace
  }

  pub fn properties(&self) -> &BTreeMap<String, String> {
    &self.properties
  }

  pub fn property(&self, property_name: &str) -> Option<&str> {
    if property_name == "NAME" {
      return Some(&self.name);
    }

    self.properties.get(property_name).map(|value| &value[..])
  }

  pub fn target_type(&self) -> Option<TargetType> {
    self.properties.get("TYPE")
      .and_then(|type_str| TargetType::from_type_property(type_str))
  }

  pub fn is_static_library(&self) -> bool {
    self.target_type() == Some(TargetType::StaticLibrary)
  }

  pub fn set_property(&mut self, property_name: impl Into<String>, value: impl Into<String>) {
    self.properties.insert(property_name.into(), value.into());
  }

  /// Appends as a list item (';' separated), or as raw text when 'as_string' is set.
  pub fn append_property(&mut self, property_name: &str, value: &str, as_string: bool) {
    if value.is_empty() && !as_string {
      return;
    }

    let existing: &mut String = self.properties
      .entry(property_name.to_string())
      .or_default();

    if !existing.is_empty() && !as_string {
      existing.push(';');
    }
    existing.push_str(value);
  }

  pub fn prepend_property(&mut self, property_name: &str, value: &str) {
    if value.is_empty() {
      return;
    }

    let existing: &mut String = self.properties
      .entry(property_name.to_string())
      .or_default();

    *existing = if existing.is_empty()
      { value.to_string() }
      else { format!("{};{}", value, existing) };
  }
}
