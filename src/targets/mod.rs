mod command_replay;
mod target;

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::{
  config::{load_yaml_file, parse_yaml_str, ConfigLoadError},
  genex::Messenger,
  list_file::{ListFile, ListFileBacktrace}
};

pub use target::{Target, TargetType};

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawTargetsFile {
  targets: BTreeMap<String, BTreeMap<String, RawPropertyValue>>
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawPropertyValue {
  Text(String),
  Boolean(bool),
  Integer(i64),
  List(Vec<String>)
}

impl RawPropertyValue {
  fn into_property_string(self) -> String {
    match self {
      RawPropertyValue::Text(text) => text,
      RawPropertyValue::Boolean(value) => String::from(if value { "ON" } else { "OFF" }),
      RawPropertyValue::Integer(value) => value.to_string(),
      RawPropertyValue::List(items) => items.join(";")
    }
  }
}

/// Every target known to one configured project, plus ALIAS names.
#[derive(Debug, Default)]
pub struct TargetRegistry {
  targets: BTreeMap<String, Target>,
  aliases: BTreeMap<String, String>
}

impl TargetRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replays the target commands of a parsed list file. Problems with individual
  /// commands are reported through the messenger and the command is skipped.
  pub fn from_list_file(list_file: &ListFile, messenger: &mut Messenger) -> Self {
    let mut registry = Self::new();

    for function in list_file.functions() {
      command_replay::replay_function(&mut registry, function, messenger);
    }

    return registry;
  }

  pub fn from_yaml_str(yaml_str: &str, path_label: &str) -> Result<Self, ConfigLoadError> {
    let raw_file: RawTargetsFile = parse_yaml_str(yaml_str, path_label)?;
    return Ok(Self::from_raw(raw_file));
  }

  pub fn from_yaml_file(file_path: &Path) -> Result<Self, ConfigLoadError> {
    let raw_file: RawTargetsFile = load_yaml_file(file_path)?;
    return Ok(Self::from_raw(raw_file));
  }

  fn from_raw(raw_file: RawTargetsFile) -> Self {
    let mut registry = Self::new();

    for (target_name, raw_properties) in raw_file.targets {
      let mut target = Target::new(&target_name, ListFileBacktrace::empty());

      for (property_name, raw_value) in raw_properties {
        target.set_property(property_name, raw_value.into_property_string());
      }

      registry.targets.insert(target_name, target);
    }

    return registry;
  }

  /// Returns false without replacing anything when the name is already taken.
  pub fn add(&mut self, target: Target) -> bool {
    if self.contains(target.name()) {
      return false;
    }

    self.targets.insert(target.name().to_string(), target);
    return true;
  }

  pub fn add_alias(&mut self, alias_name: impl Into<String>, aliased_target: impl Into<String>) -> bool {
    let alias_name: String = alias_name.into();

    if self.contains(&alias_name) {
      return false;
    }

    self.aliases.insert(alias_name, aliased_target.into());
    return true;
  }

  fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
    self.aliases.get(name)
      .map(|aliased| &aliased[..])
      .unwrap_or(name)
  }

  pub fn find(&self, name: &str) -> Option<&Target> {
    self.targets.get(self.resolve_name(name))
  }

  pub fn find_mut(&mut self, name: &str) -> Option<&mut Target> {
    let resolved: String = self.resolve_name(name).to_string();
    self.targets.get_mut(&resolved)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.targets.contains_key(name) || self.aliases.contains_key(name)
  }

  pub fn targets(&self) -> impl Iterator<Item = &Target> {
    self.targets.values()
  }

  /*
    Properties from 'other' override properties of the same name on existing targets.
    Targets only present in 'other' are added as they are.
  */
  pub fn merge(&mut self, other: TargetRegistry) {
    for (target_name, other_target) in other.targets {
      match self.find_mut(&target_name) {
        Some(existing) => {
          for (property_name, value) in other_target.properties() {
            existing.set_property(property_name.clone(), value.clone());
          }
        },
        None => {
          self.targets.insert(target_name, other_target);
        }
      }
    }

    for (alias_name, aliased_target) in other.aliases {
      self.add_alias(alias_name, aliased_target);
    }
  }
}
