use enum_iterator::Sequence;

const INTERFACE_PREFIX: &'static str = "INTERFACE_";

/// Usage requirements which propagate from a target to everything linking it.
#[derive(Sequence, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitiveProperty {
  AutouicOptions,
  CompileDefinitions,
  CompileFeatures,
  CompileOptions,
  IncludeDirectories,
  LinkDepends,
  LinkDirectories,
  LinkOptions,
  PrecompileHeaders,
  Sources,
  SystemIncludeDirectories
}

impl TransitiveProperty {
  pub fn property_name(&self) -> &'static str {
    match self {
      TransitiveProperty::AutouicOptions => "AUTOUIC_OPTIONS",
      TransitiveProperty::CompileDefinitions => "COMPILE_DEFINITIONS",
      TransitiveProperty::CompileFeatures => "COMPILE_FEATURES",
      TransitiveProperty::CompileOptions => "COMPILE_OPTIONS",
      TransitiveProperty::IncludeDirectories => "INCLUDE_DIRECTORIES",
      TransitiveProperty::LinkDepends => "LINK_DEPENDS",
      TransitiveProperty::LinkDirectories => "LINK_DIRECTORIES",
      TransitiveProperty::LinkOptions => "LINK_OPTIONS",
      TransitiveProperty::PrecompileHeaders => "PRECOMPILE_HEADERS",
      TransitiveProperty::Sources => "SOURCES",
      TransitiveProperty::SystemIncludeDirectories => "SYSTEM_INCLUDE_DIRECTORIES"
    }
  }

  pub fn interface_property_name(&self) -> String {
    format!("{}{}", INTERFACE_PREFIX, self.property_name())
  }

  /*
    Matches both the plain and the INTERFACE_ spelling of each property.
    Per-configuration compile definitions (COMPILE_DEFINITIONS_DEBUG, ...) count as
    compile definitions, but only without the INTERFACE_ prefix.
  */
  pub fn from_property_name(property: &str) -> Option<Self> {
    let base_property: &str = property
      .strip_prefix(INTERFACE_PREFIX)
      .unwrap_or(property);

    let found = enum_iterator::all::<TransitiveProperty>()
      .find(|transitive| transitive.property_name() == base_property);

    if found.is_some() {
      return found;
    }

    if property.starts_with("COMPILE_DEFINITIONS_") {
      return Some(TransitiveProperty::CompileDefinitions);
    }

    return None;
  }

  pub fn is_interface_property(property: &str) -> bool {
    property.starts_with(INTERFACE_PREFIX)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_and_interface_names_match() {
    for transitive in enum_iterator::all::<TransitiveProperty>() {
      assert_eq!(TransitiveProperty::from_property_name(transitive.property_name()), Some(transitive));
      assert_eq!(TransitiveProperty::from_property_name(&transitive.interface_property_name()), Some(transitive));
    }
  }

  #[test]
  fn per_config_compile_definitions() {
    assert_eq!(
      TransitiveProperty::from_property_name("COMPILE_DEFINITIONS_DEBUG"),
      Some(TransitiveProperty::CompileDefinitions)
    );
    assert_eq!(TransitiveProperty::from_property_name("INTERFACE_COMPILE_DEFINITIONS_DEBUG"), None);
  }

  #[test]
  fn other_properties_are_not_transitive() {
    assert_eq!(TransitiveProperty::from_property_name("LINK_LIBRARIES"), None);
    assert_eq!(TransitiveProperty::from_property_name("OUTPUT_NAME"), None);
    assert_eq!(TransitiveProperty::from_property_name("INTERFACE_"), None);
  }
}
