use crate::{
  genex::Messenger,
  list_file::{ListFileBacktrace, ListFileContext, ListFileFunction},
  logger::MessageType
};

use super::{Target, TargetRegistry, TargetType};

const EXECUTABLE_FLAGS: [&'static str; 3] = ["WIN32", "MACOSX_BUNDLE", "EXCLUDE_FROM_ALL"];

type ReplayResult = Result<(), String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
  Private,
  Public,
  Interface
}

impl Scope {
  fn from_keyword(keyword: &str) -> Option<Self> {
    match keyword {
      "PRIVATE" => Some(Scope::Private),
      "PUBLIC" => Some(Scope::Public),
      "INTERFACE" => Some(Scope::Interface),
      _ => None
    }
  }

  fn is_build_scope(&self) -> bool {
    *self != Scope::Interface
  }

  fn is_interface_scope(&self) -> bool {
    *self != Scope::Private
  }
}

/*
  Applies one command to the registry. Only commands which create targets or set
  their properties do anything. Arguments are used as written, since variables
  are never expanded.
*/
pub fn replay_function(
  registry: &mut TargetRegistry,
  function: &ListFileFunction,
  messenger: &mut Messenger
) {
  let backtrace = ListFileBacktrace::from_context(ListFileContext::from_function(function));
  let arguments: Vec<&str> = function.argument_values();

  let result: ReplayResult = match function.lower_case_name().as_str() {
    "add_executable" => add_executable(registry, &arguments, &backtrace),
    "add_library" => add_library(registry, &arguments, &backtrace),
    "set_target_properties" => set_target_properties(registry, &arguments),
    "set_property" => set_property(registry, &arguments),
    "target_link_libraries" => target_link_libraries(registry, &arguments),
    "target_include_directories" => target_usage_requirement(
      registry,
      &arguments,
      "target_include_directories",
      "include directories",
      "INCLUDE_DIRECTORIES"
    ),
    "target_compile_definitions" => target_usage_requirement(
      registry,
      &arguments,
      "target_compile_definitions",
      "compile definitions",
      "COMPILE_DEFINITIONS"
    ),
    "target_compile_options" => target_usage_requirement(
      registry,
      &arguments,
      "target_compile_options",
      "compile options",
      "COMPILE_OPTIONS"
    ),
    _ => Ok(())
  };

  if let Err(error_message) = result {
    messenger.issue_message(MessageType::FatalError, error_message, backtrace);
  }
}

fn add_target(
  registry: &mut TargetRegistry,
  command_name: &str,
  target: Target
) -> ReplayResult {
  let target_name: String = target.name().to_string();

  if !registry.add(target) {
    return Err(format!(
      "{} cannot create target \"{}\" because another target with the same name already exists.",
      command_name,
      target_name
    ));
  }

  return Ok(());
}

fn add_alias(
  registry: &mut TargetRegistry,
  command_name: &str,
  alias_name: &str,
  arguments: &[&str]
) -> ReplayResult {
  let aliased_name: &str = match arguments {
    [aliased] => aliased,
    _ => return Err(format!("{} ALIAS requires exactly one target argument.", command_name))
  };

  if !registry.contains(aliased_name) {
    return Err(format!(
      "{} cannot create ALIAS target \"{}\" because target \"{}\" does not already exist.",
      command_name,
      alias_name,
      aliased_name
    ));
  }

  if !registry.add_alias(alias_name, aliased_name) {
    return Err(format!(
      "{} cannot create ALIAS target \"{}\" because another target with the same name already exists.",
      command_name,
      alias_name
    ));
  }

  return Ok(());
}

fn add_executable(
  registry: &mut TargetRegistry,
  arguments: &[&str],
  backtrace: &ListFileBacktrace
) -> ReplayResult {
  let (target_name, rest) = match arguments.split_first() {
    Some(split) => split,
    None => return Err(String::from("add_executable called with incorrect number of arguments"))
  };

  if rest.first() == Some(&"ALIAS") {
    return add_alias(registry, "add_executable", target_name, &rest[1..]);
  }

  let mut target = Target::with_type(*target_name, TargetType::Executable, backtrace.clone());

  if rest.first() == Some(&"IMPORTED") {
    target.set_property("IMPORTED", "TRUE");
    return add_target(registry, "add_executable", target);
  }

  let sources: Vec<&str> = rest
    .iter()
    .copied()
    .skip_while(|arg| EXECUTABLE_FLAGS.iter().any(|flag| flag == arg))
    .collect();

  if !sources.is_empty() {
    target.set_property("SOURCES", sources.join(";"));
  }

  return add_target(registry, "add_executable", target);
}

fn add_library(
  registry: &mut TargetRegistry,
  arguments: &[&str],
  backtrace: &ListFileBacktrace
) -> ReplayResult {
  let (target_name, mut rest) = match arguments.split_first() {
    Some((name, rest)) => (*name, rest),
    None => return Err(String::from("add_library called with incorrect number of arguments"))
  };

  if rest.first() == Some(&"ALIAS") {
    return add_alias(registry, "add_library", target_name, &rest[1..]);
  }

  let mut target_type: TargetType = TargetType::StaticLibrary;

  if let Some(library_type) = rest.first().and_then(|keyword| TargetType::from_library_keyword(keyword)) {
    target_type = library_type;
    rest = &rest[1..];
  }

  let mut target = Target::with_type(target_name, target_type, backtrace.clone());

  if rest.first() == Some(&"IMPORTED") {
    target.set_property("IMPORTED", "TRUE");
    return add_target(registry, "add_library", target);
  }

  let sources: Vec<&str> = rest
    .iter()
    .copied()
    .skip_while(|arg| *arg == "EXCLUDE_FROM_ALL")
    .collect();

  if !sources.is_empty() {
    if target_type == TargetType::InterfaceLibrary {
      target.set_property("INTERFACE_SOURCES", sources.join(";"));
    }
    else {
      target.set_property("SOURCES", sources.join(";"));
    }
  }

  return add_target(registry, "add_library", target);
}

// set_target_properties(target1 target2 ... PROPERTIES prop1 value1 prop2 value2 ...)
fn set_target_properties(registry: &mut TargetRegistry, arguments: &[&str]) -> ReplayResult {
  let properties_index: usize = match arguments.iter().position(|arg| *arg == "PROPERTIES") {
    Some(index) => index,
    None => return Err(String::from("set_target_properties called with incorrect number of arguments."))
  };

  let target_names: &[&str] = &arguments[..properties_index];
  let pairs: &[&str] = &arguments[properties_index + 1..];

  if pairs.is_empty() || pairs.len() % 2 != 0 {
    return Err(String::from("set_target_properties called with incorrect number of arguments."));
  }

  for target_name in target_names {
    let target: &mut Target = match registry.find_mut(target_name) {
      Some(found) => found,
      None => return Err(format!("set_target_properties Can not find target to add properties to: {}", target_name))
    };

    for pair in pairs.chunks(2) {
      target.set_property(pair[0], pair[1]);
    }
  }

  return Ok(());
}

// set_property(TARGET [target1 ...] [APPEND | APPEND_STRING] PROPERTY name [value1 ...])
fn set_property(registry: &mut TargetRegistry, arguments: &[&str]) -> ReplayResult {
  if arguments.first() != Some(&"TARGET") {
    return Ok(());
  }

  let mut target_names: Vec<&str> = Vec::new();
  let mut append: bool = false;
  let mut append_string: bool = false;
  let mut index: usize = 1;

  while index < arguments.len() && arguments[index] != "PROPERTY" {
    match arguments[index] {
      "APPEND" => append = true,
      "APPEND_STRING" => append_string = true,
      target_name => target_names.push(target_name)
    }
    index += 1;
  }

  if append && append_string {
    return Err(String::from("set_property given both APPEND and APPEND_STRING."));
  }

  let property_name: &str = match arguments.get(index + 1) {
    Some(name) if index < arguments.len() => name,
    _ => return Err(String::from("set_property not given a PROPERTY <name> argument."))
  };

  let value: String = arguments[index + 2..].join(";");

  for target_name in target_names {
    let target: &mut Target = match registry.find_mut(target_name) {
      Some(found) => found,
      None => return Err(format!(
        "set_property could not find TARGET {}.  Perhaps it has not yet been created.",
        target_name
      ))
    };

    if append || append_string {
      target.append_property(property_name, &value, append_string);
    }
    else {
      target.set_property(property_name, value.clone());
    }
  }

  return Ok(());
}

fn target_link_libraries(registry: &mut TargetRegistry, arguments: &[&str]) -> ReplayResult {
  let (target_name, items) = match arguments.split_first() {
    Some(split) => split,
    None => return Err(String::from("target_link_libraries called with incorrect number of arguments"))
  };

  let target: &mut Target = match registry.find_mut(target_name) {
    Some(found) => found,
    None => return Err(format!(
      "Cannot specify link libraries for target \"{}\" which is not built by this project.",
      target_name
    ))
  };

  let is_interface_library: bool = target.target_type() == Some(TargetType::InterfaceLibrary);
  let is_static_library: bool = target.is_static_library();

  // Items before any scope keyword use the plain signature, which links them publicly.
  let mut scope: Scope = Scope::Public;
  let mut has_keyword: bool = false;

  for item in items {
    if let Some(new_scope) = Scope::from_keyword(item) {
      scope = new_scope;
      has_keyword = true;
      continue;
    }

    if is_interface_library && (scope != Scope::Interface || !has_keyword) {
      return Err(String::from(
        "INTERFACE library can only be used with the INTERFACE keyword of target_link_libraries"
      ));
    }

    if scope.is_build_scope() {
      target.append_property("LINK_LIBRARIES", item, false);
    }

    if scope.is_interface_scope() {
      target.append_property("INTERFACE_LINK_LIBRARIES", item, false);
    }
    else if is_static_library {
      // Consumers of a static library still have to link its private dependencies.
      target.append_property("INTERFACE_LINK_LIBRARIES", &format!("$<LINK_ONLY:{}>", item), false);
    }
  }

  return Ok(());
}

/*
  target_include_directories(<target> [SYSTEM] [BEFORE|AFTER] <INTERFACE|PUBLIC|PRIVATE> [items...] ...)
  target_compile_definitions(<target> <INTERFACE|PUBLIC|PRIVATE> [items...] ...)
  target_compile_options(<target> [BEFORE] <INTERFACE|PUBLIC|PRIVATE> [items...] ...)
*/
fn target_usage_requirement(
  registry: &mut TargetRegistry,
  arguments: &[&str],
  command_name: &str,
  requirement_description: &str,
  property_name: &str
) -> ReplayResult {
  let (target_name, mut rest) = match arguments.split_first() {
    Some((name, rest)) => (*name, rest),
    None => return Err(format!("{} called with invalid arguments", command_name))
  };

  let target: &mut Target = match registry.find_mut(target_name) {
    Some(found) => found,
    None => return Err(format!(
      "Cannot specify {} for target \"{}\" which is not built by this project.",
      requirement_description,
      target_name
    ))
  };

  let is_include_command: bool = property_name == "INCLUDE_DIRECTORIES";
  let mut is_system: bool = false;
  let mut prepend: bool = false;

  loop {
    match rest.first() {
      Some(&"SYSTEM") if is_include_command => is_system = true,
      Some(&"BEFORE") if property_name != "COMPILE_DEFINITIONS" => prepend = true,
      Some(&"AFTER") if is_include_command => prepend = false,
      _ => break
    }
    rest = &rest[1..];
  }

  let mut scope: Scope = match rest.first().and_then(|keyword| Scope::from_keyword(keyword)) {
    Some(first_scope) => first_scope,
    None => return Err(format!("{} called with invalid arguments", command_name))
  };

  let interface_property_name: String = format!("INTERFACE_{}", property_name);

  for item in rest[1..].iter().copied() {
    if let Some(new_scope) = Scope::from_keyword(item) {
      scope = new_scope;
      continue;
    }

    let value: &str = if property_name == "COMPILE_DEFINITIONS"
      { item.strip_prefix("-D").unwrap_or(item) }
      else { item };

    if value.is_empty() {
      continue;
    }

    if scope.is_build_scope() {
      add_requirement(target, property_name, value, prepend);
    }

    if scope.is_interface_scope() {
      add_requirement(target, &interface_property_name, value, prepend);

      if is_system {
        add_requirement(target, "INTERFACE_SYSTEM_INCLUDE_DIRECTORIES", value, prepend);
      }
    }
  }

  return Ok(());
}

fn add_requirement(target: &mut Target, property_name: &str, value: &str, prepend: bool) {
  if prepend {
    target.prepend_property(property_name, value);
  }
  else {
    target.append_property(property_name, value, false);
  }
}

#[cfg(test)]
mod tests {
  use crate::{genex::Messenger, list_file::parse_string, targets::{TargetRegistry, TargetType}};

  fn replay(source: &str) -> (TargetRegistry, Messenger) {
    let list_file = parse_string(source, "CMakeLists.txt", false).unwrap();
    let mut messenger = Messenger::new(false);
    let registry = TargetRegistry::from_list_file(&list_file, &mut messenger);
    return (registry, messenger);
  }

  #[test]
  fn targets_are_created_with_type_and_sources() {
    let (registry, messenger) = replay(
      "add_executable(app WIN32 main.cpp util.cpp)\n\
       add_library(core SHARED core.cpp)\n\
       add_library(plain plain.cpp)\n\
       add_library(headers INTERFACE)\n"
    );

    assert!(messenger.diagnostics().is_empty());

    let app = registry.find("app").unwrap();
    assert_eq!(app.target_type(), Some(TargetType::Executable));
    assert_eq!(app.property("SOURCES"), Some("main.cpp;util.cpp"));

    assert_eq!(registry.find("core").unwrap().property("TYPE"), Some("SHARED_LIBRARY"));
    assert!(registry.find("plain").unwrap().is_static_library());
    assert_eq!(registry.find("headers").unwrap().property("SOURCES"), None);
  }

  #[test]
  fn target_backtrace_points_at_the_creating_command() {
    let (registry, _) = replay("project(p)\n\nadd_library(core core.cpp)\n");
    let context = registry.find("core").unwrap().backtrace().top().unwrap().clone();

    assert_eq!(context.line, 3);
    assert_eq!(context.name, "add_library");
  }

  #[test]
  fn duplicate_target_is_an_error() {
    let (registry, messenger) = replay("add_library(core a.cpp)\nadd_executable(core main.cpp)\n");

    assert_eq!(messenger.error_count(), 1);
    assert!(messenger.diagnostics()[0].text.contains("another target with the same name already exists"));
    assert!(registry.find("core").unwrap().is_static_library());
  }

  #[test]
  fn alias_targets() {
    let (registry, messenger) = replay(
      "add_library(core a.cpp)\nadd_library(proj::core ALIAS core)\nadd_library(bad::x ALIAS missing)\n"
    );

    assert_eq!(registry.find("proj::core").unwrap().name(), "core");
    assert_eq!(messenger.error_count(), 1);
    assert!(messenger.diagnostics()[0].text.contains("does not already exist"));
  }

  #[test]
  fn property_commands() {
    let (registry, messenger) = replay(
      "add_library(core a.cpp)\n\
       set_target_properties(core PROPERTIES OUTPUT_NAME corelib VERSION 1.2)\n\
       set_property(TARGET core PROPERTY LABELS one two)\n\
       set_property(TARGET core APPEND PROPERTY LABELS three)\n\
       set_property(TARGET core APPEND_STRING PROPERTY LINK_FLAGS \"-a\")\n\
       set_property(TARGET core APPEND_STRING PROPERTY LINK_FLAGS \" -b\")\n\
       set_property(DIRECTORY PROPERTY IGNORED yes)\n"
    );

    assert!(messenger.diagnostics().is_empty());

    let core = registry.find("core").unwrap();
    assert_eq!(core.property("OUTPUT_NAME"), Some("corelib"));
    assert_eq!(core.property("VERSION"), Some("1.2"));
    assert_eq!(core.property("LABELS"), Some("one;two;three"));
    assert_eq!(core.property("LINK_FLAGS"), Some("-a -b"));
  }

  #[test]
  fn property_commands_on_unknown_targets() {
    let (_, messenger) = replay(
      "set_target_properties(ghost PROPERTIES A B)\n\
       set_property(TARGET ghost PROPERTY A B)\n\
       target_link_libraries(ghost core)\n\
       target_include_directories(ghost PUBLIC inc)\n\
       set_target_properties(ghost PROPERTIES A)\n"
    );

    let texts: Vec<&str> = messenger.diagnostics().iter().map(|d| &d.text[..]).collect();
    assert_eq!(texts.len(), 5);
    assert_eq!(texts[0], "set_target_properties Can not find target to add properties to: ghost");
    assert!(texts[1].starts_with("set_property could not find TARGET ghost."));
    assert_eq!(texts[2], "Cannot specify link libraries for target \"ghost\" which is not built by this project.");
    assert_eq!(texts[3], "Cannot specify include directories for target \"ghost\" which is not built by this project.");
    assert_eq!(texts[4], "set_target_properties called with incorrect number of arguments.");
  }

  #[test]
  fn link_scopes_route_items() {
    let (registry, messenger) = replay(
      "add_library(core STATIC a.cpp)\n\
       add_executable(app main.cpp)\n\
       target_link_libraries(core PUBLIC fmt PRIVATE zlib INTERFACE headers)\n\
       target_link_libraries(app core)\n"
    );

    assert!(messenger.diagnostics().is_empty());

    let core = registry.find("core").unwrap();
    assert_eq!(core.property("LINK_LIBRARIES"), Some("fmt;zlib"));
    assert_eq!(core.property("INTERFACE_LINK_LIBRARIES"), Some("fmt;$<LINK_ONLY:zlib>;headers"));

    let app = registry.find("app").unwrap();
    assert_eq!(app.property("LINK_LIBRARIES"), Some("core"));
  }

  #[test]
  fn interface_library_requires_interface_keyword() {
    let (registry, messenger) = replay(
      "add_library(headers INTERFACE)\n\
       target_link_libraries(headers INTERFACE fmt)\n\
       target_link_libraries(headers PUBLIC zlib)\n"
    );

    assert_eq!(messenger.error_count(), 1);
    assert_eq!(registry.find("headers").unwrap().property("INTERFACE_LINK_LIBRARIES"), Some("fmt"));
  }

  #[test]
  fn usage_requirements_route_by_scope() {
    let (registry, messenger) = replay(
      "add_library(core a.cpp)\n\
       target_include_directories(core PUBLIC include PRIVATE src)\n\
       target_include_directories(core SYSTEM INTERFACE third_party)\n\
       target_include_directories(core BEFORE PRIVATE first)\n\
       target_compile_definitions(core PRIVATE -DDEBUG_MODE INTERFACE USE_CORE)\n\
       target_compile_options(core PUBLIC -Wall)\n"
    );

    assert!(messenger.diagnostics().is_empty());

    let core = registry.find("core").unwrap();
    assert_eq!(core.property("INCLUDE_DIRECTORIES"), Some("first;include;src"));
    assert_eq!(core.property("INTERFACE_INCLUDE_DIRECTORIES"), Some("include;third_party"));
    assert_eq!(core.property("INTERFACE_SYSTEM_INCLUDE_DIRECTORIES"), Some("third_party"));
    assert_eq!(core.property("COMPILE_DEFINITIONS"), Some("DEBUG_MODE"));
    assert_eq!(core.property("INTERFACE_COMPILE_DEFINITIONS"), Some("USE_CORE"));
    assert_eq!(core.property("COMPILE_OPTIONS"), Some("-Wall"));
    assert_eq!(core.property("INTERFACE_COMPILE_OPTIONS"), Some("-Wall"));
  }

  #[test]
  fn usage_requirement_without_scope_is_invalid() {
    let (_, messenger) = replay("add_library(core a.cpp)\ntarget_compile_options(core -Wall)\n");

    assert_eq!(messenger.error_count(), 1);
    assert_eq!(messenger.diagnostics()[0].text, "target_compile_options called with invalid arguments");
  }
}
