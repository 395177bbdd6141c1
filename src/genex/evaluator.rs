use std::{
  cell::RefCell,
  collections::HashSet,
  mem
};

use regex::Regex;

use crate::targets::{Target, TargetRegistry};

use super::{
  context::EvaluationContext,
  dag_checker::{DagCheckResult, DagChecker},
  parser::{contains_genex, parse_genex, GenexContent, GenexNode},
  transitive::TransitiveProperty
};

lazy_static! {
  static ref TARGET_NAME_REGEX: Regex = new_regex_or_panic("^[A-Za-z0-9_.:+-]+$");
  static ref PROPERTY_NAME_REGEX: Regex = new_regex_or_panic("^[A-Za-z0-9_]+$");
}

fn new_regex_or_panic(regex_str: &str) -> Regex {
  return match Regex::new(regex_str) {
    Ok(r) => r,
    Err(failure_error) => panic!("{}", failure_error)
  }
}

const FALSE_CONSTANTS: [&'static str; 8] = ["", "0", "OFF", "NO", "FALSE", "N", "IGNORE", "NOTFOUND"];

fn is_off(value: &str) -> bool {
  let upper: String = value.to_uppercase();
  return FALSE_CONSTANTS.iter().any(|constant| *constant == upper) || upper.ends_with("-NOTFOUND");
}

fn bool_str(value: bool) -> String {
  String::from(if value { "1" } else { "0" })
}

fn count_word(count: usize) -> String {
  match count {
    1 => String::from("one parameter"),
    2 => String::from("two parameters"),
    3 => String::from("three parameters"),
    other => format!("{} parameters", other)
  }
}

fn join_non_empty(first: String, second: String) -> String {
  if first.is_empty() {
    return second;
  }
  if second.is_empty() {
    return first;
  }
  return format!("{};{}", first, second);
}

/// Evaluates generator expressions against the targets of one configured project.
pub struct GenexEvaluator<'r> {
  registry: &'r TargetRegistry,
  // (target, link property) pairs whose link list is being evaluated right now.
  link_lists_in_progress: RefCell<HashSet<(String, String)>>
}

impl<'r> GenexEvaluator<'r> {
  pub fn new(registry: &'r TargetRegistry) -> Self {
    Self {
      registry,
      link_lists_in_progress: RefCell::new(HashSet::new())
    }
  }

  pub fn evaluate(
    &self,
    input: &str,
    context: &mut EvaluationContext,
    dag_checker: Option<&DagChecker>
  ) -> String {
    if !contains_genex(input) {
      return input.to_string();
    }

    let nodes: Vec<GenexNode> = parse_genex(input);
    return self.evaluate_nodes(&nodes, context, dag_checker);
  }

  /// Shorthand for evaluating $<TARGET_PROPERTY:target,property>.
  pub fn evaluate_target_property(
    &self,
    target_name: &str,
    property_name: &str,
    context: &mut EvaluationContext
  ) -> String {
    let expression: String = format!("$<TARGET_PROPERTY:{},{}>", target_name, property_name);
    return self.evaluate(&expression, context, None);
  }

  fn evaluate_nodes(
    &self,
    nodes: &[GenexNode],
    context: &mut EvaluationContext,
    dag_checker: Option<&DagChecker>
  ) -> String {
    let mut result: String = String::new();

    for node in nodes {
      match node {
        GenexNode::Text(text) => result.push_str(text),
        GenexNode::Expression(content) => {
          let value: String = self.evaluate_content(content, context, dag_checker);

          if context.had_error {
            return String::new();
          }

          result.push_str(&value);
        }
      }
    }

    return result;
  }

  fn evaluate_content(
    &self,
    content: &GenexContent,
    context: &mut EvaluationContext,
    dag_checker: Option<&DagChecker>
  ) -> String {
    let identifier: String = self.evaluate_nodes(content.identifier(), context, dag_checker);

    if context.had_error {
      return String::new();
    }

    // $<0:...> discards its content without evaluating it.
    if identifier == "0" {
      return String::new();
    }

    let mut parameters: Vec<String> = Vec::new();

    for parameter in content.parameters() {
      parameters.push(self.evaluate_nodes(parameter, context, dag_checker));

      if context.had_error {
        return String::new();
      }
    }

    let expression: &str = content.original_expression();

    match identifier.as_str() {
      "1" => parameters.join(","),
      "ANGLE-R" | "COMMA" | "SEMICOLON" => {
        if !content.parameters().is_empty() {
          context.report_error(expression, &format!("$<{}> expression requires no parameters.", identifier));
          return String::new();
        }

        return String::from(match identifier.as_str() {
          "ANGLE-R" => ">",
          "COMMA" => ",",
          _ => ";"
        });
      },
      "BOOL" => {
        if !expect_parameter_count(context, expression, &identifier, &parameters, 1) {
          return String::new();
        }
        return bool_str(!is_off(&parameters[0]));
      },
      "NOT" => {
        if !expect_parameter_count(context, expression, &identifier, &parameters, 1) {
          return String::new();
        }

        match parameters[0].as_str() {
          "0" => String::from("1"),
          "1" => String::from("0"),
          _ => {
            context.report_error(expression, "$<NOT> parameter must resolve to exactly one '0' or '1' value.");
            String::new()
          }
        }
      },
      "AND" | "OR" => self.evaluate_boolean_operator(&identifier, &parameters, expression, context),
      "IF" => {
        if !expect_parameter_count(context, expression, &identifier, &parameters, 3) {
          return String::new();
        }

        match parameters[0].as_str() {
          "1" => parameters[1].clone(),
          "0" => parameters[2].clone(),
          _ => {
            context.report_error(expression, "First parameter to $<IF> must resolve to exactly one '0' or '1' value.");
            String::new()
          }
        }
      },
      "STREQUAL" => {
        if !expect_parameter_count(context, expression, &identifier, &parameters, 2) {
          return String::new();
        }
        return bool_str(parameters[0] == parameters[1]);
      },
      "TARGET_EXISTS" | "TARGET_NAME_IF_EXISTS" => {
        if !expect_parameter_count(context, expression, &identifier, &parameters, 1) {
          return String::new();
        }

        let target_name: &str = &parameters[0];

        if !TARGET_NAME_REGEX.is_match(target_name) {
          context.report_error(
            expression,
            &format!("$<{}:tgt> expression requires a non-empty valid target name.", identifier)
          );
          return String::new();
        }

        let exists: bool = self.registry.contains(target_name);

        if identifier == "TARGET_EXISTS" {
          return bool_str(exists);
        }

        return if exists { target_name.to_string() } else { String::new() };
      },
      "LINK_ONLY" => {
        if !expect_parameter_count(context, expression, &identifier, &parameters, 1) {
          return String::new();
        }

        match dag_checker {
          None => {
            context.report_error(expression, "$<LINK_ONLY:...> may only be used for linking");
            String::new()
          },
          Some(checker) if checker.transitive_properties_only() => String::new(),
          Some(_) => parameters[0].clone()
        }
      },
      "TARGET_PROPERTY" => self.evaluate_target_property_node(&parameters, content, context, dag_checker),
      "GENEX_EVAL" => {
        let dependent_expression: String = parameters.join(",");
        let head_target: String = context.head_target.clone();
        return self.evaluate_dependent_expression(
          &identifier,
          &dependent_expression,
          &head_target,
          content,
          context,
          dag_checker
        );
      },
      "TARGET_GENEX_EVAL" => {
        if parameters.len() < 2 {
          context.report_error(expression, "$<TARGET_GENEX_EVAL> expression requires two parameters.");
          return String::new();
        }

        let target_name: &str = &parameters[0];

        if !TARGET_NAME_REGEX.is_match(target_name) {
          context.report_error(
            expression,
            "$<TARGET_GENEX_EVAL:tgt, ...> expression requires a non-empty valid target name."
          );
          return String::new();
        }

        if !self.registry.contains(target_name) {
          context.report_error(
            expression,
            &format!("$<TARGET_GENEX_EVAL:tgt, ...> target \"{}\" not found.", target_name)
          );
          return String::new();
        }

        let dependent_expression: String = parameters[1..].join(",");
        return self.evaluate_dependent_expression(
          &identifier,
          &dependent_expression,
          target_name,
          content,
          context,
          dag_checker
        );
      },
      _ => {
        context.report_error(expression, "Expression did not evaluate to a known generator expression");
        String::new()
      }
    }
  }

  fn evaluate_boolean_operator(
    &self,
    identifier: &str,
    parameters: &[String],
    expression: &str,
    context: &mut EvaluationContext
  ) -> String {
    if parameters.is_empty() {
      context.report_error(expression, &format!("$<{}> expression requires at least one parameter.", identifier));
      return String::new();
    }

    if parameters.iter().any(|param| param != "0" && param != "1") {
      context.report_error(
        expression,
        &format!("Parameters to $<{}> must resolve to either '0' or '1'.", identifier)
      );
      return String::new();
    }

    let short_circuit_value: &str = if identifier == "AND" { "0" } else { "1" };

    if parameters.iter().any(|param| param == short_circuit_value) {
      return short_circuit_value.to_string();
    }

    return bool_str(identifier == "AND");
  }

  fn evaluate_dependent_expression(
    &self,
    operator: &str,
    dependent_expression: &str,
    head_target: &str,
    content: &GenexContent,
    context: &mut EvaluationContext,
    dag_checker: Option<&DagChecker>
  ) -> String {
    if !contains_genex(dependent_expression) {
      return dependent_expression.to_string();
    }

    if head_target.is_empty() {
      return self.evaluate(dependent_expression, context, dag_checker);
    }

    let frame = DagChecker::new(
      context.backtrace.clone(),
      head_target,
      format!("{}:{}", operator, dependent_expression),
      Some(content),
      dag_checker
    );

    if !frame.check() {
      frame.report_error(context, content.original_expression());
      return String::new();
    }

    return self.evaluate_with_head_target(dependent_expression, head_target, context, Some(&frame));
  }

  fn evaluate_target_property_node(
    &self,
    parameters: &[String],
    content: &GenexContent,
    context: &mut EvaluationContext,
    dag_checker: Option<&DagChecker>
  ) -> String {
    let expression: &str = content.original_expression();

    if parameters.len() != 1 && parameters.len() != 2 {
      context.report_error(expression, "$<TARGET_PROPERTY:...> expression requires one or two parameters");
      return String::new();
    }

    let target_name: String;
    let property_name: String;

    if parameters.len() == 1 {
      if context.head_target.is_empty() {
        context.report_error(
          expression,
          "$<TARGET_PROPERTY:prop>  may only be used with binary targets.  It may not be used with add_custom_command or add_custom_target.  Specify the target to read a property from using the $<TARGET_PROPERTY:tgt,prop> signature instead."
        );
        return String::new();
      }

      target_name = context.head_target.clone();
      property_name = parameters[0].clone();
    }
    else {
      if parameters[0].is_empty() && parameters[1].is_empty() {
        context.report_error(expression, "$<TARGET_PROPERTY:tgt,prop> expression requires a non-empty target name and property name.");
        return String::new();
      }

      if parameters[0].is_empty() {
        context.report_error(expression, "$<TARGET_PROPERTY:tgt,prop> expression requires a non-empty target name.");
        return String::new();
      }

      if !TARGET_NAME_REGEX.is_match(&parameters[0]) {
        let reason: &str = if PROPERTY_NAME_REGEX.is_match(&parameters[1])
          { "Target name not supported." }
          else { "Target name and property name not supported." };

        context.report_error(expression, reason);
        return String::new();
      }

      target_name = parameters[0].clone();
      property_name = parameters[1].clone();
    }

    if property_name.is_empty() {
      context.report_error(expression, "$<TARGET_PROPERTY:...> expression requires a non-empty property name.");
      return String::new();
    }

    if !PROPERTY_NAME_REGEX.is_match(&property_name) {
      context.report_error(expression, "Property name not supported.");
      return String::new();
    }

    let target: &Target = match self.registry.find(&target_name) {
      Some(found) => found,
      None => {
        context.report_error(expression, &format!("Target \"{}\" not found.", target_name));
        return String::new();
      }
    };

    return self.read_target_property(target, &property_name, Some(content), dag_checker, context);
  }

  /*
    Reads one property through a new DAG checker frame. Self references are errors.
    Longer cycles are skipped without an error, since usage requirements can loop back
    through the link graph. Reading a usage requirement also collects the INTERFACE_
    version of it from everything the target links.
  */
  fn read_target_property(
    &self,
    target: &Target,
    property_name: &str,
    content: Option<&GenexContent>,
    parent: Option<&DagChecker>,
    context: &mut EvaluationContext
  ) -> String {
    let expression: &str = content
      .map(|found| found.original_expression())
      .unwrap_or(property_name);

    let transitive: Option<TransitiveProperty> = TransitiveProperty::from_property_name(property_name);

    if property_name == "LINKER_LANGUAGE" {
      let evaluating_links: bool = parent
        .map(|checker| checker.evaluating_link_libraries(None))
        .unwrap_or(false);

      if evaluating_links && target.is_static_library() {
        context.report_error(
          expression,
          "LINKER_LANGUAGE target property can not be used while evaluating link libraries for a static library"
        );
        return String::new();
      }
    }

    let frame = DagChecker::new(
      context.backtrace.clone(),
      target.name(),
      property_name,
      content,
      parent
    );

    match frame.check_result() {
      DagCheckResult::SelfReference => {
        frame.report_error(context, expression);
        return String::new();
      },
      DagCheckResult::CyclicReference => return String::new(),
      DagCheckResult::AlreadySeen if transitive.is_some() => return String::new(),
      DagCheckResult::AlreadySeen | DagCheckResult::Dag => ()
    }

    if let Some(parent_frame) = parent {
      if !parent_frame.evaluating_genex_expression()
        && parent_frame.evaluating_link_libraries(None)
        && transitive.is_some()
      {
        context.report_error(
          expression,
          "$<TARGET_PROPERTY:...> expression in link libraries evaluation depends on target property which is transitive over the link libraries, creating a recursion."
        );
        return String::new();
      }
    }

    let raw_value: Option<&str> = target.property(property_name);

    // Only usage requirements are evaluated. Anything else is returned as written,
    // which is what $<GENEX_EVAL:...> is for.
    let transitive_property: TransitiveProperty = match transitive {
      Some(found) => found,
      None => return raw_value.unwrap_or("").to_string()
    };

    let is_interface_property: bool = TransitiveProperty::is_interface_property(property_name);

    // Interface properties are evaluated on behalf of whoever consumes them.
    let head_target: String = if is_interface_property && !context.head_target.is_empty()
      { context.head_target.clone() }
      else { target.name().to_string() };

    let value: String = match raw_value {
      Some(raw) => self.evaluate_with_head_target(raw, &head_target, context, Some(&frame)),
      None => String::new()
    };

    if context.had_error {
      return String::new();
    }

    let linked_content: String = self.linked_targets_content(
      target,
      &transitive_property.interface_property_name(),
      is_interface_property,
      content,
      &frame,
      context
    );

    if context.had_error {
      return String::new();
    }

    return join_non_empty(value, linked_content);
  }

  fn linked_targets_content(
    &self,
    target: &Target,
    interface_property_name: &str,
    from_link_interface: bool,
    content: Option<&GenexContent>,
    frame: &DagChecker,
    context: &mut EvaluationContext
  ) -> String {
    let link_property: &str = if from_link_interface
      { "INTERFACE_LINK_LIBRARIES" }
      else { "LINK_LIBRARIES" };

    let raw_libraries: &str = match target.property(link_property) {
      Some(raw) => raw,
      None => return String::new()
    };

    // A link list which reaches back into itself (through $<GENEX_EVAL:...>) starts a
    // fresh chain every time, so re-entry has to be cut here.
    let link_key: (String, String) = (target.name().to_string(), link_property.to_string());

    if !self.link_lists_in_progress.borrow_mut().insert(link_key.clone()) {
      return String::new();
    }

    // Link libraries get their own chain, like any other link interface computation.
    let mut link_root = DagChecker::new(
      context.backtrace.clone(),
      target.name(),
      link_property,
      None,
      None
    );
    link_root.set_transitive_properties_only(true);

    let libraries: String = self.evaluate_with_head_target(raw_libraries, target.name(), context, Some(&link_root));
    self.link_lists_in_progress.borrow_mut().remove(&link_key);

    if context.had_error {
      return String::new();
    }

    let mut linked_values: Vec<String> = Vec::new();

    for library_name in libraries.split(';').filter(|item| !item.is_empty()) {
      if library_name == target.name() {
        continue;
      }

      let library: &Target = match self.registry.find(library_name) {
        Some(found) => found,
        None => continue
      };

      let value: String = self.read_target_property(library, interface_property_name, content, Some(frame), context);

      if context.had_error {
        return String::new();
      }

      if !value.is_empty() {
        linked_values.push(value);
      }
    }

    return linked_values.join(";");
  }

  fn evaluate_with_head_target(
    &self,
    input: &str,
    head_target: &str,
    context: &mut EvaluationContext,
    dag_checker: Option<&DagChecker>
  ) -> String {
    let previous_head: String = mem::replace(&mut context.head_target, head_target.to_string());
    let value: String = self.evaluate(input, context, dag_checker);
    context.head_target = previous_head;
    return value;
  }
}

fn expect_parameter_count(
  context: &mut EvaluationContext,
  expression: &str,
  identifier: &str,
  parameters: &[String],
  expected: usize
) -> bool {
  if parameters.len() == expected {
    return true;
  }

  context.report_error(
    expression,
    &format!("$<{}> expression requires exactly {}.", identifier, count_word(expected))
  );
  return false;
}
