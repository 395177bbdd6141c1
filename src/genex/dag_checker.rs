use std::{cell::RefCell, collections::{HashMap, HashSet}};

use crate::{list_file::ListFileBacktrace, logger::MessageType};

use super::{context::EvaluationContext, parser::GenexContent, transitive::TransitiveProperty};

const GENEX_EVAL_PREFIXES: [&'static str; 2] = ["TARGET_GENEX_EVAL:", "GENEX_EVAL:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DagCheckResult {
  Dag,
  // The immediate parent reads the same (target, property) pair.
  SelfReference,
  // An older ancestor reads the same pair.
  CyclicReference,
  // Not a cycle, but this pair was already expanded while evaluating the same
  // transitive usage requirement. Expanding it again can't add anything new.
  AlreadySeen
}

/*
  One frame of the chain built while generator expressions read target properties.
  Each frame borrows its parent, so the chain mirrors the evaluation call stack and a
  frame can never outlive the frames above it.

  The check against the ancestors happens once, in new(). The root frame also keeps the
  set of (target, property) pairs expanded so far beneath it; that set is the only
  thing in the chain that changes after construction.
*/
pub struct DagChecker<'a> {
  parent: Option<&'a DagChecker<'a>>,
  target: String,
  property: String,
  content: Option<&'a GenexContent>,
  backtrace: ListFileBacktrace,
  check_result: DagCheckResult,
  transitive_properties_only: bool,
  seen: RefCell<HashMap<String, HashSet<String>>>
}

impl<'a> DagChecker<'a> {
  pub fn new(
    backtrace: ListFileBacktrace,
    target: impl Into<String>,
    property: impl Into<String>,
    content: Option<&'a GenexContent>,
    parent: Option<&'a DagChecker<'a>>
  ) -> Self {
    let mut checker = Self {
      parent,
      target: target.into(),
      property: property.into(),
      content,
      backtrace,
      check_result: DagCheckResult::Dag,
      transitive_properties_only: false,
      seen: RefCell::new(HashMap::new())
    };

    checker.check_result = checker.compute_check_result();
    return checker;
  }

  fn compute_check_result(&self) -> DagCheckResult {
    let graph_result: DagCheckResult = self.check_graph();

    if graph_result != DagCheckResult::Dag {
      return graph_result;
    }

    let top: &DagChecker = self.top();

    if top.transitive_property().is_some() {
      let mut seen = top.seen.borrow_mut();
      let seen_properties: &mut HashSet<String> = seen
        .entry(self.target.clone())
        .or_default();

      if !seen_properties.insert(self.property.clone()) {
        return DagCheckResult::AlreadySeen;
      }
    }

    return DagCheckResult::Dag;
  }

  fn check_graph(&self) -> DagCheckResult {
    let mut is_immediate_parent: bool = true;
    let mut current: Option<&DagChecker> = self.parent;

    while let Some(ancestor) = current {
      if ancestor.target == self.target && ancestor.property == self.property {
        return if is_immediate_parent
          { DagCheckResult::SelfReference }
          else { DagCheckResult::CyclicReference };
      }

      is_immediate_parent = false;
      current = ancestor.parent;
    }

    return DagCheckResult::Dag;
  }

  /// False when this frame closes a loop. Callers must stop expanding the branch.
  pub fn check(&self) -> bool {
    match self.check_result {
      DagCheckResult::Dag | DagCheckResult::AlreadySeen => true,
      DagCheckResult::SelfReference | DagCheckResult::CyclicReference => false
    }
  }

  pub fn check_result(&self) -> DagCheckResult {
    self.check_result
  }

  pub fn report_error(&self, context: &mut EvaluationContext, expression: &str) {
    if self.check() {
      return;
    }

    context.had_error = true;

    if context.quiet {
      return;
    }

    if let Some(parent) = self.parent {
      if parent.parent.is_none() {
        let text: String = format!(
          "Error evaluating generator expression:\n\n  {}\n\nSelf reference on target \"{}\".",
          expression,
          context.head_target
        );

        context.issue_message(MessageType::FatalError, text, parent.backtrace.clone());
        return;
      }
    }

    let loop_found_text: String = format!(
      "Error evaluating generator expression:\n\n  {}\n\nDependency loop found.",
      expression
    );
    let context_backtrace: ListFileBacktrace = context.backtrace.clone();
    context.issue_message(MessageType::FatalError, loop_found_text, context_backtrace);

    let mut loop_step: usize = 1;
    let mut current: Option<&DagChecker> = self.parent;

    while let Some(frame) = current {
      let frame_expression: &str = frame.content
        .map(|content| content.original_expression())
        .unwrap_or(expression);

      context.issue_message(
        MessageType::FatalError,
        format!("Loop step {}\n\n  {}\n", loop_step, frame_expression),
        frame.backtrace.clone()
      );

      current = frame.parent;
      loop_step += 1;
    }
  }

  pub fn parent(&self) -> Option<&'a DagChecker<'a>> {
    self.parent
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn property(&self) -> &str {
    &self.property
  }

  pub fn backtrace(&self) -> &ListFileBacktrace {
    &self.backtrace
  }

  pub fn top(&self) -> &DagChecker<'_> {
    let mut top: &DagChecker<'_> = self;

    while let Some(parent) = top.parent {
      top = parent;
    }

    return top;
  }

  pub fn top_target(&self) -> &str {
    &self.top().target
  }

  pub fn transitive_property(&self) -> Option<TransitiveProperty> {
    TransitiveProperty::from_property_name(&self.property)
  }

  /// Marks a link interface evaluation done only to collect usage requirements.
  /// $<LINK_ONLY:...> entries evaluate to nothing beneath such a root.
  pub fn set_transitive_properties_only(&mut self, value: bool) {
    self.transitive_properties_only = value;
  }

  pub fn transitive_properties_only(&self) -> bool {
    self.top().transitive_properties_only
  }

  pub fn evaluating_genex_expression(&self) -> bool {
    return GENEX_EVAL_PREFIXES
      .iter()
      .any(|prefix| self.property.starts_with(prefix));
  }

  /*
    With a target, only true while that target's own LINK_LIBRARIES is the root.
    Without one, true while any kind of link interface is the root.
  */
  pub fn evaluating_link_libraries(&self, target: Option<&str>) -> bool {
    let top: &DagChecker = self.top();
    let property: &str = &top.property;

    if let Some(target_name) = target {
      return top.target == target_name && property == "LINK_LIBRARIES";
    }

    return property == "LINK_LIBRARIES"
      || property == "INTERFACE_LINK_LIBRARIES"
      || property == "INTERFACE_LINK_LIBRARIES_DIRECT"
      || property == "LINK_INTERFACE_LIBRARIES"
      || property == "IMPORTED_LINK_INTERFACE_LIBRARIES"
      || property.starts_with("LINK_INTERFACE_LIBRARIES_")
      || property.starts_with("IMPORTED_LINK_INTERFACE_LIBRARIES_");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{genex::{context::Messenger, parser::{parse_genex, GenexNode}}, list_file::ListFileContext};

  fn backtrace_at(line: u32) -> ListFileBacktrace {
    ListFileBacktrace::from_context(ListFileContext::new("add_library", "CMakeLists.txt", line))
  }

  fn parsed_content(expression: &str) -> GenexContent {
    match parse_genex(expression).remove(0) {
      GenexNode::Expression(content) => content,
      other => panic!("expected an expression, got {:?}", other)
    }
  }

  #[test]
  fn self_reference_reports_once() {
    let mut messenger = Messenger::new(false);
    let f1 = DagChecker::new(backtrace_at(1), "T", "P", None, None);
    let f2 = DagChecker::new(backtrace_at(2), "T", "P", None, Some(&f1));

    assert!(!f2.check());
    assert_eq!(f2.check_result(), DagCheckResult::SelfReference);

    {
      let mut context = EvaluationContext::new("T", backtrace_at(9), &mut messenger);
      f2.report_error(&mut context, "$<TARGET_PROPERTY:T,P>");
      assert!(context.had_error);
    }

    let diagnostics = messenger.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].text.contains("Self reference on target \"T\"."));
    assert!(!diagnostics[0].text.contains("Dependency loop"));
    assert_eq!(diagnostics[0].backtrace.top().unwrap().line, 1);
  }

  #[test]
  fn general_cycle_reports_every_loop_step() {
    let mut messenger = Messenger::new(false);
    let f1_content = parsed_content("$<TARGET_PROPERTY:T,P>");
    let f2_content = parsed_content("$<TARGET_PROPERTY:U,Q>");

    let f0 = DagChecker::new(backtrace_at(1), "Root", "R", None, None);
    let f1 = DagChecker::new(backtrace_at(2), "T", "P", Some(&f1_content), Some(&f0));
    let f2 = DagChecker::new(backtrace_at(3), "U", "Q", Some(&f2_content), Some(&f1));
    let f3 = DagChecker::new(backtrace_at(4), "T", "P", None, Some(&f2));

    assert!(f0.check() && f1.check() && f2.check());
    assert!(!f3.check());
    assert_eq!(f3.check_result(), DagCheckResult::CyclicReference);

    {
      let mut context = EvaluationContext::new("Root", backtrace_at(9), &mut messenger);
      f3.report_error(&mut context, "$<TARGET_PROPERTY:T,P>");
    }

    let texts: Vec<&str> = messenger.diagnostics().iter().map(|d| &d.text[..]).collect();
    assert_eq!(texts.len(), 4);
    assert!(texts[0].ends_with("Dependency loop found."));
    assert_eq!(messenger.diagnostics()[0].backtrace.top().unwrap().line, 9);
    assert_eq!(texts[1], "Loop step 1\n\n  $<TARGET_PROPERTY:U,Q>\n");
    assert_eq!(texts[2], "Loop step 2\n\n  $<TARGET_PROPERTY:T,P>\n");
    // f0 has no recorded content, so the reported expression stands in for it.
    assert_eq!(texts[3], "Loop step 3\n\n  $<TARGET_PROPERTY:T,P>\n");
    assert_eq!(messenger.diagnostics()[1].backtrace.top().unwrap().line, 3);
  }

  #[test]
  fn acyclic_chain_reports_nothing() {
    let mut messenger = Messenger::new(false);
    let f1 = DagChecker::new(backtrace_at(1), "A", "P", None, None);
    let f2 = DagChecker::new(backtrace_at(2), "B", "P", None, Some(&f1));
    let f3 = DagChecker::new(backtrace_at(3), "A", "Q", None, Some(&f2));

    assert!(f1.check() && f2.check() && f3.check());

    {
      let mut context = EvaluationContext::new("A", backtrace_at(9), &mut messenger);
      f3.report_error(&mut context, "$<TARGET_PROPERTY:A,Q>");
      assert!(!context.had_error);
    }

    assert!(messenger.diagnostics().is_empty());
  }

  #[test]
  fn check_is_stable() {
    let f1 = DagChecker::new(backtrace_at(1), "T", "INCLUDE_DIRECTORIES", None, None);
    let f2 = DagChecker::new(backtrace_at(2), "T", "INCLUDE_DIRECTORIES", None, Some(&f1));

    for _ in 0..3 {
      assert!(f1.check());
      assert!(!f2.check());
    }
  }

  #[test]
  fn quiet_context_sets_flag_without_messages() {
    let mut messenger = Messenger::new(false);
    let f1 = DagChecker::new(backtrace_at(1), "T", "P", None, None);
    let f2 = DagChecker::new(backtrace_at(2), "T", "P", None, Some(&f1));

    {
      let mut context = EvaluationContext::new("T", backtrace_at(9), &mut messenger).quiet(true);
      f2.report_error(&mut context, "$<TARGET_PROPERTY:T,P>");
      assert!(context.had_error);
    }

    assert!(messenger.diagnostics().is_empty());
  }

  #[test]
  fn transitive_pairs_are_only_expanded_once() {
    let root = DagChecker::new(backtrace_at(1), "app", "INCLUDE_DIRECTORIES", None, None);
    let via_b = DagChecker::new(backtrace_at(2), "b", "INTERFACE_INCLUDE_DIRECTORIES", None, Some(&root));
    let d_from_b = DagChecker::new(backtrace_at(3), "d", "INTERFACE_INCLUDE_DIRECTORIES", None, Some(&via_b));
    let via_c = DagChecker::new(backtrace_at(4), "c", "INTERFACE_INCLUDE_DIRECTORIES", None, Some(&root));
    let d_from_c = DagChecker::new(backtrace_at(5), "d", "INTERFACE_INCLUDE_DIRECTORIES", None, Some(&via_c));

    assert_eq!(d_from_b.check_result(), DagCheckResult::Dag);
    assert_eq!(d_from_c.check_result(), DagCheckResult::AlreadySeen);
    assert!(d_from_c.check());
  }

  #[test]
  fn non_transitive_roots_never_dedupe() {
    let root = DagChecker::new(backtrace_at(1), "app", "OUTPUT_NAME", None, None);
    let first = DagChecker::new(backtrace_at(2), "d", "X", None, Some(&root));
    let second = DagChecker::new(backtrace_at(3), "d", "X", None, Some(&root));

    assert_eq!(first.check_result(), DagCheckResult::Dag);
    assert_eq!(second.check_result(), DagCheckResult::Dag);
  }

  #[test]
  fn chain_queries() {
    let root = DagChecker::new(backtrace_at(1), "app", "LINK_LIBRARIES", None, None);
    let genex_eval = DagChecker::new(backtrace_at(2), "app", "GENEX_EVAL:$<1:x>", None, Some(&root));

    assert_eq!(genex_eval.top_target(), "app");
    assert!(genex_eval.evaluating_genex_expression());
    assert!(!root.evaluating_genex_expression());
    assert!(genex_eval.evaluating_link_libraries(None));
    assert!(genex_eval.evaluating_link_libraries(Some("app")));
    assert!(!genex_eval.evaluating_link_libraries(Some("other")));
    assert!(!genex_eval.transitive_properties_only());
  }

  #[test]
  fn transitive_only_flag_is_read_from_the_root() {
    let mut root = DagChecker::new(backtrace_at(1), "lib", "INTERFACE_LINK_LIBRARIES", None, None);
    root.set_transitive_properties_only(true);
    let child = DagChecker::new(backtrace_at(2), "lib", "GENEX_EVAL:x", None, Some(&root));

    assert!(child.transitive_properties_only());
    assert!(root.transitive_properties_only());
  }
}
