use std::io::Write;

use crate::{
  cli_config::CLIEvalInfo,
  config::ToolConfig,
  genex::{EvaluationContext, GenexEvaluator, Messenger},
  list_file::{ListFile, ListFileBacktrace},
  targets::TargetRegistry
};

use super::{load_list_file, ActionError, ActionResult};

/// The value of one evaluation plus every diagnostic issued while producing it.
pub struct PropertyEvaluation {
  pub value: String,
  pub had_error: bool,
  pub messenger: Messenger
}

/*
  Replays the list file's target commands, merges in the YAML targets and evaluates
  $<TARGET_PROPERTY:target,property> with the target as head target. Problems found
  while replaying commands count as errors too.
*/
pub fn evaluate_target_property(
  list_file: &ListFile,
  extra_targets: Option<TargetRegistry>,
  target_name: &str,
  property_name: &str,
  quiet: bool,
  echo_diagnostics: bool
) -> PropertyEvaluation {
  let mut messenger = Messenger::new(echo_diagnostics);
  let mut registry: TargetRegistry = TargetRegistry::from_list_file(list_file, &mut messenger);

  if let Some(yaml_targets) = extra_targets {
    registry.merge(yaml_targets);
  }

  let backtrace: ListFileBacktrace = registry.find(target_name)
    .map(|target| target.backtrace().clone())
    .unwrap_or_else(ListFileBacktrace::empty);

  let replay_error_count: usize = messenger.error_count();
  let value: String;
  let had_error: bool;

  {
    let mut context = EvaluationContext::new(target_name, backtrace, &mut messenger)
      .quiet(quiet);

    value = GenexEvaluator::new(&registry).evaluate_target_property(target_name, property_name, &mut context);
    had_error = context.had_error || replay_error_count > 0;
  }

  return PropertyEvaluation {
    value,
    had_error,
    messenger
  };
}

pub fn evaluate_property_action(
  eval_info: &CLIEvalInfo,
  config: &ToolConfig,
  output: &mut impl Write
) -> ActionResult {
  let list_file: ListFile = load_list_file(&eval_info.input, false)?;

  let extra_targets: Option<TargetRegistry> = match &eval_info.targets_yaml {
    Some(yaml_path) => Some(TargetRegistry::from_yaml_file(yaml_path)?),
    None => None
  };

  let evaluation: PropertyEvaluation = evaluate_target_property(
    &list_file,
    extra_targets,
    &eval_info.target_name,
    &eval_info.property_name,
    eval_info.quiet || config.quiet_genex_errors,
    config.echo_diagnostics
  );

  if evaluation.had_error {
    return Err(ActionError::Evaluation {
      target_name: eval_info.target_name.clone(),
      property_name: eval_info.property_name.clone(),
      error_count: evaluation.messenger.error_count().max(1)
    });
  }

  writeln!(output, "{}", evaluation.value)?;
  return Ok(());
}
