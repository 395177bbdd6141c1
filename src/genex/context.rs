use crate::{
  list_file::ListFileBacktrace,
  logger::{self, MessageType}
};

#[derive(Debug, Clone)]
pub struct Diagnostic {
  pub message_type: MessageType,
  pub text: String,
  pub backtrace: ListFileBacktrace
}

impl Diagnostic {
  pub fn formatted(&self) -> String {
    logger::format_message(self.message_type, &self.text, &self.backtrace)
  }
}

/// Collects every diagnostic issued during configuration, optionally echoing them as they arrive.
#[derive(Debug, Default)]
pub struct Messenger {
  diagnostics: Vec<Diagnostic>,
  echo: bool
}

impl Messenger {
  pub fn new(echo: bool) -> Self {
    Self {
      diagnostics: Vec::new(),
      echo
    }
  }

  pub fn issue_message(
    &mut self,
    message_type: MessageType,
    text: impl Into<String>,
    backtrace: ListFileBacktrace
  ) {
    let diagnostic = Diagnostic {
      message_type,
      text: text.into(),
      backtrace
    };

    if self.echo {
      logger::issue_message(diagnostic.message_type, &diagnostic.text, &diagnostic.backtrace);
    }

    self.diagnostics.push(diagnostic);
  }

  pub fn diagnostics(&self) -> &Vec<Diagnostic> {
    &self.diagnostics
  }

  pub fn error_count(&self) -> usize {
    return self.diagnostics
      .iter()
      .filter(|diagnostic| diagnostic.message_type.is_error())
      .count();
  }
}

/*
  State shared by every step of one top-level generator expression evaluation.
  'had_error' is sticky. Nothing unwinds when an error is reported, so evaluators check
  the flag after each recursive step and stop expanding once it is set.
*/
pub struct EvaluationContext<'m> {
  pub head_target: String,
  pub backtrace: ListFileBacktrace,
  pub quiet: bool,
  pub had_error: bool,
  messenger: &'m mut Messenger
}

impl<'m> EvaluationContext<'m> {
  pub fn new(
    head_target: impl Into<String>,
    backtrace: ListFileBacktrace,
    messenger: &'m mut Messenger
  ) -> Self {
    Self {
      head_target: head_target.into(),
      backtrace,
      quiet: false,
      had_error: false,
      messenger
    }
  }

  pub fn quiet(mut self, quiet: bool) -> Self {
    self.quiet = quiet;
    self
  }

  pub fn issue_message(
    &mut self,
    message_type: MessageType,
    text: impl Into<String>,
    backtrace: ListFileBacktrace
  ) {
    self.messenger.issue_message(message_type, text, backtrace);
  }

  /// Reports a problem with a single expression at the context's backtrace.
  pub fn report_error(&mut self, expression: &str, reason: &str) {
    self.had_error = true;

    if self.quiet {
      return;
    }

    let text: String = format!(
      "Error evaluating generator expression:\n\n  {}\n\n{}",
      expression,
      reason
    );

    let backtrace: ListFileBacktrace = self.backtrace.clone();
    self.issue_message(MessageType::FatalError, text, backtrace);
  }
}
