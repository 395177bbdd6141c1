use std::process::exit;
use colored::Colorize;

use crate::list_file::ListFileBacktrace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
  FatalError,
  Warning,
  AuthorWarning
}

impl MessageType {
  pub fn title(&self) -> &'static str {
    match self {
      MessageType::FatalError => "CMake Error",
      MessageType::Warning => "CMake Warning",
      MessageType::AuthorWarning => "CMake Warning (dev)"
    }
  }

  pub fn is_error(&self) -> bool {
    *self == MessageType::FatalError
  }
}

pub fn warn(message: impl AsRef<str>) {
  println!(
    "{}: {}",
    "Warning".yellow(),
    message.as_ref()
  );
}

pub fn error(message: impl AsRef<str>) {
  eprintln!(
    "{}: {}",
    "Error".red(),
    message.as_ref()
  );
}

pub fn exit_error_log(error_message: impl AsRef<str>) -> ! {
  error(error_message);
  exit(1);
}

/*
  Formats a message the way CMake prints it:

    CMake Error at CMakeLists.txt:12 (add_library):
      <message, every line indented>
    Call Stack (most recent call first):
      cmake/helpers.cmake:3 (include)
*/
pub fn format_message(
  message_type: MessageType,
  text: &str,
  backtrace: &ListFileBacktrace
) -> String {
  let mut formatted: String = String::new();
  let frames = backtrace.frames();

  match frames.first() {
    Some(top_frame) => formatted.push_str(&format!("{} at {}:", message_type.title(), top_frame)),
    None => formatted.push_str(&format!("{}:", message_type.title()))
  }

  for line in text.trim_end().lines() {
    formatted.push('\n');
    if !line.is_empty() {
      formatted.push_str(&format!("  {}", line));
    }
  }

  if frames.len() > 1 {
    formatted.push_str("\nCall Stack (most recent call first):");
    for frame in frames.iter().skip(1) {
      formatted.push_str(&format!("\n  {}", frame));
    }
  }

  return formatted;
}

pub fn issue_message(
  message_type: MessageType,
  text: &str,
  backtrace: &ListFileBacktrace
) {
  let formatted: String = format_message(message_type, text, backtrace);

  if message_type.is_error() {
    eprintln!("{}\n", formatted.red());
  }
  else {
    eprintln!("{}\n", formatted.yellow());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::list_file::ListFileContext;

  #[test]
  fn message_with_call_stack() {
    let backtrace = ListFileBacktrace::from_context(ListFileContext::new("include", "CMakeLists.txt", 2))
      .push(ListFileContext::new("add_library", "lib.cmake", 7));

    let formatted = format_message(MessageType::FatalError, "first\nsecond\n", &backtrace);

    assert_eq!(
      formatted,
      "CMake Error at lib.cmake:7 (add_library):\n  first\n  second\nCall Stack (most recent call first):\n  CMakeLists.txt:2 (include)"
    );
  }

  #[test]
  fn message_without_backtrace() {
    let formatted = format_message(MessageType::Warning, "careful", &ListFileBacktrace::empty());
    assert_eq!(formatted, "CMake Warning:\n  careful");
  }
}
