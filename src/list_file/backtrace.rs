use std::{fmt, rc::Rc};

use super::list_file_types::ListFileFunction;

/// Where a command was invoked: the command name plus the file and line it appears on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFileContext {
  pub name: String,
  pub file_path: String,
  pub line: u32
}

impl ListFileContext {
  pub fn new(
    name: impl Into<String>,
    file_path: impl Into<String>,
    line: u32
  ) -> Self {
    Self {
      name: name.into(),
      file_path: file_path.into(),
      line
    }
  }

  pub fn from_function(function: &ListFileFunction) -> Self {
    Self::new(function.name(), function.file_path(), function.line())
  }

  pub fn location(&self) -> String {
    if self.line > 0 {
      format!("{}:{}", self.file_path, self.line)
    }
    else {
      self.file_path.clone()
    }
  }
}

impl fmt::Display for ListFileContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.name.is_empty() {
      write!(f, "{}", self.location())
    }
    else {
      write!(f, "{} ({})", self.location(), self.name)
    }
  }
}

#[derive(Debug)]
struct BacktraceEntry {
  context: ListFileContext,
  parent: Option<Rc<BacktraceEntry>>
}

/*
  An immutable stack of call contexts. Pushing returns a new backtrace which shares
  every older entry with the one it was pushed onto, so cloning is cheap and a
  backtrace can be stored on anything that needs to report where it came from.
*/
#[derive(Debug, Clone, Default)]
pub struct ListFileBacktrace {
  top: Option<Rc<BacktraceEntry>>
}

impl ListFileBacktrace {
  pub fn empty() -> Self {
    Self { top: None }
  }

  pub fn from_context(context: ListFileContext) -> Self {
    Self::empty().push(context)
  }

  pub fn push(&self, context: ListFileContext) -> Self {
    Self {
      top: Some(Rc::new(BacktraceEntry {
        context,
        parent: self.top.clone()
      }))
    }
  }

  pub fn pop(&self) -> Self {
    Self {
      top: self.top.as_ref().and_then(|entry| entry.parent.clone())
    }
  }

  pub fn top(&self) -> Option<&ListFileContext> {
    self.top.as_ref().map(|entry| &entry.context)
  }

  pub fn is_empty(&self) -> bool {
    self.top.is_none()
  }

  /// Contexts from the most recent call outward.
  pub fn frames(&self) -> Vec<&ListFileContext> {
    let mut all_frames: Vec<&ListFileContext> = Vec::new();
    let mut current: Option<&Rc<BacktraceEntry>> = self.top.as_ref();

    while let Some(entry) = current {
      all_frames.push(&entry.context);
      current = entry.parent.as_ref();
    }

    return all_frames;
  }
}
