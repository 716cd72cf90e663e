//! Make-compatible script document.
//!
//! A [`Script`] is an ordered list of comments and [`Rule`]s. Rendering is
//! a pure function of that list, so identical inputs give byte-identical
//! output.

use std::fmt;

/// One rule: a target, its prerequisites and the recipe lines that build it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
  pub target: String,
  pub prerequisites: Vec<String>,
  pub recipe: Vec<String>,
  /// Declared `.PHONY`; the target names no file.
  pub phony: bool,
}

impl Rule {
  pub fn new(target: impl Into<String>) -> Self {
    Self {
      target: target.into(),
      ..Default::default()
    }
  }

  pub fn phony(target: impl Into<String>) -> Self {
    Self {
      phony: true,
      ..Self::new(target)
    }
  }

  pub fn prerequisite(mut self, prerequisite: impl Into<String>) -> Self {
    self.prerequisites.push(prerequisite.into());
    self
  }

  pub fn prerequisites<I, S>(mut self, prerequisites: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.prerequisites.extend(prerequisites.into_iter().map(Into::into));
    self
  }

  pub fn command(mut self, line: impl Into<String>) -> Self {
    self.recipe.push(line.into());
    self
  }

  pub fn has_prerequisite(&self, prerequisite: &str) -> bool {
    self.prerequisites.iter().any(|p| p == prerequisite)
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.phony {
      writeln!(f, ".PHONY: {}", self.target)?;
    }

    write!(f, "{}:", self.target)?;
    for prerequisite in &self.prerequisites {
      write!(f, " {prerequisite}")?;
    }
    writeln!(f)?;

    for line in &self.recipe {
      writeln!(f, "\t{line}")?;
    }

    Ok(())
  }
}

/// A top-level entry of the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
  Comment(String),
  Rule(Rule),
}

impl fmt::Display for Item {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Comment(text) => writeln!(f, "# {text}"),
      Self::Rule(rule) => write!(f, "{rule}"),
    }
  }
}

/// The complete script: a header comment followed by blank-line separated items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
  header: String,
  items: Vec<Item>,
}

impl Script {
  pub fn new(header: impl Into<String>) -> Self {
    Self {
      header: header.into(),
      items: Vec::new(),
    }
  }

  pub fn comment(&mut self, text: impl Into<String>) {
    self.items.push(Item::Comment(text.into()));
  }

  pub fn push(&mut self, rule: Rule) {
    self.items.push(Item::Rule(rule));
  }

  pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) {
    self.items.extend(rules.into_iter().map(Item::Rule));
  }

  /// Rules in emission order.
  pub fn rules(&self) -> impl Iterator<Item = &Rule> {
    self.items.iter().filter_map(|item| match item {
      Item::Rule(rule) => Some(rule),
      Item::Comment(_) => None,
    })
  }

  pub fn rule(&self, target: &str) -> Option<&Rule> {
    self.rules().find(|rule| rule.target == target)
  }

  /// Emission index of the rule for `target` among all rules.
  pub fn position(&self, target: &str) -> Option<usize> {
    self.rules().position(|rule| rule.target == target)
  }
}

impl fmt::Display for Script {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "# {}", self.header)?;
    for item in &self.items {
      writeln!(f)?;
      write!(f, "{item}")?;
    }
    Ok(())
  }
}
