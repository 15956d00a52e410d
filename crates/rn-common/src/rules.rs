use std::ops::Range;

use regex::Regex;

/// One entry of an ordered pattern table.
///
/// Patterns are compiled case-insensitive. When `unless` is present, a pattern
/// match only counts if no guard match overlaps or touches it, so one guarded
/// phrase does not hide an unguarded one elsewhere in the text.
#[derive(Debug, Clone)]
pub struct Rule<T> {
    pub name: &'static str,
    pub pattern: Regex,
    pub unless: Option<Regex>,
    pub label: T,
}

impl<T> Rule<T> {
    pub fn new(name: &'static str, pattern: &str, label: T) -> Self {
        Self {
            name,
            pattern: compile(pattern),
            unless: None,
            label,
        }
    }

    pub fn unless(mut self, guard: &str) -> Self {
        self.unless = Some(compile(guard));
        self
    }

    pub fn matches(&self, text: &str) -> bool {
        let Some(guard) = &self.unless else {
            return self.pattern.is_match(text);
        };

        let guarded: Vec<Range<usize>> = guard.find_iter(text).map(|m| m.range()).collect();
        self.pattern.find_iter(text).any(|m| {
            !guarded
                .iter()
                .any(|g| g.start <= m.end() && m.start() <= g.end)
        })
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).unwrap()
}

/// Ordered rule list evaluated first-match-wins.
#[derive(Debug, Clone)]
pub struct RuleTable<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleTable<T> {
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { rules }
    }

    pub fn first_match(&self, text: &str) -> Option<&Rule<T>> {
        if text.trim().is_empty() {
            return None;
        }

        self.rules.iter().find(|rule| rule.matches(text))
    }

    pub fn matches_any(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule<T>> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: Clone> RuleTable<T> {
    pub fn label_for(&self, text: &str) -> Option<T> {
        self.first_match(text).map(|rule| rule.label.clone())
    }
}
