use crate::constants::selection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// The kind of request, used to pick a model when no override is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Vector embeddings
    Embed,
    /// Text completion / instruction following
    Generation,
}

impl Task {
    pub fn all() -> &'static [Task] {
        &[Task::Embed, Task::Generation]
    }

    pub fn name(&self) -> &str {
        match self {
            Task::Embed => "embed",
            Task::Generation => "generation",
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A name heuristic: a model whose lower-cased id contains any keyword is a
/// candidate for `task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRule {
    pub task: Task,
    pub keywords: Vec<String>,
}

impl SelectionRule {
    pub fn new(task: Task, keywords: &[&str]) -> Self {
        Self {
            task,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, model: &str) -> bool {
        let lower = model.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Ordered selection rules. For each task the first rule with a matching model
/// wins; within a rule the first model in server order wins. Tasks with no
/// match fall back to the first model listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    rules: Vec<SelectionRule>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                SelectionRule::new(Task::Embed, selection::EMBED_KEYWORDS),
                SelectionRule::new(Task::Generation, selection::GENERATION_KEYWORDS),
            ],
        }
    }
}

impl SelectionPolicy {
    pub fn new(rules: Vec<SelectionRule>) -> Self {
        Self { rules }
    }

    /// Append a rule. It is consulted after the existing rules for its task.
    pub fn with_rule(mut self, rule: SelectionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[SelectionRule] {
        &self.rules
    }

    /// Derive the task map for a model list.
    pub fn assign(&self, models: &[String]) -> HashMap<Task, String> {
        let mut tasks = HashMap::new();
        let Some(first) = models.first() else {
            return tasks;
        };

        for task in Task::all() {
            let picked = self
                .rules
                .iter()
                .filter(|rule| rule.task == *task)
                .find_map(|rule| models.iter().find(|m| rule.matches(m)))
                .unwrap_or(first);
            tasks.insert(*task, picked.clone());
        }

        tasks
    }
}

/// Snapshot of the server's model catalog and the task map derived from it.
///
/// Never mutated once built; a refresh produces a new value.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<String>,
    tasks: HashMap<Task, String>,
    refreshed_at: Option<Instant>,
    refreshed_at_utc: Option<DateTime<Utc>>,
}

impl ModelRegistry {
    /// The never-populated registry.
    pub fn empty() -> Self {
        Self {
            models: Vec::new(),
            tasks: HashMap::new(),
            refreshed_at: None,
            refreshed_at_utc: None,
        }
    }

    /// Build a registry from a freshly discovered model list.
    pub fn discovered(models: Vec<String>, policy: &SelectionPolicy) -> Self {
        let tasks = policy.assign(&models);
        Self {
            models,
            tasks,
            refreshed_at: Some(Instant::now()),
            refreshed_at_utc: Some(Utc::now()),
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn model_for(&self, task: Task) -> Option<&str> {
        self.tasks.get(&task).map(|m| m.as_str())
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    pub fn is_populated(&self) -> bool {
        self.refreshed_at.is_some()
    }

    pub fn age(&self) -> Option<Duration> {
        self.refreshed_at.map(|t| t.elapsed())
    }

    pub fn refreshed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at_utc
    }

    /// A zero TTL means every call refreshes.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        match self.age() {
            None => true,
            Some(_) if ttl.is_zero() => true,
            Some(age) => age > ttl,
        }
    }
}
