use std::{collections::BTreeMap, fmt};

///
/// ErrorTree
///
/// Route-keyed error aggregation. Validation keeps going after the first
/// failure so every offending class is reported in one pass.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_message(message: impl ToString) -> Self {
        let mut tree = Self::new();
        tree.add(message);

        tree
    }

    pub fn add(&mut self, message: impl ToString) {
        self.messages.push(message.to_string());
    }

    /// Add a message under a child route.
    pub fn add_for(&mut self, route: &str, message: impl ToString) {
        self.children
            .entry(route.to_string())
            .or_default()
            .add(message);
    }

    /// Merge another tree under a child route, skipping empty trees.
    pub fn merge_for(&mut self, route: &str, other: Self) {
        if other.is_empty() {
            return;
        }

        let child = self.children.entry(route.to_string()).or_default();
        child.messages.extend(other.messages);
        for (key, grandchild) in other.children {
            child.merge_for(&key, grandchild);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// Flatten into `(route, message)` pairs, routes joined with `.`.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }
        for (key, child) in &self.children {
            let route = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            child.flatten_into(&route, out);
        }
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .flatten()
            .into_iter()
            .map(|(route, message)| {
                if route.is_empty() {
                    message
                } else {
                    format!("{route}: {message}")
                }
            })
            .collect::<Vec<_>>();

        write!(f, "{}", lines.join("; "))
    }
}

impl From<String> for ErrorTree {
    fn from(message: String) -> Self {
        Self::from_message(message)
    }
}

/// Push a formatted message onto an `ErrorTree`.
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}
