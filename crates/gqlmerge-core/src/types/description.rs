use serde::{Deserialize, Serialize};

/// The source form a description was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionStyle {
    /// `"""…"""`
    Block,
    /// `"…"`
    Quoted,
    /// One or more `#` comment lines.
    Comment,
}

/// Documentation attached to a definition or member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Description {
    pub text: String,
    pub style: DescriptionStyle,
}

impl Description {
    pub fn block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: DescriptionStyle::Block,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: DescriptionStyle::Quoted,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: DescriptionStyle::Comment,
        }
    }

    /// Returns true if the text has no visible content.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// How a later, differing description on the same item is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptionPolicy {
    /// The first non-blank description is kept; later ones are dropped.
    #[default]
    FirstWins,
    /// Later non-blank descriptions that differ are appended after a blank line.
    Append,
}

/// Folds `incoming` into `existing` according to `policy`.
///
/// A missing or blank existing description is always replaced.
pub fn merge_description(
    existing: &mut Option<Description>,
    incoming: Option<&Description>,
    policy: DescriptionPolicy,
) {
    let Some(incoming) = incoming.filter(|d| !d.is_blank()) else {
        return;
    };
    match existing {
        Some(current) if !current.is_blank() => {
            if policy == DescriptionPolicy::Append && !carries(current, incoming) {
                current.text.push_str("\n\n");
                current.text.push_str(&incoming.text);
            }
        }
        _ => *existing = Some(incoming.clone()),
    }
}

/// True when `incoming` is already the whole of `current` or one of the
/// blocks appended to it.
fn carries(current: &Description, incoming: &Description) -> bool {
    current.text == incoming.text || current.text.split("\n\n").any(|block| block == incoming.text)
}
