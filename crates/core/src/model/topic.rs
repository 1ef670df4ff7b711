use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown topic: {raw}")]
pub struct TopicParseError {
    pub raw: String,
}

/// Quiz category offered to the user and sent to the question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Math,
    Science,
    GeneralKnowledge,
}

impl Topic {
    /// All topics in display order.
    pub const ALL: [Topic; 3] = [Topic::Math, Topic::Science, Topic::GeneralKnowledge];

    /// User-facing name, also used verbatim in question requests.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Topic::Math => "Math",
            Topic::Science => "Science",
            Topic::GeneralKnowledge => "General Knowledge",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "math" => Ok(Topic::Math),
            "science" => Ok(Topic::Science),
            "general knowledge" => Ok(Topic::GeneralKnowledge),
            _ => Err(TopicParseError { raw: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for topic in Topic::ALL {
            assert_eq!(topic.label().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn parse_accepts_slug_forms() {
        assert_eq!(
            "general-knowledge".parse::<Topic>().unwrap(),
            Topic::GeneralKnowledge
        );
        assert_eq!(" SCIENCE ".parse::<Topic>().unwrap(), Topic::Science);
    }

    #[test]
    fn parse_rejects_unknown_topic() {
        let err = "History".parse::<Topic>().unwrap_err();
        assert_eq!(err.raw, "History");
    }
}
