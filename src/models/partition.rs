use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One partition: its name, value description and optional comment.
///
/// The description is interpreted by the partitioning variant: a
/// comma-separated value list for LIST, an upper bound for RANGE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comment: String,
}

impl Partition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            comment: comment.into(),
        }
    }

    /// A partition addressed by name only, enough for drop and truncate
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.description.is_empty() {
            write!(f, "={}", self.description)?;
        }
        if !self.comment.is_empty() {
            write!(f, "#{}", self.comment)?;
        }
        Ok(())
    }
}

/// Parses `NAME[=DESCRIPTION][#COMMENT]`
impl FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, comment) = match s.split_once('#') {
            Some((head, comment)) => (head, comment.trim()),
            None => (s, ""),
        };
        let (name, description) = match head.split_once('=') {
            Some((name, description)) => (name.trim(), description.trim()),
            None => (head.trim(), ""),
        };

        if name.is_empty() {
            return Err(format!("partition name is empty in `{}`", s));
        }

        Ok(Partition::new(name, description, comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_only() {
        let p: Partition = "p1".parse().unwrap();
        assert_eq!(p, Partition::named("p1"));
    }

    #[test]
    fn test_parse_full() {
        let p: Partition = "p20100101=2010-01-01 00:00:00#first day".parse().unwrap();
        assert_eq!(p.name, "p20100101");
        assert_eq!(p.description, "2010-01-01 00:00:00");
        assert_eq!(p.comment, "first day");
        assert_eq!(p.to_string(), "p20100101=2010-01-01 00:00:00#first day");
    }

    #[test]
    fn test_parse_list_values() {
        let p: Partition = "e00003=3,4".parse().unwrap();
        assert_eq!(p.description, "3,4");
        assert!(p.comment.is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_name() {
        assert!("=1".parse::<Partition>().is_err());
        assert!("".parse::<Partition>().is_err());
    }
}
