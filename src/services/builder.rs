// Partition clause builders for the LIST and RANGE variants
use crate::error::{PartitionError, Result};
use crate::models::{Partition, PartitionKind, CATCH_ALL_PARTITION_VALUE};
use regex::Regex;

/// Renders `PARTITION <name> VALUES IN (<description>)`
#[derive(Debug, Clone, Default)]
pub struct ListBuilder;

impl ListBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, partition: &Partition) -> Result<String> {
        require_description(partition)?;

        let part = format!(
            "PARTITION {} VALUES IN ({})",
            partition.name, partition.description
        );
        Ok(with_comment(part, &partition.comment))
    }
}

/// Renders `PARTITION <name> VALUES LESS THAN (<bound>)`
#[derive(Debug, Clone)]
pub struct RangeBuilder {
    number: Regex,
}

impl RangeBuilder {
    pub fn new() -> Self {
        Self {
            number: Regex::new(r"^[0-9]+$").expect("integer pattern is valid"),
        }
    }

    pub fn render(&self, partition: &Partition) -> Result<String> {
        require_description(partition)?;

        let part = format!(
            "PARTITION {} VALUES LESS THAN ({})",
            partition.name,
            self.quote_bound(&partition.description)
        );
        Ok(with_comment(part, &partition.comment))
    }

    /// Integers, `MAXVALUE` and function calls go through as-is; anything
    /// else (dates, strings) becomes a quoted literal.
    pub fn quote_bound(&self, description: &str) -> String {
        if self.number.is_match(description)
            || description == CATCH_ALL_PARTITION_VALUE
            || description.contains('(')
        {
            description.to_string()
        } else {
            format!("'{}'", description)
        }
    }

    /// `PARTITION <name> VALUES LESS THAN (MAXVALUE)`
    pub fn catch_all_clause(&self, name: &str) -> Result<String> {
        self.render(&Self::catch_all_partition(name))
    }

    pub fn catch_all_partition(name: &str) -> Partition {
        Partition::new(name, CATCH_ALL_PARTITION_VALUE, "")
    }
}

impl Default for RangeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Clause builder chosen by the partitioner
#[derive(Debug, Clone)]
pub enum PartBuilder {
    List(ListBuilder),
    Range(RangeBuilder),
}

impl PartBuilder {
    pub fn for_kind(kind: PartitionKind) -> Self {
        match kind {
            PartitionKind::List => PartBuilder::List(ListBuilder::new()),
            PartitionKind::Range => PartBuilder::Range(RangeBuilder::new()),
        }
    }

    pub fn kind(&self) -> PartitionKind {
        match self {
            PartBuilder::List(_) => PartitionKind::List,
            PartBuilder::Range(_) => PartitionKind::Range,
        }
    }

    pub fn render(&self, partition: &Partition) -> Result<String> {
        match self {
            PartBuilder::List(builder) => builder.render(partition),
            PartBuilder::Range(builder) => builder.render(partition),
        }
    }
}

fn require_description(partition: &Partition) -> Result<()> {
    if partition.description.is_empty() {
        return Err(PartitionError::MissingDescription {
            name: partition.name.clone(),
        });
    }
    Ok(())
}

// Quotes are stripped, not escaped
fn with_comment(part: String, comment: &str) -> String {
    if comment.is_empty() {
        part
    } else {
        format!("{} COMMENT = '{}'", part, comment.replace('\'', ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_render() {
        let list = ListBuilder::new();
        let part = list.render(&Partition::new("p1", "1", "")).unwrap();
        assert_eq!(part, "PARTITION p1 VALUES IN (1)");
    }

    #[test]
    fn test_list_render_with_comment() {
        let list = ListBuilder::new();
        let part = list
            .render(&Partition::new("p1122", "1122", "test1122"))
            .unwrap();
        assert_eq!(part, "PARTITION p1122 VALUES IN (1122) COMMENT = 'test1122'");
    }

    #[test]
    fn test_comment_quotes_are_stripped() {
        let list = ListBuilder::new();
        let part = list
            .render(&Partition::new("p2", "2, 3", "it's 'two'"))
            .unwrap();
        assert_eq!(part, "PARTITION p2 VALUES IN (2, 3) COMMENT = 'its two'");
    }

    #[test]
    fn test_missing_description() {
        let err = ListBuilder::new().render(&Partition::named("p1")).unwrap_err();
        assert!(matches!(err, PartitionError::MissingDescription { name } if name == "p1"));

        let err = RangeBuilder::new().render(&Partition::named("p2")).unwrap_err();
        assert!(matches!(err, PartitionError::MissingDescription { name } if name == "p2"));
    }

    #[test]
    fn test_range_render_quotes_dates() {
        let range = RangeBuilder::new();
        let part = range
            .render(&Partition::new("p20100101", "2010-01-01", ""))
            .unwrap();
        assert_eq!(part, "PARTITION p20100101 VALUES LESS THAN ('2010-01-01')");
    }

    #[test]
    fn test_range_render_raw_bounds() {
        let range = RangeBuilder::new();
        assert_eq!(
            range.render(&Partition::new("p111", "111", "test111")).unwrap(),
            "PARTITION p111 VALUES LESS THAN (111) COMMENT = 'test111'"
        );
        assert_eq!(
            range
                .render(&Partition::new("p20100101", "TO_DAYS('2010-01-01')", ""))
                .unwrap(),
            "PARTITION p20100101 VALUES LESS THAN (TO_DAYS('2010-01-01'))"
        );
        assert_eq!(
            range.catch_all_clause("pmax").unwrap(),
            "PARTITION pmax VALUES LESS THAN (MAXVALUE)"
        );
    }

    #[test]
    fn test_range_quote_bound_edge_cases() {
        let range = RangeBuilder::new();
        // Signs and decimals are not pure integers
        assert_eq!(range.quote_bound("-1"), "'-1'");
        assert_eq!(range.quote_bound("1.5"), "'1.5'");
        // Sentinel match is exact
        assert_eq!(range.quote_bound("maxvalue"), "'maxvalue'");
        assert_eq!(range.quote_bound("0042"), "0042");
    }

    #[test]
    fn test_render_is_deterministic() {
        let builder = PartBuilder::for_kind(PartitionKind::Range);
        let partition = Partition::new("p1", "2020-01-01", "first");
        assert_eq!(
            builder.render(&partition).unwrap(),
            builder.render(&partition).unwrap()
        );
        assert_eq!(builder.kind(), PartitionKind::Range);
    }
}
