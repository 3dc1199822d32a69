//! Choosing which stores to refresh.
//!
//! Pure matching and parsing; prompting and printing live in the CLI.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::models::DocumentStore;

/// Non-interactive selection flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    /// Full ids or id prefixes.
    pub ids: Vec<String>,
    /// Case-insensitive name substrings.
    pub names: Vec<String>,
    pub all: bool,
}

impl SelectionCriteria {
    pub fn is_empty(&self) -> bool {
        !self.all && self.ids.is_empty() && self.names.is_empty()
    }
}

/// Stores matching the criteria, without duplicates.
///
/// Id matches come first in the order the ids were given, then name matches.
pub fn find_stores_by_criteria(
    stores: &[DocumentStore],
    criteria: &SelectionCriteria,
) -> Vec<DocumentStore> {
    if criteria.all {
        return stores.to_vec();
    }

    let mut picked: Vec<usize> = Vec::new();
    let mut pick = |idx: usize| {
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    };

    for wanted in &criteria.ids {
        for (idx, store) in stores.iter().enumerate() {
            if let Some(id) = store.id.as_deref() {
                if id.starts_with(wanted.as_str()) {
                    pick(idx);
                }
            }
        }
    }

    for wanted in &criteria.names {
        let wanted = wanted.to_lowercase();
        for (idx, store) in stores.iter().enumerate() {
            let name = store.name.as_deref().unwrap_or_default().to_lowercase();
            if name.contains(&wanted) {
                pick(idx);
            }
        }
    }

    picked.into_iter().map(|idx| stores[idx].clone()).collect()
}

/// A token of an interactive selection that was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid range format: {0}")]
    InvalidRangeFormat(String),
    #[error("Invalid selection: {0}")]
    OutOfRange(usize),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result of parsing a selection such as `1,3,5-7` or `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSelection {
    /// Sorted, de-duplicated 1-based indices.
    pub indices: Vec<usize>,
    pub rejected: Vec<SelectionError>,
}

/// Parse a menu selection against `max_index` entries.
pub fn parse_selection(input: &str, max_index: usize) -> ParsedSelection {
    let input = input.trim().to_lowercase();

    if input == "all" {
        return ParsedSelection {
            indices: (1..=max_index).collect(),
            rejected: Vec::new(),
        };
    }

    let mut selected = BTreeSet::new();
    let mut rejected = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some((start, end)) = part.split_once('-') {
            match (start.trim().parse::<usize>(), end.trim().parse::<usize>()) {
                (Ok(start), Ok(end)) if start >= 1 && end <= max_index && start <= end => {
                    selected.extend(start..=end);
                }
                (Ok(_), Ok(_)) => rejected.push(SelectionError::InvalidRange(part.to_string())),
                _ => rejected.push(SelectionError::InvalidRangeFormat(part.to_string())),
            }
        } else {
            match part.parse::<usize>() {
                Ok(n) if (1..=max_index).contains(&n) => {
                    selected.insert(n);
                }
                Ok(n) => rejected.push(SelectionError::OutOfRange(n)),
                Err(_) => rejected.push(SelectionError::InvalidInput(part.to_string())),
            }
        }
    }

    ParsedSelection {
        indices: selected.into_iter().collect(),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: &str, name: &str) -> DocumentStore {
        DocumentStore {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn fixtures() -> Vec<DocumentStore> {
        vec![
            store("abc123-0001", "Product Docs"),
            store("abd999-0002", "HR Handbook"),
            store("fff000-0003", "Docs Archive"),
        ]
    }

    fn ids(stores: &[DocumentStore]) -> Vec<&str> {
        stores.iter().map(|s| s.id_or_unknown()).collect()
    }

    #[test]
    fn test_all_flag_returns_everything() {
        let criteria = SelectionCriteria {
            all: true,
            ids: vec!["nomatch".to_string()],
            ..Default::default()
        };
        assert_eq!(find_stores_by_criteria(&fixtures(), &criteria).len(), 3);
    }

    #[test]
    fn test_id_prefix_and_exact_match() {
        let criteria = SelectionCriteria {
            ids: vec!["ab".to_string(), "fff000-0003".to_string()],
            ..Default::default()
        };
        let found = find_stores_by_criteria(&fixtures(), &criteria);
        assert_eq!(ids(&found), vec!["abc123-0001", "abd999-0002", "fff000-0003"]);
    }

    #[test]
    fn test_name_substring_is_case_insensitive_and_deduplicated() {
        let criteria = SelectionCriteria {
            ids: vec!["fff".to_string()],
            names: vec!["docs".to_string()],
            ..Default::default()
        };
        let found = find_stores_by_criteria(&fixtures(), &criteria);
        assert_eq!(ids(&found), vec!["fff000-0003", "abc123-0001"]);
    }

    #[test]
    fn test_no_match() {
        let criteria = SelectionCriteria {
            names: vec!["finance".to_string()],
            ..Default::default()
        };
        assert!(find_stores_by_criteria(&fixtures(), &criteria).is_empty());
        assert!(SelectionCriteria::default().is_empty());
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_parse_all() {
        let parsed = parse_selection("  ALL ", 4);
        assert_eq!(parsed.indices, vec![1, 2, 3, 4]);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_parse_list_and_ranges() {
        let parsed = parse_selection("5, 1-3,2", 6);
        assert_eq!(parsed.indices, vec![1, 2, 3, 5]);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn test_parse_rejections() {
        let parsed = parse_selection("0,9,x,3-1,1-x,2", 5);
        assert_eq!(parsed.indices, vec![2]);
        assert_eq!(
            parsed.rejected,
            vec![
                SelectionError::OutOfRange(0),
                SelectionError::OutOfRange(9),
                SelectionError::InvalidInput("x".to_string()),
                SelectionError::InvalidRange("3-1".to_string()),
                SelectionError::InvalidRangeFormat("1-x".to_string()),
            ]
        );
        assert_eq!(parsed.rejected[3].to_string(), "Invalid range: 3-1");
    }

    #[test]
    fn test_parse_empty_input() {
        let parsed = parse_selection("", 3);
        assert!(parsed.indices.is_empty());
        assert!(parsed.rejected.is_empty());
    }
}
