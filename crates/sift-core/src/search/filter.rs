//! Inclusion/exclusion filter expressions.
//!
//! Filters are written as `;`-separated entries where a leading `!` excludes
//! the entry: `Help;!Talk` keeps `Help` and drops `Talk`. Blank entries and a
//! bare `!` are ignored. An entry that is both included and excluded is
//! excluded.

/// Parsed form of a filter expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterList {
    pub included: Vec<String>,
    pub excluded: Vec<String>,
}

impl FilterList {
    /// Parse an id filter (owners, uploaders). Entries are compared exactly.
    pub fn ids(expr: Option<&str>) -> Self {
        Self::parse(expr, str::to_string)
    }

    /// Parse a namespace filter. Entries are lowercased so that comparisons
    /// against stored namespaces can be case-insensitive.
    pub fn namespaces(expr: Option<&str>) -> Self {
        Self::parse(expr, str::to_lowercase)
    }

    fn parse(expr: Option<&str>, normalize: impl Fn(&str) -> String) -> Self {
        let mut list = Self::default();
        let Some(expr) = expr else {
            return list;
        };

        for entry in expr.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (target, value) = match entry.strip_prefix('!') {
                Some(rest) => (&mut list.excluded, rest.trim()),
                None => (&mut list.included, entry),
            };
            if value.is_empty() {
                continue;
            }
            let value = normalize(value);
            if !target.contains(&value) {
                target.push(value);
            }
        }

        list
    }

    /// No entries at all, in either direction
    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }

    /// True when the filter includes exactly `name` and nothing else
    pub fn names_only(&self, name: &str) -> bool {
        matches!(self.included.as_slice(), [only] if only.eq_ignore_ascii_case(name))
    }

    /// Whether `value` passes the filter. `value` must already be normalized
    /// the same way the entries were.
    pub fn allows(&self, value: Option<&str>) -> bool {
        let included = self.included.is_empty()
            || value.is_some_and(|v| self.included.iter().any(|e| e == v));
        let excluded = value.is_some_and(|v| self.excluded.iter().any(|e| e == v));
        included && !excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_inclusions_and_exclusions() {
        let list = FilterList::namespaces(Some(" Help ;!Talk;;  ; ! ;help"));
        assert_eq!(
            list,
            FilterList {
                included: vec!["help".to_string()],
                excluded: vec!["talk".to_string()],
            }
        );
    }

    #[test]
    fn ids_keep_case() {
        let list = FilterList::ids(Some("Alice;!Bob"));
        assert_eq!(list.included, vec!["Alice"]);
        assert_eq!(list.excluded, vec!["Bob"]);
    }

    #[test]
    fn missing_expression_is_empty() {
        assert!(FilterList::ids(None).is_empty());
        assert!(FilterList::ids(Some(" ; ;")).is_empty());
        assert!(FilterList::ids(None).allows(None));
    }

    #[test]
    fn allows_respects_both_lists() {
        let list = FilterList::namespaces(Some("Help;!Talk"));
        assert!(list.allows(Some("help")));
        assert!(!list.allows(Some("talk")));
        assert!(!list.allows(Some("wiki")));
        assert!(!list.allows(None));

        let exclude_only = FilterList::ids(Some("!bob"));
        assert!(exclude_only.allows(Some("alice")));
        assert!(exclude_only.allows(None));
        assert!(!exclude_only.allows(Some("bob")));
    }

    #[test]
    fn exclusion_wins_over_inclusion() {
        let list = FilterList::ids(Some("alice;!alice"));
        assert!(!list.allows(Some("alice")));
        assert!(!list.allows(Some("bob")));
    }

    #[test]
    fn names_only_requires_single_entry() {
        assert!(FilterList::namespaces(Some("FILE")).names_only("File"));
        assert!(FilterList::namespaces(Some("File;!Talk")).names_only("File"));
        assert!(!FilterList::namespaces(Some("File;Help")).names_only("File"));
        assert!(!FilterList::namespaces(Some("!File")).names_only("File"));
    }
}
