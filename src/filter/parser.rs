//! List query parser
//!
//! Turns command-line tokens into a [`ListQuery`].
//!
//! # Grammar
//!
//! ```text
//! query := token*
//! token := key ":" value | key "=" value | word
//! key   := status | type | dinas | approval | change | by
//! ```
//!
//! Words are joined with spaces into one free-text search. A value of `all`
//! clears that constraint.
//!
//! # Examples
//!
//! ```text
//! status:Approved type:major core switch
//! dinas="Dinas Kominfo" status:assigned
//! ```

use crate::utils::fuzzy::closest_match;

/// Categorical filter keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Status,
    Type,
    Dinas,
    Approval,
    Change,
    By,
}

impl FilterKey {
    pub const ALL: [FilterKey; 6] = [
        FilterKey::Status,
        FilterKey::Type,
        FilterKey::Dinas,
        FilterKey::Approval,
        FilterKey::Change,
        FilterKey::By,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Status => "status",
            FilterKey::Type => "type",
            FilterKey::Dinas => "dinas",
            FilterKey::Approval => "approval",
            FilterKey::Change => "change",
            FilterKey::By => "by",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

/// Parsed list filters. `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub text: Option<String>,
    pub status: Option<String>,
    pub change_type: Option<String>,
    pub dinas: Option<String>,
    pub approval: Option<String>,
    pub change: Option<String>,
    pub changed_by: Option<String>,
}

impl ListQuery {
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Status => self.status.as_deref(),
            FilterKey::Type => self.change_type.as_deref(),
            FilterKey::Dinas => self.dinas.as_deref(),
            FilterKey::Approval => self.approval.as_deref(),
            FilterKey::Change => self.change.as_deref(),
            FilterKey::By => self.changed_by.as_deref(),
        }
    }

    fn slot(&mut self, key: FilterKey) -> &mut Option<String> {
        match key {
            FilterKey::Status => &mut self.status,
            FilterKey::Type => &mut self.change_type,
            FilterKey::Dinas => &mut self.dinas,
            FilterKey::Approval => &mut self.approval,
            FilterKey::Change => &mut self.change,
            FilterKey::By => &mut self.changed_by,
        }
    }

    /// Reject keys that a list does not support
    pub fn ensure_keys(&self, allowed: &[FilterKey], list_name: &str) -> Result<(), String> {
        for key in FilterKey::ALL {
            if self.get(key).is_some() && !allowed.contains(&key) {
                let names: Vec<&str> = allowed.iter().map(FilterKey::as_str).collect();
                let supported = if names.is_empty() { "none".to_string() } else { names.join(", ") };
                return Err(format!(
                    "Filter '{}' does not apply to {}. Supported filters: {}",
                    key.as_str(),
                    list_name,
                    supported
                ));
            }
        }
        Ok(())
    }
}

/// Parse query tokens
pub fn parse_query(tokens: &[String]) -> Result<ListQuery, String> {
    let mut query = ListQuery::default();
    let mut words: Vec<&str> = Vec::new();

    for token in tokens {
        let Some((key, value)) = split_key_value(token) else {
            if !token.trim().is_empty() {
                words.push(token.trim());
            }
            continue;
        };

        let key = FilterKey::from_str(&key.to_lowercase()).ok_or_else(|| unknown_key(key))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("Filter '{}' needs a value", key.as_str()));
        }
        *query.slot(key) = if value.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(value.to_string())
        };
    }

    if !words.is_empty() {
        query.text = Some(words.join(" "));
    }
    Ok(query)
}

/// `key:value` or `key=value`, where key is a plain word. Anything else
/// (`10:30`, `http://...`) is free text.
fn split_key_value(token: &str) -> Option<(&str, &str)> {
    let index = token.find([':', '='])?;
    let (key, rest) = token.split_at(index);
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }
    let value = &rest[1..];
    if value.starts_with("//") {
        return None;
    }
    Some((key, value))
}

fn unknown_key(key: &str) -> String {
    let names: Vec<&str> = FilterKey::ALL.iter().map(FilterKey::as_str).collect();
    match closest_match(&key.to_lowercase(), &names, 3) {
        Some(suggestion) => format!("Unknown filter '{}'. Did you mean '{}'?", key, suggestion),
        None => format!("Unknown filter '{}'. Valid filters: {}", key, names.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(parse_query(&[]).unwrap(), ListQuery::default());
    }

    #[test]
    fn test_keys_and_text() {
        let q = parse_query(&tokens(&["status:Approved", "core", "type=MAJOR", "switch"])).unwrap();
        assert_eq!(q.status.as_deref(), Some("Approved"));
        assert_eq!(q.change_type.as_deref(), Some("MAJOR"));
        assert_eq!(q.text.as_deref(), Some("core switch"));
    }

    #[test]
    fn test_all_clears_constraint() {
        let q = parse_query(&tokens(&["status:all", "dinas:ALL"])).unwrap();
        assert!(q.status.is_none());
        assert!(q.dinas.is_none());
    }

    #[test]
    fn test_unknown_key_suggests() {
        let err = parse_query(&tokens(&["stauts:open"])).unwrap_err();
        assert_eq!(err, "Unknown filter 'stauts'. Did you mean 'status'?");
        let err = parse_query(&tokens(&["priority:high"])).unwrap_err();
        assert!(err.contains("Valid filters"));
    }

    #[test]
    fn test_non_key_colons_are_text() {
        let q = parse_query(&tokens(&["10:30", "http://host"])).unwrap();
        assert_eq!(q.text.as_deref(), Some("10:30 http://host"));
    }

    #[test]
    fn test_missing_value() {
        assert!(parse_query(&tokens(&["status:"])).is_err());
    }

    #[test]
    fn test_ensure_keys() {
        let q = parse_query(&tokens(&["dinas:A"])).unwrap();
        assert!(q.ensure_keys(&[FilterKey::Dinas], "patch jobs").is_ok());
        let err = q.ensure_keys(&[FilterKey::Status], "emergencies").unwrap_err();
        assert_eq!(err, "Filter 'dinas' does not apply to emergencies. Supported filters: status");
    }
}
