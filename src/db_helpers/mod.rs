mod comment_helpers;
mod post_helpers;
mod user_helpers;
mod vote_helpers;

pub use comment_helpers::*;
pub use post_helpers::*;
pub use user_helpers::*;
pub use vote_helpers::*;

/// Accumulates `SET` assignments for a partial update and renders
/// `UPDATE <table> SET a = ?, b = ? WHERE id = ?`. Columns with no incoming
/// value are left untouched. The caller binds the returned params in order,
/// then the id.
struct UpdateBuilder {
    table: &'static str,
    assignments: Vec<&'static str>,
    params: Vec<String>,
}

impl UpdateBuilder {
    fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            params: Vec::new(),
        }
    }

    fn set(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.assignments.push(column);
            self.params.push(value);
        }
        self
    }

    /// Returns `None` when nothing was set, so callers can skip the round trip.
    fn build(self) -> Option<(String, Vec<String>)> {
        if self.assignments.is_empty() {
            return None;
        }
        let assignments = self
            .assignments
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "UPDATE {} SET {} WHERE id = ?",
            self.table, assignments
        );
        Some((query, self.params))
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateBuilder;

    #[test]
    fn renders_only_the_columns_that_were_set() {
        let (query, params) = UpdateBuilder::new("user")
            .set("email", Some("amy@x.com".to_string()))
            .set("username", None)
            .set("password", Some("hash".to_string()))
            .build()
            .unwrap();
        assert_eq!(query, "UPDATE user SET email = ?, password = ? WHERE id = ?");
        assert_eq!(params, vec!["amy@x.com".to_string(), "hash".to_string()]);
    }

    #[test]
    fn empty_update_builds_nothing() {
        assert!(UpdateBuilder::new("user").set("email", None).build().is_none());
    }
}
