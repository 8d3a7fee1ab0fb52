//! Admin e-mail allow-list

use std::collections::HashSet;

/// Set of e-mail addresses granted the admin role at sign-in.
///
/// Matching ignores case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();

        Self { emails }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_case_insensitively() {
        let admins = AdminAllowList::new(["TheShubhamChowdhury01@gmail.com"]);

        assert!(admins.contains("theshubhamchowdhury01@gmail.com"));
        assert!(admins.contains("  THESHUBHAMCHOWDHURY01@GMAIL.COM "));
        assert!(!admins.contains("someone@gmail.com"));
    }

    #[test]
    fn test_blank_entries_ignored() {
        let admins = AdminAllowList::new(["", "  ", "a@b.in"]);

        assert_eq!(admins.len(), 1);
        assert!(!admins.contains(""));
    }

    #[test]
    fn test_empty_list() {
        let admins = AdminAllowList::default();
        assert!(admins.is_empty());
        assert!(!admins.contains("admin@example.com"));
    }
}
