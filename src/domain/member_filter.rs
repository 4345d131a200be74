use std::collections::HashSet;

use super::Member;

pub const ROLE_OPTIONS: [&str; 4] = ["Member", "Lead", "Admin", "Co Lead"];

pub const DOMAIN_OPTIONS: [&str; 7] = [
    "App Dev",
    "Web Dev",
    "AI/ML",
    "Marketing",
    "Content Writing",
    "Graphic Designing",
    "Cyber Security",
];

/// Directory search: a name query plus optional role and domain filters.
/// `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub query: String,
    pub role: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryStats {
    pub total: usize,
    pub shown: usize,
    pub unique_roles: usize,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        let query = self.query.to_lowercase();
        member.name.to_lowercase().contains(&query)
            && equals_ignore_case(self.role.as_deref(), &member.role)
            && equals_ignore_case(self.domain.as_deref(), &member.domain)
    }

    pub fn apply(&self, members: &[Member]) -> Vec<Member> {
        members
            .iter()
            .filter(|member| self.matches(member))
            .cloned()
            .collect()
    }

    pub fn stats(&self, members: &[Member]) -> DirectoryStats {
        let shown = self.apply(members);
        let unique_roles = shown
            .iter()
            .map(|member| member.role.as_str())
            .collect::<HashSet<_>>()
            .len();

        DirectoryStats {
            total: members.len(),
            shown: shown.len(),
            unique_roles,
        }
    }
}

fn equals_ignore_case(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        Some(wanted) => wanted.to_lowercase() == actual.to_lowercase(),
        None => true,
    }
}
