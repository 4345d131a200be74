use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::{DocumentId, Role, ValidationError};

lazy_static! {
    static ref ADD_MEMBER: Regex =
        Regex::new(r"^add_member(?:\?memberId=([^&/]*))?$").unwrap();
    static ref MEMBER_DETAIL: Regex =
        Regex::new(r"^member_detail/([^/?]+)/(true|false)$").unwrap();
    static ref ANNOUNCEMENT_DETAIL: Regex =
        Regex::new(r"^announcement_detail/([^/?]+)$").unwrap();
}

/// Every destination in the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    RoleSelection,
    AdminHome,
    MemberHome,
    MemberManagement,
    AnnouncementManagement,
    /// Adds a member, or edits one when an id is given.
    AddMember {
        member_id: Option<DocumentId>,
    },
    PostAnnouncement,
    MemberDetail {
        member_id: DocumentId,
        is_admin: bool,
    },
    AnnouncementDetail {
        announcement_id: DocumentId,
    },
    Settings,
    About,
}

impl Screen {
    /// Route template with `{placeholders}` for arguments.
    pub fn pattern(&self) -> &'static str {
        match self {
            Screen::RoleSelection => "role_selection",
            Screen::AdminHome => "admin_home",
            Screen::MemberHome => "member_home",
            Screen::MemberManagement => "member_management",
            Screen::AnnouncementManagement => "announcement_management",
            Screen::AddMember { .. } => "add_member?memberId={memberId}",
            Screen::PostAnnouncement => "post_announcement",
            Screen::MemberDetail { .. } => {
                "member_detail/{memberId}/{isAdmin}"
            }
            Screen::AnnouncementDetail { .. } => {
                "announcement_detail/{announcementId}"
            }
            Screen::Settings => "settings",
            Screen::About => "about",
        }
    }

    /// Concrete route with arguments filled in.
    pub fn route(&self) -> String {
        match self {
            Screen::AddMember { member_id } => format!(
                "add_member?memberId={}",
                member_id.as_ref().map(DocumentId::as_str).unwrap_or_default()
            ),
            Screen::MemberDetail {
                member_id,
                is_admin,
            } => format!("member_detail/{member_id}/{is_admin}"),
            Screen::AnnouncementDetail { announcement_id } => {
                format!("announcement_detail/{announcement_id}")
            }
            other => other.pattern().to_owned(),
        }
    }

    pub fn parse(route: &str) -> Result<Self, ValidationError> {
        let screen = match route {
            "role_selection" => Screen::RoleSelection,
            "admin_home" => Screen::AdminHome,
            "member_home" => Screen::MemberHome,
            "member_management" => Screen::MemberManagement,
            "announcement_management" => Screen::AnnouncementManagement,
            "post_announcement" => Screen::PostAnnouncement,
            "settings" => Screen::Settings,
            "about" => Screen::About,
            _ => return Self::parse_with_arguments(route),
        };
        Ok(screen)
    }

    fn parse_with_arguments(route: &str) -> Result<Self, ValidationError> {
        if let Some(captures) = ADD_MEMBER.captures(route) {
            let member_id = match captures.get(1).map(|m| m.as_str()) {
                None | Some("") => None,
                Some(id) => Some(DocumentId::parse(id)?),
            };
            return Ok(Screen::AddMember { member_id });
        }

        if let Some(captures) = MEMBER_DETAIL.captures(route) {
            return Ok(Screen::MemberDetail {
                member_id: DocumentId::parse(&captures[1])?,
                is_admin: &captures[2] == "true",
            });
        }

        if let Some(captures) = ANNOUNCEMENT_DETAIL.captures(route) {
            return Ok(Screen::AnnouncementDetail {
                announcement_id: DocumentId::parse(&captures[1])?,
            });
        }

        Err(ValidationError::new(format!("Unknown route: {route}")))
    }

    /// Screens only an admin may open.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Screen::AdminHome
                | Screen::PostAnnouncement
                | Screen::AddMember { .. }
                | Screen::MemberDetail { is_admin: true, .. }
        )
    }

    /// Without a role only role selection and the about page are reachable.
    pub fn is_accessible_to(&self, role: Option<Role>) -> bool {
        match role {
            None => matches!(self, Screen::RoleSelection | Screen::About),
            Some(role) => role.is_admin() || !self.requires_admin(),
        }
    }

    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Screen::AdminHome,
            Role::Member => Screen::MemberHome,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route())
    }
}
