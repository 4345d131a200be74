use super::{
    Document, DocumentId, FieldValue, Fields, MemberName, RequiredText,
    ValidationError,
};

const NAME: &str = "name";
const ROLE: &str = "role";
const DOMAIN: &str = "domain";
const CONTACT: &str = "contact";
const PROFILE_IMAGE_URL: &str = "profileImageUrl";

/// A member as stored in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: DocumentId,
    pub name: String,
    pub role: String,
    pub domain: String,
    pub contact: Option<String>,
    pub profile_image_url: Option<String>,
}

impl Member {
    /// Missing string fields read as empty, missing optional fields as
    /// absent. The id always comes from the document key.
    pub fn from_document(document: &Document) -> Self {
        let text = |field| document.string(field).unwrap_or_default();
        Self {
            id: document.id.clone(),
            name: text(NAME).to_owned(),
            role: text(ROLE).to_owned(),
            domain: text(DOMAIN).to_owned(),
            contact: document.string(CONTACT).map(str::to_owned),
            profile_image_url: document
                .string(PROFILE_IMAGE_URL)
                .map(str::to_owned),
        }
    }

    pub fn with_details(id: DocumentId, details: MemberDetails) -> Self {
        Self {
            id,
            name: details.name.as_ref().to_owned(),
            role: details.role.as_ref().to_owned(),
            domain: details.domain.as_ref().to_owned(),
            contact: details.contact.map(|c| c.as_ref().to_owned()),
            profile_image_url: details.profile_image_url,
        }
    }
}

/// Validated contents of a member document.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDetails {
    pub name: MemberName,
    pub role: RequiredText,
    pub domain: RequiredText,
    pub contact: Option<RequiredText>,
    pub profile_image_url: Option<String>,
}

impl MemberDetails {
    pub fn parse(
        name: &str,
        role: &str,
        domain: &str,
        contact: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: MemberName::parse(name)?,
            role: RequiredText::parse("Role", role)?,
            domain: RequiredText::parse("Domain", domain)?,
            contact: RequiredText::parse_optional("Contact", contact)?,
            profile_image_url: None,
        })
    }

    pub fn from_member(member: &Member) -> Result<Self, ValidationError> {
        let mut details = Self::parse(
            &member.name,
            &member.role,
            &member.domain,
            member.contact.as_deref(),
        )?;
        details.profile_image_url = member.profile_image_url.clone();
        Ok(details)
    }

    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(NAME.to_owned(), self.name.as_ref().as_str().into());
        fields.insert(ROLE.to_owned(), self.role.as_ref().as_str().into());
        fields.insert(DOMAIN.to_owned(), self.domain.as_ref().as_str().into());
        fields.insert(
            CONTACT.to_owned(),
            self.contact.as_ref().map(|c| c.as_ref().to_owned()).into(),
        );
        fields.insert(
            PROFILE_IMAGE_URL.to_owned(),
            FieldValue::from(self.profile_image_url.clone()),
        );
        fields
    }
}
