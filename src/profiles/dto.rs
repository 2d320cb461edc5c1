use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::profiles::repo::{EducationEntry, ExperienceEntry, ProfileWithOwner, SocialLinks};

/// Skills arrive either as an already-ordered list or as one comma-delimited
/// string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub githubusername: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EducationRequest {
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub fieldofstudy: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Minimal owner fields joined onto read responses.
#[derive(Debug, Serialize)]
pub struct OwnerInfo {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// Profile as returned by the public read endpoints: the owner is expanded
/// to `{id, name, avatar}`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user: OwnerInfo,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ProfileWithOwner> for ProfileResponse {
    fn from(row: ProfileWithOwner) -> Self {
        let p = row.profile;
        Self {
            id: p.id,
            user: OwnerInfo {
                id: p.user_id,
                name: row.name,
                avatar: row.avatar,
            },
            status: p.status,
            company: p.company,
            website: p.website,
            location: p.location,
            bio: p.bio,
            githubusername: p.githubusername,
            skills: p.skills,
            social: p.social.0,
            experience: p.experience.0,
            education: p.education.0,
            updated_at: p.updated_at,
        }
    }
}

/// Confirmation body for account deletion.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub msg: &'static str,
}
