use sqlx::PgPool;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::auth::repo::User;
use crate::posts::repo::Post;
use crate::profiles::dto::{EducationRequest, ExperienceRequest, SkillsInput, UpsertProfileRequest};
use crate::profiles::repo::{
    EducationEntry, ExperienceEntry, Profile, ProfileFields, SocialLinks,
};

/// Canonical stored form of a user-supplied link: parsed, scheme forced to
/// HTTPS, scheme-less input treated as a host. Input that cannot be parsed
/// at all is stored as typed.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).or_else(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => Url::parse(&format!("https://{trimmed}")),
        other => Err(other),
    });
    match parsed {
        Ok(mut url) => {
            if url.scheme() == "http" {
                let _ = url.set_scheme("https");
            }
            url.to_string()
        }
        Err(_) => trimmed.to_string(),
    }
}

fn normalize_nonempty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(normalize_url)
}

/// Comma-splitting trims both sides of every token; list input is kept
/// as-is, in order.
pub fn parse_skills(input: &SkillsInput) -> Vec<String> {
    match input {
        SkillsInput::List(list) => list.clone(),
        SkillsInput::Csv(csv) => csv.split(',').map(|s| s.trim().to_string()).collect(),
    }
}

pub fn validate_upsert(req: &UpsertProfileRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.status.as_deref().map_or(true, |s| s.trim().is_empty()) {
        errors.push("Status is required".to_string());
    }
    let skills_empty = match &req.skills {
        None => true,
        Some(SkillsInput::List(list)) => list.is_empty(),
        Some(SkillsInput::Csv(csv)) => csv.trim().is_empty(),
    };
    if skills_empty {
        errors.push("Skills is required".to_string());
    }
    errors
}

pub fn validate_experience(req: &ExperienceRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.title.as_deref().map_or(true, |s| s.trim().is_empty()) {
        errors.push("Title is required".to_string());
    }
    if req.company.as_deref().map_or(true, |s| s.trim().is_empty()) {
        errors.push("Company is required".to_string());
    }
    if req.from.as_deref().map_or(true, |s| s.trim().is_empty()) {
        errors.push("From date is required".to_string());
    }
    errors
}

pub fn validate_education(req: &EducationRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.school.as_deref().map_or(true, |s| s.trim().is_empty()) {
        errors.push("School is required".to_string());
    }
    if req.degree.as_deref().map_or(true, |s| s.trim().is_empty()) {
        errors.push("Degree is required".to_string());
    }
    if req
        .fieldofstudy
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        errors.push("Field of Study is required".to_string());
    }
    if req.from.as_deref().map_or(true, |s| s.trim().is_empty()) {
        errors.push("From date is required".to_string());
    }
    errors
}

/// Build the whitelisted field set for the upsert. Only populated social
/// links are normalized; absent ones stay absent.
pub fn build_profile_fields(req: &UpsertProfileRequest) -> ProfileFields {
    ProfileFields {
        status: req.status.clone().unwrap_or_default(),
        company: req.company.clone().filter(|v| !v.trim().is_empty()),
        website: normalize_nonempty(&req.website),
        location: req.location.clone().filter(|v| !v.trim().is_empty()),
        bio: req.bio.clone().filter(|v| !v.trim().is_empty()),
        githubusername: req
            .githubusername
            .clone()
            .filter(|v| !v.trim().is_empty()),
        skills: req.skills.as_ref().map(parse_skills).unwrap_or_default(),
        social: SocialLinks {
            youtube: normalize_nonempty(&req.youtube),
            twitter: normalize_nonempty(&req.twitter),
            instagram: normalize_nonempty(&req.instagram),
            linkedin: normalize_nonempty(&req.linkedin),
            facebook: normalize_nonempty(&req.facebook),
        },
    }
}

/// Most-recent-first: new entries always go to the front.
pub fn push_front<T>(mut entries: Vec<T>, entry: T) -> Vec<T> {
    entries.insert(0, entry);
    entries
}

/// Removing an entry that is not there is a no-op, not an error.
pub fn drop_experience(entries: Vec<ExperienceEntry>, entry_id: Uuid) -> Vec<ExperienceEntry> {
    entries.into_iter().filter(|e| e.id != entry_id).collect()
}

pub fn drop_education(entries: Vec<EducationEntry>, entry_id: Uuid) -> Vec<EducationEntry> {
    entries.into_iter().filter(|e| e.id != entry_id).collect()
}

/// Cascading account deletion: posts, then the profile, then the user, so no
/// step can orphan rows behind it. Each step is a no-op on absent rows, so a
/// crash mid-way is recovered by re-invoking.
pub async fn delete_account(db: &PgPool, user_id: Uuid) -> sqlx::Result<()> {
    Post::delete_by_user(db, user_id).await?;
    Profile::delete_by_user(db, user_id).await?;
    User::delete_by_id(db, user_id).await?;
    info!(user_id = %user_id, "account deleted");
    Ok(())
}
