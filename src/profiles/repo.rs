use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Social links, each optional. Absent platforms stay absent; they are never
/// defaulted to a normalized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// One experience entry. The id is generated on insertion and is what
/// targeted removal matches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Profile row as stored. Mutation endpoints serialize this directly, with
/// the owner as a bare id.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: Json<SocialLinks>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Profile row joined with the owner's public fields, for the read endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileWithOwner {
    #[sqlx(flatten)]
    pub profile: Profile,
    pub name: String,
    pub avatar: String,
}

/// Whitelisted field set for the upsert. Nothing outside this struct ever
/// reaches the stored document; experience and education are not part of it.
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub status: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
}

const PROFILE_COLS: &str = "id, user_id, status, company, website, location, bio, \
                            githubusername, skills, social, experience, education, updated_at";

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Create-if-absent-else-replace-fields, atomic on the user_id key.
    pub async fn upsert(db: &PgPool, user_id: Uuid, fields: &ProfileFields) -> sqlx::Result<Profile> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles
                (user_id, status, company, website, location, bio, githubusername, skills, social)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                status = EXCLUDED.status,
                company = EXCLUDED.company,
                website = EXCLUDED.website,
                location = EXCLUDED.location,
                bio = EXCLUDED.bio,
                githubusername = EXCLUDED.githubusername,
                skills = EXCLUDED.skills,
                social = EXCLUDED.social,
                updated_at = now()
            RETURNING {PROFILE_COLS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.status)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.bio)
        .bind(&fields.githubusername)
        .bind(&fields.skills)
        .bind(Json(&fields.social))
        .fetch_one(db)
        .await
    }

    pub async fn set_experience(
        db: &PgPool,
        user_id: Uuid,
        entries: &[ExperienceEntry],
    ) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET experience = $2, updated_at = now() \
             WHERE user_id = $1 RETURNING {PROFILE_COLS}"
        ))
        .bind(user_id)
        .bind(Json(entries))
        .fetch_optional(db)
        .await
    }

    pub async fn set_education(
        db: &PgPool,
        user_id: Uuid,
        entries: &[EducationEntry],
    ) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET education = $2, updated_at = now() \
             WHERE user_id = $1 RETURNING {PROFILE_COLS}"
        ))
        .bind(user_id)
        .bind(Json(entries))
        .fetch_optional(db)
        .await
    }

    pub async fn delete_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl ProfileWithOwner {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Option<ProfileWithOwner>> {
        sqlx::query_as::<_, ProfileWithOwner>(
            r#"
            SELECT p.id, p.user_id, p.status, p.company, p.website, p.location, p.bio,
                   p.githubusername, p.skills, p.social, p.experience, p.education,
                   p.updated_at, u.name, u.avatar
              FROM profiles p
              JOIN users u ON u.id = p.user_id
             WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<ProfileWithOwner>> {
        sqlx::query_as::<_, ProfileWithOwner>(
            r#"
            SELECT p.id, p.user_id, p.status, p.company, p.website, p.location, p.bio,
                   p.githubusername, p.skills, p.social, p.experience, p.education,
                   p.updated_at, u.name, u.avatar
              FROM profiles p
              JOIN users u ON u.id = p.user_id
             ORDER BY p.updated_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serializes_owner_as_bare_id() {
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: "Developer".into(),
            company: None,
            website: None,
            location: None,
            bio: None,
            githubusername: None,
            skills: vec!["js".into(), "node".into()],
            social: Json(SocialLinks::default()),
            experience: Json(Vec::new()),
            education: Json(Vec::new()),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["user_id"], serde_json::json!(profile.user_id));
        assert_eq!(json["skills"], serde_json::json!(["js", "node"]));
    }

    #[test]
    fn absent_social_links_stay_absent() {
        let social = SocialLinks {
            twitter: Some("https://twitter.com/alice".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&social).unwrap();
        assert!(json.get("twitter").is_some());
        assert!(json.get("youtube").is_none());
        assert!(json.get("facebook").is_none());
    }

    #[test]
    fn experience_entries_roundtrip_through_json() {
        let entry = ExperienceEntry {
            id: Uuid::new_v4(),
            title: "Engineer".into(),
            company: "Acme".into(),
            location: None,
            from: "2020-01-01".into(),
            to: None,
            current: true,
            description: Some("things".into()),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: ExperienceEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
