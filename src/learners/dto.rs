use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::content::repo::SubjectTag;
use crate::learners::repo::LearnerProfile;

#[derive(Debug, Serialize)]
pub struct LearnerProfileResponse {
    pub id: Uuid,
    pub interests: Vec<SubjectTag>,
    pub total_xp: i32,
    pub level: i32,
    pub badges: serde_json::Value,
    pub streak_days: i32,
    pub longest_streak: i32,
    pub last_active: OffsetDateTime,
    pub total_courses_enrolled: i32,
    pub total_courses_completed: i32,
    pub total_quizzes_attempted: i32,
    pub total_quizzes_passed: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl LearnerProfileResponse {
    pub fn from_parts(profile: LearnerProfile, interests: Vec<SubjectTag>) -> Self {
        Self {
            id: profile.id,
            interests,
            total_xp: profile.total_xp,
            level: profile.level,
            badges: profile.badges,
            streak_days: profile.streak_days,
            longest_streak: profile.longest_streak,
            last_active: profile.last_active,
            total_courses_enrolled: profile.total_courses_enrolled,
            total_courses_completed: profile.total_courses_completed,
            total_quizzes_attempted: profile.total_quizzes_attempted,
            total_quizzes_passed: profile.total_quizzes_passed,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Only the interest set is learner-writable.
#[derive(Debug, Deserialize)]
pub struct UpdateLearnerProfileRequest {
    pub interest_ids: Option<Vec<Uuid>>,
}
