use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Announcement;

use super::tournament::TournamentResponse;

/// One house's standing within a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub house_id: Uuid,
    pub house_name: String,
    pub color: Option<String>,
    pub total_points: i64,
    pub first_places: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub tournament_id: Uuid,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GlobalCounts {
    pub tournaments: i64,
    pub houses: i64,
    pub events: i64,
    pub participants: i64,
    pub results_recorded: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TournamentCounts {
    pub events: i64,
    pub events_completed: i64,
    pub participants: i64,
    pub results_recorded: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecentActivity {
    pub event_update_id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub message: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminDashboardResponse {
    pub counts: GlobalCounts,
    pub active_tournament: Option<TournamentResponse>,
    pub recent_activity: Vec<RecentActivity>,
    pub generated_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicDashboardResponse {
    pub tournament: TournamentResponse,
    pub announcements: Vec<Announcement>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub counts: TournamentCounts,
    pub generated_at: chrono::NaiveDateTime,
}
