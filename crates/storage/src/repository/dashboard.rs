use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::dashboard::{GlobalCounts, LeaderboardEntry, RecentActivity, TournamentCounts};
use crate::error::Result;

/// Read-only aggregate queries behind the leaderboard and dashboards
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// House totals for a tournament, highest first; equal totals are
    /// ordered by house name. Houses without points are included.
    pub async fn leaderboard(&self, tournament_id: Uuid) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT h.house_id,
                   h.name AS house_name,
                   h.color,
                   COALESCE(SUM(r.points), 0)::BIGINT AS total_points,
                   COUNT(r.result_id) FILTER (WHERE r.placement = 1) AS first_places
            FROM houses h
            LEFT JOIN results r ON r.house_id = h.house_id AND r.tournament_id = $1
            GROUP BY h.house_id, h.name, h.color
            ORDER BY total_points DESC, h.name ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn global_counts(&self) -> Result<GlobalCounts> {
        let counts = sqlx::query_as::<_, GlobalCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM tournaments) AS tournaments,
                (SELECT COUNT(*) FROM houses) AS houses,
                (SELECT COUNT(*) FROM events) AS events,
                (SELECT COUNT(*) FROM participants) AS participants,
                (SELECT COUNT(*) FROM results WHERE placement IS NOT NULL) AS results_recorded
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn tournament_counts(&self, tournament_id: Uuid) -> Result<TournamentCounts> {
        let counts = sqlx::query_as::<_, TournamentCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM events WHERE tournament_id = $1) AS events,
                (SELECT COUNT(*) FROM events
                  WHERE tournament_id = $1 AND status = 'completed') AS events_completed,
                (SELECT COUNT(*) FROM participants WHERE tournament_id = $1) AS participants,
                (SELECT COUNT(*) FROM results
                  WHERE tournament_id = $1 AND placement IS NOT NULL) AS results_recorded
            "#,
        )
        .bind(tournament_id)
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn recent_activity(&self, limit: i64) -> Result<Vec<RecentActivity>> {
        let activity = sqlx::query_as::<_, RecentActivity>(
            r#"
            SELECT u.event_update_id, u.event_id, e.name AS event_name, u.message, u.created_at
            FROM event_updates u
            INNER JOIN events e ON e.event_id = u.event_id
            ORDER BY u.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(activity)
    }
}
