use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::cache::TtlCache;
use crate::dto::dashboard::{AdminDashboardResponse, PublicDashboardResponse};
use crate::dto::tournament::TournamentResponse;
use crate::error::Result;
use crate::repository::announcement::AnnouncementRepository;
use crate::repository::dashboard::DashboardRepository;
use crate::repository::tournament::TournamentRepository;

pub const DEFAULT_DASHBOARD_TTL: Duration = Duration::from_secs(120);

const ADMIN_KEY: &str = "dashboard:admin";
const PUBLIC_KEY: &str = "dashboard:public";

const RECENT_ACTIVITY_LIMIT: i64 = 10;
const ANNOUNCEMENT_LIMIT: i64 = 5;

/// Cached admin and public dashboards.
///
/// Each view lives under its own key for the configured TTL. Any mutation
/// of tournaments, events, participants, results or announcements must call
/// [`invalidate`](Self::invalidate), which drops both.
pub struct DashboardService {
    admin: TtlCache<&'static str, AdminDashboardResponse>,
    public: TtlCache<&'static str, PublicDashboardResponse>,
}

impl DashboardService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            admin: TtlCache::new(ttl),
            public: TtlCache::new(ttl),
        }
    }

    pub async fn admin(&self, pool: &PgPool) -> Result<Arc<AdminDashboardResponse>> {
        self.admin_with(|| build_admin_dashboard(pool)).await
    }

    pub async fn public(&self, pool: &PgPool) -> Result<Arc<PublicDashboardResponse>> {
        self.public_with(|| build_public_dashboard(pool)).await
    }

    pub async fn admin_with<F, Fut>(&self, build: F) -> Result<Arc<AdminDashboardResponse>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AdminDashboardResponse>>,
    {
        self.admin.get_or_try_insert_with(ADMIN_KEY, build).await
    }

    pub async fn public_with<F, Fut>(&self, build: F) -> Result<Arc<PublicDashboardResponse>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PublicDashboardResponse>>,
    {
        self.public.get_or_try_insert_with(PUBLIC_KEY, build).await
    }

    pub fn invalidate(&self) {
        self.admin.invalidate(&ADMIN_KEY);
        self.public.invalidate(&PUBLIC_KEY);
        tracing::debug!("Dashboard caches invalidated");
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new(DEFAULT_DASHBOARD_TTL)
    }
}

pub async fn build_admin_dashboard(pool: &PgPool) -> Result<AdminDashboardResponse> {
    let dashboards = DashboardRepository::new(pool);
    let tournaments = TournamentRepository::new(pool);

    let counts = dashboards.global_counts().await?;
    let active_tournament = tournaments.find_active().await?.map(TournamentResponse::from);
    let recent_activity = dashboards.recent_activity(RECENT_ACTIVITY_LIMIT).await?;

    Ok(AdminDashboardResponse {
        counts,
        active_tournament,
        recent_activity,
        generated_at: chrono::Utc::now().naive_utc(),
    })
}

/// Fails with `NoActiveTournament` when no tournament is active.
pub async fn build_public_dashboard(pool: &PgPool) -> Result<PublicDashboardResponse> {
    let tournament = TournamentRepository::new(pool).get_active().await?;
    let dashboards = DashboardRepository::new(pool);

    let announcements = AnnouncementRepository::new(pool)
        .list_recent(tournament.tournament_id, ANNOUNCEMENT_LIMIT)
        .await?;
    let leaderboard = dashboards.leaderboard(tournament.tournament_id).await?;
    let counts = dashboards.tournament_counts(tournament.tournament_id).await?;

    Ok(PublicDashboardResponse {
        tournament: TournamentResponse::from(tournament),
        announcements,
        leaderboard,
        counts,
        generated_at: chrono::Utc::now().naive_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::dashboard::{GlobalCounts, LeaderboardEntry, TournamentCounts};
    use crate::error::StorageError;
    use uuid::Uuid;

    fn admin_view(events: i64) -> AdminDashboardResponse {
        AdminDashboardResponse {
            counts: GlobalCounts {
                events,
                ..Default::default()
            },
            active_tournament: None,
            recent_activity: Vec::new(),
            generated_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn public_view(points: i64) -> PublicDashboardResponse {
        PublicDashboardResponse {
            tournament: TournamentResponse {
                tournament_id: Uuid::new_v4(),
                name: "Sports Day".to_string(),
                venue: None,
                event_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 14).unwrap(),
                is_active: true,
                created_at: chrono::Utc::now().naive_utc(),
            },
            announcements: Vec::new(),
            leaderboard: vec![LeaderboardEntry {
                house_id: Uuid::new_v4(),
                house_name: "Phoenix".to_string(),
                color: None,
                total_points: points,
                first_places: 0,
            }],
            counts: TournamentCounts::default(),
            generated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_within_ttl_returns_same_view() {
        let service = DashboardService::default();

        let first = service.admin_with(|| async { Ok(admin_view(3)) }).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        let second = service.admin_with(|| async { Ok(admin_view(4)) }).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.counts.events, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_view_is_rebuilt() {
        let service = DashboardService::default();

        service.public_with(|| async { Ok(public_view(10)) }).await.unwrap();
        tokio::time::advance(DEFAULT_DASHBOARD_TTL).await;
        let rebuilt = service.public_with(|| async { Ok(public_view(25)) }).await.unwrap();

        assert_eq!(rebuilt.leaderboard[0].total_points, 25);
    }

    #[tokio::test]
    async fn test_invalidate_drops_both_views() {
        let service = DashboardService::default();
        service.admin_with(|| async { Ok(admin_view(1)) }).await.unwrap();
        service.public_with(|| async { Ok(public_view(1)) }).await.unwrap();

        service.invalidate();

        let admin = service.admin_with(|| async { Ok(admin_view(2)) }).await.unwrap();
        let public = service.public_with(|| async { Ok(public_view(2)) }).await.unwrap();
        assert_eq!(admin.counts.events, 2);
        assert_eq!(public.leaderboard[0].total_points, 2);
    }

    #[tokio::test]
    async fn test_views_are_cached_independently() {
        let service = DashboardService::default();
        let admin = service.admin_with(|| async { Ok(admin_view(7)) }).await.unwrap();

        let err = service
            .public_with(|| async { Err(StorageError::NoActiveTournament) })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NoActiveTournament));

        let again = service.admin_with(|| async { Ok(admin_view(8)) }).await.unwrap();
        assert!(Arc::ptr_eq(&admin, &again));
    }
}
