use utoipa::OpenApi;

use crate::features::{
    announcements, dashboard, events, house_leaders, houses, notifications, participants, results,
    tournaments,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        tournaments::handlers::list_tournaments,
        tournaments::handlers::get_active_tournament,
        tournaments::handlers::get_tournament,
        tournaments::handlers::get_leaderboard,
        tournaments::handlers::create_tournament,
        tournaments::handlers::update_tournament,
        tournaments::handlers::delete_tournament,
        tournaments::handlers::activate_tournament,
        houses::handlers::list_houses,
        houses::handlers::get_house,
        houses::handlers::create_house,
        houses::handlers::update_house,
        houses::handlers::delete_house,
        house_leaders::handlers::list_claims,
        house_leaders::handlers::claim_house,
        house_leaders::handlers::get_own_claim,
        house_leaders::handlers::release_house,
        events::handlers::list_tournament_events,
        events::handlers::get_event,
        events::handlers::get_event_results,
        events::handlers::list_event_updates,
        events::handlers::create_event,
        events::handlers::update_event,
        events::handlers::delete_event,
        events::handlers::change_event_status,
        events::handlers::settle_event,
        events::handlers::finalize_event,
        events::handlers::add_event_update,
        events::handlers::register_participant,
        events::handlers::unregister_participant,
        participants::handlers::list_tournament_participants,
        participants::handlers::get_participant,
        participants::handlers::create_participant,
        participants::handlers::update_participant,
        participants::handlers::delete_participant,
        results::handlers::enter_result,
        announcements::handlers::list_tournament_announcements,
        announcements::handlers::create_announcement,
        announcements::handlers::delete_announcement,
        dashboard::handlers::get_public_dashboard,
        dashboard::handlers::get_admin_dashboard,
        notifications::handlers::stream_notifications,
    ),
    components(
        schemas(
            storage::dto::tournament::CreateTournamentRequest,
            storage::dto::tournament::UpdateTournamentRequest,
            storage::dto::tournament::TournamentResponse,
            storage::dto::house::CreateHouseRequest,
            storage::dto::house::UpdateHouseRequest,
            storage::dto::house::HouseResponse,
            storage::dto::house_leader::ClaimHouseRequest,
            storage::dto::house_leader::HouseLeaderResponse,
            storage::dto::event::CreateEventRequest,
            storage::dto::event::UpdateEventRequest,
            storage::dto::event::ChangeEventStatusRequest,
            storage::dto::event::CreateEventUpdateRequest,
            storage::dto::event::RegisterParticipantRequest,
            storage::dto::event::EventResponse,
            storage::dto::event::SettlementResponse,
            storage::dto::event::RecordInfo,
            storage::dto::participant::CreateParticipantRequest,
            storage::dto::participant::UpdateParticipantRequest,
            storage::dto::participant::ParticipantResponse,
            storage::dto::result::EnterResultRequest,
            storage::dto::result::ResultDetail,
            storage::dto::result::EventResultsResponse,
            storage::dto::announcement::CreateAnnouncementRequest,
            storage::dto::dashboard::LeaderboardEntry,
            storage::dto::dashboard::LeaderboardResponse,
            storage::dto::dashboard::GlobalCounts,
            storage::dto::dashboard::TournamentCounts,
            storage::dto::dashboard::RecentActivity,
            storage::dto::dashboard::AdminDashboardResponse,
            storage::dto::dashboard::PublicDashboardResponse,
            storage::dto::common::PaginationMeta,
            storage::models::Announcement,
            storage::models::EventKind,
            storage::models::EventStatus,
            storage::models::EventResult,
            storage::models::EventUpdate,
        )
    ),
    tags(
        (name = "tournaments", description = "Tournaments and the house leaderboard"),
        (name = "houses", description = "Competing houses"),
        (name = "house-leaders", description = "House claims by house-leader keys"),
        (name = "events", description = "Events, registrations, settlement and status"),
        (name = "participants", description = "Student participants"),
        (name = "results", description = "Result entry"),
        (name = "announcements", description = "Tournament announcements"),
        (name = "dashboard", description = "Cached dashboard views"),
        (name = "notifications", description = "Live notification stream"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}
