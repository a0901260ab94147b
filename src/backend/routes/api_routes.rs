/**
 * API Routes
 *
 * Endpoints used by the mobile client. Handlers that take the `CurrentUser`
 * extractor require a Firebase ID token in the `Authorization: Bearer`
 * header; `/`, `/topics/`, the localize endpoints, `/leaderboard/` and
 * `/debug/content-status/` are public.
 *
 * # Routes
 *
 * ## Content
 * - `GET /quiz/`, `GET /quiz/localize/`, `POST /quiz/answer/`
 * - `GET /truefalse/`, `POST /truefalse/answer/`
 * - `GET /info/random/`
 * - `GET /challenges/random/`, `GET /challenges/{id}/localize/`
 *
 * ## User
 * - `GET /user/profile/`, `DELETE /user/me/`
 * - `PUT /user/language/`, `PUT /user/notifications/`, `PUT /user/username/`
 * - `GET|PUT /user/topics/`, `GET /user/analysis/`, `GET /user/rank/`
 * - `POST|DELETE /user/device-token/`
 * - `GET /leaderboard/`, `GET /subscription/`
 * - `POST /notifications/send_for_user/{user_id}`
 */

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::content::handlers::{
    content_status, get_quiz, get_random_challenge, get_random_info, get_true_false, localize_challenge,
    localize_quiz,
};
use crate::backend::notifications::handlers::{register_device_token, send_for_user, unregister_device_token};
use crate::backend::progress::handlers::{
    answer_quiz, answer_true_false, delete_me, get_analysis, get_leaderboard, get_profile, get_rank, get_topics,
    list_topics, put_topics, update_language, update_notifications, update_username, welcome,
};
use crate::backend::server::state::AppState;
use crate::backend::subscription::api::get_subscription;

/// Configure the client-facing routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(welcome))
        .route("/topics/", get(list_topics))
        .route("/debug/content-status/", get(content_status))
        // Content
        .route("/quiz/", get(get_quiz))
        .route("/quiz/localize/", get(localize_quiz))
        .route("/quiz/answer/", post(answer_quiz))
        .route("/truefalse/", get(get_true_false))
        .route("/truefalse/answer/", post(answer_true_false))
        .route("/info/random/", get(get_random_info))
        .route("/challenges/random/", get(get_random_challenge))
        .route("/challenges/{id}/localize/", get(localize_challenge))
        // User
        .route("/user/profile/", get(get_profile))
        .route("/user/language/", put(update_language))
        .route("/user/notifications/", put(update_notifications))
        .route("/user/topics/", get(get_topics).put(put_topics))
        .route("/user/username/", put(update_username))
        .route("/user/analysis/", get(get_analysis))
        .route("/user/rank/", get(get_rank))
        .route("/user/me/", delete(delete_me))
        .route(
            "/user/device-token/",
            post(register_device_token).delete(unregister_device_token),
        )
        .route("/leaderboard/", get(get_leaderboard))
        .route("/subscription/", get(get_subscription))
        .route("/notifications/send_for_user/{user_id}", post(send_for_user))
}
