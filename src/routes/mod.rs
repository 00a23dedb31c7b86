pub mod admin;
pub mod analytics;
pub mod bookings;
pub mod checkout;
pub mod health;
pub mod notifications;
pub mod properties;
pub mod quotes;
pub mod recommendations;

use actix_web::web;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::role_auth::RequirePermission;
use crate::models::account::Permission;

/// Mounts every `/api` route. Middleware added last runs first, so
/// `AuthMiddleware` always wraps outside `RequirePermission`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(admin::config)
            .service(
                web::scope("/properties")
                    .route("", web::get().to(properties::search_properties))
                    .route("/{id}", web::get().to(properties::get_property))
                    .route("/{id}/reviews", web::get().to(properties::list_reviews)),
            )
            .route("/quotes", web::post().to(quotes::create_quote))
            // Protected routes
            .service(
                web::scope("/checkout")
                    .wrap(RequirePermission::new(Permission::BookingsCreate))
                    .wrap(AuthMiddleware)
                    .route("", web::post().to(checkout::start_checkout))
                    .route("/{id}", web::get().to(checkout::get_checkout))
                    .route("/{id}", web::delete().to(checkout::abandon))
                    .route("/{id}/guest", web::put().to(checkout::update_guest))
                    .route("/{id}/payment", web::put().to(checkout::update_payment))
                    .route("/{id}/advance", web::post().to(checkout::advance))
                    .route("/{id}/back", web::post().to(checkout::back)),
            )
            .service(
                web::scope("/bookings")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(bookings::list_bookings))
                    .route("/{id}", web::get().to(bookings::get_booking))
                    .route("/{id}/cancel", web::post().to(bookings::cancel_booking)),
            )
            .service(
                web::scope("/notifications")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(notifications::list_notifications))
                    .route("", web::delete().to(notifications::clear_notifications))
                    .route("/read-all", web::post().to(notifications::mark_all_read))
                    .route(
                        "/preferences",
                        web::get().to(notifications::get_preferences),
                    )
                    .route(
                        "/preferences",
                        web::put().to(notifications::update_preferences),
                    )
                    .route("/{id}", web::delete().to(notifications::delete_notification))
                    .route("/{id}/read", web::post().to(notifications::mark_read)),
            )
            .service(
                web::scope("/analytics")
                    .route("/events", web::post().to(analytics::track_event))
                    .route("/engagement", web::post().to(analytics::track_engagement))
                    .service(
                        web::resource("/insights")
                            .wrap(RequirePermission::new(Permission::AnalyticsRead))
                            .wrap(AuthMiddleware)
                            .route(web::get().to(analytics::insights)),
                    )
                    .service(
                        web::resource("/recent")
                            .wrap(RequirePermission::new(Permission::AnalyticsRead))
                            .wrap(AuthMiddleware)
                            .route(web::get().to(analytics::recent_events)),
                    ),
            )
            .service(
                web::scope("/recommendations")
                    .service(
                        web::scope("/saved")
                            .wrap(AuthMiddleware)
                            .route("", web::get().to(recommendations::list_saved))
                            .route(
                                "/{property_id}",
                                web::put().to(recommendations::save_property),
                            )
                            .route(
                                "/{property_id}",
                                web::delete().to(recommendations::unsave_property),
                            ),
                    )
                    .route("/{kind}", web::get().to(recommendations::get_recommendations)),
            ),
    );
}
