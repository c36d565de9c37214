pub mod applications;
pub mod jobs;
pub mod services;
pub mod subscriptions;
pub mod vendors;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Job routes (societies post and manage, vendors search) ──
    cfg.service(
        web::scope("/jobs")
            .route("", web::post().to(jobs::create_job))
            .route("/mine", web::get().to(jobs::get_my_jobs))
            .route("/nearby", web::get().to(jobs::get_nearby_jobs))
            .route("/expire-stale", web::post().to(jobs::expire_stale))
            .route("/{id}", web::get().to(jobs::get_job))
            .route("/{id}", web::delete().to(jobs::delete_job))
            .route("/{id}/applicants", web::get().to(jobs::get_applicants))
            .route("/{id}/applicant-count", web::get().to(jobs::get_applicant_count)),
    );

    // ── Application routes (vendor applies, society decides) ──
    cfg.service(
        web::scope("/applications")
            .route("/job/{job_id}", web::post().to(applications::apply))
            .route("/{id}/approve", web::put().to(applications::approve))
            .route("/{id}/reject", web::put().to(applications::reject))
            .route("/{id}/withdraw", web::put().to(applications::withdraw)),
    );

    // ── Subscription routes (vendor only; mutations are payment-gated) ──
    cfg.service(
        web::scope("/subscriptions")
            .route("/verify", web::post().to(subscriptions::activate))
            .route("/status", web::get().to(subscriptions::status))
            .route("/services/verify", web::post().to(subscriptions::add_services)),
    );

    // ── Service catalog routes ──
    cfg.service(
        web::scope("/services")
            .route("", web::get().to(services::get_services))
            .route("", web::post().to(services::create_service)),
    );

    // ── Vendor profile routes ──
    cfg.service(
        web::scope("/vendors")
            .route("/location", web::put().to(vendors::update_location)),
    );
}
