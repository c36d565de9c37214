use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;
use velre_backend::auth::middleware::JwtSecret;
use velre_backend::cache::ServiceCatalog;
use velre_backend::create_pool;
use velre_backend::db::applications::ApprovalPolicy;
use velre_backend::handlers;
use velre_backend::payment::PaymentSecret;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let db = create_pool().await;
    let db_data = web::Data::new(db);

    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let jwt_data = web::Data::new(JwtSecret(jwt_secret));

    let payment_secret =
        std::env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET must be set");
    let payment_data = web::Data::new(PaymentSecret(payment_secret));

    let catalog = web::Data::new(ServiceCatalog::from_env());
    let approval_policy = web::Data::new(ApprovalPolicy::from_env());
    tracing::info!("approval policy: {:?}", approval_policy.get_ref());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{port}");
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(jwt_data.clone())
            .app_data(payment_data.clone())
            .app_data(catalog.clone())
            .app_data(approval_policy.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
