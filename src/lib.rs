pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use infrastructure::catalog::DieselCatalogGateway;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

/// The order lifecycle engine wired to its Postgres-backed adapters.
pub type AppOrderService = OrderService<DieselOrderRepository, DieselCatalogGateway>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::pay_order,
        handlers::orders::cancel_order,
        handlers::orders::list_all_orders,
        handlers::orders::list_my_orders,
    ),
    components(schemas(
        handlers::orders::OrderRequestDto,
        handlers::orders::OrderLineRequestDto,
        handlers::orders::OrderResponse,
        handlers::orders::OrderLineResponse,
    )),
    tags((name = "orders", description = "Order lifecycle and pricing"))
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        let service = OrderService::new(
            DieselOrderRepository::new(pool.clone()),
            DieselCatalogGateway::new(pool.clone()),
        );
        App::new()
            .app_data(web::Data::new(service))
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_all_orders))
                    .route("/user", web::get().to(handlers::orders::list_my_orders))
                    .route("/pay/{id}", web::post().to(handlers::orders::pay_order))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}", web::patch().to(handlers::orders::update_order))
                    .route("/{id}", web::delete().to(handlers::orders::cancel_order)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
