use actix_cors::Cors;
use actix_web::{
    dev::Server, http::header, middleware, web, App, HttpServer,
};

use crate::{
    configuration::{AppState, State},
    controller::{admin, krc20, mining, misc, network, price, wallet, whales},
    error::Error,
};

const JSON_LIMIT: usize = 4096;

pub async fn server_task(app_state: &AppState<State>) -> Result<(), Error> {
    let app = app_state.clone();
    tokio::spawn(async move {
        let server = init_server(app)?;
        server.await?;
        Ok(())
    })
    .await?
}

fn init_server(app_state: AppState<State>) -> Result<Server, Error> {
    let host = app_state.config.server_host.to_owned();
    let port = app_state.config.port;

    let server = HttpServer::new(move || {
        let app = app_state.clone();
        let allowed_cors = String::from("*");
        let cors_access_all =
            app.config.allowed_origins.contains(&allowed_cors);
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                if cors_access_all {
                    return true;
                }
                let allowed = &app.config.allowed_origins;
                if let Ok(origin) = origin.to_str() {
                    return allowed.contains(&origin.to_owned());
                }
                false
            })
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT])
            .allowed_header(header::CONTENT_TYPE);

        App::new()
            .wrap(cors)
            .wrap(middleware::Compress::default())
            .wrap(security_headers())
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes)
    })
    .bind((host, port))?
    .disable_signals()
    .run();
    Ok(server)
}

pub fn security_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "DENY"))
        .add((header::X_XSS_PROTECTION, "1; mode=block"))
        .add((
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=31536000; includeSubDomains",
        ))
}

/// Extractor settings and every route. Malformed bodies, queries and paths
/// are answered with the input validation envelope.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT).error_handler(
        |err, _| Error::InputValidation(err.to_string()).into(),
    ))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        Error::InputValidation(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        Error::InputValidation(err.to_string()).into()
    }))
    .service(misc::health)
    .service(
        web::scope("/api/v1")
            .service(price::current)
            .service(price::history)
            .service(network::stats)
            .service(network::health)
            .service(network::blockdag)
            .service(mining::calculate)
            .service(whales::top)
            .service(whales::stats)
            .service(wallet::index)
            .service(krc20::tokens)
            .service(krc20::token)
            .service(krc20::trending)
            .service(krc20::analytics)
            .service(admin::clear_cache)
            .service(misc::version),
    );
}
