use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{AppConfig, CorsConfig, ServerConfig, load_s3_client},
    database,
    error::{AppError, Result},
    routes,
    services::{
        cloudinary_service::CloudinaryClient, media::MediaServices,
        storage_service::S3ObjectStorage,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub media: MediaServices,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;

    let s3_client = load_s3_client(&config.storage).await?;
    let storage = S3ObjectStorage::new(
        s3_client,
        &config.storage.bucket,
        &config.storage.public_url,
    );
    let cdn = CloudinaryClient::new(&config.cloudinary);

    let state = AppState {
        db: pool,
        media: MediaServices::new(Arc::new(cdn), Arc::new(storage)),
    };

    router(state, &config.server, &config.cors)
}

/// Routes plus the HTTP layers, over an already assembled state.
pub fn router(state: AppState, server: &ServerConfig, cors: &CorsConfig) -> Result<Router> {
    let app = routes::create_router()
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer> {
    let allow_origin = if cors.allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let origins = cors
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allow_origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_origins() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://shop.example\n".to_string()],
        };

        assert!(matches!(cors_layer(&cors), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn accepts_listed_or_missing_origins() {
        let listed = CorsConfig {
            allowed_origins: vec!["https://shop.example".to_string()],
        };
        let open = CorsConfig {
            allowed_origins: Vec::new(),
        };

        assert!(cors_layer(&listed).is_ok());
        assert!(cors_layer(&open).is_ok());
    }
}
