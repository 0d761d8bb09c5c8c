use std::sync::Arc;

use axum_test::TestServer;
use routine_config::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, PagingConfig,
    ServerConfig, StorageBackend,
};
use routine_core::{
    CompanyService, InMemoryCompanyRepository,
    query::{Paginator, default_registry},
};
use routine_server::{AppState, build_router};

// Not every test binary uses every constant
#[allow(unused)]
pub const MICROSOFT: &str = "0c131a59-dbec-4527-a92a-daeb910efecb";
#[allow(unused)]
pub const GOOGLE: &str = "080d684e-21aa-46d8-8eb8-8c6709879f59";
#[allow(unused)]
pub const ALIBABA: &str = "d76af422-8f46-429c-b576-ad4d62216861";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig::default(),
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            allowed_methods: vec!["GET".into(), "POST".into(), "PUT".into()],
            allowed_headers: vec!["Content-Type".into()],
            allow_credentials: false,
        },
        paging: PagingConfig::default(),
        storage: StorageBackend::Memory,
        dev_mode: false,
        metadata: ConfigMetadata::default(),
    }
}

/// Server over a freshly seeded in-memory store.
pub fn build_test_server() -> TestServer {
    let config = test_config();
    let paginator = Paginator::new(config.paging.max_page_size)
        .with_default_page_size(config.paging.default_page_size);
    let service = CompanyService::new(
        Arc::new(InMemoryCompanyRepository::seeded()),
        Arc::new(default_registry().expect("default mappings")),
        paginator,
    );
    let app = build_router(AppState::new(service, config));
    TestServer::new(app).expect("test server")
}
