//! Shared constants

pub const DEFAULT_API_BASE_URL: &str = "https://api.criteo.com";
pub const DEFAULT_METRICS_PATH: &str = "./audience-agent.prom";

pub const TOKEN_ENDPOINT: &str = "/oauth2/token";
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

// Marketing Solutions audience endpoints
pub const AUDIENCES_ENDPOINT: &str = "/marketing-solutions/audiences";
pub const AUDIENCES_SEARCH_ENDPOINT: &str = "/marketing-solutions/audiences/search";
pub const AUDIENCES_CREATE_ENDPOINT: &str = "/marketing-solutions/audiences/create";
pub const AUDIENCES_DELETE_ENDPOINT: &str = "/marketing-solutions/audiences/delete";
pub const AUDIENCES_COMPUTE_SIZES_ENDPOINT: &str = "/marketing-solutions/audiences/compute-sizes";
pub const AUDIENCES_ESTIMATE_SIZE_ENDPOINT: &str = "/marketing-solutions/audiences/estimate-size";

pub const DEFAULT_SEARCH_LIMIT: u64 = 50;
pub const DEFAULT_SEARCH_OFFSET: u64 = 0;

// Supported resources
pub const RESOURCE_AUDIENCE: &str = "audience";
