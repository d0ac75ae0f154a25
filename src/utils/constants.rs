//! Shared constants and defaults

pub const DEFAULT_CONFIG_PATH: &str = "mock-bureau.yaml";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3006;

pub const DEFAULT_SECRET_KEY: &str = "default-secret-key";
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

pub const DEFAULT_MIN_DELAY_MS: u64 = 2000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 60000;
pub const DEFAULT_ERROR_CHANCE_PERCENT: u8 = 15;

pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 900_000;
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;

pub const DEFAULT_PAYLOAD_PF: &str = "payload-pf.json";
pub const DEFAULT_PAYLOAD_PJ: &str = "payload-pj.json";

// Routes
pub const LOGIN_PATH: &str = "/security/iam/v1/client-identities/login";
pub const PF_REPORT_PATH: &str = "/credit-services/person-information-report/v1/creditreport";
pub const PJ_REPORT_PATH: &str = "/credit-services/business-information-report/v1/reports";
pub const HEALTH_PATH: &str = "/health";

pub const DOCUMENT_ID_HEADER: &str = "x-document-id";
