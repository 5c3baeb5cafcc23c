/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub aws_region: String,
    pub table_name: String,
    pub api_port: u16,
    /// Write buffer capacity, capped by the store's 25-item batch limit.
    pub batch_size: usize,
    /// Attribute whose presence identifies a migratable preference record.
    /// Environment-dependent, hence configurable.
    pub category_attribute: String,
    /// Cooperative per-run deadline in seconds.
    pub run_deadline_secs: u64,
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            aws_region: std::env::var("AWS_REGION")
                .unwrap_or_else(|_| "us-east-1".to_string()),
            table_name: std::env::var("DYNAMODB_TABLE")
                .unwrap_or_else(|_| "Users".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("API_PORT must be a number"),
            batch_size: std::env::var("MIGRATION_BATCH_SIZE")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .expect("MIGRATION_BATCH_SIZE must be a number"),
            category_attribute: std::env::var("MIGRATION_CATEGORY_ATTRIBUTE")
                .unwrap_or_else(|_| "CategoryId".to_string()),
            run_deadline_secs: std::env::var("MIGRATION_DEADLINE_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("MIGRATION_DEADLINE_SECS must be a number"),
        }
    }
}
