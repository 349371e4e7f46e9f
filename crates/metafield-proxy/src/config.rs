pub const DEFAULT_NAMESPACE: &str = "SecondaryDesc";
pub const DEFAULT_KEY: &str = "Secondary Attribute Description";
pub const DEFAULT_API_BASE: &str = "https://api.bigcommerce.com/stores";

/// Process-wide proxy configuration.
///
/// Built once from the host environment and handed to [`crate::MetafieldProxy`];
/// handlers never read the environment themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub store_hash: Option<String>,
    pub admin_token: Option<String>,
    pub oauth_client_id: Option<String>,
    pub sf_token: Option<String>,
    pub sf_graphql_endpoint: Option<String>,
    pub channel_id: Option<String>,
    pub allowed_origins: Vec<String>,
    pub proxy_api_key: Option<String>,
    pub api_base: String,
    pub namespace: String,
    pub key: String,
    pub debug_endpoints: bool,
}

/// Strip surrounding whitespace and one pair of matching quotes.
///
/// Dashboard-managed secrets are frequently pasted with quotes included.
pub fn normalize_env_value(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

pub fn parse_bool(raw: Option<&str>) -> bool {
    matches!(
        raw.unwrap_or_default().trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn parse_origin_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ProxyConfig {
    /// Build a config from any key lookup (worker `Env`, a test map, ...).
    ///
    /// Values are normalized with [`normalize_env_value`]; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| normalize_env_value(&v))
                .filter(|v| !v.is_empty())
        };

        Self {
            store_hash: get("BC_STORE_HASH"),
            admin_token: get("BC_ADMIN_API_TOKEN").or_else(|| get("BC_ADMIN_TOKEN")),
            oauth_client_id: get("BC_OAUTH_CLIENT_ID"),
            sf_token: get("BC_SF_TOKEN"),
            sf_graphql_endpoint: get("BC_SF_GRAPHQL_ENDPOINT"),
            channel_id: get("BC_CHANNEL_ID"),
            allowed_origins: parse_origin_list(get("ALLOWED_ORIGINS").as_deref()),
            proxy_api_key: get("PROXY_API_KEY"),
            api_base: get("BC_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            namespace: get("BC_METAFIELD_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            key: get("BC_METAFIELD_KEY").unwrap_or_else(|| DEFAULT_KEY.to_string()),
            debug_endpoints: parse_bool(get("PROXY_DEBUG_ENDPOINTS").as_deref()),
        }
    }

    /// Admin REST base for this store, e.g. `https://api.bigcommerce.com/stores/abc123/v3`.
    pub fn admin_base(&self, store_hash: &str) -> String {
        format!("{}/{store_hash}/v3", self.api_base)
    }

    pub fn graphql_endpoint(&self, store_hash: &str) -> String {
        match &self.sf_graphql_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://store-{store_hash}.mybigcommerce.com/graphql"),
        }
    }
}
