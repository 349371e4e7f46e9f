use worker::Env;

use metafield_proxy::config::normalize_env_value;
use metafield_proxy::ProxyConfig;

pub fn env_string(env: &Env, key: &str) -> Option<String> {
    env.var(key)
        .ok()
        .map(|v| normalize_env_value(&v.to_string()))
        .filter(|s| !s.is_empty())
}

/// Read every proxy setting from Worker vars and secrets.
pub fn load_config(env: &Env) -> ProxyConfig {
    ProxyConfig::from_lookup(|key| env_string(env, key))
}
