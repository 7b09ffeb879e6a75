use std::str::FromStr;

use anyhow::{Context, bail};
use bearergate_auth::{Algorithm, StaticKey, Verifier};
use bearergate_config::{CorsConfig, GateConfig, ServerConfig};

use crate::middleware::jwt::{AuthGate, skip_paths};
use crate::modules::profile::AccessClaims;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate_config: GateConfig,
    pub server_config: ServerConfig,
    pub cors_config: CorsConfig,
}

pub fn init_app_state() -> AppState {
    AppState {
        gate_config: GateConfig::from_env(),
        server_config: ServerConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    }
}

impl AppState {
    /// Builds the gate guarding the API from the configured HMAC secret.
    pub fn build_gate(&self) -> anyhow::Result<AuthGate<AccessClaims>> {
        build_gate(&self.gate_config)
    }
}

pub fn build_gate(config: &GateConfig) -> anyhow::Result<AuthGate<AccessClaims>> {
    let algorithm = Algorithm::from_str(&config.algorithm)
        .with_context(|| format!("unknown JWT_ALGORITHM `{}`", config.algorithm))?;

    if !matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    ) {
        bail!(
            "JWT_ALGORITHM `{}` needs a public key; only HMAC algorithms work with JWT_SECRET",
            config.algorithm
        );
    }

    let mut verifier = Verifier::<AccessClaims>::typed(
        algorithm,
        StaticKey::from_secret(config.secret.as_bytes()),
    )
    .with_leeway(config.leeway);

    if let Some(issuer) = &config.issuer {
        verifier = verifier.with_issuer(&[issuer]);
    }
    if let Some(audience) = &config.audience {
        verifier = verifier.with_audience(&[audience]);
    }

    Ok(AuthGate::new(verifier)
        .skipper(skip_paths(config.skip_paths.clone()))
        .max_form_bytes(config.max_form_bytes))
}
