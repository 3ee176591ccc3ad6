use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use sapporo_food_core::catalog::DEFAULT_CKAN_BASE;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "sapporo-food-mcpd", version, about = "Sapporo food-license MCP daemon.")]
struct CliArgs {
    /// CKAN resource id of the food-business license dataset.
    #[arg(long, env = "RESOURCE_ID")]
    resource_id: Option<String>,

    #[arg(long, env = "SAPPORO_CKAN_BASE", default_value = DEFAULT_CKAN_BASE)]
    ckan_base: String,

    #[arg(
        long,
        env = "SAPPORO_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long = "stdio",
        env = "SAPPORO_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(long, env = "SAPPORO_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone, Debug)]
pub struct DaemonConfig {
    pub resource_id: String,
    pub ckan_base: String,
    pub request_timeout: Duration,
    pub enable_stdio: bool,
    pub mcp_http_addr: SocketAddr,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl DaemonConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for DaemonConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let resource_id = args
            .resource_id
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("RESOURCE_ID"))?;

        if args.ckan_base.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "SAPPORO_CKAN_BASE",
                value: args.ckan_base,
            });
        }

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "SAPPORO_REQUEST_TIMEOUT_SECS",
                value: args.request_timeout_secs.to_string(),
            });
        }

        Ok(Self {
            resource_id,
            ckan_base: args.ckan_base,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            enable_stdio: args.enable_stdio,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}
