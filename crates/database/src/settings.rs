use std::fmt::Display;
use std::fmt::Formatter;

#[rustfmt::skip]
const DEFAULT_HOST: &str = "localhost";
#[rustfmt::skip]
const DEFAULT_PORT: u16  = 5432;
#[rustfmt::skip]
const DEFAULT_USER: &str = "postgres";
#[rustfmt::skip]
const DEFAULT_NAME: &str = "air";

/// Connection parameters for the flight database.
///
/// A full `DB_URL` takes precedence. Otherwise the discrete
/// `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`
/// variables are consulted, each falling back to a local default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settings {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: Option<String>,
        dbname: String,
    },
}

impl Default for Settings {
    fn default() -> Self {
        Self::Parts {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            user: String::from(DEFAULT_USER),
            password: None,
            dbname: String::from(DEFAULT_NAME),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DB_URL").filter(|url| !url.is_empty()) {
            return Self::Url(url);
        }
        Self::Parts {
            host: lookup("DB_HOST").unwrap_or_else(|| String::from(DEFAULT_HOST)),
            port: lookup("DB_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            user: lookup("DB_USER").unwrap_or_else(|| String::from(DEFAULT_USER)),
            password: lookup("DB_PASSWORD"),
            dbname: lookup("DB_NAME").unwrap_or_else(|| String::from(DEFAULT_NAME)),
        }
    }
    /// Driver configuration for these settings.
    ///
    /// An unparseable `DB_URL` yields an empty configuration, which the
    /// driver rejects on connect with its own diagnostic.
    pub fn config(&self) -> tokio_postgres::Config {
        match self {
            Self::Url(url) => url
                .parse::<tokio_postgres::Config>()
                .inspect_err(|e| log::error!("invalid DB_URL: {}", e))
                .unwrap_or_default(),
            Self::Parts {
                host,
                port,
                user,
                password,
                dbname,
            } => {
                let mut config = tokio_postgres::Config::new();
                config.host(host).port(*port).user(user).dbname(dbname);
                if let Some(password) = password {
                    config.password(password);
                }
                config
            }
        }
    }
}

/// Renders the target without credentials.
impl Display for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(_) => write!(f, "DB_URL"),
            Self::Parts {
                host,
                port,
                user,
                dbname,
                ..
            } => write!(f, "{}@{}:{}/{}", user, host, port, dbname),
        }
    }
}
