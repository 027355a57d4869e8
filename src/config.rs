use std::str::FromStr;

use crate::error::Error;

pub static DATABASE_URL: &str = "DATABASE_URL";
pub static HOST: &str = "HOST";
pub static PORT: &str = "PORT";
pub static DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub static RANDOM_QUIZ_SIZE: &str = "RANDOM_QUIZ_SIZE";

/// Number of quizzes `GET /api/quiz/random` returns when no `count` is given.
#[derive(Debug, Clone, Copy)]
pub struct RandomQuizSize(pub i64);

impl Default for RandomQuizSize {
    fn default() -> Self {
        Self(2)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub random_quiz_size: RandomQuizSize,
}

impl Config {
    /// Reads the configuration from the environment, after loading `.env`
    /// if there is one.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL).ok_or_else(|| Error::ConfigError(format!("environment variable {} not been set", DATABASE_URL)))?;
        let random_quiz_size = parse_or(&lookup, RANDOM_QUIZ_SIZE, 2)?;
        if random_quiz_size < 1 {
            return Err(Error::ConfigError(format!("{} must be at least 1", RANDOM_QUIZ_SIZE)));
        }
        Ok(Self {
            database_url,
            host: lookup(HOST).unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, PORT, 8000)?,
            max_connections: parse_or(&lookup, DATABASE_MAX_CONNECTIONS, 5)?,
            random_quiz_size: RandomQuizSize(random_quiz_size),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| Error::ConfigError(format!("invalid value for {}: {:?}", key, raw))),
        None => Ok(default),
    }
}
