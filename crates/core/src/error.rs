use std::{error::Error as StdError, fmt};

use crate::Feature;

pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unsupported feature `{feature}` for dialect {dialect}: {reason}")]
    UnsupportedFeature {
        feature: Feature,
        dialect: String,
        reason: String,
    },
}

impl CompileError {
    pub fn feature(&self) -> Feature {
        match self {
            Self::UnsupportedFeature { feature, .. } => *feature,
        }
    }
}

/// One failed connection attempt against a single candidate host.
#[derive(Debug, thiserror::Error)]
#[error("host `{host}`: {source}")]
pub struct HostAttempt {
    pub host: String,
    #[source]
    pub source: BoxError,
}

#[derive(Debug)]
pub enum ConnectError {
    /// Every candidate host refused or failed; attempts are in the order tried.
    Exhausted { attempts: Vec<HostAttempt> },
}

impl ConnectError {
    pub fn attempts(&self) -> &[HostAttempt] {
        match self {
            Self::Exhausted { attempts } => attempts,
        }
    }

    pub fn attempted_hosts(&self) -> Vec<&str> {
        self.attempts()
            .iter()
            .map(|attempt| attempt.host.as_str())
            .collect()
    }
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { attempts } => {
                write!(
                    f,
                    "connection exhausted: all {} candidate host(s) failed [{}]",
                    attempts.len(),
                    self.attempted_hosts().join(", ")
                )?;
                if let Some(last) = attempts.last() {
                    write!(f, "; last error from {last}")?;
                }
                Ok(())
            }
        }
    }
}

impl StdError for ConnectError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.attempts()
            .last()
            .map(|attempt| attempt as &(dyn StdError + 'static))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("execute failed on host `{host}`: {sql}")]
    StatementFailed {
        host: String,
        sql: String,
        #[source]
        source: BoxError,
    },
}

impl ExecuteError {
    pub fn statement_failed<E>(host: impl Into<String>, sql: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::StatementFailed {
            host: host.into(),
            sql: sql.into(),
            source: Box::new(source),
        }
    }
}
