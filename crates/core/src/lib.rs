mod capability;
mod config;
mod connector;
mod date_format;
mod driver;
mod error;
mod grammar;
mod ir;
mod resolver;

pub use capability::{CapabilityTable, Feature, Support};
pub use config::{ConnectionConfig, HostList, HostListError};
pub use connector::{Connection, Connector};
pub use date_format::{DEFAULT_DATE_FORMAT, DateFormat, DateFormatError};
pub use driver::{Driver, DriverRegistry};
pub use error::{
    BoxError, CompileError, ConnectError, Error, ExecuteError, HostAttempt, Result,
};
pub use grammar::{Grammar, IdentifierQuoting};
pub use ir::{
    DropIndexCommand, FulltextCommand, IndexCommand, SchemaCommand, TableReference, UniqueCommand,
};
pub use resolver::{ConnectionResolver, HostShuffle, NoShuffle, RandomShuffle, ResolvePolicy};
