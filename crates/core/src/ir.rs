mod command;
mod ident;

pub use command::{
    DropIndexCommand, FulltextCommand, IndexCommand, SchemaCommand, UniqueCommand,
};
pub use ident::TableReference;
