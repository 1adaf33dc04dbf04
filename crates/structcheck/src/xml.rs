//! XML parser module

pub mod model;
pub mod parser;

pub use model::{Children, Document, Node, NodeId};
pub use parser::{Config, Parser};
