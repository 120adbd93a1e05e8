mod dataset;
mod display;
mod schema;

pub use dataset::DataSet;
pub use display::DataSetDisplay;
pub use schema::{Field, Schema, SchemaRef};
