mod cast;
mod from_scalars;

pub use cast::cast;
pub use from_scalars::from_scalars;
