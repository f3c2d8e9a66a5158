pub mod derived;
pub mod forecast;
pub mod snapshot;

pub use derived::*;
pub use forecast::*;
pub use snapshot::*;
