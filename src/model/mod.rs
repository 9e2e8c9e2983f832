mod agency;
mod alert;
mod direction;
mod mock;
mod prediction;
mod route;
mod stop;

pub use agency::*;
pub use alert::*;
pub use direction::*;
pub use prediction::*;
pub use route::*;
pub use stop::*;
