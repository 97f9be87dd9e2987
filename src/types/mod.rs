pub mod chart;
pub mod indicators;
pub mod price;
pub mod screening;
pub mod signals;

pub use chart::*;
pub use indicators::*;
pub use price::*;
pub use screening::*;
pub use signals::*;
