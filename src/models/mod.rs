pub mod audit;
pub mod bin;
pub mod lot;
pub mod remark;
pub mod transfer;

pub use audit::*;
pub use bin::*;
pub use lot::*;
pub use remark::*;
pub use transfer::*;
