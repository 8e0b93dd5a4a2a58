pub mod bins;
pub mod lots;
pub mod remarks;
pub mod transfers;
