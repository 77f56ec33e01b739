pub mod errors;
pub mod extraction;
pub mod order;
pub mod ports;
pub mod price;
