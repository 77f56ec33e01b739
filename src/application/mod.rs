pub mod order_form;
pub mod order_store;
pub mod seed;
pub mod stats;
pub mod view;
