pub mod adapter;
pub mod bind;
pub mod callable;
pub mod error;
pub mod future;
pub mod registry;
pub mod resolve;
pub mod token;
pub mod value;
