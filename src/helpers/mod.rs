pub(crate) mod client_address;

pub use client_address::client_address;
