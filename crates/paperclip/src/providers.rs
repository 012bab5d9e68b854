pub mod anthropic;
pub mod base;
pub mod catalog;
pub mod factory;
pub mod openai;
pub mod utils;

#[cfg(test)]
pub mod mock;
