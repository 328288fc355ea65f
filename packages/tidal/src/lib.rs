pub mod asset;
pub mod clp;
pub mod exchange;
pub mod token_factory;
