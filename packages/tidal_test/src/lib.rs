pub mod modules;

pub use cw_multi_test;
