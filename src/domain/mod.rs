pub mod param_info;
pub mod value;

pub use param_info::{Choice, Choices, ParamInfo};
