pub mod calculator;
pub mod timing;
pub mod types;

pub use calculator::{AspectCalculator, Motion};
pub use timing::{days_to_sign_exit, format_timing_description};
pub use types::{format_aspect, Aspect, AspectInfo, LunarAspect};
