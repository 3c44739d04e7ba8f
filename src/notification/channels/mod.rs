//! 具体渠道实现

pub mod hipchat;

pub use hipchat::HipchatChannel;
