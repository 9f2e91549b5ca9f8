pub mod channels;
pub mod onboard;
pub mod serve;
pub mod status;
