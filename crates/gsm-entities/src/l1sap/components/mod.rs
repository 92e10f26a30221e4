pub mod chan_ctrl;
pub mod ciph;
pub mod gsmtap;
pub mod meas;
pub mod rach;
pub mod rach_load;
pub mod radio_link;
pub mod tch;
