pub mod home;
pub mod location;
pub mod packages;
pub mod trainers;
