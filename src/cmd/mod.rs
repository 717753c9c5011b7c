pub mod convert;
pub mod frames;
pub mod inspect;
