#![no_std]

pub mod codec;
pub mod decoder;
pub mod platform;
pub mod player;
pub mod profile;
pub mod screen;
pub mod timing;
