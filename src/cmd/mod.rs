pub mod decode;
pub mod demo;
pub mod encode;
pub mod stats;
