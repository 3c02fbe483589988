pub mod greeting;
pub mod logout;
