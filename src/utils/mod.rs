pub mod config;
pub mod flutterwave;
pub mod helpers;
