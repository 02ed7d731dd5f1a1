pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod house;
pub mod transaction;

#[cfg(test)]
mod tests;
