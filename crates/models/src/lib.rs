pub mod errors;
pub mod db;
pub mod service;
pub mod link;
pub mod coach_service;
pub mod abonement_service;

#[cfg(test)]
mod tests;
