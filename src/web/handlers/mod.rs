//! # Web API Request Handlers

pub mod activities;
pub mod health;
