mod auth;
mod integration;
