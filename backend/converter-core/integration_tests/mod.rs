mod catalog;
mod config;
mod conversion;
mod helpers;
mod rates_client;
mod session;
