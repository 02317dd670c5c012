mod catalog;
mod conversion;
mod fetch_error;
mod session;
mod snapshot;
mod state;
