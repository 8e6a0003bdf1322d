// Adapters layer: concrete implementations of the domain ports (roster file, outbox).

pub mod csv_store;
pub mod outbox;
