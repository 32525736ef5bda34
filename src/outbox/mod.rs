mod repair;
mod worker;
mod writer;

pub use repair::OutboxRepairJob;
pub use worker::OutboxWorker;
pub use writer::OutboxWriter;
