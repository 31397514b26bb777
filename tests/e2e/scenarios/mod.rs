mod concurrency;
mod contexts;
mod lifecycle;
mod messages;
mod tracing_bridge;
