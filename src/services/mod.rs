pub mod heartbeat;
#[cfg(test)]
pub mod memory_store;
pub mod storage_service;
pub mod sweep_service;
