mod ledger;
mod memory;
mod rpc;

pub use ledger::{IdentityProvider, LedgerClient, StateProvider, TaskLedger};
pub use memory::{LedgerFixture, MemoryLedger};
pub use rpc::RpcLedger;
