use std::sync::{Arc, Mutex, MutexGuard};

use nvbridge_backend::RpcChannel;

use crate::directory::Directory;
use crate::pagination::PageCursors;
use crate::{BridgeConfig, Status};

/// Everything the bridge remembers between calls.
#[derive(Debug, Default)]
pub(crate) struct BridgeState {
    pub directory: Directory,
    pub cursors: PageCursors,
}

/// Translates resource-API calls into backend RPCs.
///
/// One mutex guards the directory and the page cursors and is held for the
/// whole of a call, backend round-trip included, so calls never interleave.
/// `Bridge` is `Send + Sync`; share it behind an `Arc`.
pub struct Bridge {
    channel: Arc<dyn RpcChannel>,
    config: BridgeConfig,
    state: Mutex<BridgeState>,
}

impl Bridge {
    pub fn new(channel: impl RpcChannel + 'static, config: BridgeConfig) -> Self {
        Self::with_shared_channel(Arc::new(channel), config)
    }

    pub fn with_shared_channel(channel: Arc<dyn RpcChannel>, config: BridgeConfig) -> Self {
        Self {
            channel,
            config,
            state: Mutex::new(BridgeState::default()),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub(crate) fn channel(&self) -> &dyn RpcChannel {
        self.channel.as_ref()
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, BridgeState>, Status> {
        self.state
            .lock()
            .map_err(|_| Status::internal("bridge state lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvbridge_backend::MockChannel;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn bridge_is_send_and_sync() {
        assert_send_sync::<Bridge>();
    }

    #[test]
    fn starts_empty() {
        let bridge = Bridge::new(MockChannel::new(), BridgeConfig::default());
        let state = bridge.lock().unwrap();
        assert_eq!(bridge.config().emulation_manager, "mlx5_0");
        assert!(state.directory.subsystems.name_by_key(|_| true).is_none());
    }
}
