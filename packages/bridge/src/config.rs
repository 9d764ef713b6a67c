/// Settings the bridge passes through to backend create calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Device the daemon emulates controllers on.
    pub emulation_manager: String,
    /// Block-device type sent with namespace attach and virtio-blk create.
    pub bdev_type: String,
}

impl BridgeConfig {
    pub fn with_emulation_manager(mut self, emulation_manager: impl Into<String>) -> Self {
        self.emulation_manager = emulation_manager.into();
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            emulation_manager: "mlx5_0".to_string(),
            bdev_type: "spdk".to_string(),
        }
    }
}
