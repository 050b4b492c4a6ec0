//! NVS (Non-Volatile Storage) config store.
//!
//! Implements [`ConfigPort`] for [`MonitorConfig`], stored as one `postcard`
//! blob under `boiler/moncfg`.
//!
//! - **`target_os = "espidf"`**: the default NVS partition via `EspNvs`.
//! - **`not(target_os = "espidf")`**: an in-memory map (dev/test only).

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::MonitorConfig;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

const CONFIG_NAMESPACE: &str = "boiler";
const CONFIG_KEY: &str = "moncfg";
const MAX_BLOB_SIZE: usize = 256;

pub struct NvsConfigStore {
    #[cfg(target_os = "espidf")]
    nvs: std::sync::Mutex<EspNvs<NvsDefault>>,
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsConfigStore {
    /// Open the config namespace on the default NVS partition.
    #[cfg(target_os = "espidf")]
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, ConfigError> {
        let nvs = EspNvs::new(partition, CONFIG_NAMESPACE, true).map_err(|e| {
            warn!("NvsConfigStore: open failed: {}", e);
            ConfigError::IoError
        })?;
        info!("NvsConfigStore: ESP-IDF NVS namespace '{}'", CONFIG_NAMESPACE);
        Ok(Self {
            nvs: std::sync::Mutex::new(nvs),
        })
    }

    /// In-memory store for host builds.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, ConfigError> {
        info!("NvsConfigStore: simulation backend");
        Ok(Self {
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key() -> String {
        format!("{}::{}", CONFIG_NAMESPACE, CONFIG_KEY)
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        let nvs = self.nvs.lock().map_err(|_| ConfigError::IoError)?;
        let mut buf = [0u8; MAX_BLOB_SIZE];
        match nvs.get_raw(CONFIG_KEY, &mut buf) {
            Ok(found) => Ok(found.map(<[u8]>::to_vec)),
            Err(e) => {
                warn!("NvsConfigStore: read error {}", e);
                Err(ConfigError::IoError)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_blob(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        Ok(self.store.borrow().get(&Self::composite_key()).cloned())
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(&self, bytes: &[u8]) -> Result<(), ConfigError> {
        let mut nvs = self.nvs.lock().map_err(|_| ConfigError::IoError)?;
        nvs.set_raw(CONFIG_KEY, bytes).map_err(|e| {
            warn!("NvsConfigStore: write error {}", e);
            ConfigError::IoError
        })?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_blob(&self, bytes: &[u8]) -> Result<(), ConfigError> {
        self.store
            .borrow_mut()
            .insert(Self::composite_key(), bytes.to_vec());
        Ok(())
    }
}

impl ConfigPort for NvsConfigStore {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        match self.read_blob()? {
            Some(bytes) => {
                let cfg: MonitorConfig =
                    postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                cfg.validate()?;
                info!("NvsConfigStore: loaded config ({} bytes)", bytes.len());
                Ok(cfg)
            }
            None => {
                info!("NvsConfigStore: no stored config, using defaults");
                Ok(MonitorConfig::default())
            }
        }
    }

    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::ValidationFailed("config blob too large"));
        }
        self.write_blob(&bytes)?;
        info!("NvsConfigStore: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
