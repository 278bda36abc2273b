use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Namespaced LocalStorage key for one persisted value.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

/// Load/save/clear helpers for any [`StorageKey`] type.
pub(crate) trait LocalStore: StorageKey + Sized {
    fn local_load() -> Option<Self>
    where
        Self: DeserializeOwned,
    {
        LocalStorage::get(Self::KEY).ok()
    }

    fn local_save(&self)
    where
        Self: Serialize,
    {
        if let Err(err) = try_local_save(Self::KEY, self) {
            log::error!("failed to persist {}: {:?}", Self::KEY, err);
        }
    }
}

impl<T: StorageKey> LocalStore for T {}

fn try_local_save<T: Serialize>(key: &str, value: &T) -> anyhow::Result<()> {
    LocalStorage::set(key, value)?;
    Ok(())
}

/// Loads a persisted value, falling back to its default.
pub(crate) trait LocalOrDefault {
    fn local_or_default() -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> T {
        T::local_load().unwrap_or_default()
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    let mut bytes = [0u8; 8];
    for byte in &mut bytes {
        *byte = (256.0 * random()) as u8;
    }
    u64::from_be_bytes(bytes)
}
