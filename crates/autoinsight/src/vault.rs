//! Sealed profile records.
//!
//! The dashboard stores the owner's personal record as an opaque
//! string: `seal` turns any JSON-serializable record into one, `open`
//! turns it back or fails. The primitive behind that contract has
//! already been swapped once upstream, so [`RecordSealer`] marks the
//! seam; the shipped implementation is AES-256-GCM over the JSON
//! encoding, with a random nonce prepended and the whole blob carried
//! as base64.

use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Length of the vault key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the per-seal nonce prepended to the ciphertext.
const NONCE_LEN: usize = 12;

/// The swappable encrypt/decrypt collaborator.
///
/// `seal_value(record) -> opaque string`, `open_value(opaque) -> record
/// or failure`. Implementations are free to pick the primitive; callers
/// must treat the output as opaque and never parse it.
pub trait RecordSealer {
    /// Seal a JSON record into an opaque string.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails.
    fn seal_value(&self, record: &serde_json::Value) -> Result<String>;

    /// Open an opaque string back into a JSON record.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is malformed, tampered with, or was
    /// sealed under a different key.
    fn open_value(&self, opaque: &str) -> Result<serde_json::Value>;
}

/// AES-256-GCM record vault with a locally persisted key.
#[derive(Clone)]
pub struct Vault {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").field("key", &"<redacted>").finish()
    }
}

impl Vault {
    /// Create a vault from raw key bytes.
    #[must_use]
    pub fn from_key(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Create a vault with a freshly generated random key.
    ///
    /// The key lives only in memory; use [`Vault::load_or_generate`] to
    /// get a key that survives restarts.
    #[must_use]
    pub fn generate() -> Self {
        let key: [u8; KEY_LEN] = Aes256Gcm::generate_key(&mut OsRng).into();
        Self { key }
    }

    /// Load the key from `path`, generating and persisting one if the
    /// file does not exist yet.
    ///
    /// On unix the key file is created with mode 0600.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file exists but is unreadable or has
    /// the wrong length, or if a fresh key cannot be written.
    pub fn load_or_generate(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let bytes = std::fs::read(path).map_err(|err| Error::VaultKey {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
            let key: [u8; KEY_LEN] = bytes.try_into().map_err(|bytes: Vec<u8>| Error::VaultKey {
                path: path.to_path_buf(),
                message: format!("expected {KEY_LEN} key bytes, found {}", bytes.len()),
            })?;
            debug!("loaded vault key from {}", path.display());
            return Ok(Self { key });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let vault = Self::generate();
        std::fs::write(path, vault.key).map_err(|err| Error::VaultKey {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        restrict_key_permissions(path)?;

        info!("generated new vault key at {}", path.display());
        Ok(vault)
    }

    /// Seal any serializable record into an opaque string.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be JSON-encoded or
    /// encryption fails.
    pub fn seal<T: Serialize>(&self, record: &T) -> Result<String> {
        let plaintext = serde_json::to_vec(record)
            .map_err(|err| Error::vault_seal(format!("record is not JSON-encodable: {err}")))?;

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|_| Error::vault_seal("encryption failed"))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    /// Open an opaque string back into a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not valid base64, is truncated,
    /// fails authentication (tampered or wrong key), or decrypts to
    /// something that is not the expected record shape.
    pub fn open<T: DeserializeOwned>(&self, opaque: &str) -> Result<T> {
        let blob = BASE64
            .decode(opaque.trim())
            .map_err(|err| Error::vault_open(format!("not valid base64: {err}")))?;
        if blob.len() <= NONCE_LEN {
            return Err(Error::vault_open("sealed blob too short"));
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::vault_open("ciphertext rejected"))?;

        serde_json::from_slice(&plaintext)
            .map_err(|err| Error::vault_open(format!("payload is not a valid record: {err}")))
    }
}

impl RecordSealer for Vault {
    fn seal_value(&self, record: &serde_json::Value) -> Result<String> {
        self.seal(record)
    }

    fn open_value(&self, opaque: &str) -> Result<serde_json::Value> {
        self.open(opaque)
    }
}

#[cfg(unix)]
fn restrict_key_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|err| {
        Error::VaultKey {
            path: path.to_path_buf(),
            message: format!("failed to restrict key permissions: {err}"),
        }
    })
}

#[cfg(not(unix))]
fn restrict_key_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        plate: String,
    }

    fn sample_record() -> Record {
        Record {
            name: "John Doe".to_string(),
            plate: "MH01AB1234".to_string(),
        }
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let vault = Vault::generate();
        let sealed = vault.seal(&sample_record()).unwrap();
        let opened: Record = vault.open(&sealed).unwrap();
        assert_eq!(opened, sample_record());
    }

    #[test]
    fn test_sealed_blob_is_opaque() {
        let vault = Vault::generate();
        let sealed = vault.seal(&sample_record()).unwrap();
        // No plaintext field names or values leak into the blob
        assert!(!sealed.contains("John"));
        assert!(!sealed.contains("plate"));
        assert!(BASE64.decode(&sealed).is_ok());
    }

    #[test]
    fn test_seal_is_randomized() {
        let vault = Vault::generate();
        let first = vault.seal(&sample_record()).unwrap();
        let second = vault.seal(&sample_record()).unwrap();
        // Fresh nonce per seal, so identical records seal differently
        assert_ne!(first, second);
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let sealed = Vault::generate().seal(&sample_record()).unwrap();
        let other = Vault::generate();
        let result: Result<Record> = other.open(&sealed);
        assert!(matches!(result, Err(Error::VaultOpen { .. })));
    }

    #[test]
    fn test_open_tampered_blob_fails() {
        let vault = Vault::generate();
        let sealed = vault.seal(&sample_record()).unwrap();

        let mut blob = BASE64.decode(&sealed).unwrap();
        let mid = blob.len() / 2;
        blob[mid] ^= 0xff;
        let tampered = BASE64.encode(blob);

        let result: Result<Record> = vault.open(&tampered);
        assert!(matches!(result, Err(Error::VaultOpen { .. })));
    }

    #[test]
    fn test_open_rejects_garbage() {
        let vault = Vault::generate();
        let not_base64: Result<Record> = vault.open("not//valid//base64!!!");
        assert!(matches!(not_base64, Err(Error::VaultOpen { .. })));

        let too_short: Result<Record> = vault.open(&BASE64.encode([0u8; 4]));
        assert!(matches!(too_short, Err(Error::VaultOpen { .. })));
    }

    #[test]
    fn test_record_sealer_trait_roundtrip() {
        let vault = Vault::generate();
        let sealer: &dyn RecordSealer = &vault;

        let record = serde_json::json!({"fullName": "John Doe", "vehicleNumber": "MH01AB1234"});
        let sealed = sealer.seal_value(&record).unwrap();
        let opened = sealer.open_value(&sealed).unwrap();
        assert_eq!(opened, record);
    }

    #[test]
    fn test_load_or_generate_creates_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("keys").join("vault.key");

        assert!(!key_path.exists());
        let _vault = Vault::load_or_generate(&key_path).unwrap();
        assert!(key_path.exists());
        assert_eq!(std::fs::read(&key_path).unwrap().len(), KEY_LEN);
    }

    #[test]
    fn test_load_or_generate_key_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("vault.key");

        let first = Vault::load_or_generate(&key_path).unwrap();
        let sealed = first.seal(&sample_record()).unwrap();

        let second = Vault::load_or_generate(&key_path).unwrap();
        let opened: Record = second.open(&sealed).unwrap();
        assert_eq!(opened, sample_record());
    }

    #[test]
    fn test_load_or_generate_rejects_short_key() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("vault.key");
        std::fs::write(&key_path, [0u8; 7]).unwrap();

        let result = Vault::load_or_generate(&key_path);
        assert!(matches!(result, Err(Error::VaultKey { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_permissions_are_restricted() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("vault.key");
        let _vault = Vault::load_or_generate(&key_path).unwrap();

        let mode = std::fs::metadata(&key_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_debug_redacts_key() {
        let vault = Vault::from_key([0x42; KEY_LEN]);
        let debug_str = format!("{vault:?}");
        assert!(debug_str.contains("<redacted>"));
        assert!(!debug_str.contains("66"));
    }
}
