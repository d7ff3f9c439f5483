use std::io;

use winreg::enums::{
    RegType, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, KEY_SET_VALUE,
};
use winreg::{RegKey, RegValue};

use super::{ConfigStore, Scope, StoreError, StoreValue};

/// [`ConfigStore`] backed by the Windows registry
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryStore;

fn root(scope: Scope) -> RegKey {
    match scope {
        Scope::Machine => RegKey::predef(HKEY_LOCAL_MACHINE),
        Scope::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
    }
}

fn map_err(scope: Scope, path: &str, e: io::Error) -> StoreError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        StoreError::AccessDenied {
            scope,
            path: path.to_string(),
        }
    } else {
        StoreError::Io {
            scope,
            path: path.to_string(),
            source: e,
        }
    }
}

fn decode(scope: Scope, path: &str, name: &str, raw: RegValue) -> Result<StoreValue, StoreError> {
    match raw.vtype {
        RegType::REG_DWORD if raw.bytes.len() == 4 => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&raw.bytes);
            Ok(StoreValue::Dword(u32::from_le_bytes(buf)))
        }
        RegType::REG_SZ | RegType::REG_EXPAND_SZ => {
            let units: Vec<u16> = raw
                .bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .take_while(|&u| u != 0)
                .collect();
            Ok(StoreValue::Text(String::from_utf16_lossy(&units)))
        }
        _ => Err(StoreError::UnsupportedKind {
            scope,
            path: path.to_string(),
            name: name.to_string(),
        }),
    }
}

impl ConfigStore for RegistryStore {
    fn get(&self, scope: Scope, path: &str, name: &str) -> Result<Option<StoreValue>, StoreError> {
        let key = match root(scope).open_subkey_with_flags(path, KEY_READ) {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_err(scope, path, e)),
        };
        match key.get_raw_value(name) {
            Ok(raw) => decode(scope, path, name, raw).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_err(scope, path, e)),
        }
    }

    fn set(
        &self,
        scope: Scope,
        path: &str,
        name: &str,
        value: &StoreValue,
    ) -> Result<(), StoreError> {
        let (key, _) = root(scope)
            .create_subkey(path)
            .map_err(|e| map_err(scope, path, e))?;
        match value {
            StoreValue::Dword(n) => key.set_value(name, n),
            StoreValue::Text(s) => key.set_value(name, s),
        }
        .map_err(|e| map_err(scope, path, e))
    }

    fn delete_value(&self, scope: Scope, path: &str, name: &str) -> Result<(), StoreError> {
        let key = match root(scope).open_subkey_with_flags(path, KEY_SET_VALUE) {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(map_err(scope, path, e)),
        };
        match key.delete_value(name) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_err(scope, path, e)),
        }
    }

    fn path_exists(&self, scope: Scope, path: &str) -> Result<bool, StoreError> {
        match root(scope).open_subkey_with_flags(path, KEY_READ) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_err(scope, path, e)),
        }
    }
}
